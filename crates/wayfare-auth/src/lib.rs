//! # wayfare-auth
//!
//! Credential hashing for Wayfare accounts.
//!
//! A thin wrapper around Argon2id producing PHC-format strings, which
//! is what the `users.password_hash` column stores.  Only the
//! administrative bootstrap tooling uses this; the messaging core
//! never touches credentials.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use thiserror::Error;

/// Errors produced while hashing or verifying credentials.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Stored hash is not a valid PHC string: {0}")]
    MalformedHash(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Hash a plaintext password with Argon2id and a random salt.
///
/// Returns a self-describing PHC string (algorithm, parameters, salt
/// and digest), suitable for storage as an opaque value.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hash(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC string.
pub fn verify_password(password: &str, stored: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| AuthError::MalformedHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
