//! Admin-account bootstrap.
//!
//! Promotion to admin is deliberately not a public code path: the
//! operator must present a token that matches one configured
//! out-of-band (the `WAYFARE_ADMIN_TOKEN` environment variable on the
//! machine running the tool), and the password is always supplied by
//! the operator, never baked in.

use wayfare_store::{Database, Role, User};

use crate::{Result, ToolsError};

/// Environment variable holding the operator token.
pub const ADMIN_TOKEN_ENV: &str = "WAYFARE_ADMIN_TOKEN";

/// Out-of-band authorization gate for administrative promotion.
#[derive(Debug, Clone)]
pub struct OperatorGate {
    token: String,
}

impl OperatorGate {
    /// Build a gate from an explicit token.
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }

    /// Build the gate from `WAYFARE_ADMIN_TOKEN`.  `None` when the
    /// variable is unset or empty, which disables promotion entirely.
    pub fn from_env() -> Option<Self> {
        match std::env::var(ADMIN_TOKEN_ENV) {
            Ok(token) if !token.is_empty() => Some(Self::new(token)),
            _ => None,
        }
    }

    /// Check a presented token against the configured one.
    pub fn authorize(&self, presented: &str) -> Result<()> {
        // Constant-time comparison to prevent timing attacks on the token.
        use subtle::ConstantTimeEq;
        let presented_bytes = presented.as_bytes();
        let expected_bytes = self.token.as_bytes();
        if presented_bytes.len() != expected_bytes.len()
            || presented_bytes.ct_eq(expected_bytes).unwrap_u8() != 1
        {
            return Err(ToolsError::Unauthorized("token mismatch".into()));
        }

        Ok(())
    }
}

/// Promote a user (created if missing) to admin and set their
/// credential.
///
/// The gate must have authorized the presented token first; this
/// function re-checks it so the two cannot be decoupled by accident.
pub fn promote_to_admin(
    db: &Database,
    gate: &OperatorGate,
    presented_token: &str,
    phone: &str,
    name: &str,
    password: &str,
) -> Result<User> {
    gate.authorize(presented_token)?;

    let user = match db.find_user_by_phone(phone)? {
        Some(existing) => {
            tracing::info!(phone, "user exists, promoting");
            existing
        }
        None => {
            tracing::info!(phone, "creating user before promotion");
            db.upsert_user(phone, name, Role::User)?
        }
    };

    let hash = wayfare_auth::hash_password(password)?;
    db.set_password_hash(user.id, &hash)?;

    let promoted = db.set_user_role(user.id, Role::Admin)?;
    tracing::info!(phone, id = %promoted.id, "admin bootstrap complete");

    Ok(promoted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfare_store::StoreConfig;

    fn open_test_db(dir: &tempfile::TempDir) -> Database {
        Database::open(&StoreConfig::new(dir.path().join("test.db"))).unwrap()
    }

    #[test]
    fn authorize_accepts_only_the_exact_token() {
        let gate = OperatorGate::new("s3cret");

        assert!(gate.authorize("s3cret").is_ok());
        assert!(matches!(
            gate.authorize("s3creT").unwrap_err(),
            ToolsError::Unauthorized(_)
        ));
        // Different length takes the early exit, same verdict.
        assert!(matches!(
            gate.authorize("s3cret-but-longer").unwrap_err(),
            ToolsError::Unauthorized(_)
        ));
        assert!(matches!(
            gate.authorize("").unwrap_err(),
            ToolsError::Unauthorized(_)
        ));
    }

    #[test]
    fn promotion_requires_matching_token() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_test_db(&dir);
        let gate = OperatorGate::new("s3cret");

        let err = promote_to_admin(&db, &gate, "wrong", "15988859056", "Op", "hunter22")
            .unwrap_err();
        assert!(matches!(err, ToolsError::Unauthorized(_)));
        assert!(db.find_user_by_phone("15988859056").unwrap().is_none());
    }

    #[test]
    fn promotes_existing_user_and_sets_credential() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_test_db(&dir);
        let gate = OperatorGate::new("s3cret");

        db.upsert_user("15988859056", "Op", Role::User).unwrap();
        let promoted =
            promote_to_admin(&db, &gate, "s3cret", "15988859056", "Op", "hunter22").unwrap();

        assert_eq!(promoted.role, Role::Admin);
        let hash = promoted.password_hash.expect("credential must be set");
        assert!(wayfare_auth::verify_password("hunter22", &hash).unwrap());
    }

    #[test]
    fn creates_user_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_test_db(&dir);
        let gate = OperatorGate::new("s3cret");

        let promoted =
            promote_to_admin(&db, &gate, "s3cret", "15988859056", "Op", "hunter22").unwrap();
        assert_eq!(promoted.role, Role::Admin);
        assert_eq!(promoted.name, "Op");
    }
}
