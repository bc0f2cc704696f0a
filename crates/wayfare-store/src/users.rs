//! CRUD operations for [`User`] records.
//!
//! The phone number is the upsert key: registration and seeding both
//! go through [`Database::upsert_user`], which never escalates the
//! effective role.  Role changes are a separate administrative
//! operation, [`Database::set_user_role`].

use chrono::{DateTime, Utc};
use rusqlite::params;
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{Role, User};

impl Database {
    // ------------------------------------------------------------------
    // Create / update
    // ------------------------------------------------------------------

    /// Insert or update a user, keyed on the phone number.
    ///
    /// New users always start with an effective role of [`Role::User`];
    /// `intended_role` records what the user declared and stays pending
    /// until an administrator verifies it.  Updating an existing user
    /// refreshes the name and intended role but never touches the
    /// effective role.
    ///
    /// Declaring `intended_role = admin` is rejected with
    /// [`StoreError::Authorization`]: admin accounts are only created
    /// through [`Database::set_user_role`].
    pub fn upsert_user(&self, phone: &str, name: &str, intended_role: Role) -> Result<User> {
        if intended_role == Role::Admin {
            return Err(StoreError::Authorization(
                "admin role cannot be self-declared".into(),
            ));
        }

        let id = Uuid::new_v4();
        let now = Utc::now();

        self.conn().execute(
            "INSERT INTO users (id, phone, name, role, intended_role, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             ON CONFLICT(phone) DO UPDATE SET
                 name          = excluded.name,
                 intended_role = excluded.intended_role,
                 updated_at    = excluded.updated_at",
            params![
                id.to_string(),
                phone,
                name,
                Role::User.as_str(),
                intended_role.as_str(),
                now.to_rfc3339(),
            ],
        )?;

        // Re-read so the caller sees the surviving row (the insert's id
        // is discarded when the phone already existed).
        self.find_user_by_phone(phone)?.ok_or(StoreError::NotFound)
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Look up a user by phone number.  Absence is not an error.
    pub fn find_user_by_phone(&self, phone: &str) -> Result<Option<User>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, phone, name, role, intended_role, password_hash, created_at, updated_at
             FROM users
             WHERE phone = ?1",
        )?;

        let mut rows = stmt.query_map(params![phone], row_to_user)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// Fetch a single user by UUID.
    pub fn get_user(&self, id: Uuid) -> Result<User> {
        self.conn()
            .query_row(
                "SELECT id, phone, name, role, intended_role, password_hash, created_at, updated_at
                 FROM users
                 WHERE id = ?1",
                params![id.to_string()],
                row_to_user,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => other.into(),
            })
    }

    // ------------------------------------------------------------------
    // Administrative mutation
    // ------------------------------------------------------------------

    /// Set a user's effective role.  This is the only code path that
    /// can produce an admin; callers are expected to have performed
    /// their own out-of-band authorization before invoking it.
    pub fn set_user_role(&self, id: Uuid, role: Role) -> Result<User> {
        let affected = self.conn().execute(
            "UPDATE users
             SET role = ?1, intended_role = ?1, updated_at = ?2
             WHERE id = ?3",
            params![role.as_str(), Utc::now().to_rfc3339(), id.to_string()],
        )?;

        if affected == 0 {
            return Err(StoreError::NotFound);
        }

        tracing::info!(user_id = %id, role = role.as_str(), "role updated");
        self.get_user(id)
    }

    /// Store a credential hash (Argon2 PHC string) for a user.
    pub fn set_password_hash(&self, id: Uuid, password_hash: &str) -> Result<()> {
        let affected = self.conn().execute(
            "UPDATE users SET password_hash = ?1, updated_at = ?2 WHERE id = ?3",
            params![password_hash, Utc::now().to_rfc3339(), id.to_string()],
        )?;

        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete a user by UUID.  Returns `true` if a row was deleted.
    /// Used by verification tooling to clean up probe rows.
    pub fn delete_user(&self, id: Uuid) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM users WHERE id = ?1", params![id.to_string()])?;
        Ok(affected > 0)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`User`].
fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let id_str: String = row.get(0)?;
    let phone: String = row.get(1)?;
    let name: String = row.get(2)?;
    let role_str: String = row.get(3)?;
    let intended_str: String = row.get(4)?;
    let password_hash: Option<String> = row.get(5)?;
    let created_str: String = row.get(6)?;
    let updated_str: String = row.get(7)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let role = Role::parse(&role_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("unknown role: {role_str}").into(),
        )
    })?;

    let intended_role = Role::parse(&intended_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            format!("unknown role: {intended_str}").into(),
        )
    })?;

    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
        })?;

    let updated_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&updated_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(User {
        id,
        phone,
        name,
        role,
        intended_role,
        password_hash,
        created_at,
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;

    fn open_test_db(dir: &tempfile::TempDir) -> Database {
        Database::open(&StoreConfig::new(dir.path().join("test.db"))).unwrap()
    }

    #[test]
    fn upsert_creates_then_updates() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_test_db(&dir);

        let created = db.upsert_user("13800138000", "Lin", Role::Guide).unwrap();
        assert_eq!(created.role, Role::User);
        assert_eq!(created.intended_role, Role::Guide);

        let updated = db.upsert_user("13800138000", "Lin Wei", Role::Guide).unwrap();
        assert_eq!(updated.id, created.id, "phone key must be stable");
        assert_eq!(updated.name, "Lin Wei");
        assert_eq!(updated.role, Role::User, "upsert must not change role");
    }

    #[test]
    fn upsert_rejects_self_declared_admin() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_test_db(&dir);

        let err = db.upsert_user("13800138000", "Mallory", Role::Admin).unwrap_err();
        assert!(matches!(err, StoreError::Authorization(_)));
        assert!(db.find_user_by_phone("13800138000").unwrap().is_none());
    }

    #[test]
    fn find_by_phone_absence_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_test_db(&dir);

        assert!(db.find_user_by_phone("unknown").unwrap().is_none());
    }

    #[test]
    fn get_user_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_test_db(&dir);

        let err = db.get_user(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn set_user_role_escalates() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_test_db(&dir);

        let user = db.upsert_user("15988859056", "Operator", Role::User).unwrap();
        let promoted = db.set_user_role(user.id, Role::Admin).unwrap();

        assert_eq!(promoted.role, Role::Admin);
        assert_eq!(promoted.intended_role, Role::Admin);
        assert!(promoted.updated_at >= user.updated_at);
    }

    #[test]
    fn password_hash_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_test_db(&dir);

        let user = db.upsert_user("15988859056", "Operator", Role::User).unwrap();
        assert!(user.password_hash.is_none());

        db.set_password_hash(user.id, "$argon2id$v=19$m=19456,t=2,p=1$abc$def")
            .unwrap();
        let reloaded = db.get_user(user.id).unwrap();
        assert!(reloaded.password_hash.is_some());
    }

    #[test]
    fn delete_user_reports_affected() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_test_db(&dir);

        let user = db.upsert_user("13800138000", "Probe", Role::User).unwrap();
        assert!(db.delete_user(user.id).unwrap());
        assert!(!db.delete_user(user.id).unwrap());
    }
}
