//! CRUD operations for [`Message`] records.
//!
//! Messages are immutable once written except for the read flag,
//! which only the recipient may flip.

use chrono::{DateTime, Utc};
use rusqlite::params;
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::Message;

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Send a message, timestamped now.
    ///
    /// Content must be non-empty ([`StoreError::Validation`], checked
    /// before any statement runs).  Unknown sender or recipient ids
    /// fail the foreign-key check and surface as
    /// [`StoreError::Constraint`] with no row written.
    pub fn send_message(&self, sender_id: Uuid, recipient_id: Uuid, content: &str) -> Result<Message> {
        self.send_message_at(sender_id, recipient_id, content, Utc::now())
    }

    /// Send a message with an explicit timestamp.
    ///
    /// Seeding tools use this to backdate conversation history; the
    /// validation and constraint behavior is identical to
    /// [`Database::send_message`].
    pub fn send_message_at(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Message> {
        if content.is_empty() {
            return Err(StoreError::Validation("message content is empty".into()));
        }

        let id = Uuid::new_v4();

        self.conn().execute(
            "INSERT INTO messages (id, sender_id, recipient_id, content, is_read, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)",
            params![
                id.to_string(),
                sender_id.to_string(),
                recipient_id.to_string(),
                content,
                created_at.to_rfc3339(),
            ],
        )?;

        Ok(Message {
            id,
            sender_id,
            recipient_id,
            content: content.to_string(),
            is_read: false,
            created_at,
            updated_at: created_at,
        })
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single message by UUID.
    pub fn get_message(&self, id: Uuid) -> Result<Message> {
        self.conn()
            .query_row(
                "SELECT id, sender_id, recipient_id, content, is_read, created_at, updated_at
                 FROM messages
                 WHERE id = ?1",
                params![id.to_string()],
                row_to_message,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => other.into(),
            })
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Mark a message as read on behalf of `reader_id`.
    ///
    /// Only the recipient may do this; anyone else gets
    /// [`StoreError::Authorization`].  Idempotent: the update is
    /// predicated on the message still being unread, so marking an
    /// already-read message again changes nothing (not even
    /// `updated_at`).
    pub fn mark_read(&self, message_id: Uuid, reader_id: Uuid) -> Result<Message> {
        let message = self.get_message(message_id)?;

        if message.recipient_id != reader_id {
            return Err(StoreError::Authorization(
                "only the recipient may mark a message read".into(),
            ));
        }

        self.conn().execute(
            "UPDATE messages
             SET is_read = 1, updated_at = ?1
             WHERE id = ?2 AND is_read = 0",
            params![Utc::now().to_rfc3339(), message_id.to_string()],
        )?;

        self.get_message(message_id)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete a message by UUID.  Returns `true` if a row was deleted.
    /// Not part of normal operation; administrative cleanup only.
    pub fn delete_message(&self, id: Uuid) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM messages WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(affected > 0)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`Message`].  Shared with the
/// conversation queries.
pub(crate) fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    let id_str: String = row.get(0)?;
    let sender_str: String = row.get(1)?;
    let recipient_str: String = row.get(2)?;
    let content: String = row.get(3)?;
    let is_read: bool = row.get(4)?;
    let created_str: String = row.get(5)?;
    let updated_str: String = row.get(6)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let sender_id = Uuid::parse_str(&sender_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let recipient_id = Uuid::parse_str(&recipient_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?;
    let updated_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&updated_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(Message {
        id,
        sender_id,
        recipient_id,
        content,
        is_read,
        created_at,
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::models::Role;

    fn open_test_db(dir: &tempfile::TempDir) -> Database {
        Database::open(&StoreConfig::new(dir.path().join("test.db"))).unwrap()
    }

    fn two_users(db: &Database) -> (Uuid, Uuid) {
        let a = db.upsert_user("13800138001", "Ada", Role::User).unwrap();
        let b = db.upsert_user("13800138002", "Bao", Role::Guide).unwrap();
        (a.id, b.id)
    }

    #[test]
    fn send_and_fetch_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_test_db(&dir);
        let (a, b) = two_users(&db);

        let sent = db.send_message(a, b, "hello").unwrap();
        assert!(!sent.is_read);

        let fetched = db.get_message(sent.id).unwrap();
        assert_eq!(fetched, sent);
    }

    #[test]
    fn empty_content_is_rejected_before_insert() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_test_db(&dir);
        let (a, b) = two_users(&db);

        let err = db.send_message(a, b, "").unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        assert!(db.list_conversation(a, b).unwrap().is_empty());
    }

    #[test]
    fn unknown_recipient_is_a_constraint_violation() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_test_db(&dir);
        let (a, _) = two_users(&db);
        let ghost = Uuid::new_v4();

        let err = db.send_message(a, ghost, "anyone there?").unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));

        assert!(db.list_conversation(a, ghost).unwrap().is_empty());
    }

    #[test]
    fn sender_equals_recipient_is_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_test_db(&dir);
        let (a, _) = two_users(&db);

        let note = db.send_message(a, a, "note to self").unwrap();
        assert_eq!(note.sender_id, note.recipient_id);
    }

    #[test]
    fn mark_read_requires_recipient() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_test_db(&dir);
        let (a, b) = two_users(&db);

        let msg = db.send_message(a, b, "hello").unwrap();

        let err = db.mark_read(msg.id, a).unwrap_err();
        assert!(matches!(err, StoreError::Authorization(_)));
        assert!(!db.get_message(msg.id).unwrap().is_read);

        let read = db.mark_read(msg.id, b).unwrap();
        assert!(read.is_read);
    }

    #[test]
    fn mark_read_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_test_db(&dir);
        let (a, b) = two_users(&db);

        let msg = db.send_message(a, b, "hello").unwrap();
        let first = db.mark_read(msg.id, b).unwrap();
        let second = db.mark_read(msg.id, b).unwrap();

        assert_eq!(first, second, "second mark_read must not change the row");
    }

    #[test]
    fn mark_read_on_missing_message_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_test_db(&dir);
        let (a, _) = two_users(&db);

        let err = db.mark_read(Uuid::new_v4(), a).unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn delete_message_reports_affected() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_test_db(&dir);
        let (a, b) = two_users(&db);

        let msg = db.send_message(a, b, "oops").unwrap();
        assert!(db.delete_message(msg.id).unwrap());
        assert!(!db.delete_message(msg.id).unwrap());
    }
}
