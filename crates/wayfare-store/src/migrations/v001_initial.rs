//! v001 -- Initial schema creation.
//!
//! Creates the two core tables, `users` and `messages`, plus the
//! indexes the conversation queries depend on.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Users
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id            TEXT PRIMARY KEY NOT NULL,      -- UUID v4
    phone         TEXT NOT NULL UNIQUE,           -- login key
    name          TEXT NOT NULL,
    role          TEXT NOT NULL DEFAULT 'user',   -- user | guide | admin
    intended_role TEXT NOT NULL DEFAULT 'user',
    password_hash TEXT,                           -- Argon2 PHC string, nullable
    created_at    TEXT NOT NULL,                  -- ISO-8601 / RFC-3339
    updated_at    TEXT NOT NULL
);

-- ----------------------------------------------------------------
-- Messages
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS messages (
    id           TEXT PRIMARY KEY NOT NULL,       -- UUID v4
    sender_id    TEXT NOT NULL,                   -- FK -> users(id)
    recipient_id TEXT NOT NULL,                   -- FK -> users(id)
    content      TEXT NOT NULL,                   -- never empty
    is_read      INTEGER NOT NULL DEFAULT 0,      -- boolean 0/1
    created_at   TEXT NOT NULL,                   -- ISO-8601
    updated_at   TEXT NOT NULL,

    FOREIGN KEY (sender_id)    REFERENCES users(id),
    FOREIGN KEY (recipient_id) REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_messages_sender_ts
    ON messages(sender_id, created_at);

CREATE INDEX IF NOT EXISTS idx_messages_recipient_ts
    ON messages(recipient_id, created_at);

CREATE INDEX IF NOT EXISTS idx_messages_recipient_unread
    ON messages(recipient_id, is_read);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
