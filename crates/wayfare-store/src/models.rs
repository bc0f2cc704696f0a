//! Domain model structs persisted in the local SQLite database.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be
//! handed directly to an API or presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Coarse authorization tier for a user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular traveler account.
    User,
    /// Verified local guide.
    Guide,
    /// Platform administrator.  Only reachable through
    /// [`Database::set_user_role`](crate::Database::set_user_role).
    Admin,
}

impl Role {
    /// Stable string form stored in the `role` columns.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Guide => "guide",
            Role::Admin => "admin",
        }
    }

    /// Parse the stored string form.  Unknown values are rejected
    /// rather than defaulted, so schema drift surfaces loudly.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "user" => Some(Role::User),
            "guide" => Some(Role::Guide),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// An identity record.  The phone number is the unique login key;
/// the UUID is the stable identifier everything else references.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Stable unique identifier.
    pub id: Uuid,
    /// Phone number used as the login key.  Unique.
    pub phone: String,
    /// Display name.
    pub name: String,
    /// Effective authorization tier.  Admin-mutated only.
    pub role: Role,
    /// Self-declared tier pending verification.
    pub intended_role: Role,
    /// Argon2 PHC string, if a credential has been set.
    pub password_hash: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last modified.
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A single direct message.  Immutable once written, except for the
/// read flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Unique message identifier.
    pub id: Uuid,
    /// The sending user.
    pub sender_id: Uuid,
    /// The receiving user.
    pub recipient_id: Uuid,
    /// Message text.  Never empty.
    pub content: String,
    /// Whether the recipient has read the message.
    pub is_read: bool,
    /// When the message was sent.
    pub created_at: DateTime<Utc>,
    /// When the record was last modified (read-flag flips).
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// ConversationSummary (derived, never persisted)
// ---------------------------------------------------------------------------

/// One entry of a user's inbox: the other participant, the latest
/// message exchanged with them, and how many of their messages are
/// still unread.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationSummary {
    /// The other participant of the conversation.
    pub other_user_id: Uuid,
    /// Most recent message in either direction.
    pub last_message: Message,
    /// Messages addressed to the viewer that are still unread.
    pub unread_count: u32,
}
