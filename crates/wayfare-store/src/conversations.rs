//! Derived conversation views.
//!
//! A conversation is not a persisted entity: it is the set of messages
//! whose unordered {sender, recipient} pair matches, reconstructed at
//! query time.  Two queries exist, one per UI surface: the thread view
//! ([`Database::list_conversation`]) and the inbox view
//! ([`Database::list_conversations_for_user`]).

use rusqlite::params;
use uuid::Uuid;

use crate::database::Database;
use crate::error::Result;
use crate::messages::row_to_message;
use crate::models::{ConversationSummary, Message};

impl Database {
    /// List every message between two users, oldest first.
    ///
    /// The pair is unordered: `list_conversation(a, b)` and
    /// `list_conversation(b, a)` return the same sequence.  An empty
    /// vec means no conversation exists; that is not an error.
    /// Timestamp ties are broken by message id so the order is stable
    /// across calls.
    pub fn list_conversation(&self, user_a: Uuid, user_b: Uuid) -> Result<Vec<Message>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, sender_id, recipient_id, content, is_read, created_at, updated_at
             FROM messages
             WHERE (sender_id = ?1 AND recipient_id = ?2)
                OR (sender_id = ?2 AND recipient_id = ?1)
             ORDER BY created_at ASC, id ASC",
        )?;

        let rows = stmt.query_map(
            params![user_a.to_string(), user_b.to_string()],
            row_to_message,
        )?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }

    /// Build the inbox view for one user.
    ///
    /// Every message touching `user_id` is grouped by the other
    /// participant; each group yields its most recent message and the
    /// number of messages addressed to `user_id` that are still
    /// unread.  Groups are ordered by the last message's timestamp,
    /// most recently active first, with ties broken by the other
    /// user's id for determinism.
    pub fn list_conversations_for_user(&self, user_id: Uuid) -> Result<Vec<ConversationSummary>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, sender_id, recipient_id, content, is_read, created_at, updated_at
             FROM messages
             WHERE sender_id = ?1 OR recipient_id = ?1
             ORDER BY created_at DESC, id DESC",
        )?;

        let rows = stmt.query_map(params![user_id.to_string()], row_to_message)?;

        // Newest-first scan: the first message seen for a pair is the
        // group's last message; the rest only contribute to the unread
        // count.
        let mut summaries: Vec<ConversationSummary> = Vec::new();
        for row in rows {
            let message = row?;
            let other = if message.sender_id == user_id {
                message.recipient_id
            } else {
                message.sender_id
            };

            let unread = u32::from(message.recipient_id == user_id && !message.is_read);

            if let Some(pos) = summaries.iter().position(|s| s.other_user_id == other) {
                summaries[pos].unread_count += unread;
            } else {
                summaries.push(ConversationSummary {
                    other_user_id: other,
                    last_message: message,
                    unread_count: unread,
                });
            }
        }

        summaries.sort_by(|a, b| {
            b.last_message
                .created_at
                .cmp(&a.last_message.created_at)
                .then_with(|| a.other_user_id.cmp(&b.other_user_id))
        });

        Ok(summaries)
    }
}
