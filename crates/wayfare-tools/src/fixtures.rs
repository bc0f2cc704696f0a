//! Parameterized fixture builder.
//!
//! One builder replaces the pile of near-identical seed scripts a
//! deployment tends to accumulate: a [`FixtureSet`] is a list of users
//! and a list of (sender, recipient, content, age) tuples, applied in
//! order against an open database.  Message timestamps are backdated
//! by `age` so seeded threads read like real history.

use chrono::{Duration, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use wayfare_store::{Database, Role, StoreError};

use crate::{Result, ToolsError};

/// A user to upsert before any messages are inserted.
#[derive(Debug, Clone)]
pub struct FixtureUser {
    pub phone: String,
    pub name: String,
    pub intended_role: Role,
}

/// A message between two fixture users, identified by phone.
/// `age` is subtracted from the wall clock at apply time.
#[derive(Debug, Clone)]
pub struct FixtureMessage {
    pub sender_phone: String,
    pub recipient_phone: String,
    pub content: String,
    pub age: Duration,
}

/// Outcome of one [`FixtureSet::apply`] run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FixtureReport {
    pub users_applied: usize,
    pub messages_applied: usize,
    pub messages_skipped: usize,
}

/// An ordered batch of fixture users and messages.
#[derive(Debug, Default, Clone)]
pub struct FixtureSet {
    users: Vec<FixtureUser>,
    messages: Vec<FixtureMessage>,
}

impl FixtureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user to upsert.
    pub fn user(mut self, phone: &str, name: &str, intended_role: Role) -> Self {
        self.users.push(FixtureUser {
            phone: phone.to_string(),
            name: name.to_string(),
            intended_role,
        });
        self
    }

    /// Add a message, backdated by `age` relative to apply time.
    pub fn message(mut self, sender_phone: &str, recipient_phone: &str, content: &str, age: Duration) -> Self {
        self.messages.push(FixtureMessage {
            sender_phone: sender_phone.to_string(),
            recipient_phone: recipient_phone.to_string(),
            content: content.to_string(),
            age,
        });
        self
    }

    /// Apply the batch: upsert every user, then insert every message.
    ///
    /// Individual message rows that fail with a constraint or
    /// transient error are logged and skipped so the rest of the batch
    /// still lands; anything else aborts.  No rollback of rows already
    /// applied.
    pub fn apply(&self, db: &Database) -> Result<FixtureReport> {
        let mut report = FixtureReport::default();
        let mut ids_by_phone: HashMap<&str, Uuid> = HashMap::new();

        for user in &self.users {
            let stored = db.upsert_user(&user.phone, &user.name, user.intended_role)?;
            tracing::info!(phone = %user.phone, id = %stored.id, "fixture user upserted");
            ids_by_phone.insert(user.phone.as_str(), stored.id);
            report.users_applied += 1;
        }

        let now = Utc::now();
        for message in &self.messages {
            let sender = self.resolve(db, &mut ids_by_phone, &message.sender_phone)?;
            let recipient = self.resolve(db, &mut ids_by_phone, &message.recipient_phone)?;

            match db.send_message_at(sender, recipient, &message.content, now - message.age) {
                Ok(stored) => {
                    tracing::info!(id = %stored.id, "fixture message inserted");
                    report.messages_applied += 1;
                }
                Err(e @ (StoreError::Constraint(_) | StoreError::Transient(_))) => {
                    tracing::warn!(error = %e, "skipping fixture message");
                    report.messages_skipped += 1;
                }
                Err(other) => return Err(other.into()),
            }
        }

        Ok(report)
    }

    /// Resolve a phone to a user id, consulting the store for users
    /// that were not part of this set.
    fn resolve<'a>(
        &self,
        db: &Database,
        cache: &mut HashMap<&'a str, Uuid>,
        phone: &'a str,
    ) -> Result<Uuid> {
        if let Some(id) = cache.get(phone) {
            return Ok(*id);
        }
        let user = db
            .find_user_by_phone(phone)?
            .ok_or_else(|| ToolsError::Store(StoreError::NotFound))?;
        cache.insert(phone, user.id);
        Ok(user.id)
    }
}

/// The built-in demo data: two backdated conversations between a
/// traveler and three guides, staggered over the last three hours.
pub fn demo_set() -> FixtureSet {
    FixtureSet::new()
        .user("13800138000", "Ming", Role::User)
        .user("13700137001", "Guide An", Role::Guide)
        .user("13700137002", "Guide Bo", Role::Guide)
        .user("13700137003", "Guide Chun", Role::Guide)
        // Conversation 1: traveler planning a West Lake day trip.
        .message("13800138000", "13700137001", "Hi, I'd like to hear about routes around Hangzhou", Duration::minutes(120))
        .message("13700137001", "13800138000", "Happy to help! The classic West Lake loop covers Broken Bridge and Leifeng Pagoda", Duration::minutes(90))
        .message("13800138000", "13700137001", "Sounds good, how long does it take?", Duration::minutes(60))
        .message("13700137001", "13800138000", "Six to eight hours, adjustable to your schedule", Duration::minutes(30))
        .message("13800138000", "13700137001", "And the price?", Duration::minutes(15))
        .message("13700137001", "13800138000", "The day package is 2900 including tickets and guiding", Duration::minutes(10))
        // Conversation 2: two guides coordinating a booking.
        .message("13700137002", "13700137003", "Hello, I'd like to book companion service for tomorrow", Duration::minutes(180))
        .message("13700137003", "13700137002", "I'm free tomorrow, what kind of service do you need?", Duration::minutes(165))
        .message("13700137002", "13700137003", "Just day-to-day company, shopping and such", Duration::minutes(150))
        .message("13700137003", "13700137002", "Alright, my rate is 150 per hour, does that work?", Duration::minutes(135))
}
