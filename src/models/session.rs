use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a user session.
///
/// The session token itself is the store key; this record only binds the
/// authenticated user id to a lifetime. A record past `expires_at` is
/// treated as unauthenticated even if the store still holds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The ID of the user this session belongs to.
    pub user_id: Uuid,
    /// The timestamp when the session was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the session expires.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Creates a new session for `user_id` expiring `duration_days` from now.
    pub fn new(user_id: Uuid, duration_days: i64) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            created_at: now,
            expires_at: now + Duration::days(duration_days),
        }
    }

    /// Checks if the session has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}
