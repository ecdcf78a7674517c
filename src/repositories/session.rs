use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use uuid::Uuid;

use crate::{error::Result, models::session::Session};

/// Persistent mapping of session token to session record.
///
/// Expiry is enforced twice: the store drops records after `ttl_seconds`,
/// and callers must still check `Session::is_expired` on whatever loads.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores `session` under `session_id`, replacing any previous record
    /// and resetting the time-to-live.
    async fn insert(&self, session_id: Uuid, session: &Session, ttl_seconds: u64) -> Result<()>;

    /// Loads the session for `session_id`, if any.
    async fn load(&self, session_id: Uuid) -> Result<Option<Session>>;

    /// Destroys the record for `session_id`. Removing an absent record is
    /// not an error.
    async fn delete(&self, session_id: Uuid) -> Result<()>;
}

/// `SessionStore` backed by Redis, keyed `session:{uuid}` with a JSON value.
pub struct RedisSessionStore {
    conn: ConnectionManager,
}

impl RedisSessionStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    fn key(session_id: Uuid) -> String {
        format!("session:{}", session_id)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn insert(&self, session_id: Uuid, session: &Session, ttl_seconds: u64) -> Result<()> {
        let session_json = sonic_rs::to_string(session)
            .map_err(|e| crate::error::AppError::Internal(format!("Session serialization failed: {}", e)))?;

        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(Self::key(session_id), &session_json, ttl_seconds)
            .await?;
        Ok(())
    }

    async fn load(&self, session_id: Uuid) -> Result<Option<Session>> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(Self::key(session_id)).await?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        match sonic_rs::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                // An unreadable record is as good as no record.
                tracing::warn!("❌ Invalid session JSON for {}: {}", session_id, e);
                Ok(None)
            }
        }
    }

    async fn delete(&self, session_id: Uuid) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(Self::key(session_id)).await?;
        Ok(())
    }
}
