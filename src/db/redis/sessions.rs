use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::{Cache, CacheKey};
use crate::{
    db::SessionStore,
    error::AppResult,
    models::{session::MAX_SESSION_TTL_SECS, Session},
};

/// Sessions stored in Redis as JSON under `session:<token>`, expiring with the session
#[derive(Clone)]
pub struct RedisSessionStore {
    cache: Cache,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub fn new(cache: Cache, ttl_secs: u64) -> Self {
        Self {
            cache,
            ttl_secs: ttl_secs.min(MAX_SESSION_TTL_SECS),
        }
    }

    fn ttl(&self) -> Duration {
        crate::models::session::ttl_from_secs(self.ttl_secs)
    }
}

/// Drops a stored session whose `expires_at` has passed but whose key has not yet expired
fn live_session(session: Option<Session>, now: DateTime<Utc>) -> Option<Session> {
    session.filter(|s| !s.is_expired(now))
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, username: &str) -> AppResult<Session> {
        let session = Session::new(username, self.ttl());
        self.cache
            .set_with_ttl(&CacheKey::Session(session.token), &session, self.ttl_secs)
            .await?;

        tracing::debug!(username = %username, "Session created");
        Ok(session)
    }

    async fn get(&self, token: Uuid) -> AppResult<Option<Session>> {
        let session: Option<Session> = self.cache.get_from_cache(&CacheKey::Session(token)).await?;
        Ok(live_session(session, Utc::now()))
    }

    async fn revoke(&self, token: Uuid) -> AppResult<()> {
        self.cache.delete(&CacheKey::Session(token)).await
    }
}
