use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest accepted session lifetime (one year)
pub const MAX_SESSION_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Session lifetime for a configured number of seconds, capped at one year
pub fn ttl_from_secs(secs: u64) -> Duration {
    Duration::seconds(secs.min(MAX_SESSION_TTL_SECS) as i64)
}

/// A logged-in user's session, resolved per request from its bearer token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Opens a new session for `username` valid for `ttl`
    pub fn new(username: impl Into<String>, ttl: Duration) -> Self {
        let created_at = Utc::now();
        Self {
            token: Uuid::new_v4(),
            username: username.into(),
            created_at,
            expires_at: created_at + ttl,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Username/password pair submitted to register or log in
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}
