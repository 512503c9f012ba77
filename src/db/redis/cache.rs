use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use uuid::Uuid;

use crate::error::AppError;
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Session(Uuid),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Session(token) => write!(f, "session:{}", token),
        }
    }
}

/// Creates a Redis client
///
/// Connections are opened lazily per operation as multiplexed async connections.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// JSON value store on top of Redis with per-key expiry
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
}

impl Cache {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }

    /// Retrieves a value from the cache by key
    ///
    /// If the key exists, the stored JSON is deserialized and returned.
    /// If the key does not exist (or has expired), `None` is returned.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;

        match cached {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Stores a value that expires after `ttl` seconds
    ///
    /// The write is awaited, so a following read observes it.
    pub async fn set_with_ttl<T: serde::Serialize>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: u64,
    ) -> AppResult<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::Internal(format!("Cache serialization error: {}", e)))?;

        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(key.to_string(), json, ttl).await?;
        Ok(())
    }

    pub async fn delete(&self, key: &CacheKey) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(key.to_string()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_display_session() {
        let token = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        let key = CacheKey::Session(token);
        assert_eq!(
            format!("{}", key),
            "session:67e55044-10b1-426f-9247-bb680e5fe0c8"
        );
    }

    #[test]
    fn test_create_redis_client_rejects_bad_url() {
        assert!(create_redis_client("not a url").is_err());
        assert!(create_redis_client("redis://localhost:6379").is_ok());
    }
}
