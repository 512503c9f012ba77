pub mod cache;
pub mod sessions;

pub use cache::create_redis_client;
pub use cache::Cache;
pub use cache::CacheKey;
pub use sessions::RedisSessionStore;
