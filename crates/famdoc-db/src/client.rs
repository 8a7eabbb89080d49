//! Redis connection management and the data layer error type.

use redis::aio::ConnectionManager;
use thiserror::Error;

/// Data layer error types.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type for data layer operations.
pub type DbResult<T> = Result<T, DbError>;

/// Redis connection handle. ConnectionManager multiplexes internally and
/// is Clone, so callers clone it to get a mutable handle for each operation.
pub type RedisPool = ConnectionManager;

/// Open a managed Redis connection.
pub async fn connect(redis_url: &str) -> DbResult<RedisPool> {
    let client = redis::Client::open(redis_url)?;
    let manager = ConnectionManager::new(client).await?;
    Ok(manager)
}
