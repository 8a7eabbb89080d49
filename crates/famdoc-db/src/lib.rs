//! famdoc Data Layer
//!
//! Record persistence for famdoc. Every record is stored as a JSON document
//! under a collection name and an id. Production runs on Redis; the
//! in-memory store backs tests and local development.

pub mod client;
pub mod memory;
pub mod records;
pub mod redis_store;
pub mod store;

pub use client::{DbError, DbResult, RedisPool};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use store::{DbPool, Store};

use std::sync::Arc;

/// Initialize a Redis-backed pool from a URL.
///
/// Example URL: `redis://127.0.0.1:6379`
pub async fn init_pool(redis_url: &str) -> DbResult<DbPool> {
    let conn = client::connect(redis_url).await?;
    Ok(Arc::new(RedisStore::new(conn)))
}

/// Create an empty in-memory pool.
pub fn in_memory() -> DbPool {
    Arc::new(MemoryStore::new())
}
