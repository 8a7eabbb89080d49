//! The storage seam shared by all famdoc services.

use async_trait::async_trait;
use std::sync::Arc;

use crate::client::DbResult;

/// A JSON document store.
///
/// Records live in named collections and keep their first insertion order.
/// Sequences hand out strictly increasing numbers starting at 1. Unique
/// claims map a key within a namespace to exactly one owner.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert or overwrite a record. Overwriting keeps its list position.
    async fn put(&self, collection: &str, id: &str, json: &str) -> DbResult<()>;

    async fn get(&self, collection: &str, id: &str) -> DbResult<Option<String>>;

    /// Remove a record. Returns whether it existed.
    async fn delete(&self, collection: &str, id: &str) -> DbResult<bool>;

    /// All records of a collection in insertion order.
    async fn list(&self, collection: &str) -> DbResult<Vec<String>>;

    async fn next_sequence(&self, name: &str) -> DbResult<i64>;

    /// Claim `key` for `owner`. Returns false if the key is already taken.
    async fn claim_unique(&self, namespace: &str, key: &str, owner: &str) -> DbResult<bool>;

    async fn lookup_unique(&self, namespace: &str, key: &str) -> DbResult<Option<String>>;

    /// Give up the claim on `key`. Returns whether it was held.
    async fn release_unique(&self, namespace: &str, key: &str) -> DbResult<bool>;
}

/// Shared handle to the configured store.
pub type DbPool = Arc<dyn Store>;
