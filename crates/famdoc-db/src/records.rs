//! Typed helpers over [`Store`]: records go in and out as serde types.

use serde::{de::DeserializeOwned, Serialize};

use crate::client::{DbError, DbResult};
use crate::store::DbPool;

/// Fetch and decode a record.
pub async fn get_record<T: DeserializeOwned>(
    pool: &DbPool,
    collection: &str,
    id: &str,
) -> DbResult<Option<T>> {
    match pool.get(collection, id).await? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Fetch a record that must exist.
pub async fn require_record<T: DeserializeOwned>(
    pool: &DbPool,
    collection: &str,
    id: &str,
) -> DbResult<T> {
    get_record(pool, collection, id)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("{}: {}", collection, id)))
}

pub async fn put_record<T: Serialize>(
    pool: &DbPool,
    collection: &str,
    id: &str,
    record: &T,
) -> DbResult<()> {
    let json = serde_json::to_string(record)?;
    pool.put(collection, id, &json).await
}

pub async fn delete_record(pool: &DbPool, collection: &str, id: &str) -> DbResult<bool> {
    pool.delete(collection, id).await
}

/// Decode every record of a collection. Documents that no longer decode
/// are skipped with a warning.
pub async fn list_records<T: DeserializeOwned>(pool: &DbPool, collection: &str) -> DbResult<Vec<T>> {
    let docs = pool.list(collection).await?;
    let mut records = Vec::with_capacity(docs.len());
    for doc in docs {
        match serde_json::from_str::<T>(&doc) {
            Ok(row) => records.push(row),
            Err(e) => tracing::warn!(collection, error = %e, "skipping undecodable record"),
        }
    }
    Ok(records)
}
