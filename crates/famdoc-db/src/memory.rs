//! In-memory implementation of [`Store`], used by tests and `serve --in-memory`.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::client::DbResult;
use crate::store::Store;

#[derive(Default)]
struct Collection {
    order: Vec<String>,
    docs: HashMap<String, String>,
}

#[derive(Default)]
struct Inner {
    collections: HashMap<String, Collection>,
    sequences: HashMap<String, i64>,
    uniques: HashMap<(String, String), String>,
}

/// A process-local store. Contents are lost on drop.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn put(&self, collection: &str, id: &str, json: &str) -> DbResult<()> {
        let mut inner = self.inner.write().await;
        let coll = inner.collections.entry(collection.to_string()).or_default();
        if coll.docs.insert(id.to_string(), json.to_string()).is_none() {
            coll.order.push(id.to_string());
        }
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> DbResult<Option<String>> {
        let inner = self.inner.read().await;
        Ok(inner
            .collections
            .get(collection)
            .and_then(|c| c.docs.get(id).cloned()))
    }

    async fn delete(&self, collection: &str, id: &str) -> DbResult<bool> {
        let mut inner = self.inner.write().await;
        let Some(coll) = inner.collections.get_mut(collection) else {
            return Ok(false);
        };
        let existed = coll.docs.remove(id).is_some();
        if existed {
            coll.order.retain(|i| i != id);
        }
        Ok(existed)
    }

    async fn list(&self, collection: &str) -> DbResult<Vec<String>> {
        let inner = self.inner.read().await;
        Ok(inner
            .collections
            .get(collection)
            .map(|c| {
                c.order
                    .iter()
                    .filter_map(|id| c.docs.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn next_sequence(&self, name: &str) -> DbResult<i64> {
        let mut inner = self.inner.write().await;
        let seq = inner.sequences.entry(name.to_string()).or_insert(0);
        *seq += 1;
        Ok(*seq)
    }

    async fn claim_unique(&self, namespace: &str, key: &str, owner: &str) -> DbResult<bool> {
        let mut inner = self.inner.write().await;
        let slot = (namespace.to_string(), key.to_string());
        if inner.uniques.contains_key(&slot) {
            return Ok(false);
        }
        inner.uniques.insert(slot, owner.to_string());
        Ok(true)
    }

    async fn lookup_unique(&self, namespace: &str, key: &str) -> DbResult<Option<String>> {
        let inner = self.inner.read().await;
        Ok(inner
            .uniques
            .get(&(namespace.to_string(), key.to_string()))
            .cloned())
    }

    async fn release_unique(&self, namespace: &str, key: &str) -> DbResult<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .uniques
            .remove(&(namespace.to_string(), key.to_string()))
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_overwrite_keeps_order() {
        let store = MemoryStore::new();
        store.put("family", "a", "1").await.unwrap();
        store.put("family", "b", "2").await.unwrap();
        store.put("family", "a", "3").await.unwrap();

        assert_eq!(store.list("family").await.unwrap(), vec!["3", "2"]);
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let store = MemoryStore::new();
        store.put("config", "x", "{}").await.unwrap();

        assert!(store.delete("config", "x").await.unwrap());
        assert!(!store.delete("config", "x").await.unwrap());
        assert!(store.get("config", "x").await.unwrap().is_none());
        assert!(store.list("config").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sequences_are_independent() {
        let store = MemoryStore::new();
        assert_eq!(store.next_sequence("family").await.unwrap(), 1);
        assert_eq!(store.next_sequence("family").await.unwrap(), 2);
        assert_eq!(store.next_sequence("master_data:t1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unique_claims() {
        let store = MemoryStore::new();
        assert!(store.claim_unique("email", "a@b.de", "u1").await.unwrap());
        assert!(!store.claim_unique("email", "a@b.de", "u2").await.unwrap());
        assert_eq!(
            store.lookup_unique("email", "a@b.de").await.unwrap().as_deref(),
            Some("u1")
        );
    }

    #[tokio::test]
    async fn test_released_claim_can_be_taken_again() {
        let store = MemoryStore::new();
        store.claim_unique("user_auth_id", "a1", "u1").await.unwrap();

        assert!(store.release_unique("user_auth_id", "a1").await.unwrap());
        assert!(!store.release_unique("user_auth_id", "a1").await.unwrap());
        assert!(store.lookup_unique("user_auth_id", "a1").await.unwrap().is_none());
        assert!(store.claim_unique("user_auth_id", "a1", "u2").await.unwrap());
    }
}
