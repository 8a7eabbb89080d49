//! Redis implementation of [`Store`].
//!
//! Key layout:
//! - `famdoc:{collection}:{id}` hash with the JSON document in field `data`
//! - `famdoc:{collection}:all` sorted set of ids scored by creation time
//! - `famdoc:seq:{name}` integer counter
//! - `famdoc:unique:{namespace}` hash of key -> owner

use async_trait::async_trait;
use redis::AsyncCommands;

use crate::client::{DbResult, RedisPool};
use crate::store::Store;

/// Store backed by a managed Redis connection.
#[derive(Clone)]
pub struct RedisStore {
    pool: RedisPool,
}

impl RedisStore {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    fn record_key(collection: &str, id: &str) -> String {
        format!("famdoc:{}:{}", collection, id)
    }

    fn index_key(collection: &str) -> String {
        format!("famdoc:{}:all", collection)
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn put(&self, collection: &str, id: &str, json: &str) -> DbResult<()> {
        let mut conn = self.pool.clone();
        let key = Self::record_key(collection, id);
        conn.hset::<_, _, _, ()>(&key, "data", json).await?;

        // NX keeps the first score when a record is overwritten
        let score = chrono::Utc::now().timestamp_millis();
        let _: i64 = redis::cmd("ZADD")
            .arg(Self::index_key(collection))
            .arg("NX")
            .arg(score)
            .arg(id)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> DbResult<Option<String>> {
        let mut conn = self.pool.clone();
        let json: Option<String> = conn.hget(Self::record_key(collection, id), "data").await?;
        Ok(json)
    }

    async fn delete(&self, collection: &str, id: &str) -> DbResult<bool> {
        let mut conn = self.pool.clone();
        let removed: i64 = conn.del(Self::record_key(collection, id)).await?;
        conn.zrem::<_, _, ()>(Self::index_key(collection), id).await?;
        Ok(removed > 0)
    }

    async fn list(&self, collection: &str) -> DbResult<Vec<String>> {
        let mut conn = self.pool.clone();
        let ids: Vec<String> = conn.zrange(Self::index_key(collection), 0, -1).await?;
        let mut docs = Vec::with_capacity(ids.len());
        for id in ids {
            let json: Option<String> = conn.hget(Self::record_key(collection, &id), "data").await?;
            if let Some(j) = json {
                docs.push(j);
            }
        }
        Ok(docs)
    }

    async fn next_sequence(&self, name: &str) -> DbResult<i64> {
        let mut conn = self.pool.clone();
        let next: i64 = conn.incr(format!("famdoc:seq:{}", name), 1).await?;
        Ok(next)
    }

    async fn claim_unique(&self, namespace: &str, key: &str, owner: &str) -> DbResult<bool> {
        let mut conn = self.pool.clone();
        let claimed: bool = conn
            .hset_nx(format!("famdoc:unique:{}", namespace), key, owner)
            .await?;
        Ok(claimed)
    }

    async fn lookup_unique(&self, namespace: &str, key: &str) -> DbResult<Option<String>> {
        let mut conn = self.pool.clone();
        let owner: Option<String> = conn.hget(format!("famdoc:unique:{}", namespace), key).await?;
        Ok(owner)
    }

    async fn release_unique(&self, namespace: &str, key: &str) -> DbResult<bool> {
        let mut conn = self.pool.clone();
        let removed: i64 = conn.hdel(format!("famdoc:unique:{}", namespace), key).await?;
        Ok(removed > 0)
    }
}
