use dashmap::DashMap;

use crate::error::StoreError;

/// Process-local, concurrency-safe string map.
///
/// Built explicitly and shared behind an `Arc`; nothing here is a global. Each operation
/// touches one `DashMap` shard under that shard's lock, so operations on the same key are
/// linearizable and concurrent writers race as "last write wins".
#[derive(Debug, Default)]
pub struct KvStore {
    data: DashMap<String, String>,
}

impl KvStore {
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }

    /// Inserts or overwrites `key`.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> Result<(), StoreError> {
        let key = key.into();
        let value = value.into();
        if key.is_empty() || value.is_empty() {
            return Err(StoreError::InvalidArgument("key and value must be non-empty"));
        }

        tracing::debug!("set key={}", key);
        self.data.insert(key, value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<String, StoreError> {
        if key.is_empty() {
            return Err(StoreError::InvalidArgument("key must be non-empty"));
        }

        self.data
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    /// Removes `key`. Lookup and removal are a single step, so of two racing deletes
    /// exactly one succeeds.
    pub fn delete(&self, key: &str) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(StoreError::InvalidArgument("key must be non-empty"));
        }

        match self.data.remove(key) {
            Some(_) => {
                tracing::debug!("deleted key={}", key);
                Ok(())
            }
            None => Err(StoreError::NotFound(key.to_string())),
        }
    }

    /// Lists the keys currently present, in no particular order.
    ///
    /// Shards are read-locked one at a time: no key is duplicated or torn, but an entry
    /// written concurrently into a shard that was already visited will not show up.
    pub fn keys(&self) -> Vec<String> {
        self.data.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
