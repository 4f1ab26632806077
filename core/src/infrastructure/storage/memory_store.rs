use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::{common::entities::app_errors::CoreError, library::ports::KeyValueStore};

/// Process-local store; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyValueStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entries<T>(
        &self,
        f: impl FnOnce(&mut HashMap<String, String>) -> T,
    ) -> Result<T, CoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CoreError::StorageRead("in-memory store poisoned".to_string()))?;
        Ok(f(&mut entries))
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        self.with_entries(|entries| entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CoreError> {
        self.with_entries(|entries| {
            entries.insert(key.to_string(), value);
        })
    }

    async fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.with_entries(|entries| {
            entries.remove(key);
        })
    }
}
