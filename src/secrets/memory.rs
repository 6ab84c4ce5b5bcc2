use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{LumenError, Result};

use super::kvstore::{Item, Key, SecretsKVStore, ALL_KINDS};

/// Non-durable secrets store backed by a hash map. Used as the lightweight
/// backend in tests and single-process setups.
pub struct MemorySecretsStore {
    items: RwLock<HashMap<Key, String>>,
}

impl MemorySecretsStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemorySecretsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretsKVStore for MemorySecretsStore {
    async fn get(&self, org_id: i64, namespace: &str, kind: &str) -> Result<Option<String>> {
        let guard = self
            .items
            .read()
            .map_err(|_| LumenError::internal("Secrets store lock poisoned"))?;
        Ok(guard.get(&Key::new(org_id, namespace, kind)).cloned())
    }

    async fn set(&self, org_id: i64, namespace: &str, kind: &str, value: &str) -> Result<()> {
        let mut guard = self
            .items
            .write()
            .map_err(|_| LumenError::internal("Secrets store lock poisoned"))?;
        guard.insert(Key::new(org_id, namespace, kind), value.to_string());
        Ok(())
    }

    async fn del(&self, org_id: i64, namespace: &str, kind: &str) -> Result<()> {
        let mut guard = self
            .items
            .write()
            .map_err(|_| LumenError::internal("Secrets store lock poisoned"))?;
        guard.remove(&Key::new(org_id, namespace, kind));
        Ok(())
    }

    async fn keys(&self, org_id: i64, namespace: &str, kind: &str) -> Result<Vec<Key>> {
        let guard = self
            .items
            .read()
            .map_err(|_| LumenError::internal("Secrets store lock poisoned"))?;
        Ok(guard
            .keys()
            .filter(|key| {
                key.org_id == org_id
                    && key.namespace == namespace
                    && (kind == ALL_KINDS || key.kind == kind)
            })
            .cloned()
            .collect())
    }

    async fn rename(
        &self,
        org_id: i64,
        namespace: &str,
        kind: &str,
        new_namespace: &str,
    ) -> Result<()> {
        let mut guard = self
            .items
            .write()
            .map_err(|_| LumenError::internal("Secrets store lock poisoned"))?;
        // Renaming an absent key is a no-op, matching the durable store
        if let Some(value) = guard.remove(&Key::new(org_id, namespace, kind)) {
            guard.insert(Key::new(org_id, new_namespace, kind), value);
        }
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<Item>> {
        let guard = self
            .items
            .read()
            .map_err(|_| LumenError::internal("Secrets store lock poisoned"))?;
        Ok(guard
            .iter()
            .map(|(key, value)| Item {
                key: key.clone(),
                value: value.clone(),
            })
            .collect())
    }
}
