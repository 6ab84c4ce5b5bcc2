use std::str;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{LumenError, Result};

use super::kvstore::{Item, Key, SecretsKVStore, ALL_KINDS};

/// Durable secrets store over a sled tree. Keys are encoded as
/// `"{org}|{namespace}|{kind}"`, values as JSON-encoded records.
pub struct SledSecretsStore {
    tree: sled::Tree,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SecretRecord {
    value: String,
    created: i64,
    updated: i64,
}

impl SledSecretsStore {
    pub fn new(tree: sled::Tree) -> Self {
        Self { tree }
    }

    fn encode_key(org_id: i64, namespace: &str, kind: &str) -> Vec<u8> {
        format!("{}|{}|{}", org_id, namespace, kind).into_bytes()
    }

    fn decode_key(bytes: &[u8]) -> Result<Key> {
        let key_str = str::from_utf8(bytes).map_err(|e| {
            LumenError::internal(format!("Failed to parse sled key as UTF-8: {}", e))
        })?;

        let mut parts = key_str.splitn(3, '|');
        let (org, namespace, kind) = match (parts.next(), parts.next(), parts.next()) {
            (Some(org), Some(namespace), Some(kind)) => (org, namespace, kind),
            _ => {
                return Err(LumenError::internal(format!(
                    "Malformed secrets key '{}'",
                    key_str
                )))
            }
        };

        let org_id = org.parse::<i64>().map_err(|e| {
            LumenError::internal(format!("Failed to parse org id from key '{}': {}", key_str, e))
        })?;

        Ok(Key::new(org_id, namespace, kind))
    }

    fn read_record(&self, key: &[u8]) -> Result<Option<SecretRecord>> {
        let value = self.tree.get(key)?;
        match value {
            Some(bytes) => {
                let record: SecretRecord = serde_json::from_slice(&bytes).map_err(|e| {
                    LumenError::internal(format!("Failed to parse secret record: {}", e))
                })?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn write_record(&self, key: Vec<u8>, record: &SecretRecord) -> Result<()> {
        let encoded = serde_json::to_vec(record)
            .map_err(|e| LumenError::internal(format!("Failed to encode secret record: {}", e)))?;
        self.tree.insert(key, encoded)?;
        self.tree.flush()?;
        Ok(())
    }
}

#[async_trait]
impl SecretsKVStore for SledSecretsStore {
    async fn get(&self, org_id: i64, namespace: &str, kind: &str) -> Result<Option<String>> {
        let key = Self::encode_key(org_id, namespace, kind);
        Ok(self.read_record(&key)?.map(|record| record.value))
    }

    async fn set(&self, org_id: i64, namespace: &str, kind: &str, value: &str) -> Result<()> {
        let key = Self::encode_key(org_id, namespace, kind);
        let now = Utc::now().timestamp();

        let record = match self.read_record(&key)? {
            Some(existing) => SecretRecord {
                value: value.to_string(),
                created: existing.created,
                updated: now,
            },
            None => SecretRecord {
                value: value.to_string(),
                created: now,
                updated: now,
            },
        };

        self.write_record(key, &record)
    }

    async fn del(&self, org_id: i64, namespace: &str, kind: &str) -> Result<()> {
        let key = Self::encode_key(org_id, namespace, kind);
        self.tree.remove(key)?;
        self.tree.flush()?;
        Ok(())
    }

    async fn keys(&self, org_id: i64, namespace: &str, kind: &str) -> Result<Vec<Key>> {
        let mut keys = Vec::new();
        for entry in self.tree.iter() {
            let (key_bytes, _) = entry?;
            let key = Self::decode_key(&key_bytes)?;
            if key.org_id == org_id
                && key.namespace == namespace
                && (kind == ALL_KINDS || key.kind == kind)
            {
                keys.push(key);
            }
        }
        Ok(keys)
    }

    async fn rename(
        &self,
        org_id: i64,
        namespace: &str,
        kind: &str,
        new_namespace: &str,
    ) -> Result<()> {
        let old_key = Self::encode_key(org_id, namespace, kind);
        let record = match self.read_record(&old_key)? {
            Some(record) => record,
            // Nothing stored under the source key
            None => return Ok(()),
        };

        let moved = SecretRecord {
            value: record.value,
            created: record.created,
            updated: Utc::now().timestamp(),
        };

        self.tree.remove(old_key)?;
        self.write_record(Self::encode_key(org_id, new_namespace, kind), &moved)
    }

    async fn get_all(&self) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        for entry in self.tree.iter() {
            let (key_bytes, value_bytes) = entry?;
            let key = Self::decode_key(&key_bytes)?;
            let record: SecretRecord = serde_json::from_slice(&value_bytes).map_err(|e| {
                LumenError::internal(format!("Failed to parse secret record: {}", e))
            })?;
            items.push(Item {
                key,
                value: record.value,
            });
        }
        Ok(items)
    }
}
