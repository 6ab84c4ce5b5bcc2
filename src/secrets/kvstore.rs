use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Wildcard accepted by [`SecretsKVStore::keys`] in place of an exact kind.
pub const ALL_KINDS: &str = "*";

/// Identity of one stored secret within a backing store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    pub org_id: i64,
    pub namespace: String,
    pub kind: String,
}

impl Key {
    pub fn new(org_id: i64, namespace: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            org_id,
            namespace: namespace.into(),
            kind: kind.into(),
        }
    }
}

/// A stored value plus its key, as returned by full-store enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub key: Key,
    pub value: String,
}

/// Capability set every secrets backing store provides. Values are opaque
/// strings; encryption happens in the stores behind this trait, not above it.
#[async_trait]
pub trait SecretsKVStore: Send + Sync {
    /// Fetch one secret; `None` when the key is absent.
    async fn get(&self, org_id: i64, namespace: &str, kind: &str) -> Result<Option<String>>;

    /// Store or overwrite one secret.
    async fn set(&self, org_id: i64, namespace: &str, kind: &str, value: &str) -> Result<()>;

    /// Delete one secret. Deleting an absent key is not an error.
    async fn del(&self, org_id: i64, namespace: &str, kind: &str) -> Result<()>;

    /// List keys for an org and namespace. `kind` is an exact match or the
    /// [`ALL_KINDS`] wildcard.
    async fn keys(&self, org_id: i64, namespace: &str, kind: &str) -> Result<Vec<Key>>;

    /// Move one secret to a new namespace, keeping org and kind.
    async fn rename(
        &self,
        org_id: i64,
        namespace: &str,
        kind: &str,
        new_namespace: &str,
    ) -> Result<()>;

    /// Enumerate every secret in this store.
    async fn get_all(&self) -> Result<Vec<Item>>;
}
