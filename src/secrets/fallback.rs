use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

use super::kvstore::{Item, Key, SecretsKVStore};

/// Decorator routing every secrets operation to one of two interchangeable
/// backing stores, switchable at runtime.
///
/// The switch exists for live migrations between storage implementations:
/// flip it once the data has been copied, without touching any call site.
/// It is a routing hint, not a transaction boundary — calls in flight around
/// a flip may land on either store.
pub struct FallbackKVStore {
    store: Arc<dyn SecretsKVStore>,
    fallback: Arc<dyn SecretsKVStore>,
    use_fallback: AtomicBool,
}

impl FallbackKVStore {
    pub fn with_fallback(
        store: Arc<dyn SecretsKVStore>,
        fallback: Arc<dyn SecretsKVStore>,
    ) -> Self {
        Self {
            store,
            fallback,
            use_fallback: AtomicBool::new(false),
        }
    }

    fn active(&self) -> &dyn SecretsKVStore {
        if self.use_fallback.load(Ordering::SeqCst) {
            self.fallback.as_ref()
        } else {
            self.store.as_ref()
        }
    }

    /// Redirect all subsequent operations to the fallback store (or back).
    pub fn use_fallback(&self, use_fallback: bool) {
        self.use_fallback.store(use_fallback, Ordering::SeqCst);
        tracing::info!("Secrets kv store fallback routing set to {}", use_fallback);
    }

    /// The primary store, bypassing routing. Migration routines read from
    /// one unwrapped store and write to the other while the switch still
    /// points at the pre-migration side.
    pub fn unwrapped_store(&self) -> Arc<dyn SecretsKVStore> {
        Arc::clone(&self.store)
    }

    /// The fallback store, bypassing routing.
    pub fn unwrapped_fallback(&self) -> Arc<dyn SecretsKVStore> {
        Arc::clone(&self.fallback)
    }
}

#[async_trait]
impl SecretsKVStore for FallbackKVStore {
    async fn get(&self, org_id: i64, namespace: &str, kind: &str) -> Result<Option<String>> {
        self.active().get(org_id, namespace, kind).await
    }

    async fn set(&self, org_id: i64, namespace: &str, kind: &str, value: &str) -> Result<()> {
        self.active().set(org_id, namespace, kind, value).await
    }

    async fn del(&self, org_id: i64, namespace: &str, kind: &str) -> Result<()> {
        self.active().del(org_id, namespace, kind).await
    }

    async fn keys(&self, org_id: i64, namespace: &str, kind: &str) -> Result<Vec<Key>> {
        self.active().keys(org_id, namespace, kind).await
    }

    async fn rename(
        &self,
        org_id: i64,
        namespace: &str,
        kind: &str,
        new_namespace: &str,
    ) -> Result<()> {
        self.active()
            .rename(org_id, namespace, kind, new_namespace)
            .await
    }

    async fn get_all(&self) -> Result<Vec<Item>> {
        self.active().get_all().await
    }
}
