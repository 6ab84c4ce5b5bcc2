use crate::error::Result;

use super::fallback::FallbackKVStore;
use super::kvstore::SecretsKVStore;

/// Copy every secret from the primary store into the fallback store through
/// the unwrap accessors. The routing switch is left untouched; the caller
/// flips it once the copy has succeeded.
///
/// Returns the number of secrets copied.
pub async fn migrate_to_fallback(kv: &FallbackKVStore) -> Result<usize> {
    copy_all(kv.unwrapped_store(), kv.unwrapped_fallback()).await
}

/// Reverse migration, copying from the fallback store into the primary.
pub async fn migrate_to_primary(kv: &FallbackKVStore) -> Result<usize> {
    copy_all(kv.unwrapped_fallback(), kv.unwrapped_store()).await
}

async fn copy_all(
    source: std::sync::Arc<dyn SecretsKVStore>,
    target: std::sync::Arc<dyn SecretsKVStore>,
) -> Result<usize> {
    let items = source.get_all().await?;
    let total = items.len();

    for item in &items {
        target
            .set(
                item.key.org_id,
                &item.key.namespace,
                &item.key.kind,
                &item.value,
            )
            .await?;
    }

    tracing::info!("Migrated {} secrets between kv stores", total);
    Ok(total)
}
