use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::PluginsConfig;
use crate::error::{LumenError, Result};

use super::installer::PluginInstaller;
use super::paths::is_within_plugins_root;
use super::process::PluginProcessManager;
use super::registry::PluginRegistry;

/// Orchestrates install, upgrade and uninstall of external plugins.
///
/// Operations on the same plugin id are serialized through a per-id lock;
/// operations on different ids may run concurrently.
pub struct PluginLifecycleManager {
    registry: Arc<PluginRegistry>,
    installer: Arc<dyn PluginInstaller>,
    process: Arc<dyn PluginProcessManager>,
    plugins_dir: PathBuf,
    registry_url: String,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl PluginLifecycleManager {
    pub fn new(
        registry: Arc<PluginRegistry>,
        installer: Arc<dyn PluginInstaller>,
        process: Arc<dyn PluginProcessManager>,
        config: &PluginsConfig,
    ) -> Self {
        Self {
            registry,
            installer,
            process,
            plugins_dir: config.directory.clone(),
            registry_url: config.registry_url.clone(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Install `version` of `plugin_id`, upgrading an existing external
    /// installation when the versions differ.
    ///
    /// The upgrade path confirms the requested version with the registry
    /// service, then fully removes the current installation before
    /// installing the new one. If the install then fails, the plugin stays
    /// uninstalled; no rollback to the prior version is attempted.
    pub async fn add(&self, plugin_id: &str, version: &str) -> Result<()> {
        let lock = self.plugin_lock(plugin_id).await;
        let _guard = lock.lock().await;

        let mut zip_url: Option<String> = None;

        if let Some(existing) = self.registry.lookup(plugin_id)? {
            if !existing.is_external() {
                return Err(LumenError::InstallCorePlugin {
                    plugin_id: plugin_id.to_string(),
                });
            }

            if existing.version == version {
                return Err(LumenError::DuplicateInstall {
                    plugin_id: plugin_id.to_string(),
                    version: version.to_string(),
                    existing_dir: existing.directory,
                });
            }

            // Confirm the requested version exists before touching the
            // current installation.
            let info = self
                .installer
                .get_update_info(plugin_id, version, &self.registry_url)
                .await?;
            zip_url = Some(info.zip_url);

            self.remove_locked(plugin_id).await?;
        }

        self.installer
            .install(
                plugin_id,
                version,
                &self.plugins_dir,
                zip_url.as_deref(),
                &self.registry_url,
            )
            .await?;

        self.registry.reload_external(&self.plugins_dir).await?;

        tracing::info!("Installed plugin {} v{}", plugin_id, version);
        Ok(())
    }

    /// Uninstall an external plugin: validate, stop and unregister the
    /// instance, then delete its directory.
    pub async fn remove(&self, plugin_id: &str) -> Result<()> {
        let lock = self.plugin_lock(plugin_id).await;
        let _guard = lock.lock().await;

        self.remove_locked(plugin_id).await
    }

    // Caller must hold the per-id lock. Also entered from the upgrade path
    // in `add`, which already holds it.
    async fn remove_locked(&self, plugin_id: &str) -> Result<()> {
        let plugin =
            self.registry
                .lookup(plugin_id)?
                .ok_or_else(|| LumenError::PluginNotInstalled {
                    plugin_id: plugin_id.to_string(),
                })?;

        if !plugin.is_external() {
            return Err(LumenError::UninstallCorePlugin {
                plugin_id: plugin_id.to_string(),
            });
        }

        if !is_within_plugins_root(&self.plugins_dir, &plugin.directory) {
            return Err(LumenError::UninstallOutsideOfPluginDir {
                plugin_dir: plugin.directory,
            });
        }

        // The instance must be stopped before its files go away. If this
        // fails we abort with the files intact.
        self.process.unregister_and_stop(&plugin).await?;

        self.installer.uninstall(&plugin.directory).await?;

        tracing::info!("Uninstalled plugin {}", plugin_id);
        Ok(())
    }

    async fn plugin_lock(&self, plugin_id: &str) -> Arc<Mutex<()>> {
        let mut guard = self.locks.lock().await;
        // Entries held only by the map belong to completed operations
        guard.retain(|_, lock| Arc::strong_count(lock) > 1);
        guard
            .entry(plugin_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
