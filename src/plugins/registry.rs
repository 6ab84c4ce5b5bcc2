use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use crate::error::{LumenError, Result};

use super::dto::{Plugin, PluginClass, PluginManifest};

/// In-memory registry of currently loaded plugins, keyed by plugin id.
pub struct PluginRegistry {
    plugins: RwLock<HashMap<String, Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            plugins: RwLock::new(HashMap::new()),
        }
    }

    pub fn lookup(&self, plugin_id: &str) -> Result<Option<Plugin>> {
        let guard = self
            .plugins
            .read()
            .map_err(|_| LumenError::internal("Plugin registry lock poisoned"))?;
        Ok(guard.get(plugin_id).cloned())
    }

    pub fn register(&self, plugin: Plugin) -> Result<()> {
        let mut guard = self
            .plugins
            .write()
            .map_err(|_| LumenError::internal("Plugin registry lock poisoned"))?;
        guard.insert(plugin.id.clone(), plugin);
        Ok(())
    }

    pub fn unregister(&self, plugin_id: &str) -> Result<Option<Plugin>> {
        let mut guard = self
            .plugins
            .write()
            .map_err(|_| LumenError::internal("Plugin registry lock poisoned"))?;
        Ok(guard.remove(plugin_id))
    }

    pub fn list(&self) -> Result<Vec<Plugin>> {
        let guard = self
            .plugins
            .read()
            .map_err(|_| LumenError::internal("Plugin registry lock poisoned"))?;
        Ok(guard.values().cloned().collect())
    }

    /// Load every plugin found under `dir` into the registry with the given
    /// class. Used at startup for bundled core plugin directories.
    pub async fn load_directory(&self, dir: &Path, class: PluginClass) -> Result<usize> {
        let discovered = scan_directory(dir, class).await?;
        let count = discovered.len();

        let mut guard = self
            .plugins
            .write()
            .map_err(|_| LumenError::internal("Plugin registry lock poisoned"))?;
        for plugin in discovered {
            guard.insert(plugin.id.clone(), plugin);
        }

        Ok(count)
    }

    /// Replace the external plugin set with whatever is currently on disk
    /// under `dir`. Core plugins are left untouched.
    pub async fn reload_external(&self, dir: &Path) -> Result<()> {
        let discovered = scan_directory(dir, PluginClass::External).await?;

        let mut guard = self
            .plugins
            .write()
            .map_err(|_| LumenError::internal("Plugin registry lock poisoned"))?;
        guard.retain(|_, plugin| !plugin.is_external());
        for plugin in discovered {
            guard.insert(plugin.id.clone(), plugin);
        }

        Ok(())
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

async fn scan_directory(dir: &Path, class: PluginClass) -> Result<Vec<Plugin>> {
    let mut plugins = Vec::new();
    if !dir.exists() {
        return Ok(plugins);
    }

    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let manifest_path = path.join("plugin.json");
        let bytes = match tokio::fs::read(&manifest_path).await {
            Ok(bytes) => bytes,
            // Not every subdirectory is a plugin
            Err(_) => continue,
        };

        let manifest: PluginManifest = match serde_json::from_slice(&bytes) {
            Ok(manifest) => manifest,
            Err(err) => {
                tracing::warn!(
                    "Skipping plugin directory {} due to invalid manifest: {}",
                    path.display(),
                    err
                );
                continue;
            }
        };

        plugins.push(Plugin {
            id: manifest.id,
            version: manifest.version,
            directory: path,
            class,
        });
    }

    Ok(plugins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_manifest(root: &Path, id: &str, version: &str) {
        let dir = root.join(id);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("plugin.json"),
            format!(r#"{{"id":"{}","version":"{}"}}"#, id, version),
        )
        .unwrap();
    }

    #[tokio::test]
    async fn reload_picks_up_manifests_and_skips_junk() {
        let temp = TempDir::new().unwrap();
        write_manifest(temp.path(), "datasource-a", "1.0.0");
        write_manifest(temp.path(), "panel-b", "2.1.0");

        // Directory without a manifest and a broken manifest are both skipped
        fs::create_dir_all(temp.path().join("not-a-plugin")).unwrap();
        let broken = temp.path().join("broken");
        fs::create_dir_all(&broken).unwrap();
        fs::write(broken.join("plugin.json"), "{ nope").unwrap();

        let registry = PluginRegistry::new();
        registry.reload_external(temp.path()).await.unwrap();

        let mut ids: Vec<_> = registry
            .list()
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["datasource-a", "panel-b"]);
    }

    #[tokio::test]
    async fn reload_replaces_externals_but_keeps_core() {
        let temp = TempDir::new().unwrap();
        write_manifest(temp.path(), "fresh", "1.0.0");

        let registry = PluginRegistry::new();
        registry
            .register(Plugin::core("bundled", "9.0.0", temp.path().join("bundled")))
            .unwrap();
        registry
            .register(Plugin::external(
                "stale",
                "0.1.0",
                temp.path().join("stale"),
            ))
            .unwrap();

        registry.reload_external(temp.path()).await.unwrap();

        assert!(registry.lookup("bundled").unwrap().is_some());
        assert!(registry.lookup("stale").unwrap().is_none());
        let fresh = registry.lookup("fresh").unwrap().unwrap();
        assert_eq!(fresh.version, "1.0.0");
        assert!(fresh.is_external());
    }

    #[tokio::test]
    async fn missing_directory_loads_nothing() {
        let temp = TempDir::new().unwrap();
        let registry = PluginRegistry::new();
        registry
            .reload_external(&temp.path().join("does-not-exist"))
            .await
            .unwrap();
        assert!(registry.list().unwrap().is_empty());
    }
}
