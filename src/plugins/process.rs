use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

use super::dto::Plugin;
use super::registry::PluginRegistry;

/// Hook called before a plugin's directory is deleted. Implementations must
/// not return until the plugin holds no open handles into its directory.
#[async_trait]
pub trait PluginProcessManager: Send + Sync {
    async fn unregister_and_stop(&self, plugin: &Plugin) -> Result<()>;
}

/// Process manager for descriptor-only plugins: there is no running process
/// to stop, so unregistering from the shared registry is sufficient.
pub struct RegistryProcessManager {
    registry: Arc<PluginRegistry>,
}

impl RegistryProcessManager {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl PluginProcessManager for RegistryProcessManager {
    async fn unregister_and_stop(&self, plugin: &Plugin) -> Result<()> {
        self.registry.unregister(&plugin.id)?;
        tracing::debug!("Unregistered plugin {}", plugin.id);
        Ok(())
    }
}
