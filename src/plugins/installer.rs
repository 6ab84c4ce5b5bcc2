use std::io::Cursor;
use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

use super::dto::UpdateInfo;

/// Network/filesystem side of plugin installation. The lifecycle manager
/// drives this; implementations own download, unpack and delete mechanics.
#[async_trait]
pub trait PluginInstaller: Send + Sync {
    /// Ask the registry service whether `version` of `plugin_id` is
    /// available, returning the archive URL to fetch it from.
    async fn get_update_info(
        &self,
        plugin_id: &str,
        version: &str,
        registry_url: &str,
    ) -> Result<UpdateInfo>;

    /// Fetch and unpack the plugin into `dest_root/{plugin_id}`. A
    /// pre-resolved `zip_url` (from an upgrade lookup) is used as-is;
    /// `None` resolves the download URL from the registry service.
    async fn install(
        &self,
        plugin_id: &str,
        version: &str,
        dest_root: &Path,
        zip_url: Option<&str>,
        registry_url: &str,
    ) -> Result<()>;

    /// Delete an installed plugin directory from disk.
    async fn uninstall(&self, plugin_dir: &Path) -> Result<()>;
}

/// Installer backed by the HTTP plugin registry service.
pub struct HttpPluginInstaller {
    http_client: reqwest::Client,
}

impl HttpPluginInstaller {
    pub fn new() -> Self {
        Self {
            http_client: reqwest::Client::new(),
        }
    }

    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    fn version_url(registry_url: &str, plugin_id: &str, version: &str) -> String {
        format!(
            "{}/api/plugins/{}/versions/{}",
            registry_url.trim_end_matches('/'),
            plugin_id,
            version
        )
    }

    fn download_url(registry_url: &str, plugin_id: &str, version: &str) -> String {
        format!(
            "{}/download",
            Self::version_url(registry_url, plugin_id, version)
        )
    }
}

impl Default for HttpPluginInstaller {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginInstaller for HttpPluginInstaller {
    async fn get_update_info(
        &self,
        plugin_id: &str,
        version: &str,
        registry_url: &str,
    ) -> Result<UpdateInfo> {
        let url = Self::version_url(registry_url, plugin_id, version);
        tracing::debug!("Fetching update info for {} from {}", plugin_id, url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await?
            .error_for_status()?;

        let info: UpdateInfo = response.json().await?;
        Ok(info)
    }

    async fn install(
        &self,
        plugin_id: &str,
        version: &str,
        dest_root: &Path,
        zip_url: Option<&str>,
        registry_url: &str,
    ) -> Result<()> {
        let url = match zip_url {
            Some(url) => url.to_string(),
            None => Self::download_url(registry_url, plugin_id, version),
        };

        tracing::info!("Downloading plugin {} v{} from {}", plugin_id, version, url);
        let bytes = self
            .http_client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let dest = dest_root.join(plugin_id);
        tokio::fs::create_dir_all(&dest).await?;

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.as_ref()))?;
        archive.extract(&dest)?;

        tracing::debug!(
            "Extracted plugin {} archive into {}",
            plugin_id,
            dest.display()
        );
        Ok(())
    }

    async fn uninstall(&self, plugin_dir: &Path) -> Result<()> {
        tokio::fs::remove_dir_all(plugin_dir).await?;
        Ok(())
    }
}
