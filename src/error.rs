use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LumenError>;

#[derive(Error, Debug)]
pub enum LumenError {
    #[error("plugin {plugin_id} is a core plugin and cannot be installed or upgraded")]
    InstallCorePlugin { plugin_id: String },

    #[error(
        "plugin {plugin_id} v{version} is already installed in {}",
        existing_dir.display()
    )]
    DuplicateInstall {
        plugin_id: String,
        version: String,
        existing_dir: PathBuf,
    },

    #[error("plugin {plugin_id} is not installed")]
    PluginNotInstalled { plugin_id: String },

    #[error("plugin {plugin_id} is a core plugin and cannot be uninstalled")]
    UninstallCorePlugin { plugin_id: String },

    #[error(
        "refusing to uninstall plugin directory outside of the plugins root: {}",
        plugin_dir.display()
    )]
    UninstallOutsideOfPluginDir { plugin_dir: PathBuf },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl LumenError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        LumenError::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        LumenError::Internal(msg.into())
    }
}
