use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Core plugins ship with the platform and are immutable; external plugins
/// are installed by an operator and may be upgraded or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginClass {
    Core,
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plugin {
    pub id: String,
    pub version: String,
    pub directory: PathBuf,
    pub class: PluginClass,
}

impl Plugin {
    pub fn core(id: impl Into<String>, version: impl Into<String>, directory: PathBuf) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            directory,
            class: PluginClass::Core,
        }
    }

    pub fn external(id: impl Into<String>, version: impl Into<String>, directory: PathBuf) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            directory,
            class: PluginClass::External,
        }
    }

    pub fn is_external(&self) -> bool {
        self.class == PluginClass::External
    }
}

/// The `plugin.json` descriptor the loader reads from each plugin directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginManifest {
    pub id: String,
    pub version: String,
}

/// Result of asking the registry service whether a version is available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateInfo {
    #[serde(rename = "zipUrl")]
    pub zip_url: String,
}
