pub mod dto;
pub mod installer;
pub mod lifecycle;
pub mod paths;
pub mod process;
pub mod registry;

pub use dto::{Plugin, PluginClass, PluginManifest, UpdateInfo};
pub use installer::{HttpPluginInstaller, PluginInstaller};
pub use lifecycle::PluginLifecycleManager;
pub use process::{PluginProcessManager, RegistryProcessManager};
pub use registry::PluginRegistry;
