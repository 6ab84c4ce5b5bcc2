pub mod config;
pub mod error;
pub mod plugins;
pub mod secrets;

pub use config::LumenConfig;
pub use error::{LumenError, Result};
