pub mod fallback;
pub mod kvstore;
pub mod memory;
pub mod migration;
pub mod sled_store;

pub use fallback::FallbackKVStore;
pub use kvstore::{Item, Key, SecretsKVStore, ALL_KINDS};
pub use memory::MemorySecretsStore;
pub use migration::{migrate_to_fallback, migrate_to_primary};
pub use sled_store::SledSecretsStore;
