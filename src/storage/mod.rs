//! Key-value persistence for session data, cooldowns, and staged profiles

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::core::error::Result;

/// String key-value store
///
/// All of the client's durable state (auth session, cooldown records,
/// staged profile updates) goes through this trait, so tests can swap
/// in an in-memory store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}
