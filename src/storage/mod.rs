pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use eyre::{Context, Result};

pub use memory::Memory;
pub use sqlite::Sqlite;

#[cfg(test)]
use mockall::automock;

use crate::config::{
    StorageConfig,
    constants::DB_FILE_PATH,
    utils::{ensure_parent_dir, resolve_path},
};

/// Saved conversations, a JSON array of `Conversation`
pub const CHAT_HISTORY_KEY: &str = "chatHistory";

/// The conversation being composed, a JSON array of `Message`
pub const CURRENT_CHAT_KEY: &str = "currentChat";

/// Index of the active conversation in the history or `none`
pub const CURRENT_CHAT_INDEX_KEY: &str = "currentChatIndex";

/// String valued key-value storage.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait Storage {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write every entry or none of them.
    async fn set_many(&self, entries: Vec<(String, String)>) -> Result<()>;
}

pub type ArcStorage = Arc<dyn Storage + Send + Sync>;

pub async fn new_storage(config: &StorageConfig) -> Result<ArcStorage> {
    let storage: ArcStorage = match config {
        StorageConfig::Sqlite(sqlite_config) => {
            let path = resolve_path(sqlite_config.path().unwrap_or(DB_FILE_PATH))
                .wrap_err("resolving database path")?;
            ensure_parent_dir(&path)?;
            log::debug!("Using sqlite storage at {}", path);
            Arc::new(Sqlite::new(Some(&path)).await?)
        }
        StorageConfig::Memory => {
            log::debug!("Using in-memory storage");
            Arc::new(Memory::default())
        }
    };
    Ok(storage)
}
