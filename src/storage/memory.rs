#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;

use std::collections::HashMap;

use async_trait::async_trait;
use eyre::Result;
use tokio::sync::RwLock;

use super::Storage;

/// Process-local storage. Nothing survives a restart.
#[derive(Default)]
pub struct Memory {
    entries: RwLock<HashMap<String, String>>,
}

#[async_trait]
impl Storage for Memory {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set_many(&self, entries: Vec<(String, String)>) -> Result<()> {
        let mut guard = self.entries.write().await;
        guard.extend(entries);
        Ok(())
    }
}
