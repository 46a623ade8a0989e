#[cfg(test)]
#[path = "snapshot_test.rs"]
mod tests;

use eyre::{Context, Result, bail};

use crate::{
    models::{Conversation, Message},
    storage::{CHAT_HISTORY_KEY, CURRENT_CHAT_INDEX_KEY, CURRENT_CHAT_KEY, Storage},
};

/// Stored form of a new, uncommitted conversation pointer
pub const NO_INDEX: &str = "none";

/// Sentinel written by older clients for a new conversation
const LEGACY_NO_INDEX: &str = "-1";

/// The persisted triple of a `ConversationStore`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub history: Vec<Conversation>,
    pub active: Vec<Message>,
    pub active_index: Option<usize>,
}

impl Snapshot {
    /// Encode every key. The result is written with a single `set_many` call.
    pub fn encode(&self) -> Result<Vec<(String, String)>> {
        let history = serde_json::to_string(&self.history).wrap_err("encoding chat history")?;
        let active = serde_json::to_string(&self.active).wrap_err("encoding current chat")?;
        Ok(vec![
            (CHAT_HISTORY_KEY.to_string(), history),
            (CURRENT_CHAT_KEY.to_string(), active),
            (
                CURRENT_CHAT_INDEX_KEY.to_string(),
                encode_index(self.active_index),
            ),
        ])
    }

    /// Read the triple back. Missing keys keep their default value, anything
    /// unreadable or inconsistent is an error.
    pub async fn load(storage: &(dyn Storage + Send + Sync)) -> Result<Self> {
        let mut snapshot = Self::default();

        if let Some(raw) = storage
            .get(CHAT_HISTORY_KEY)
            .await
            .wrap_err("reading chat history")?
        {
            snapshot.history = serde_json::from_str(&raw).wrap_err("decoding chat history")?;
        }

        if let Some(raw) = storage
            .get(CURRENT_CHAT_KEY)
            .await
            .wrap_err("reading current chat")?
        {
            snapshot.active = serde_json::from_str(&raw).wrap_err("decoding current chat")?;
        }

        if let Some(raw) = storage
            .get(CURRENT_CHAT_INDEX_KEY)
            .await
            .wrap_err("reading current chat index")?
        {
            snapshot.active_index = decode_index(&raw)?;
        }

        snapshot.validate()?;
        Ok(snapshot)
    }

    fn validate(&self) -> Result<()> {
        if let Some(pos) = self.history.iter().position(|c| c.is_empty()) {
            bail!("chat {} has no messages", pos);
        }

        if let Some(index) = self.active_index {
            if index >= self.history.len() {
                bail!(
                    "current chat index {} out of range (history has {} chats)",
                    index,
                    self.history.len()
                );
            }
        }
        Ok(())
    }
}

pub fn encode_index(index: Option<usize>) -> String {
    match index {
        Some(index) => index.to_string(),
        None => NO_INDEX.to_string(),
    }
}

pub fn decode_index(raw: &str) -> Result<Option<usize>> {
    let raw = raw.trim();
    if raw == NO_INDEX || raw == LEGACY_NO_INDEX {
        return Ok(None);
    }
    let index = raw
        .parse::<usize>()
        .wrap_err(format!("parsing current chat index {:?}", raw))?;
    Ok(Some(index))
}
