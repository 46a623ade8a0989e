#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;

use thiserror::Error;

use crate::{
    models::{ChatListItem, Conversation, Message, Role},
    storage::ArcStorage,
};

use super::Snapshot;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("chat index {index} out of range (history has {len} chats)")]
    Index { index: usize, len: usize },

    #[error("persisting chats: {0:#}")]
    Persistence(eyre::Report),
}

/// Saved conversations plus the one currently being composed.
///
/// `active` mirrors `history[i].messages` whenever `active_index` is
/// `Some(i)`. A conversation started from scratch lives only in `active`
/// until the user starts another new chat, at which point it is committed
/// to `history`. Every mutation writes the whole state through `storage`.
pub struct ConversationStore {
    storage: ArcStorage,
    history: Vec<Conversation>,
    active: Vec<Message>,
    active_index: Option<usize>,
}

impl ConversationStore {
    /// An empty store: no history and a new chat.
    pub fn new(storage: ArcStorage) -> Self {
        Self {
            storage,
            history: vec![],
            active: vec![],
            active_index: None,
        }
    }

    /// Rehydrate the store from `storage`. Unreadable or inconsistent data is
    /// discarded and the store starts empty.
    pub async fn restore(storage: ArcStorage) -> Self {
        let mut store = Self::new(storage);
        let loaded = Snapshot::load(store.storage.as_ref()).await;
        match loaded {
            Ok(snapshot) => store.apply(snapshot),
            Err(err) => log::warn!("Discarding saved chats: {:#}", err),
        }
        log::debug!(
            "Restored {} chats, active index {:?}",
            store.history.len(),
            store.active_index
        );
        store
    }

    fn apply(&mut self, snapshot: Snapshot) {
        self.history = snapshot.history;
        self.active_index = snapshot.active_index;
        self.active = match self.active_index {
            Some(index) => self.history[index].messages().to_vec(),
            None => snapshot.active,
        };
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            history: self.history.clone(),
            active: self.active.clone(),
            active_index: self.active_index,
        }
    }

    pub async fn append_message(&mut self, role: Role, content: impl Into<String>) {
        self.active.push(Message::new(role, content));
        if let Some(index) = self.active_index {
            self.history[index].set_messages(self.active.clone());
        }
        self.save().await;
    }

    /// Commit the active conversation if it was never saved, then switch to
    /// an empty new chat. Returns whether a conversation was committed.
    pub async fn start_new_chat(&mut self) -> bool {
        let mut committed = false;
        if self.active_index.is_none() {
            let messages = std::mem::take(&mut self.active);
            if let Some(convo) = Conversation::from_messages(messages) {
                log::debug!("Committing chat {:?}", convo.title());
                self.history.push(convo);
                committed = true;
            }
        }

        self.active.clear();
        self.active_index = None;
        self.save().await;
        committed
    }

    pub async fn load_chat(&mut self, index: usize) -> Result<(), StoreError> {
        let convo = self.history.get(index).ok_or(StoreError::Index {
            index,
            len: self.history.len(),
        })?;

        self.active = convo.messages().to_vec();
        self.active_index = Some(index);
        self.save().await;
        Ok(())
    }

    /// Remove a saved chat. Returns the refreshed chat list since indices
    /// after `index` have shifted.
    pub async fn delete_chat(&mut self, index: usize) -> Result<Vec<ChatListItem>, StoreError> {
        if index >= self.history.len() {
            return Err(StoreError::Index {
                index,
                len: self.history.len(),
            });
        }

        let removed = self.history.remove(index);
        log::debug!("Deleted chat {} {:?}", index, removed.title());

        match self.active_index {
            Some(active) if active == index => {
                self.active.clear();
                self.active_index = None;
            }
            Some(active) if active > index => self.active_index = Some(active - 1),
            _ => {}
        }

        self.save().await;
        Ok(self.chat_list())
    }

    /// Write the whole state in one storage call.
    pub async fn persist(&self) -> Result<(), StoreError> {
        let entries = self.snapshot().encode().map_err(StoreError::Persistence)?;
        self.storage
            .set_many(entries)
            .await
            .map_err(StoreError::Persistence)
    }

    async fn save(&self) {
        if let Err(err) = self.persist().await {
            log::error!("{}", err);
        }
    }

    pub fn history(&self) -> &[Conversation] {
        &self.history
    }

    pub fn active(&self) -> &[Message] {
        &self.active
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn is_new_chat(&self) -> bool {
        self.active_index.is_none()
    }

    pub fn chat_list(&self) -> Vec<ChatListItem> {
        self.history
            .iter()
            .enumerate()
            .map(|(index, convo)| ChatListItem {
                title: convo.title().to_string(),
                index,
            })
            .collect()
    }
}
