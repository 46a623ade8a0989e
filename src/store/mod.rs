pub mod conversation;
pub mod snapshot;

pub use conversation::{ConversationStore, StoreError};
pub use snapshot::Snapshot;
