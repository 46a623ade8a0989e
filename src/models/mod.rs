pub mod conversation;
pub mod message;

pub use conversation::{ChatListItem, Conversation, derive_title};
pub use message::{Message, Role};
