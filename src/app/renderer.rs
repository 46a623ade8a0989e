#[cfg(test)]
#[path = "renderer_test.rs"]
mod tests;

use std::io::Write;

use crate::models::{ChatListItem, Message, Role};

/// Everything the chat needs from a display. Indices are positions in the
/// saved chat list.
pub trait Renderer {
    fn on_message_appended(&mut self, message: &Message);
    fn on_chat_list_changed(&mut self, chats: &[ChatListItem]);
    fn on_chat_selected(&mut self, index: usize);
    fn on_chat_cleared(&mut self);
    fn on_notice(&mut self, text: &str);
}

/// Plain line output. Chat numbers are shown starting at 1.
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) {
        if let Err(err) = writeln!(self.out, "{}", line).and_then(|_| self.out.flush()) {
            log::warn!("Writing to terminal: {}", err);
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn on_message_appended(&mut self, message: &Message) {
        let prefix = match message.role() {
            Role::User => "you",
            Role::Assistant => "assistant",
        };
        self.write_line(&format!("{}> {}", prefix, message.content()));
    }

    fn on_chat_list_changed(&mut self, chats: &[ChatListItem]) {
        if chats.is_empty() {
            self.write_line("No saved chats");
            return;
        }
        self.write_line("Chats:");
        for chat in chats {
            self.write_line(&format!("  [{}] {}", chat.index + 1, chat.title));
        }
    }

    fn on_chat_selected(&mut self, index: usize) {
        self.write_line(&format!("-- chat {} --", index + 1));
    }

    fn on_chat_cleared(&mut self) {
        self.write_line("----");
    }

    fn on_notice(&mut self, text: &str) {
        self.write_line(&format!("* {}", text));
    }
}
