#[cfg(test)]
#[path = "app_test.rs"]
mod tests;

use eyre::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::{
    backend::ResponseClient,
    config::{
        Configuration,
        constants::{FAILURE_NOTICE, HELLO_MESSAGE},
    },
    models::Role,
    store::ConversationStore,
};

use super::{
    Renderer,
    input::{HELP, Input},
};

pub const THINKING_NOTICE: &str = "Thinking...";

pub const INVALID_INPUT_NOTICE: &str = "Input is not valid UTF-8, please try again.";

/// Drives the conversation store and the response client from user input
/// and reflects every change through the renderer.
pub struct App<R: Renderer> {
    store: ConversationStore,
    client: ResponseClient,
    renderer: R,
    hello_message: String,
}

impl<R: Renderer> App<R> {
    pub fn new(store: ConversationStore, client: ResponseClient, renderer: R) -> Self {
        let hello_message = Configuration::instance()
            .general
            .hello_message
            .clone()
            .unwrap_or_else(|| HELLO_MESSAGE.to_string());
        Self {
            store,
            client,
            renderer,
            hello_message,
        }
    }

    pub fn with_hello_message(mut self, hello_message: impl Into<String>) -> Self {
        self.hello_message = hello_message.into();
        self
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Show whatever was restored from the previous session.
    pub fn startup(&mut self) {
        if !self.store.history().is_empty() {
            self.renderer.on_chat_list_changed(&self.store.chat_list());
        }
        if let Some(index) = self.store.active_index() {
            self.renderer.on_chat_selected(index);
        }
        self.replay_active();
    }

    /// Handle one line of input. Returns false when the user asked to quit.
    pub async fn handle_input(&mut self, line: &str) -> bool {
        match Input::parse(line) {
            Input::Empty => {}
            Input::Submit(text) => self.submit(text).await,
            Input::NewChat => self.new_chat().await,
            Input::List => self.renderer.on_chat_list_changed(&self.store.chat_list()),
            Input::Load(index) => self.load_chat(index).await,
            Input::Delete(index) => self.delete_chat(index).await,
            Input::Help => self.renderer.on_notice(HELP),
            Input::Quit => return false,
            Input::Invalid(reason) => self.renderer.on_notice(&reason),
        }
        true
    }

    /// Read lines until end of input, `/quit` or Ctrl-C, then save. Lines
    /// that are not UTF-8 are reported and skipped; a failing reader ends the
    /// session like end of input does.
    pub async fn run<I: AsyncBufRead + Unpin>(&mut self, mut input: I) -> Result<()> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = tokio::select! {
                read = input.read_until(b'\n', &mut buf) => read,
                _ = tokio::signal::ctrl_c() => {
                    log::info!("Interrupted");
                    break;
                }
            };

            match read {
                Ok(0) => break,
                Ok(_) => {}
                Err(err) => {
                    log::error!("Reading input: {}", err);
                    break;
                }
            }

            let Some(line) = decode_line(&buf) else {
                log::warn!("Skipping {} bytes of non UTF-8 input", buf.len());
                self.renderer.on_notice(INVALID_INPUT_NOTICE);
                continue;
            };
            if !self.handle_input(line).await {
                break;
            }
        }

        self.shutdown().await
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        self.store.persist().await.wrap_err("saving chats")?;
        log::info!("Saved {} chats", self.store.history().len());
        Ok(())
    }

    async fn submit(&mut self, text: String) {
        self.store.append_message(Role::User, text.as_str()).await;
        self.render_last_message();

        self.renderer.on_notice(THINKING_NOTICE);
        match self.client.get_response(self.store.active(), &text).await {
            Ok(reply) => {
                self.store.append_message(Role::Assistant, reply).await;
                self.render_last_message();
            }
            Err(err) => {
                log::error!("No reply for chat: {}", err);
                self.renderer.on_notice(FAILURE_NOTICE);
            }
        }
    }

    async fn new_chat(&mut self) {
        if self.store.start_new_chat().await {
            self.renderer.on_chat_list_changed(&self.store.chat_list());
        }
        self.renderer.on_chat_cleared();
        self.renderer.on_notice(&self.hello_message);
    }

    async fn load_chat(&mut self, index: usize) {
        if let Err(err) = self.store.load_chat(index).await {
            self.renderer.on_notice(&err.to_string());
            return;
        }
        self.renderer.on_chat_cleared();
        self.renderer.on_chat_selected(index);
        self.replay_active();
    }

    async fn delete_chat(&mut self, index: usize) {
        let was_active = self.store.active_index() == Some(index);
        match self.store.delete_chat(index).await {
            Ok(chats) => {
                self.renderer.on_chat_list_changed(&chats);
                if was_active {
                    self.renderer.on_chat_cleared();
                    self.renderer.on_notice(&self.hello_message);
                }
            }
            Err(err) => self.renderer.on_notice(&err.to_string()),
        }
    }

    fn replay_active(&mut self) {
        if self.store.active().is_empty() {
            self.renderer.on_notice(&self.hello_message);
            return;
        }
        for message in self.store.active() {
            self.renderer.on_message_appended(message);
        }
    }

    fn render_last_message(&mut self) {
        if let Some(message) = self.store.active().last() {
            self.renderer.on_message_appended(message);
        }
    }
}

/// Strip the line terminator. `None` when the bytes are not UTF-8.
fn decode_line(buf: &[u8]) -> Option<&str> {
    let line = std::str::from_utf8(buf).ok()?;
    Some(line.trim_end_matches(['\n', '\r']))
}
