pub mod client;
pub mod error;
pub mod gemini;

pub use client::ResponseClient;
pub use error::BackendError;
pub use gemini::Gemini;

#[cfg(test)]
use mockall::automock;

use crate::{config::Configuration, models::Message};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
#[cfg_attr(test, automock)]
pub trait Backend {
    fn name(&self) -> &str;

    /// Ask the model for the next assistant turn given the conversation so
    /// far and the latest user text.
    async fn get_completion(&self, history: &[Message], text: &str)
    -> Result<String, BackendError>;
}

pub type ArcBackend = Arc<dyn Backend + Send + Sync>;

pub fn new_backend(config: &Configuration) -> ArcBackend {
    let gemini: Gemini = (&config.backend).into();
    if config.backend.api_key.is_none() {
        log::warn!("No api key configured, requests are sent unauthenticated");
    }
    log::debug!(
        "Using backend {} at {} with model {}",
        gemini.name(),
        gemini.endpoint(),
        gemini.model()
    );
    Arc::new(gemini)
}
