#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

use crate::{config::constants::FALLBACK_RESPONSE, models::Message};

use super::{ArcBackend, BackendError};

/// Boundary between the chat and the model backend.
///
/// Failures are logged and, unless `strict` is set, replaced by a fixed
/// apology so the caller always gets a reply to show.
pub struct ResponseClient {
    backend: ArcBackend,
    strict: bool,
}

impl ResponseClient {
    pub fn new(backend: ArcBackend) -> Self {
        Self {
            backend,
            strict: false,
        }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub async fn get_response(
        &self,
        history: &[Message],
        text: &str,
    ) -> Result<String, BackendError> {
        match self.backend.get_completion(history, text).await {
            Ok(reply) => Ok(reply),
            Err(err) => {
                log::error!("Getting response: {}", err);
                if self.strict {
                    return Err(err);
                }
                Ok(FALLBACK_RESPONSE.to_string())
            }
        }
    }
}
