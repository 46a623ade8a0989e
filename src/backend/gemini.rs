#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;

use std::time;

use crate::{
    config::{
        BackendConfig, GenerationConfig,
        constants::{GEMINI_ENDPOINT, GEMINI_MODEL},
        user_agent,
    },
    models::{Message, Role},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::backend::{Backend, BackendError};

const USER_ROLE: &str = "user";
const MODEL_ROLE: &str = "model";

pub struct Gemini {
    alias: String,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    timeout: Option<time::Duration>,
    generation: GenerationConfig,
}

impl Gemini {
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = format_model(model);
        self
    }

    pub fn with_timeout(mut self, timeout: time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> Result<reqwest::Url, BackendError> {
        let mut params = vec![];
        if let Some(key) = &self.api_key {
            params.push(("key", key));
        }

        reqwest::Url::parse_with_params(
            &format!("{}/models/{}:generateContent", self.endpoint, self.model),
            params.as_slice(),
        )
        .map_err(|e| BackendError::Request(format!("parsing url: {}", e)))
    }
}

#[async_trait]
impl Backend for Gemini {
    fn name(&self) -> &str {
        &self.alias
    }

    async fn get_completion(
        &self,
        history: &[Message],
        text: &str,
    ) -> Result<String, BackendError> {
        let completion_req = CompletionRequest {
            contents: build_contents(history, text),
            generation_config: (&self.generation).into(),
        };

        let mut builder = reqwest::Client::new()
            .post(self.url()?)
            .header("User-Agent", user_agent());

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        log::trace!("Sending completion request: {:?}", completion_req);

        let resp = builder.json(&completion_req).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = match resp.json::<ErrorResponse>().await {
                Ok(err) => err.error.message,
                Err(err) => {
                    log::debug!("Unreadable error body for status {}: {}", status, err);
                    None
                }
            };
            return Err(BackendError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        let content: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| BackendError::MalformedResponse(format!("decoding body: {}", e)))?;
        log::trace!("Received completion response: {:?}", content);

        content.into_text()
    }
}

/// Map the stored turns into the request schema, then add `text` as the
/// final user turn.
pub(crate) fn build_contents(history: &[Message], text: &str) -> Vec<Content> {
    let mut contents = history.iter().map(Content::from).collect::<Vec<_>>();

    if !contains_user_turn(&contents, text) {
        contents.push(Content::user(text));
    }
    contents
}

/// Resend guard: callers usually append the user message to the history
/// before asking for a reply, so an identical user turn already present is
/// taken to be this one. Two genuinely repeated prompts in one conversation
/// collapse into a single turn.
pub(crate) fn contains_user_turn(contents: &[Content], text: &str) -> bool {
    contents.iter().any(|content| {
        content.role == USER_ROLE
            && content
                .parts
                .first()
                .is_some_and(|part| part.text == text)
    })
}

impl Default for Gemini {
    fn default() -> Self {
        Gemini {
            alias: "Gemini".to_string(),
            endpoint: GEMINI_ENDPOINT.to_string(),
            api_key: None,
            model: GEMINI_MODEL.to_string(),
            timeout: None,
            generation: GenerationConfig::default(),
        }
    }
}

impl From<&BackendConfig> for Gemini {
    fn from(value: &BackendConfig) -> Self {
        let mut backend = Gemini::default()
            .with_endpoint(&value.endpoint)
            .with_model(&value.model)
            .with_generation(value.generation.clone());

        if let Some(key) = value.api_key.as_deref().filter(|k| !k.is_empty()) {
            backend = backend.with_api_key(key);
        }

        if let Some(timeout) = value.timeout_secs.filter(|t| *t > 0) {
            backend = backend.with_timeout(time::Duration::from_secs(timeout as u64));
        }

        backend
    }
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ContentPart {
    text: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Content {
    role: String,
    parts: Vec<ContentPart>,
}

impl Content {
    fn user(text: &str) -> Self {
        Content {
            role: USER_ROLE.to_string(),
            parts: vec![ContentPart {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerationParams {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
    top_k: u32,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompletionRequest {
    contents: Vec<Content>,
    generation_config: GenerationParams,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GenerateCandidate>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateCandidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate.
    fn into_text(self) -> Result<String, BackendError> {
        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::MalformedResponse("no candidates".to_string()))?;

        let finish_reason = candidate.finish_reason.unwrap_or_default();
        candidate
            .content
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or_else(|| {
                BackendError::MalformedResponse(format!(
                    "first candidate has no text (finish reason: {:?})",
                    finish_reason
                ))
            })
    }
}

#[derive(Default, Debug, Serialize, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Default, Debug, Serialize, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl From<&Message> for Content {
    fn from(value: &Message) -> Self {
        let role = match value.role() {
            Role::User => USER_ROLE,
            Role::Assistant => MODEL_ROLE,
        };
        Content {
            role: role.to_string(),
            parts: vec![ContentPart {
                text: value.content().to_string(),
            }],
        }
    }
}

impl From<&GenerationConfig> for GenerationParams {
    fn from(value: &GenerationConfig) -> Self {
        GenerationParams {
            temperature: value.temperature,
            max_output_tokens: value.max_output_tokens,
            top_p: value.top_p,
            top_k: value.top_k,
        }
    }
}

fn format_model(model: &str) -> String {
    let model = model.strip_prefix("model/").unwrap_or(model);
    model.strip_prefix("models/").unwrap_or(model).to_string()
}
