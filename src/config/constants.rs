pub const HELLO_MESSAGE: &str = "How can I help you today?";

pub const LOG_FILE_PATH: &str = "/tmp/gemchat.log";

/// Environment variable holding `env_logger` style filters
pub const LOG_ENV: &str = "GEMCHAT_LOG";

pub const DB_FILE_PATH: &str = "${HOME}/.local/share/gemchat/gemchat.db";

pub const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Environment variable consulted when no api_key is configured
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

pub const TIMEOUT_SECS: u16 = 60;

pub const TEMPERATURE: f32 = 0.7;

pub const MAX_OUTPUT_TOKENS: u32 = 500;

pub const TOP_P: f32 = 0.8;

pub const TOP_K: u32 = 40;

/// Returned to the user whenever the backend call fails in non-strict mode
pub const FALLBACK_RESPONSE: &str =
    "Sorry, I couldn't process your request. Please try again later.";

/// Shown instead of a reply when the backend call fails in strict mode
pub const FAILURE_NOTICE: &str = "Sorry, something went wrong. Please try again.";

/// Number of characters of the first message kept in a chat title
pub const TITLE_LENGTH: usize = 20;

pub const TITLE_ELLIPSIS: &str = "...";
