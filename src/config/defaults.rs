use super::constants::*;

pub(crate) fn hello_message() -> Option<String> {
    Some(HELLO_MESSAGE.to_string())
}

pub(crate) fn log_level() -> Option<String> {
    Some("info".to_string())
}

pub(crate) fn log_file_path() -> String {
    LOG_FILE_PATH.to_string()
}

pub(crate) fn gemini_endpoint() -> String {
    GEMINI_ENDPOINT.to_string()
}

pub(crate) fn gemini_model() -> String {
    GEMINI_MODEL.to_string()
}

pub(crate) fn timeout_secs() -> Option<u16> {
    Some(TIMEOUT_SECS)
}

pub(crate) fn temperature() -> f32 {
    TEMPERATURE
}

pub(crate) fn max_output_tokens() -> u32 {
    MAX_OUTPUT_TOKENS
}

pub(crate) fn top_p() -> f32 {
    TOP_P
}

pub(crate) fn top_k() -> u32 {
    TOP_K
}
