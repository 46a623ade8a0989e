use eyre::Result;
use serde::{Deserialize, Serialize};

#[allow(unused_imports)]
use super::CONFIG;

use super::constants::{
    GEMINI_ENDPOINT, GEMINI_MODEL, HELLO_MESSAGE, LOG_FILE_PATH, MAX_OUTPUT_TOKENS, TEMPERATURE,
    TIMEOUT_SECS, TOP_K, TOP_P,
};
use super::defaults::*;

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Configuration {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GeneralConfig {
    #[serde(default = "hello_message")]
    pub hello_message: Option<String>,

    #[serde(default)]
    pub verbose: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogConfig {
    #[serde(default = "log_level")]
    pub level: Option<String>,

    #[serde(default)]
    pub filters: Option<Vec<LogFilter>>,

    #[serde(default)]
    pub file: LogFile,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFilter {
    #[serde(default)]
    pub module: Option<String>,

    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFile {
    #[serde(default = "log_file_path")]
    pub path: String,

    #[serde(default)]
    pub append: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct BackendConfig {
    #[serde(default = "gemini_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "gemini_model")]
    pub model: String,

    #[serde(default = "timeout_secs")]
    pub timeout_secs: Option<u16>,

    /// Propagate backend errors instead of replying with the fallback text
    #[serde(default)]
    pub strict: bool,

    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Sampling parameters sent with every request. They are static for the
/// lifetime of the process.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    #[serde(default = "temperature")]
    pub temperature: f32,

    #[serde(default = "max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default = "top_p")]
    pub top_p: f32,

    #[serde(default = "top_k")]
    pub top_k: u32,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub enum StorageConfig {
    #[serde(rename = "sqlite")]
    Sqlite(SqliteStorage),

    #[serde(rename = "memory")]
    Memory,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SqliteStorage {
    pub path: Option<String>,
}

impl SqliteStorage {
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}

impl Configuration {
    #[cfg(not(test))]
    pub fn instance() -> &'static Configuration {
        CONFIG.get_or_init(Configuration::default)
    }

    #[cfg(not(test))]
    pub fn init(config: Configuration) -> Result<()> {
        CONFIG
            .set(config)
            .map_err(|_| eyre::eyre!("Config already initialized"))?;
        Ok(())
    }

    #[cfg(test)]
    pub fn instance() -> &'static Configuration {
        use super::TEST_CONFIG;
        TEST_CONFIG.with(|config| *config.borrow())
    }

    #[cfg(test)]
    pub fn init(config: Configuration) -> Result<()> {
        use super::TEST_CONFIG;
        TEST_CONFIG.with(|test_config| {
            *test_config.borrow_mut() = Box::leak(Box::new(config));
        });
        Ok(())
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            hello_message: Some(HELLO_MESSAGE.to_string()),
            verbose: false,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Some("info".to_string()),
            file: LogFile::default(),
            filters: None,
        }
    }
}

impl Default for LogFile {
    fn default() -> Self {
        Self {
            path: LOG_FILE_PATH.to_string(),
            append: false,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: GEMINI_ENDPOINT.to_string(),
            api_key: None,
            model: GEMINI_MODEL.to_string(),
            timeout_secs: Some(TIMEOUT_SECS),
            strict: false,
            generation: GenerationConfig::default(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: TEMPERATURE,
            max_output_tokens: MAX_OUTPUT_TOKENS,
            top_p: TOP_P,
            top_k: TOP_K,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Sqlite(SqliteStorage::default())
    }
}
