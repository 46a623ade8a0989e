#[cfg(test)]
#[path = "command_test.rs"]
mod tests;

use clap::Parser;
use eyre::{Context, Result};

use crate::config::{self, Configuration, load_or_default};

#[derive(Debug, Parser)]
#[command(
    version,
    about,
    long_about = r#"A terminal chat client for Gemini models

Conversations are saved between sessions. Type /help inside the chat for
the list of commands.

Default configuration file location looks up in the following order:
    * $XDG_CONFIG_HOME/gemchat/config.toml
    * $HOME/.config/gemchat/config.toml
    * $HOME/.gemchat.toml
"#,
    disable_version_flag = true
)]
pub struct Command {
    /// Configuration file path
    #[arg(short, long, value_name = "PATH")]
    config: Option<String>,

    /// Report backend failures instead of replying with a fallback message
    #[arg(long)]
    strict: bool,

    /// Show the version
    #[arg(short, long)]
    version: bool,
}

impl Command {
    pub fn new() -> Command {
        Self::parse()
    }

    pub fn get_config(&self) -> Result<Configuration> {
        let mut config =
            load_or_default(self.config.as_deref()).wrap_err("loading configuration")?;
        if self.strict {
            config.backend.strict = true;
        }
        Ok(config)
    }

    pub fn version(&self) -> bool {
        self.version
    }

    pub fn print_version(&self) {
        println!("{}", config::version())
    }
}

impl Default for Command {
    fn default() -> Self {
        Self::new()
    }
}
