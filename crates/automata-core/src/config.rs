//! RunnerConfig - ユーザーに見せる文言の設定
//!
//! 既定値はそのまま使える。TOML で一部だけ上書きでき、書かなかったキーは既定値のまま。
//!
//! ```toml
//! [messages]
//! stopped_by_user = "Stopped"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error for field `{field}`: must not be blank")]
    Blank { field: &'static str },
}

/// Titles and notification texts used when a run terminates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Message box title for user aborts and defined exits.
    pub exit_title: String,
    /// Notification after a user abort.
    pub stopped_by_user: String,
    /// Notification after a defined exit that carried a message.
    pub exited: String,
    /// Message box title and notification for unexpected failures.
    pub unexpected_error: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            exit_title: "Script Exited".to_string(),
            stopped_by_user: "Script stopped by user or screen turned OFF".to_string(),
            exited: "Script Exited".to_string(),
            unexpected_error: "Unexpected Error".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub messages: Messages,
}

impl RunnerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: RunnerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.messages;
        for (field, value) in [
            ("messages.exit_title", &m.exit_title),
            ("messages.stopped_by_user", &m.stopped_by_user),
            ("messages.exited", &m.exited),
            ("messages.unexpected_error", &m.unexpected_error),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Blank { field });
            }
        }
        Ok(())
    }
}
