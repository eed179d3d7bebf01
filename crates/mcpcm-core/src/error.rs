//! Error taxonomy carried inside read/write results and command reports.
//!
//! None of these are meant to abort a batch: the store and the commands
//! capture them per agent and keep going.

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigFormat;
use crate::types::Scope;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigError {
    /// A stored config file does not parse under its declared format.
    #[error("Invalid {format} config: {message}")]
    Decode {
        format: ConfigFormat,
        message: String,
    },

    /// User-supplied server JSON is not a recognizable server mapping.
    #[error("Invalid MCP config: {message}")]
    InvalidInput { message: String },

    /// The document cannot be represented in the target format.
    #[error("Failed to serialize {format} config: {message}")]
    Encode {
        format: ConfigFormat,
        message: String,
    },

    /// Reading or writing the config file failed.
    #[error("{message}")]
    Io { message: String },

    /// The agent has no config file for the requested scope.
    #[error("{agent} has no {scope} config path")]
    UnsupportedScope { agent: String, scope: Scope },
}

impl ConfigError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ConfigError::InvalidInput {
            message: message.into(),
        }
    }

    /// Wrap an `anyhow` chain, keeping every context layer in the message.
    pub fn io(err: &anyhow::Error) -> Self {
        ConfigError::Io {
            message: format!("{err:#}"),
        }
    }
}
