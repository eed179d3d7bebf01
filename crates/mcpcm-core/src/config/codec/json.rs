//! JSON codec for agent configuration files.

use serde_json::Value;

use super::{ConfigDocument, ConfigFormat, DocumentCodec};
use crate::error::ConfigError;

/// JSON configuration document codec.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl DocumentCodec for JsonCodec {
    fn decode(&self, text: &str) -> Result<ConfigDocument, ConfigError> {
        let value: Value = serde_json::from_str(text).map_err(|err| ConfigError::Decode {
            format: ConfigFormat::Json,
            message: err.to_string(),
        })?;
        match value {
            Value::Object(map) => Ok(map),
            other => Err(ConfigError::Decode {
                format: ConfigFormat::Json,
                message: format!("expected an object at the document root, found {}", kind(&other)),
            }),
        }
    }

    fn encode(&self, document: &ConfigDocument) -> Result<String, ConfigError> {
        let mut text =
            serde_json::to_string_pretty(document).map_err(|err| ConfigError::Encode {
                format: ConfigFormat::Json,
                message: err.to_string(),
            })?;
        text.push('\n');
        Ok(text)
    }

    fn format(&self) -> ConfigFormat {
        ConfigFormat::Json
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
