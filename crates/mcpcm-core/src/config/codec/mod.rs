//! Document codecs for agent configuration files.
//!
//! Agents keep their settings in JSON (`~/.cursor/mcp.json`) or TOML
//! (`~/.codex/config.toml`). Both are normalized to an ordered
//! `serde_json::Map<String, Value>` so that extraction and merging are
//! format-agnostic and keys the engine does not understand pass through.

mod json;
mod toml;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;

pub use json::JsonCodec;
pub use toml::TomlCodec;

/// A whole agent config file, MCP servers and everything else.
pub type ConfigDocument = Map<String, Value>;

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFormat::Json => f.write_str("JSON"),
            ConfigFormat::Toml => f.write_str("TOML"),
        }
    }
}

/// Trait for decoding/encoding configuration documents.
pub trait DocumentCodec: Send + Sync {
    /// Parse text into a document. Malformed input is a `ConfigError::Decode`.
    fn decode(&self, text: &str) -> Result<ConfigDocument, ConfigError>;

    /// Render a document as text in this codec's format.
    fn encode(&self, document: &ConfigDocument) -> Result<String, ConfigError>;

    /// Get the format this codec handles.
    fn format(&self) -> ConfigFormat;
}

/// Create a codec for the given format.
pub fn codec_for_format(format: ConfigFormat) -> Box<dyn DocumentCodec> {
    match format {
        ConfigFormat::Json => Box::new(JsonCodec),
        ConfigFormat::Toml => Box::new(TomlCodec),
    }
}

pub fn decode(text: &str, format: ConfigFormat) -> Result<ConfigDocument, ConfigError> {
    codec_for_format(format).decode(text)
}

pub fn encode(document: &ConfigDocument, format: ConfigFormat) -> Result<String, ConfigError> {
    codec_for_format(format).encode(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_document() -> ConfigDocument {
        let value = json!({
            "string": "value",
            "number": 42,
            "float": 1.5,
            "flag": true,
            "array": ["a", "b", "c"],
            "nested": {"inner": {"deep": true}},
            "mcp_servers": {
                "context7": {
                    "command": "npx",
                    "args": ["-y", "@upstash/context7-mcp"],
                    "env": {"MY_VAR": "MY_VALUE"}
                }
            }
        });
        value.as_object().cloned().unwrap()
    }

    // ===========================================
    // JSON Codec Tests
    // ===========================================

    #[test]
    fn json_roundtrip_preserves_data() {
        let original = sample_document();

        let text = encode(&original, ConfigFormat::Json).expect("encode");
        let decoded = decode(&text, ConfigFormat::Json).expect("decode");

        assert_eq!(original, decoded);
    }

    #[test]
    fn json_encode_is_indented() {
        let mut doc = ConfigDocument::new();
        doc.insert("mcpServers".to_string(), json!({"s": {"command": "node"}}));

        let text = encode(&doc, ConfigFormat::Json).expect("encode");

        assert!(text.contains("\n  \"mcpServers\": {\n    \"s\""));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn json_encode_keeps_key_order() {
        let doc = decode(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#, ConfigFormat::Json).unwrap();

        let text = encode(&doc, ConfigFormat::Json).unwrap();

        let zeta = text.find("zeta").unwrap();
        let alpha = text.find("alpha").unwrap();
        let mid = text.find("mid").unwrap();
        assert!(zeta < alpha && alpha < mid);
    }

    #[test]
    fn json_decode_rejects_malformed_text() {
        let err = decode("{ not json", ConfigFormat::Json).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Decode {
                format: ConfigFormat::Json,
                ..
            }
        ));
    }

    #[test]
    fn json_decode_rejects_non_object_root() {
        let err = decode("[1, 2, 3]", ConfigFormat::Json).unwrap_err();

        assert!(err.to_string().contains("an array"));
    }

    // ===========================================
    // TOML Codec Tests
    // ===========================================

    #[test]
    fn toml_roundtrip_preserves_data() {
        let original = sample_document();

        let text = encode(&original, ConfigFormat::Toml).expect("encode");
        let decoded = decode(&text, ConfigFormat::Toml).expect("decode");

        assert_eq!(original, decoded);
    }

    #[test]
    fn toml_decode_reads_codex_structure() {
        let text = r#"
model = "o3"

[mcp_servers.test]
command = "echo"
args = ["hello"]

[mcp_servers.test.env]
TOKEN = "abc"
"#;

        let doc = decode(text, ConfigFormat::Toml).expect("decode");

        assert_eq!(doc["model"], json!("o3"));
        assert_eq!(
            doc["mcp_servers"]["test"],
            json!({"command": "echo", "args": ["hello"], "env": {"TOKEN": "abc"}})
        );
    }

    #[test]
    fn toml_encode_writes_server_tables() {
        let doc = sample_document();

        let text = encode(&doc, ConfigFormat::Toml).expect("encode");

        assert!(text.contains("[mcp_servers.context7]"));
        assert!(text.contains("command = \"npx\""));
    }

    #[test]
    fn toml_decode_rejects_malformed_text() {
        let err = decode("key = = value", ConfigFormat::Toml).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Decode {
                format: ConfigFormat::Toml,
                ..
            }
        ));
    }

    #[test]
    fn toml_encode_drops_null_members() {
        let doc = json!({"keep": "yes", "gone": null});

        let text = encode(doc.as_object().unwrap(), ConfigFormat::Toml).expect("encode");

        assert!(text.contains("keep"));
        assert!(!text.contains("gone"));
    }

    #[test]
    fn toml_encode_rejects_null_in_array() {
        let doc = json!({"list": ["a", null]});

        let err = encode(doc.as_object().unwrap(), ConfigFormat::Toml).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Encode {
                format: ConfigFormat::Toml,
                ..
            }
        ));
    }

    #[test]
    fn toml_datetime_survives_roundtrip() {
        let doc = decode("updated = 1979-05-27T07:32:00Z", ConfigFormat::Toml).unwrap();

        assert_eq!(
            doc["updated"],
            json!({"$__toml_private_datetime": "1979-05-27T07:32:00Z"})
        );

        let text = encode(&doc, ConfigFormat::Toml).unwrap();
        let table: ::toml::Table = ::toml::from_str(&text).unwrap();
        assert!(table["updated"].is_datetime());
        assert_eq!(
            table["updated"].as_datetime().map(|dt| dt.to_string()),
            Some("1979-05-27T07:32:00Z".to_string())
        );
    }

    #[test]
    fn toml_non_finite_floats_survive_roundtrip() {
        let doc = decode("ratio = nan\nlimit = -inf\n", ConfigFormat::Toml).unwrap();

        assert_eq!(doc["ratio"], json!({"$__toml_private_float": "nan"}));
        assert_eq!(doc["limit"], json!({"$__toml_private_float": "-inf"}));

        let text = encode(&doc, ConfigFormat::Toml).unwrap();
        let table: ::toml::Table = ::toml::from_str(&text).unwrap();
        assert!(table["ratio"].as_float().is_some_and(f64::is_nan));
        assert_eq!(table["limit"].as_float(), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn toml_encode_rejects_bad_datetime_literal() {
        let doc = json!({"updated": {"$__toml_private_datetime": "yesterday"}});

        let err = encode(doc.as_object().unwrap(), ConfigFormat::Toml).unwrap_err();

        assert!(matches!(err, ConfigError::Encode { .. }));
    }

    // ===========================================
    // Factory Tests
    // ===========================================

    #[test]
    fn codec_for_format_returns_correct_type() {
        assert_eq!(codec_for_format(ConfigFormat::Json).format(), ConfigFormat::Json);
        assert_eq!(codec_for_format(ConfigFormat::Toml).format(), ConfigFormat::Toml);
    }
}
