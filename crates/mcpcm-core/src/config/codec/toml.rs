//! TOML codec for agent configuration files.
//!
//! Documents are normalized to the same JSON map the JSON codec produces, so
//! the extractor and merge engine never see format-specific values.
//!
//! Datetimes and non-finite floats have no JSON form. They decode to a
//! single-key object (`{"$__toml_private_datetime": "1979-05-27T07:32:00Z"}`,
//! `{"$__toml_private_float": "nan"}`) that the encoder turns back into the
//! original TOML value, so a rewrite keeps their type.

use serde_json::{Map, Value};
use toml::value::Datetime;

use super::{ConfigDocument, ConfigFormat, DocumentCodec};
use crate::error::ConfigError;

/// TOML configuration document codec.
#[derive(Debug, Default, Clone, Copy)]
pub struct TomlCodec;

impl DocumentCodec for TomlCodec {
    fn decode(&self, text: &str) -> Result<ConfigDocument, ConfigError> {
        let table: toml::Table = toml::from_str(text).map_err(|err| ConfigError::Decode {
            format: ConfigFormat::Toml,
            message: err.message().to_string(),
        })?;
        Ok(toml_table_to_json(table))
    }

    fn encode(&self, document: &ConfigDocument) -> Result<String, ConfigError> {
        let table = json_map_to_toml(document)?;
        toml::to_string_pretty(&table).map_err(|err| encode_error(err.to_string()))
    }

    fn format(&self) -> ConfigFormat {
        ConfigFormat::Toml
    }
}

/// Key toml itself uses when a datetime passes through serde.
const DATETIME_KEY: &str = "$__toml_private_datetime";
const FLOAT_KEY: &str = "$__toml_private_float";

fn encode_error(message: impl Into<String>) -> ConfigError {
    ConfigError::Encode {
        format: ConfigFormat::Toml,
        message: message.into(),
    }
}

fn toml_table_to_json(table: toml::Table) -> Map<String, Value> {
    table
        .into_iter()
        .map(|(key, value)| (key, toml_to_json_value(value)))
        .collect()
}

/// Convert a single TOML value to a JSON value.
fn toml_to_json_value(toml_value: toml::Value) -> Value {
    match toml_value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or_else(|| tagged(FLOAT_KEY, non_finite_literal(f))),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => tagged(DATETIME_KEY, dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json_value).collect()),
        toml::Value::Table(table) => Value::Object(toml_table_to_json(table)),
    }
}

/// Convert a JSON-compatible map to a TOML table. Null members are dropped.
fn json_map_to_toml(map: &Map<String, Value>) -> Result<toml::Table, ConfigError> {
    let mut table = toml::Table::new();
    for (key, value) in map {
        if value.is_null() {
            continue;
        }
        table.insert(key.clone(), json_to_toml_value(key, value)?);
    }
    Ok(table)
}

fn json_to_toml_value(key: &str, json_value: &Value) -> Result<toml::Value, ConfigError> {
    match json_value {
        Value::Null => Err(encode_error(format!(
            "'{key}' contains a null, which TOML cannot represent"
        ))),
        Value::Bool(b) => Ok(toml::Value::Boolean(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(toml::Value::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Ok(toml::Value::Float(f))
            } else {
                Err(encode_error(format!("'{key}' holds an unsupported number {n}")))
            }
        }
        Value::String(s) => Ok(toml::Value::String(s.clone())),
        Value::Array(arr) => arr
            .iter()
            .map(|item| json_to_toml_value(key, item))
            .collect::<Result<Vec<_>, _>>()
            .map(toml::Value::Array),
        Value::Object(obj) => match tagged_scalar(key, obj) {
            Some(value) => value,
            None => json_map_to_toml(obj).map(toml::Value::Table),
        },
    }
}

fn tagged(key: &str, literal: String) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), Value::String(literal));
    Value::Object(map)
}

fn non_finite_literal(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_sign_negative() {
        "-inf".to_string()
    } else {
        "inf".to_string()
    }
}

/// Restore a datetime or non-finite float from its single-key object form.
fn tagged_scalar(key: &str, obj: &Map<String, Value>) -> Option<Result<toml::Value, ConfigError>> {
    if obj.len() != 1 {
        return None;
    }
    let (tag, literal) = obj.iter().next()?;
    let literal = literal.as_str()?;
    match tag.as_str() {
        DATETIME_KEY => Some(
            literal
                .parse::<Datetime>()
                .map(toml::Value::Datetime)
                .map_err(|err| encode_error(format!("'{key}' holds an invalid datetime: {err}"))),
        ),
        FLOAT_KEY => Some(match literal {
            "nan" => Ok(toml::Value::Float(f64::NAN)),
            "inf" => Ok(toml::Value::Float(f64::INFINITY)),
            "-inf" => Ok(toml::Value::Float(f64::NEG_INFINITY)),
            other => Err(encode_error(format!("'{key}' holds an invalid float {other}"))),
        }),
        _ => None,
    }
}
