//! MCP server mappings and their place inside an agent's config document.
//!
//! A server mapping is kept as raw JSON so that fields this crate does not
//! know about (`type`, `url`, `headers`, `cwd`, `disabled`, ...) survive a
//! read-modify-write untouched. [`ServerDefinition`] is a typed view used
//! for recognition and reporting only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::codec::ConfigDocument;
use crate::error::ConfigError;

/// Key that holds the server mapping when an agent names no nesting key.
pub const DEFAULT_SERVERS_KEY: &str = "mcpServers";

/// Typed view of one server's launch configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDefinition {
    /// Executable to launch
    pub command: String,

    /// Arguments, absent rather than empty when not supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,

    /// Environment variables for the server process
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,

    /// Any other fields, passed through as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServerDefinition {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: None,
            env: None,
            extra: Map::new(),
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Interpret a raw value. Returns `None` unless it has a string `command`
    /// and well-typed `args`/`env`.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !is_server_definition(value) {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    pub fn to_value(&self) -> Value {
        // Serializing strings, string maps and a JSON map cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// `command arg1 arg2`, for one-line listings.
    pub fn command_line(&self) -> String {
        match &self.args {
            Some(args) if !args.is_empty() => format!("{} {}", self.command, args.join(" ")),
            _ => self.command.clone(),
        }
    }
}

/// Whether a value looks like a server definition: an object with `command`.
pub fn is_server_definition(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|obj| obj.contains_key("command"))
}

/// Server name → definition, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerMapping(Map<String, Value>);

impl ServerMapping {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Typed view of one entry, if it is a recognizable definition.
    pub fn definition(&self, name: &str) -> Option<ServerDefinition> {
        self.get(name).and_then(ServerDefinition::from_value)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(name.into(), value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for ServerMapping {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ServerMapping {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

fn servers_key(nesting_key: Option<&str>) -> &str {
    nesting_key.unwrap_or(DEFAULT_SERVERS_KEY)
}

/// Pull the server mapping out of a document.
///
/// Looks under `nesting_key`, or `mcpServers` at the root when there is none.
/// A missing or non-object value yields an empty mapping.
pub fn extract_servers(document: &ConfigDocument, nesting_key: Option<&str>) -> ServerMapping {
    match document.get(servers_key(nesting_key)) {
        Some(Value::Object(servers)) => ServerMapping::from_map(servers.clone()),
        _ => ServerMapping::new(),
    }
}

/// Return a copy of `document` whose server key holds `servers`.
///
/// Only that one key is replaced; every other key keeps its value and position.
pub fn inject_servers(
    document: &ConfigDocument,
    nesting_key: Option<&str>,
    servers: &ServerMapping,
) -> ConfigDocument {
    let mut updated = document.clone();
    updated.insert(
        servers_key(nesting_key).to_string(),
        Value::Object(servers.as_map().clone()),
    );
    updated
}

/// Parse user-supplied JSON into a server mapping.
///
/// Accepts `{"mcpServers": {...}}`, or a bare `{"<name>": {"command": ...}}`
/// mapping recognized by its first entry.
pub fn parse_server_input(text: &str) -> Result<ServerMapping, ConfigError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|err| ConfigError::invalid_input(format!("not valid JSON ({err})")))?;
    let Value::Object(root) = value else {
        return Err(ConfigError::invalid_input("expected a JSON object"));
    };

    if let Some(Value::Object(servers)) = root.get(DEFAULT_SERVERS_KEY) {
        if servers.is_empty() {
            return Err(ConfigError::invalid_input(
                "'mcpServers' does not contain any servers",
            ));
        }
        return Ok(ServerMapping::from_map(servers.clone()));
    }

    match root.values().next() {
        Some(first) if is_server_definition(first) => Ok(ServerMapping::from_map(root)),
        _ => Err(ConfigError::invalid_input(
            "expected {\"mcpServers\": {...}} or {\"<name>\": {\"command\": ...}}",
        )),
    }
}
