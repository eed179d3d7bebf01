//! Config store for reading and writing an agent's MCP servers.
//!
//! Every call is total: failures come back inside [`ReadResult`] or
//! [`WriteResult`] so a batch over many agents can report each one and move
//! on. Writes go straight to the target file; there is no lock and no
//! temp-file rename.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use tracing::debug;

use super::codec::{self, ConfigDocument, ConfigFormat};
use super::paths::config_path_for_scope;
use super::servers::{ServerMapping, extract_servers, inject_servers};
use crate::agent::AgentDescriptor;
use crate::error::ConfigError;
use crate::types::Scope;

/// Outcome of reading one agent config file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadResult {
    /// Servers found, `None` when the file is absent or unusable
    pub config: Option<ServerMapping>,
    /// The whole decoded document, kept so a later write preserves it
    #[serde(skip)]
    pub raw_document: Option<ConfigDocument>,
    pub path: PathBuf,
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ConfigError>,
}

impl ReadResult {
    fn missing(path: PathBuf) -> Self {
        Self {
            config: None,
            raw_document: None,
            path,
            exists: false,
            error: None,
        }
    }

    fn failed(path: PathBuf, exists: bool, error: ConfigError) -> Self {
        Self {
            config: None,
            raw_document: None,
            path,
            exists,
            error: Some(error),
        }
    }

    /// The servers read, or an empty mapping when there were none.
    pub fn servers(&self) -> ServerMapping {
        self.config.clone().unwrap_or_default()
    }
}

/// Outcome of writing one agent config file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WriteResult {
    pub success: bool,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ConfigError>,
}

impl WriteResult {
    fn ok(path: PathBuf) -> Self {
        Self {
            success: true,
            path,
            error: None,
        }
    }

    fn failed(path: PathBuf, error: ConfigError) -> Self {
        Self {
            success: false,
            path,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    home_dir: PathBuf,
    project_root: PathBuf,
}

impl ConfigStore {
    pub fn from_paths(home_dir: PathBuf, project_root: PathBuf) -> Self {
        Self {
            home_dir,
            project_root,
        }
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Concrete file for `agent` at `scope`.
    pub fn resolve_path(
        &self,
        agent: &AgentDescriptor,
        scope: Scope,
    ) -> Result<PathBuf, ConfigError> {
        let configured = agent
            .path_for_scope(scope)
            .ok_or_else(|| ConfigError::UnsupportedScope {
                agent: agent.display_name().to_string(),
                scope,
            })?;
        Ok(config_path_for_scope(
            scope,
            configured,
            &self.home_dir,
            &self.project_root,
        ))
    }

    pub fn read(&self, agent: &AgentDescriptor, scope: Scope) -> ReadResult {
        match self.resolve_path(agent, scope) {
            Ok(path) => read_config_file(&path, agent.format(), agent.nesting_key()),
            Err(err) => ReadResult::failed(PathBuf::new(), false, err),
        }
    }

    /// Write `servers` into the agent's file for `scope`.
    ///
    /// `previous` is the document from an earlier [`ConfigStore::read`]; when
    /// it is `None` the file is re-read so unrelated settings survive.
    pub fn write(
        &self,
        agent: &AgentDescriptor,
        scope: Scope,
        servers: &ServerMapping,
        previous: Option<&ConfigDocument>,
    ) -> WriteResult {
        match self.resolve_path(agent, scope) {
            Ok(path) => {
                write_config_file(&path, agent.format(), agent.nesting_key(), servers, previous)
            }
            Err(err) => WriteResult::failed(PathBuf::new(), err),
        }
    }
}

/// Read the server mapping from a config file.
pub fn read_config_file(path: &Path, format: ConfigFormat, nesting_key: Option<&str>) -> ReadResult {
    if !path.exists() {
        debug!(path = %path.display(), "config file not found");
        return ReadResult::missing(path.to_path_buf());
    }

    let document = match load_document(path, format) {
        Ok(document) => document,
        Err(err) => return ReadResult::failed(path.to_path_buf(), true, err),
    };
    let servers = extract_servers(&document, nesting_key);
    debug!(path = %path.display(), servers = servers.len(), "read config");

    ReadResult {
        config: Some(servers),
        raw_document: Some(document),
        path: path.to_path_buf(),
        exists: true,
        error: None,
    }
}

/// Write a server mapping into a config file, keeping its other settings.
pub fn write_config_file(
    path: &Path,
    format: ConfigFormat,
    nesting_key: Option<&str>,
    servers: &ServerMapping,
    previous: Option<&ConfigDocument>,
) -> WriteResult {
    match try_write(path, format, nesting_key, servers, previous) {
        Ok(()) => {
            debug!(path = %path.display(), servers = servers.len(), "wrote config");
            WriteResult::ok(path.to_path_buf())
        }
        Err(err) => WriteResult::failed(path.to_path_buf(), err),
    }
}

fn try_write(
    path: &Path,
    format: ConfigFormat,
    nesting_key: Option<&str>,
    servers: &ServerMapping,
    previous: Option<&ConfigDocument>,
) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))
            .map_err(|err| ConfigError::io(&err))?;
    }

    let base = match previous {
        Some(document) => document.clone(),
        None if path.exists() => load_document(path, format)?,
        None => ConfigDocument::new(),
    };
    let document = inject_servers(&base, nesting_key, servers);
    let content = codec::encode(&document, format)?;

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))
        .map_err(|err| ConfigError::io(&err))
}

fn load_document(path: &Path, format: ConfigFormat) -> Result<ConfigDocument, ConfigError> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))
        .map_err(|err| ConfigError::io(&err))?;
    codec::decode(&content, format)
}
