//! Sync command: copy one agent's global servers to other agents.

use serde::Serialize;
use thiserror::Error;

use super::BatchReport;
use super::add::{AddOptions, add_servers};
use crate::agent::AgentDescriptor;
use crate::config::ConfigStore;
use crate::error::ConfigError;
use crate::types::Scope;

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyncError {
    #[error("Cannot read {agent}'s global config: {error}")]
    SourceUnreadable { agent: String, error: ConfigError },

    #[error("No MCP servers found in {agent}'s global config")]
    EmptySource { agent: String },
}

/// Merge every server in `source`'s global config into each target's global
/// config. The source itself is never a target. Same-name servers are
/// shallow-merged, never replaced.
pub fn sync_servers(
    store: &ConfigStore,
    source: &AgentDescriptor,
    targets: &[&AgentDescriptor],
) -> Result<BatchReport, SyncError> {
    let read = store.read(source, Scope::Global);
    if let Some(error) = read.error {
        return Err(SyncError::SourceUnreadable {
            agent: source.display_name().to_string(),
            error,
        });
    }
    let servers = read.servers();
    if servers.is_empty() {
        return Err(SyncError::EmptySource {
            agent: source.display_name().to_string(),
        });
    }

    let targets: Vec<&AgentDescriptor> = targets
        .iter()
        .copied()
        .filter(|agent| agent.id() != source.id())
        .collect();
    Ok(add_servers(store, &targets, &AddOptions::new(servers)))
}
