//! Batch commands over many agents.
//!
//! Each command walks its targets in order and records one
//! [`AgentOutcome`] per agent. A failure for one agent never stops the
//! others; callers read the counts off the returned report.

pub mod add;
pub mod query;
pub mod remove;
pub mod sync;

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use crate::agent::{AgentCatalog, AgentDescriptor, AgentId};
use crate::config::{ConfigStore, ReadResult, WriteResult};
use crate::error::ConfigError;
use crate::types::Scope;

pub use add::{AddOptions, add_servers, update_servers};
pub use query::{
    ConfigListing, FindReport, ListReport, ServerLocation, UnreadableConfig, find_server,
    list_servers,
};
pub use remove::remove_servers;
pub use sync::{SyncError, sync_servers};

/// Which agents a write command touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSelection {
    /// Exactly these agents, in this order
    Agents(Vec<AgentId>),
    /// Every agent whose installation probe fires
    Installed,
    /// Every agent with a config path at the command's scope
    AllSupporting,
}

/// Resolve a selection against the catalog.
pub fn resolve_targets<'a>(
    catalog: &'a AgentCatalog,
    selection: &TargetSelection,
    scope: Scope,
) -> Vec<&'a AgentDescriptor> {
    match selection {
        TargetSelection::Agents(ids) => catalog.select(ids),
        TargetSelection::Installed => catalog.detect_installed(),
        TargetSelection::AllSupporting => catalog.supporting_scope(scope),
    }
}

/// Why an agent was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The agent has no config file for the scope
    UnsupportedScope,
    /// The config file does not exist
    NotConfigured,
    /// None of the requested servers are present
    NoMatchingServers,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnsupportedScope => f.write_str("scope not supported"),
            SkipReason::NotConfigured => f.write_str("no config file"),
            SkipReason::NoMatchingServers => f.write_str("no matching servers found"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// The file was written; `servers` are the names added, updated or removed
    Applied { servers: Vec<String> },
    Skipped { reason: SkipReason },
    Failed { error: ConfigError },
}

/// What happened to one agent during a batch command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentOutcome {
    pub agent: AgentId,
    pub display_name: String,
    pub scope: Scope,
    /// Config file involved, when one could be resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(flatten)]
    pub status: OutcomeStatus,
    /// Requested servers that this agent does not have
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
}

impl AgentOutcome {
    fn new(agent: &AgentDescriptor, scope: Scope, path: Option<PathBuf>, status: OutcomeStatus) -> Self {
        Self {
            agent: agent.id(),
            display_name: agent.display_name().to_string(),
            scope,
            path,
            status,
            missing: Vec::new(),
        }
    }

    fn with_missing(mut self, missing: Vec<String>) -> Self {
        self.missing = missing;
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Applied { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failed { .. })
    }
}

/// Per-agent results of one batch command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub scope: Scope,
    /// Server names the command was asked to handle
    pub servers: Vec<String>,
    pub outcomes: Vec<AgentOutcome>,
}

impl BatchReport {
    fn new(scope: Scope, servers: Vec<String>) -> Self {
        Self {
            scope,
            servers,
            outcomes: Vec::new(),
        }
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    /// Missing server names, each with the agents that lacked it, in the
    /// order the names were first seen.
    pub fn missing_by_server(&self) -> Vec<(String, Vec<String>)> {
        let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
        for outcome in &self.outcomes {
            for name in &outcome.missing {
                match grouped.iter_mut().find(|(n, _)| n == name) {
                    Some((_, agents)) => agents.push(outcome.display_name.clone()),
                    None => grouped.push((name.clone(), vec![outcome.display_name.clone()])),
                }
            }
        }
        grouped
    }
}

/// Read an agent's config, turning unusable results into a final outcome.
///
/// A missing file is not an error here; callers decide what it means.
fn read_target(
    store: &ConfigStore,
    agent: &AgentDescriptor,
    scope: Scope,
) -> Result<ReadResult, AgentOutcome> {
    if !agent.supports_scope(scope) {
        debug!(agent = %agent.id(), %scope, "agent has no config path for scope");
        return Err(AgentOutcome::new(
            agent,
            scope,
            None,
            OutcomeStatus::Skipped {
                reason: SkipReason::UnsupportedScope,
            },
        ));
    }

    let read = store.read(agent, scope);
    match read.error {
        Some(error) => Err(AgentOutcome::new(
            agent,
            scope,
            Some(read.path),
            OutcomeStatus::Failed { error },
        )),
        None => Ok(read),
    }
}

/// Outcome for a finished write; `servers` are the names it changed.
fn write_outcome(
    agent: &AgentDescriptor,
    scope: Scope,
    written: WriteResult,
    servers: Vec<String>,
) -> AgentOutcome {
    let status = match written.error {
        Some(error) => OutcomeStatus::Failed { error },
        None => OutcomeStatus::Applied { servers },
    };
    AgentOutcome::new(agent, scope, Some(written.path), status)
}
