//! Add and update commands.

use tracing::{debug, warn};

use super::{AgentOutcome, BatchReport, OutcomeStatus, SkipReason, read_target, write_outcome};
use crate::agent::AgentDescriptor;
use crate::config::{ConfigStore, ServerMapping, merge_servers, split_existing};
use crate::types::Scope;

/// Options for the add command
#[derive(Debug, Clone)]
pub struct AddOptions {
    /// Servers to add
    pub servers: ServerMapping,
    /// Which config file of each agent to write
    pub scope: Scope,
    /// Replace same-name servers instead of shallow-merging them
    pub replace: bool,
}

impl AddOptions {
    pub fn new(servers: ServerMapping) -> Self {
        Self {
            servers,
            scope: Scope::Global,
            replace: false,
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }
}

/// Merge `options.servers` into every target's config.
pub fn add_servers(
    store: &ConfigStore,
    targets: &[&AgentDescriptor],
    options: &AddOptions,
) -> BatchReport {
    let names: Vec<String> = options.servers.names().map(str::to_string).collect();
    let mut report = BatchReport::new(options.scope, names.clone());
    debug!(servers = ?names, replace = options.replace, "adding servers");

    for agent in targets {
        let existing = match read_target(store, agent, options.scope) {
            Ok(read) => read,
            Err(outcome) => {
                report.outcomes.push(outcome);
                continue;
            }
        };

        let merged = merge_servers(&existing.servers(), &options.servers, options.replace);
        let written = store.write(
            agent,
            options.scope,
            &merged,
            existing.raw_document.as_ref(),
        );
        report.outcomes.push(write_outcome(agent, options.scope, written, names.clone()));
    }

    report
}

/// Replace servers that already exist in each target; report the rest as missing.
///
/// Names a target does not have are never added. A target with none of the
/// names is skipped without touching its file.
pub fn update_servers(
    store: &ConfigStore,
    targets: &[&AgentDescriptor],
    servers: &ServerMapping,
    scope: Scope,
) -> BatchReport {
    let names: Vec<String> = servers.names().map(str::to_string).collect();
    let mut report = BatchReport::new(scope, names);

    for agent in targets {
        let existing = match read_target(store, agent, scope) {
            Ok(read) => read,
            Err(outcome) => {
                report.outcomes.push(outcome);
                continue;
            }
        };

        let current = existing.servers();
        let (updates, missing) = split_existing(&current, servers);
        if updates.is_empty() {
            warn!(agent = %agent.id(), "no matching servers found, skipping");
            report.outcomes.push(
                AgentOutcome::new(
                    agent,
                    scope,
                    Some(existing.path),
                    OutcomeStatus::Skipped {
                        reason: SkipReason::NoMatchingServers,
                    },
                )
                .with_missing(missing),
            );
            continue;
        }

        let updated_names: Vec<String> = updates.names().map(str::to_string).collect();
        let merged = merge_servers(&current, &updates, true);
        let written = store.write(agent, scope, &merged, existing.raw_document.as_ref());
        report
            .outcomes
            .push(write_outcome(agent, scope, written, updated_names).with_missing(missing));
    }

    report
}
