//! Remove command.

use tracing::debug;

use super::{AgentOutcome, BatchReport, OutcomeStatus, SkipReason, read_target, write_outcome};
use crate::agent::AgentDescriptor;
use crate::config::{self, ConfigStore};
use crate::types::Scope;

/// Delete the named servers from every target's config.
///
/// Agents without a config file, or without any of the names, are skipped
/// and their files are left as they are.
pub fn remove_servers(
    store: &ConfigStore,
    targets: &[&AgentDescriptor],
    names: &[String],
    scope: Scope,
) -> BatchReport {
    let mut report = BatchReport::new(scope, names.to_vec());

    for agent in targets {
        let existing = match read_target(store, agent, scope) {
            Ok(read) => read,
            Err(outcome) => {
                report.outcomes.push(outcome);
                continue;
            }
        };

        let Some(current) = existing.config else {
            debug!(agent = %agent.id(), "no config file, nothing to remove");
            report.outcomes.push(AgentOutcome::new(
                agent,
                scope,
                Some(existing.path),
                OutcomeStatus::Skipped {
                    reason: SkipReason::NotConfigured,
                },
            ));
            continue;
        };

        let (present, missing): (Vec<String>, Vec<String>) =
            names.iter().cloned().partition(|name| current.contains(name));
        if present.is_empty() {
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

        let remaining = config::remove_servers(&current, &present);
        let written = store.write(agent, scope, &remaining, existing.raw_document.as_ref());
        report
            .outcomes
            .push(write_outcome(agent, scope, written, present).with_missing(missing));
    }

    report
}
