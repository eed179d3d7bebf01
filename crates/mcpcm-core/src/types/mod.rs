//! Shared core types used across the config store and commands.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which of an agent's config files an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// The agent's user-wide config file (e.g. `~/.cursor/mcp.json`).
    Global,
    /// The agent's config file relative to the project root (e.g. `.cursor/mcp.json`).
    Project,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => f.write_str("global"),
            Scope::Project => f.write_str("project"),
        }
    }
}
