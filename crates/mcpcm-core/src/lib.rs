//! mcpcm Core Library
//!
//! Provides the domain logic for managing MCP server entries across the
//! configuration files of many AI coding agents, in JSON or TOML, without
//! disturbing the unrelated settings those files carry.

pub mod agent;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod types;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{
        ConfigDocument, ConfigFormat, ConfigStore, ReadResult, ServerDefinition, ServerMapping,
        WriteResult, extract_servers, inject_servers, merge_servers, parse_server_input,
        remove_servers,
    };

    // Agents
    pub use crate::agent::{AgentCatalog, AgentDescriptor, AgentId, InstallProbe, Platform};

    // Commands
    pub use crate::commands::{AgentOutcome, BatchReport, OutcomeStatus};

    pub use crate::context::AppContext;
    pub use crate::error::ConfigError;
    pub use crate::types::Scope;
}
