//! Agent descriptors: where each AI coding agent keeps its MCP servers.
//!
//! A descriptor is static data plus an [`InstallProbe`]. The full set lives
//! in an [`AgentCatalog`], built once and passed around by reference.

pub mod probe;
pub mod registry;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigFormat;
use crate::types::Scope;

pub use probe::{FixedProbe, InstallProbe, NeverInstalled, PathProbe};
pub use registry::AgentCatalog;

/// Built-in agent identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentId {
    Cursor,
    ClaudeCode,
    Antigravity,
    Windsurf,
    #[serde(rename = "vscode")]
    VsCode,
    Codex,
    #[serde(rename = "opencode")]
    OpenCode,
    GeminiCli,
    Qoder,
    QwenCode,
    Trae,
}

impl AgentId {
    pub const ALL: [AgentId; 11] = [
        AgentId::Cursor,
        AgentId::ClaudeCode,
        AgentId::Antigravity,
        AgentId::Windsurf,
        AgentId::VsCode,
        AgentId::Codex,
        AgentId::OpenCode,
        AgentId::GeminiCli,
        AgentId::Qoder,
        AgentId::QwenCode,
        AgentId::Trae,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentId::Cursor => "cursor",
            AgentId::ClaudeCode => "claude-code",
            AgentId::Antigravity => "antigravity",
            AgentId::Windsurf => "windsurf",
            AgentId::VsCode => "vscode",
            AgentId::Codex => "codex",
            AgentId::OpenCode => "opencode",
            AgentId::GeminiCli => "gemini-cli",
            AgentId::Qoder => "qoder",
            AgentId::QwenCode => "qwen-code",
            AgentId::Trae => "trae",
        }
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<_> = AgentId::ALL.iter().map(|id| id.as_str()).collect();
                anyhow::anyhow!("Unknown agent: {s} (expected one of: {})", known.join(", "))
            })
    }
}

/// Operating system family, for agents whose paths differ per platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }
}

/// Where and how one agent stores its MCP servers.
#[derive(Debug)]
pub struct AgentDescriptor {
    id: AgentId,
    display_name: String,
    format: ConfigFormat,
    nesting_key: Option<String>,
    global_path: Option<String>,
    project_path: Option<String>,
    probe: Box<dyn InstallProbe>,
}

impl AgentDescriptor {
    /// A descriptor with no paths, servers under the root `mcpServers` key,
    /// and a probe that never reports the agent as installed.
    pub fn new(id: AgentId, display_name: impl Into<String>, format: ConfigFormat) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            format,
            nesting_key: None,
            global_path: None,
            project_path: None,
            probe: Box::new(NeverInstalled),
        }
    }

    pub fn with_nesting_key(mut self, key: impl Into<String>) -> Self {
        self.nesting_key = Some(key.into());
        self
    }

    /// Global config path, in `~/` shorthand or absolute.
    pub fn with_global_path(mut self, path: impl Into<String>) -> Self {
        self.global_path = Some(path.into());
        self
    }

    /// Config path relative to the project root.
    pub fn with_project_path(mut self, path: impl Into<String>) -> Self {
        self.project_path = Some(path.into());
        self
    }

    pub fn with_probe(mut self, probe: impl InstallProbe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn format(&self) -> ConfigFormat {
        self.format
    }

    /// Key holding the server mapping; `None` means root-level `mcpServers`.
    pub fn nesting_key(&self) -> Option<&str> {
        self.nesting_key.as_deref()
    }

    pub fn global_path(&self) -> Option<&str> {
        self.global_path.as_deref()
    }

    pub fn project_path(&self) -> Option<&str> {
        self.project_path.as_deref()
    }

    pub fn path_for_scope(&self, scope: Scope) -> Option<&str> {
        match scope {
            Scope::Global => self.global_path(),
            Scope::Project => self.project_path(),
        }
    }

    pub fn supports_scope(&self, scope: Scope) -> bool {
        self.path_for_scope(scope).is_some()
    }

    pub fn is_installed(&self) -> bool {
        self.probe.is_installed()
    }
}
