//! Agent catalog: the table of supported agents.
//!
//! The catalog is built once per process from the home directory, project
//! root and platform, then only read. Lookups and target selection hand out
//! borrowed descriptors in catalog order.

use std::path::Path;

use super::{AgentDescriptor, AgentId, NeverInstalled, PathProbe, Platform};
use crate::config::ConfigFormat;
use crate::types::Scope;

#[derive(Debug, Default)]
pub struct AgentCatalog {
    agents: Vec<AgentDescriptor>,
}

impl AgentCatalog {
    /// Create a catalog from explicit descriptors.
    pub fn from_agents(agents: Vec<AgentDescriptor>) -> Self {
        Self { agents }
    }

    /// Create the catalog of every built-in agent.
    pub fn builtin(home: &Path, project_root: &Path, platform: Platform) -> Self {
        let (vscode_dir, vscode_global) = match platform {
            Platform::MacOs => (
                "Library/Application Support/Code",
                "~/Library/Application Support/Code/User/mcp.json",
            ),
            Platform::Windows => (
                "AppData/Roaming/Code",
                "~/AppData/Roaming/Code/User/mcp.json",
            ),
            Platform::Linux => (".config/Code", "~/.config/Code/User/mcp.json"),
        };

        let agents = vec![
            AgentDescriptor::new(AgentId::Cursor, "Cursor", ConfigFormat::Json)
                .with_project_path(".cursor/mcp.json")
                .with_global_path("~/.cursor/mcp.json")
                .with_nesting_key("mcpServers")
                .with_probe(PathProbe::new(home.join(".cursor"))),
            AgentDescriptor::new(AgentId::ClaudeCode, "Claude Code", ConfigFormat::Json)
                .with_project_path(".mcp.json")
                .with_global_path("~/.claude.json")
                .with_nesting_key("mcpServers")
                .with_probe(PathProbe::new(home.join(".claude.json"))),
            AgentDescriptor::new(AgentId::Antigravity, "Antigravity", ConfigFormat::Json)
                .with_project_path(".gemini/mcp_config.json")
                .with_global_path("~/.gemini/antigravity/mcp_config.json")
                .with_nesting_key("mcpServers")
                .with_probe(PathProbe::any_of([
                    home.join(".gemini/antigravity"),
                    home.join(".gemini"),
                ])),
            AgentDescriptor::new(AgentId::Windsurf, "Windsurf", ConfigFormat::Json)
                .with_project_path(".windsurf/mcp_config.json")
                .with_global_path("~/.codeium/windsurf/mcp_config.json")
                .with_nesting_key("mcpServers")
                .with_probe(PathProbe::new(home.join(".codeium/windsurf"))),
            // VS Code uses "servers" instead of "mcpServers"
            AgentDescriptor::new(AgentId::VsCode, "VS Code / GitHub Copilot", ConfigFormat::Json)
                .with_project_path(".vscode/mcp.json")
                .with_global_path(vscode_global)
                .with_nesting_key("servers")
                .with_probe(PathProbe::new(home.join(vscode_dir))),
            AgentDescriptor::new(AgentId::Codex, "Codex", ConfigFormat::Toml)
                .with_project_path(".codex/config.toml")
                .with_global_path("~/.codex/config.toml")
                .with_nesting_key("mcp_servers")
                .with_probe(PathProbe::new(home.join(".codex"))),
            AgentDescriptor::new(AgentId::OpenCode, "OpenCode", ConfigFormat::Json)
                .with_global_path("~/.config/opencode/opencode.json")
                .with_nesting_key("mcpServers")
                .with_probe(PathProbe::new(home.join(".config/opencode"))),
            AgentDescriptor::new(AgentId::GeminiCli, "Gemini CLI", ConfigFormat::Json)
                .with_project_path(".gemini/settings.json")
                .with_global_path("~/.gemini/settings.json")
                .with_nesting_key("mcpServers")
                .with_probe(PathProbe::new(home.join(".gemini"))),
            // Managed through qodercli; there is no file to edit or detect.
            AgentDescriptor::new(AgentId::Qoder, "Qoder", ConfigFormat::Json)
                .with_probe(NeverInstalled),
            AgentDescriptor::new(AgentId::QwenCode, "Qwen Code", ConfigFormat::Json)
                .with_project_path(".qwen/settings.json")
                .with_global_path("~/.qwen/settings.json")
                .with_nesting_key("mcpServers")
                .with_probe(PathProbe::new(home.join(".qwen"))),
            AgentDescriptor::new(AgentId::Trae, "Trae", ConfigFormat::Json)
                .with_project_path(".trae/mcp.json")
                .with_nesting_key("mcpServers")
                .with_probe(PathProbe::new(project_root.join(".trae"))),
        ];
        Self { agents }
    }

    /// Get all agents.
    pub fn all(&self) -> &[AgentDescriptor] {
        &self.agents
    }

    /// Get an agent by ID.
    pub fn get(&self, id: AgentId) -> Option<&AgentDescriptor> {
        self.agents.iter().find(|a| a.id() == id)
    }

    /// Agents for an explicit id list, in the order given. Unknown ids and
    /// duplicates are dropped.
    pub fn select(&self, ids: &[AgentId]) -> Vec<&AgentDescriptor> {
        let mut selected: Vec<&AgentDescriptor> = Vec::new();
        for id in ids {
            if let Some(agent) = self.get(*id)
                && !selected.iter().any(|a| a.id() == *id)
            {
                selected.push(agent);
            }
        }
        selected
    }

    /// Agents whose installation probe fires.
    pub fn detect_installed(&self) -> Vec<&AgentDescriptor> {
        self.agents.iter().filter(|a| a.is_installed()).collect()
    }

    /// Agents that have a config file at the given scope.
    pub fn supporting_scope(&self, scope: Scope) -> Vec<&AgentDescriptor> {
        self.agents
            .iter()
            .filter(|a| a.supports_scope(scope))
            .collect()
    }

    /// Agents with a project-level config file.
    pub fn with_project_scope(&self) -> Vec<&AgentDescriptor> {
        self.supporting_scope(Scope::Project)
    }
}
