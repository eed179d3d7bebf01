//! Read-only commands: list configured servers and find one by name.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

use crate::agent::{AgentDescriptor, AgentId};
use crate::config::{ConfigStore, ReadResult, ServerMapping};
use crate::error::ConfigError;
use crate::types::Scope;

/// Servers configured in one agent config file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigListing {
    pub agent: AgentId,
    pub display_name: String,
    pub scope: Scope,
    pub path: PathBuf,
    pub servers: ServerMapping,
}

/// A config file that exists but could not be read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnreadableConfig {
    pub agent: AgentId,
    pub display_name: String,
    pub scope: Scope,
    pub path: PathBuf,
    pub error: ConfigError,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListReport {
    /// Non-empty server mappings, by agent then scope
    pub listings: Vec<ConfigListing>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unreadable: Vec<UnreadableConfig>,
}

impl ListReport {
    pub fn total_servers(&self) -> usize {
        self.listings.iter().map(|l| l.servers.len()).sum()
    }
}

/// One place where a server name is configured.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerLocation {
    pub agent: AgentId,
    pub display_name: String,
    pub scope: Scope,
    pub path: PathBuf,
    pub definition: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FindReport {
    pub name: String,
    pub locations: Vec<ServerLocation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unreadable: Vec<UnreadableConfig>,
}

/// Visit every readable config of `agents` at `scopes`, collecting read errors.
fn scan<F>(
    store: &ConfigStore,
    agents: &[&AgentDescriptor],
    scopes: &[Scope],
    unreadable: &mut Vec<UnreadableConfig>,
    mut visit: F,
) where
    F: FnMut(&AgentDescriptor, Scope, ReadResult),
{
    for &agent in agents {
        for &scope in scopes {
            if !agent.supports_scope(scope) {
                continue;
            }
            let read = store.read(agent, scope);
            match read.error {
                Some(error) if read.exists => unreadable.push(UnreadableConfig {
                    agent: agent.id(),
                    display_name: agent.display_name().to_string(),
                    scope,
                    path: read.path,
                    error,
                }),
                Some(_) => {}
                None => visit(agent, scope, read),
            }
        }
    }
}

/// List the servers each agent has at each of `scopes`. Empty or missing
/// configs are left out.
pub fn list_servers(
    store: &ConfigStore,
    agents: &[&AgentDescriptor],
    scopes: &[Scope],
) -> ListReport {
    let mut report = ListReport::default();
    let mut listings = Vec::new();
    scan(store, agents, scopes, &mut report.unreadable, |agent, scope, read| {
        match read.config {
            Some(servers) if !servers.is_empty() => listings.push(ConfigListing {
                agent: agent.id(),
                display_name: agent.display_name().to_string(),
                scope,
                path: read.path,
                servers,
            }),
            _ => {}
        }
    });
    report.listings = listings;
    report
}

/// Find every global and project config that defines `name`.
pub fn find_server(store: &ConfigStore, agents: &[&AgentDescriptor], name: &str) -> FindReport {
    let mut unreadable = Vec::new();
    let mut locations = Vec::new();
    scan(
        store,
        agents,
        &[Scope::Global, Scope::Project],
        &mut unreadable,
        |agent, scope, read| {
            if let Some(definition) = read.config.as_ref().and_then(|c| c.get(name)) {
                locations.push(ServerLocation {
                    agent: agent.id(),
                    display_name: agent.display_name().to_string(),
                    scope,
                    definition: definition.clone(),
                    path: read.path,
                });
            }
        },
    );
    FindReport {
        name: name.to_string(),
        locations,
        unreadable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::FixedProbe;
    use crate::config::ConfigFormat;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn agents() -> Vec<AgentDescriptor> {
        vec![
            AgentDescriptor::new(AgentId::Cursor, "Cursor", ConfigFormat::Json)
                .with_global_path("~/.cursor/mcp.json")
                .with_project_path(".cursor/mcp.json")
                .with_nesting_key("mcpServers")
                .with_probe(FixedProbe(true)),
            AgentDescriptor::new(AgentId::Codex, "Codex", ConfigFormat::Toml)
                .with_global_path("~/.codex/config.toml")
                .with_nesting_key("mcp_servers")
                .with_probe(FixedProbe(true)),
        ]
    }

    fn setup() -> (TempDir, ConfigStore) {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("home");
        let project = temp.path().join("project");
        fs::create_dir_all(home.join(".cursor")).unwrap();
        fs::create_dir_all(home.join(".codex")).unwrap();
        fs::create_dir_all(project.join(".cursor")).unwrap();
        let store = ConfigStore::from_paths(home, project);
        (temp, store)
    }

    #[test]
    fn list_skips_missing_and_empty_configs() {
        let (_temp, store) = setup();
        fs::write(
            store.home_dir().join(".cursor/mcp.json"),
            r#"{"mcpServers":{"a":{"command":"x"},"b":{"command":"y"}}}"#,
        )
        .unwrap();
        fs::write(store.project_root().join(".cursor/mcp.json"), r#"{"mcpServers":{}}"#).unwrap();

        let agents = agents();
        let refs: Vec<&AgentDescriptor> = agents.iter().collect();
        let report = list_servers(&store, &refs, &[Scope::Global, Scope::Project]);

        assert_eq!(report.listings.len(), 1);
        assert_eq!(report.listings[0].agent, AgentId::Cursor);
        assert_eq!(report.listings[0].scope, Scope::Global);
        assert_eq!(report.total_servers(), 2);
        assert!(report.unreadable.is_empty());
    }

    #[test]
    fn list_reports_unreadable_configs() {
        let (_temp, store) = setup();
        fs::write(store.home_dir().join(".codex/config.toml"), "[mcp_servers\n").unwrap();

        let agents = agents();
        let refs: Vec<&AgentDescriptor> = agents.iter().collect();
        let report = list_servers(&store, &refs, &[Scope::Global]);

        assert!(report.listings.is_empty());
        assert_eq!(report.unreadable.len(), 1);
        assert_eq!(report.unreadable[0].agent, AgentId::Codex);
        assert!(matches!(
            report.unreadable[0].error,
            ConfigError::Decode {
                format: ConfigFormat::Toml,
                ..
            }
        ));
    }

    #[test]
    fn find_searches_every_scope() {
        let (_temp, store) = setup();
        fs::write(
            store.home_dir().join(".cursor/mcp.json"),
            r#"{"mcpServers":{"fs":{"command":"npx"}}}"#,
        )
        .unwrap();
        fs::write(
            store.project_root().join(".cursor/mcp.json"),
            r#"{"mcpServers":{"fs":{"command":"node"}}}"#,
        )
        .unwrap();
        fs::write(
            store.home_dir().join(".codex/config.toml"),
            "[mcp_servers.other]\ncommand = \"uvx\"\n",
        )
        .unwrap();

        let agents = agents();
        let refs: Vec<&AgentDescriptor> = agents.iter().collect();
        let report = find_server(&store, &refs, "fs");

        assert_eq!(report.name, "fs");
        assert_eq!(report.locations.len(), 2);
        assert_eq!(report.locations[0].scope, Scope::Global);
        assert_eq!(report.locations[0].definition, json!({"command": "npx"}));
        assert_eq!(report.locations[1].scope, Scope::Project);
        assert_eq!(report.locations[1].definition, json!({"command": "node"}));
    }

    #[test]
    fn find_reports_nothing_for_unknown_name() {
        let (_temp, store) = setup();
        let agents = agents();
        let refs: Vec<&AgentDescriptor> = agents.iter().collect();

        let report = find_server(&store, &refs, "missing");
        assert!(report.locations.is_empty());
        assert!(report.unreadable.is_empty());
    }
}
