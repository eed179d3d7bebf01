use std::path::PathBuf;

use tempfile::TempDir;

use mcpcm_core::agent::{AgentId, Platform};
use mcpcm_core::commands::{TargetSelection, resolve_targets};
use mcpcm_core::context::AppContext;
use mcpcm_core::types::Scope;

fn create_context(temp: &TempDir) -> AppContext {
    let home = temp.path().join("home");
    let project = temp.path().join("project");
    std::fs::create_dir_all(&home).unwrap();
    std::fs::create_dir_all(&project).unwrap();
    AppContext::new(home, project, Platform::Linux)
}

#[test]
fn context_exposes_paths() {
    let temp = TempDir::new().unwrap();
    let ctx = create_context(&temp);

    assert_eq!(ctx.home_dir(), temp.path().join("home"));
    assert_eq!(ctx.project_root(), temp.path().join("project"));
    assert_eq!(ctx.platform(), Platform::Linux);
    assert_eq!(ctx.config_store().home_dir(), ctx.home_dir());
}

#[test]
fn installed_agents_follow_home_directories() {
    let temp = TempDir::new().unwrap();
    let ctx = create_context(&temp);
    std::fs::create_dir_all(ctx.home_dir().join(".cursor")).unwrap();
    std::fs::create_dir_all(ctx.home_dir().join(".codex")).unwrap();
    std::fs::write(ctx.home_dir().join(".claude.json"), "{}").unwrap();

    let catalog = ctx.agent_catalog();
    let installed: Vec<AgentId> = resolve_targets(&catalog, &TargetSelection::Installed, Scope::Global)
        .iter()
        .map(|a| a.id())
        .collect();

    assert_eq!(
        installed,
        vec![AgentId::Cursor, AgentId::ClaudeCode, AgentId::Codex]
    );
}

#[test]
fn builtin_paths_resolve_against_context() {
    let temp = TempDir::new().unwrap();
    let ctx = create_context(&temp);
    let catalog = ctx.agent_catalog();
    let store = ctx.config_store();

    let vscode = catalog.get(AgentId::VsCode).unwrap();
    assert_eq!(
        store.resolve_path(vscode, Scope::Global).unwrap(),
        ctx.home_dir().join(".config/Code/User/mcp.json")
    );
    assert_eq!(
        store.resolve_path(vscode, Scope::Project).unwrap(),
        ctx.project_root().join(".vscode/mcp.json")
    );

    let trae = catalog.get(AgentId::Trae).unwrap();
    assert!(store.resolve_path(trae, Scope::Global).is_err());
    assert_eq!(
        store.resolve_path(trae, Scope::Project).unwrap(),
        PathBuf::from(ctx.project_root()).join(".trae/mcp.json")
    );
}

#[test]
fn workspace_targets_every_agent_with_project_config() {
    let temp = TempDir::new().unwrap();
    let ctx = create_context(&temp);
    let catalog = ctx.agent_catalog();

    let targets = resolve_targets(&catalog, &TargetSelection::AllSupporting, Scope::Project);
    let ids: Vec<AgentId> = targets.iter().map(|a| a.id()).collect();

    assert!(!ids.contains(&AgentId::OpenCode));
    assert!(!ids.contains(&AgentId::Qoder));
    assert!(ids.contains(&AgentId::Trae));
    assert_eq!(ids.len(), 9);
}
