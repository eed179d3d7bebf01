//! mcpcm - MCP Configuration Manager
//!
//! Usage:
//!   mcpcm add '{"mcpServers":{...}}' --agent cursor
//!   mcpcm del my-server --global
//!   mcpcm sync --from claude-code --to-all
//!   mcpcm list

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use console::style;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use mcpcm_core::commands::{
    AddOptions, BatchReport, FindReport, ListReport, OutcomeStatus, SyncError, TargetSelection,
    UnreadableConfig, add_servers, find_server, list_servers, remove_servers, resolve_targets,
    sync_servers, update_servers,
};
use mcpcm_core::config::expand_home;
use mcpcm_core::prelude::*;

#[derive(Parser)]
#[command(name = "mcpcm")]
#[command(about = "Manage MCP server configs across AI coding agents", long_about = None)]
struct Cli {
    /// Log what each step reads and writes
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short = 'o', long, global = true, default_value = "table")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add MCP servers to agent configs
    Add {
        #[command(flatten)]
        input: ServerInput,
        #[command(flatten)]
        target: TargetArgs,
        /// Replace same-name servers instead of merging their fields
        #[arg(short, long)]
        replace: bool,
    },

    /// Replace MCP servers that agents already have
    Update {
        #[command(flatten)]
        input: ServerInput,
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Remove MCP servers by name
    #[command(alias = "rm")]
    Del {
        /// Server names to remove
        #[arg(required = true)]
        names: Vec<String>,
        #[command(flatten)]
        target: TargetArgs,
    },

    /// List configured MCP servers
    List {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Show every config that defines a server
    Find {
        /// Server name
        name: String,
    },

    /// Copy one agent's global servers to other agents
    Sync {
        /// Agent to copy from
        #[arg(long)]
        from: AgentId,
        /// Agents to copy to
        #[arg(
            long,
            value_delimiter = ',',
            required_unless_present = "to_all",
            conflicts_with = "to_all"
        )]
        to: Vec<AgentId>,
        /// Copy to every installed agent
        #[arg(long)]
        to_all: bool,
    },

    /// Show supported agents and whether they are installed
    Agents,
}

/// A server mapping given inline or as a file.
#[derive(Args)]
struct ServerInput {
    /// MCP config as JSON
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    json: Option<String>,
    /// Read the MCP config from a file
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,
}

impl ServerInput {
    fn parse(&self) -> Result<ServerMapping> {
        let text = match (&self.json, &self.file) {
            (_, Some(path)) => {
                let path = expand_home(&path.to_string_lossy());
                std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read file: {}", path.display()))?
            }
            (Some(json), None) => json.clone(),
            (None, None) => anyhow::bail!("No MCP config provided. Use a JSON string or --file."),
        };
        Ok(parse_server_input(&text)?)
    }
}

#[derive(Args)]
struct TargetArgs {
    /// Target agents; repeat the flag or separate with commas
    #[arg(short, long = "agent", value_name = "AGENT", value_delimiter = ',')]
    agents: Vec<AgentId>,
    /// Global configs of installed agents
    #[arg(short, long)]
    global: bool,
    /// Project configs in the current directory
    #[arg(short, long, conflicts_with = "global")]
    workspace: bool,
}

impl TargetArgs {
    fn scope(&self) -> Scope {
        if self.workspace {
            Scope::Project
        } else {
            Scope::Global
        }
    }

    /// Targets for commands that change files; one flag must be given.
    fn selection(&self) -> Result<TargetSelection> {
        if !self.agents.is_empty() {
            Ok(TargetSelection::Agents(self.agents.clone()))
        } else if self.global {
            Ok(TargetSelection::Installed)
        } else if self.workspace {
            Ok(TargetSelection::AllSupporting)
        } else {
            anyhow::bail!("Specify target with --agent, --global, or --workspace")
        }
    }

    /// Scopes to list; both unless one flag narrows it.
    fn list_scopes(&self) -> Vec<Scope> {
        match (self.global, self.workspace) {
            (true, false) => vec![Scope::Global],
            (false, true) => vec![Scope::Project],
            _ => vec![Scope::Global, Scope::Project],
        }
    }
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "mcpcm=debug,mcpcm_core=debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{} {err:#}", style("✗").red());
            ExitCode::FAILURE
        }
    }
}

/// Run one command; `Ok(false)` means some agent failed.
fn run(cli: Cli) -> Result<bool> {
    let ctx = AppContext::from_env()?;
    debug!(
        home = %ctx.home_dir().display(),
        project = %ctx.project_root().display(),
        "resolved context"
    );
    let catalog = ctx.agent_catalog();
    let store = ctx.config_store();
    let format = cli.format;

    match cli.command {
        Commands::Add {
            input,
            target,
            replace,
        } => {
            let servers = input.parse()?;
            let scope = target.scope();
            let targets = resolve_targets(&catalog, &target.selection()?, scope);
            if targets.is_empty() {
                warn_no_targets();
                return Ok(true);
            }
            let options = AddOptions::new(servers)
                .with_scope(scope)
                .with_replace(replace);
            let report = add_servers(&store, &targets, &options);
            print_batch(format, "Adding", &report)
        }
        Commands::Update { input, target } => {
            let servers = input.parse()?;
            let scope = target.scope();
            let targets = resolve_targets(&catalog, &target.selection()?, scope);
            if targets.is_empty() {
                warn_no_targets();
                return Ok(true);
            }
            let report = update_servers(&store, &targets, &servers, scope);
            print_batch(format, "Updating", &report)
        }
        Commands::Del { names, target } => {
            let scope = target.scope();
            let targets = resolve_targets(&catalog, &target.selection()?, scope);
            if targets.is_empty() {
                warn_no_targets();
                return Ok(true);
            }
            let report = remove_servers(&store, &targets, &names, scope);
            print_batch(format, "Removing", &report)
        }
        Commands::List { target } => {
            let agents = list_targets(&catalog, &target.agents);
            if agents.is_empty() {
                print_no_installed_agents(format, &catalog)?;
                return Ok(true);
            }
            let report = list_servers(&store, &agents, &target.list_scopes());
            print_list(format, &report)
        }
        Commands::Find { name } => {
            let agents: Vec<&AgentDescriptor> = catalog.all().iter().collect();
            let report = find_server(&store, &agents, &name);
            print_find(format, &report)
        }
        Commands::Sync { from, to, to_all } => {
            let source = catalog
                .get(from)
                .with_context(|| format!("Unknown agent: {from}"))?;
            let selection = if to_all {
                TargetSelection::Installed
            } else {
                TargetSelection::Agents(to)
            };
            let targets = resolve_targets(&catalog, &selection, Scope::Global);
            match sync_servers(&store, source, &targets) {
                Ok(report) if report.outcomes.is_empty() => {
                    warn_no_targets();
                    Ok(true)
                }
                Ok(report) => print_batch(format, "Syncing", &report),
                Err(err) => print_sync_error(format, &err),
            }
        }
        Commands::Agents => {
            print_agents(format, &catalog, &store)?;
            Ok(true)
        }
    }
}

/// Agents to list: the requested ones, or every installed agent.
fn list_targets<'a>(catalog: &'a AgentCatalog, requested: &[AgentId]) -> Vec<&'a AgentDescriptor> {
    if requested.is_empty() {
        catalog.detect_installed()
    } else {
        catalog.select(requested)
    }
}

fn print_no_installed_agents(format: OutputFormat, catalog: &AgentCatalog) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{} No installed agents detected.", style("!").yellow());
            println!();
            println!("{}", style("Supported agents:").dim());
            for agent in catalog.all() {
                println!("  {} (--agent {})", agent.display_name(), agent.id());
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&ListReport::default())?)
        }
    }
    Ok(())
}

fn warn_no_targets() {
    println!(
        "{} No target agents found. Specify agents with --agent.",
        style("!").yellow()
    );
}

fn print_batch(format: OutputFormat, verb: &str, report: &BatchReport) -> Result<bool> {
    match format {
        OutputFormat::Table => {
            println!(
                "{verb} {} MCP server(s) in {} configs: {}",
                report.servers.len(),
                report.scope,
                report.servers.join(", ")
            );
            for outcome in &report.outcomes {
                let path = outcome
                    .path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                match &outcome.status {
                    OutcomeStatus::Applied { .. } => {
                        println!("{} {}: {path}", style("✓").green(), outcome.display_name)
                    }
                    OutcomeStatus::Skipped { reason } => println!(
                        "{} {}: {reason}",
                        style("-").dim(),
                        style(&outcome.display_name).dim()
                    ),
                    OutcomeStatus::Failed { error } => {
                        println!("{} {}: {error}", style("✗").red(), outcome.display_name)
                    }
                }
            }
            for (name, agents) in report.missing_by_server() {
                println!(
                    "{} '{name}' not found in: {}",
                    style("!").yellow(),
                    agents.join(", ")
                );
            }
            println!();
            println!(
                "Done: {} succeeded, {} failed",
                style(report.success_count()).green(),
                style(report.failure_count()).red()
            );
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(!report.has_failures())
}

fn print_unreadable(unreadable: &[UnreadableConfig]) {
    for entry in unreadable {
        println!(
            "{} {} ({}): {}",
            style("✗").red(),
            entry.display_name,
            entry.scope,
            entry.error
        );
    }
}

fn print_list(format: OutputFormat, report: &ListReport) -> Result<bool> {
    match format {
        OutputFormat::Table => {
            if report.listings.is_empty() && report.unreadable.is_empty() {
                println!("No MCP servers configured.");
                return Ok(true);
            }
            for listing in &report.listings {
                println!(
                    "{} {}",
                    style(&listing.display_name).bold().cyan(),
                    style(format!("({}: {})", listing.scope, listing.path.display())).dim()
                );
                for (name, value) in listing.servers.iter() {
                    let detail = listing
                        .servers
                        .definition(name)
                        .map(|d| d.command_line())
                        .or_else(|| value.get("url").and_then(|u| u.as_str()).map(str::to_string))
                        .unwrap_or_default();
                    println!("  {:<24} {}", name, style(detail).dim());
                }
                println!();
            }
            print_unreadable(&report.unreadable);
            println!("Total: {} server(s)", report.total_servers());
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(report.unreadable.is_empty())
}

fn print_find(format: OutputFormat, report: &FindReport) -> Result<bool> {
    match format {
        OutputFormat::Table => {
            if report.locations.is_empty() {
                println!(
                    "{} '{}' is not configured in any agent",
                    style("!").yellow(),
                    report.name
                );
            }
            for location in &report.locations {
                println!(
                    "{} {} ({}): {}",
                    style("✓").green(),
                    location.display_name,
                    location.scope,
                    location.path.display()
                );
                println!("  {}", serde_json::to_string(&location.definition)?);
            }
            print_unreadable(&report.unreadable);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(report.unreadable.is_empty())
}

fn print_sync_error(format: OutputFormat, err: &SyncError) -> Result<bool> {
    match format {
        OutputFormat::Table => println!("{} {err}", style("✗").red()),
        OutputFormat::Json => {
            let output = serde_json::json!({ "error": err });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(false)
}

fn print_agents(format: OutputFormat, catalog: &AgentCatalog, store: &ConfigStore) -> Result<()> {
    let path_of = |agent: &AgentDescriptor, scope: Scope| {
        store
            .resolve_path(agent, scope)
            .ok()
            .map(|p| p.display().to_string())
    };

    match format {
        OutputFormat::Table => {
            println!("{:<14} {:<26} {:<10} Global config", "Id", "Name", "Installed");
            println!("{}", "-".repeat(80));
            for agent in catalog.all() {
                let installed = if agent.is_installed() {
                    style("yes").green()
                } else {
                    style("no").dim()
                };
                println!(
                    "{:<14} {:<26} {:<10} {}",
                    agent.id().as_str(),
                    agent.display_name(),
                    installed,
                    path_of(agent, Scope::Global).unwrap_or_else(|| "-".to_string())
                );
            }
        }
        OutputFormat::Json => {
            let output: Vec<_> = catalog
                .all()
                .iter()
                .map(|agent| {
                    serde_json::json!({
                        "id": agent.id(),
                        "name": agent.display_name(),
                        "format": agent.format(),
                        "installed": agent.is_installed(),
                        "global_path": path_of(agent, Scope::Global),
                        "project_path": path_of(agent, Scope::Project),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands, list_targets};
    use clap::Parser;
    use mcpcm_core::agent::FixedProbe;
    use mcpcm_core::prelude::{AgentCatalog, AgentDescriptor, AgentId, ConfigFormat, Scope};

    #[test]
    fn add_parses_agents_and_flags() {
        let cli = Cli::try_parse_from([
            "mcpcm",
            "add",
            r#"{"s":{"command":"x"}}"#,
            "--agent",
            "cursor,codex",
            "-a",
            "trae",
            "-r",
        ])
        .unwrap();
        let Commands::Add {
            input,
            target,
            replace,
        } = cli.command
        else {
            panic!("expected add");
        };
        assert!(replace);
        assert_eq!(input.json.as_deref(), Some(r#"{"s":{"command":"x"}}"#));
        assert_eq!(
            target.agents,
            vec![AgentId::Cursor, AgentId::Codex, AgentId::Trae]
        );
        assert_eq!(target.scope(), Scope::Global);
    }

    #[test]
    fn agent_flag_takes_one_value_before_positionals() {
        let cli = Cli::try_parse_from(["mcpcm", "del", "-a", "cursor", "s"]).unwrap();
        let Commands::Del { names, target } = cli.command else {
            panic!("expected del");
        };
        assert_eq!(names, vec!["s"]);
        assert_eq!(target.agents, vec![AgentId::Cursor]);
    }

    #[test]
    fn list_defaults_to_installed_agents() {
        let catalog = AgentCatalog::from_agents(vec![
            AgentDescriptor::new(AgentId::Cursor, "Cursor", ConfigFormat::Json)
                .with_probe(FixedProbe(false)),
            AgentDescriptor::new(AgentId::Codex, "Codex", ConfigFormat::Toml)
                .with_probe(FixedProbe(true)),
        ]);

        let ids = |agents: Vec<&AgentDescriptor>| agents.iter().map(|a| a.id()).collect::<Vec<_>>();
        assert_eq!(ids(list_targets(&catalog, &[])), vec![AgentId::Codex]);
        assert_eq!(
            ids(list_targets(&catalog, &[AgentId::Cursor])),
            vec![AgentId::Cursor]
        );
        assert!(list_targets(&AgentCatalog::default(), &[]).is_empty());
    }

    #[test]
    fn unknown_agent_is_rejected() {
        let result = Cli::try_parse_from(["mcpcm", "del", "s", "--agent", "notepad"]);
        assert!(result.is_err());
    }

    #[test]
    fn write_commands_need_a_target() {
        let cli = Cli::try_parse_from(["mcpcm", "del", "s"]).unwrap();
        let Commands::Del { target, .. } = cli.command else {
            panic!("expected del");
        };
        assert!(target.selection().is_err());
    }

    #[test]
    fn workspace_selects_project_scope() {
        let cli = Cli::try_parse_from(["mcpcm", "rm", "a", "b", "-w"]).unwrap();
        let Commands::Del { names, target } = cli.command else {
            panic!("expected del");
        };
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(target.scope(), Scope::Project);
        assert_eq!(target.list_scopes(), vec![Scope::Project]);
    }

    #[test]
    fn sync_requires_destination() {
        assert!(Cli::try_parse_from(["mcpcm", "sync", "--from", "cursor"]).is_err());
        let cli =
            Cli::try_parse_from(["mcpcm", "sync", "--from", "cursor", "--to-all", "-o", "json"])
                .unwrap();
        assert!(matches!(cli.command, Commands::Sync { to_all: true, .. }));
    }

    #[test]
    fn add_needs_input() {
        assert!(Cli::try_parse_from(["mcpcm", "add", "-g"]).is_err());
        let cli = Cli::try_parse_from(["mcpcm", "add", "-f", "mcp.json", "-g"]).unwrap();
        assert!(matches!(cli.command, Commands::Add { .. }));
    }
}
