//! Application context for unified dependency injection.

use std::path::{Path, PathBuf};

use crate::agent::{AgentCatalog, Platform};
use crate::config::ConfigStore;

/// Paths and platform every command needs.
///
/// Frontends create this once and derive the catalog and store from it.
#[derive(Debug, Clone)]
pub struct AppContext {
    home_dir: PathBuf,
    project_root: PathBuf,
    platform: Platform,
}

impl AppContext {
    /// Create a new context with explicit paths.
    pub fn new(home_dir: PathBuf, project_root: PathBuf, platform: Platform) -> Self {
        Self {
            home_dir,
            project_root,
            platform,
        }
    }

    /// Context for the current user, working directory and platform.
    pub fn from_env() -> anyhow::Result<Self> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        let project_root = std::env::current_dir()?;
        Ok(Self::new(home_dir, project_root, Platform::current()))
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Build the catalog of built-in agents for this context.
    pub fn agent_catalog(&self) -> AgentCatalog {
        AgentCatalog::builtin(&self.home_dir, &self.project_root, self.platform)
    }

    /// Get a ConfigStore resolving paths against this context.
    pub fn config_store(&self) -> ConfigStore {
        ConfigStore::from_paths(self.home_dir.clone(), self.project_root.clone())
    }
}
