//! Config path resolution helpers.

use std::path::{Path, PathBuf};

use crate::types::Scope;

/// Marker for "the user's home directory" in agent path tables.
pub const HOME_MARKER: char = '~';

/// Expand a leading `~` against `home`. Anything else is returned as-is.
///
/// The remainder after the marker is joined onto `home` with its leading
/// separators dropped, so `~/.codex/config.toml` and `~.codex/config.toml`
/// resolve to the same place. No filesystem access happens here.
pub fn expand_home_in(path: &str, home: &Path) -> PathBuf {
    match path.strip_prefix(HOME_MARKER) {
        Some(rest) => {
            let rest = rest.trim_start_matches(['/', '\\']);
            if rest.is_empty() {
                home.to_path_buf()
            } else {
                home.join(rest)
            }
        }
        None => PathBuf::from(path),
    }
}

/// Expand a leading `~` against the current user's home directory.
///
/// If the home directory cannot be determined the path is left untouched.
pub fn expand_home(path: &str) -> PathBuf {
    match dirs::home_dir() {
        Some(home) => expand_home_in(path, &home),
        None => PathBuf::from(path),
    }
}

/// Resolve an agent's configured path for a scope.
///
/// Global paths are home-relative shorthand; project paths are relative to
/// the project root.
pub fn config_path_for_scope(
    scope: Scope,
    configured: &str,
    home: &Path,
    project_root: &Path,
) -> PathBuf {
    match scope {
        Scope::Global => expand_home_in(configured, home),
        Scope::Project => project_root.join(configured),
    }
}
