//! Installation probes.
//!
//! Each agent carries one probe that answers "is this agent installed on
//! this machine?". The built-in catalog only checks for paths; tests swap in
//! [`FixedProbe`].

use std::fmt;
use std::path::PathBuf;

pub trait InstallProbe: Send + Sync + fmt::Debug {
    fn is_installed(&self) -> bool;
}

/// Installed when any of the candidate paths exists.
#[derive(Debug, Clone)]
pub struct PathProbe {
    candidates: Vec<PathBuf>,
}

impl PathProbe {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            candidates: vec![path.into()],
        }
    }

    pub fn any_of<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            candidates: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl InstallProbe for PathProbe {
    fn is_installed(&self) -> bool {
        self.candidates.iter().any(|path| path.exists())
    }
}

/// For agents whose installation cannot be detected from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverInstalled;

impl InstallProbe for NeverInstalled {
    fn is_installed(&self) -> bool {
        false
    }
}

/// Always answers the same way.
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe(pub bool);

impl InstallProbe for FixedProbe {
    fn is_installed(&self) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn path_probe_checks_any_candidate() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(".gemini")).unwrap();

        let probe = PathProbe::any_of([
            temp.path().join(".gemini/antigravity"),
            temp.path().join(".gemini"),
        ]);

        assert!(probe.is_installed());
        assert!(!PathProbe::new(temp.path().join(".cursor")).is_installed());
    }

    #[test]
    fn never_installed_is_false() {
        assert!(!NeverInstalled.is_installed());
    }
}
