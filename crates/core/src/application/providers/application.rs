// Applications found on PATH

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use super::{CapabilityProvider, ProviderError};
use crate::application::signals::HostSignals;
use crate::domain::Capability;

const PATH_VAR: &str = "PATH";
const PATHEXT_VAR: &str = "PATHEXT";

/// Emits `{capability: full path}` for every application resolvable on PATH
#[derive(Debug, Clone, Copy)]
pub struct ApplicationCapabilities {
    provider: &'static str,
    /// (capability name, application name)
    applications: &'static [(&'static str, &'static str)],
}

impl ApplicationCapabilities {
    pub const NODE_TOOLS: Self = Self::new(
        "NodeTools",
        &[
            ("npm", "npm"),
            ("gulp", "gulp"),
            ("node.js", "node"),
            ("bower", "bower"),
            ("grunt", "grunt"),
            ("svn", "svn"),
        ],
    );

    pub const fn new(
        provider: &'static str,
        applications: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self {
            provider,
            applications,
        }
    }
}

/// PATH entries in search order (empty entries dropped)
pub(super) fn path_entries(signals: &HostSignals) -> Vec<PathBuf> {
    signals
        .env(PATH_VAR)
        .map(|path| {
            std::env::split_paths(&path)
                .filter(|p| !p.as_os_str().is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Candidate suffixes: PATHEXT entries when set (Windows), otherwise the bare name
fn executable_suffixes(signals: &HostSignals) -> Vec<String> {
    match signals.env(PATHEXT_VAR) {
        Some(pathext) => pathext
            .split(';')
            .map(str::trim)
            .filter(|ext| !ext.is_empty())
            .map(|ext| ext.to_lowercase())
            .collect(),
        None => vec![String::new()],
    }
}

/// First existing file for `application` across PATH entries and suffixes
pub(super) fn resolve_on_path(
    signals: &HostSignals,
    dirs: &[PathBuf],
    suffixes: &[String],
    application: &str,
) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| {
            suffixes
                .iter()
                .map(move |suffix| dir.join(format!("{}{}", application, suffix)))
        })
        .find(|candidate| signals.file_system.is_file(candidate))
}

#[async_trait]
impl CapabilityProvider for ApplicationCapabilities {
    fn name(&self) -> &'static str {
        self.provider
    }

    async fn detect(&self, signals: &HostSignals) -> Result<Vec<Capability>, ProviderError> {
        let dirs = path_entries(signals);
        if dirs.is_empty() {
            return Ok(Vec::new());
        }
        let suffixes = executable_suffixes(signals);

        let mut capabilities = Vec::new();
        for (capability, application) in self.applications {
            match resolve_on_path(signals, &dirs, &suffixes, application) {
                Some(path) => capabilities.push(Capability::new(*capability, path.to_string_lossy())?),
                None => debug!(application = %application, "Application not found on PATH"),
            }
        }
        Ok(capabilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::signals::mocks::empty_signals;
    use crate::port::environment::mocks::MockEnvironment;
    use crate::port::file_system::mocks::MockFileSystem;
    use std::path::Path;
    use std::sync::Arc;

    fn joined(dirs: &[&Path]) -> String {
        std::env::join_paths(dirs)
            .unwrap()
            .into_string()
            .unwrap()
    }

    #[tokio::test]
    async fn test_resolves_first_path_hit_per_application() {
        let first = Path::new("/usr/local/bin");
        let second = Path::new("/usr/bin");
        let fs = MockFileSystem::new()
            .with_file(second.join("npm"))
            .with_file(first.join("node"))
            .with_file(second.join("node"));
        let signals = empty_signals()
            .with_environment(Arc::new(
                MockEnvironment::new().with_var("PATH", joined(&[first, second])),
            ))
            .with_file_system(Arc::new(fs));

        let facts = ApplicationCapabilities::NODE_TOOLS
            .detect(&signals)
            .await
            .unwrap();

        let pairs: Vec<(&str, String)> = facts
            .iter()
            .map(|c| (c.name(), c.value().to_string()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("npm", second.join("npm").to_string_lossy().into_owned()),
                ("node.js", first.join("node").to_string_lossy().into_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn test_pathext_suffixes_are_tried() {
        let dir = Path::new("/tools");
        let fs = MockFileSystem::new().with_file(dir.join("svn.exe"));
        let signals = empty_signals()
            .with_environment(Arc::new(
                MockEnvironment::new()
                    .with_var("PATH", joined(&[dir]))
                    .with_var("PATHEXT", ".COM;.EXE;.BAT"),
            ))
            .with_file_system(Arc::new(fs));

        let facts = ApplicationCapabilities::NODE_TOOLS
            .detect(&signals)
            .await
            .unwrap();

        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].name(), "svn");
        assert_eq!(facts[0].value(), dir.join("svn.exe").to_string_lossy());
    }
}
