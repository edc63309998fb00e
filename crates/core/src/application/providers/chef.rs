// Chef provider (version + install directory)
//
// Both signals are required. A version without a directory (or the other
// way round) is a half-installed toolchain and is not advertised.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::application::path_entries;
use super::{CapabilityProvider, ProviderError};
use crate::application::signals::HostSignals;
use crate::domain::{Capability, Hive, RegistryView};

pub const CHEF: &str = "Chef";
pub const KNIFE: &str = "Knife";

const VERSION_KEY: &str = r"SOFTWARE\Chef\Chef Client";
const VERSION_VALUE: &str = "Version";
const VERSION_LOCATIONS: [(Hive, RegistryView); 2] = [
    (Hive::LocalMachine, RegistryView::Registry64),
    (Hive::LocalMachine, RegistryView::Registry32),
];
const KNIFE_FILES: [&str; 2] = ["knife.bat", "knife"];

pub struct ChefCapabilities;

impl ChefCapabilities {
    fn version(signals: &HostSignals) -> Option<String> {
        signals.first_registry_string(&VERSION_LOCATIONS, VERSION_KEY, VERSION_VALUE)
    }

    /// The PATH entry ending in `chef\bin` (or `chef/bin`)
    fn chef_directory(signals: &HostSignals) -> Option<PathBuf> {
        path_entries(signals)
            .into_iter()
            .find(|entry| is_chef_bin(entry))
    }

    fn knife(signals: &HostSignals, chef_dir: &Path) -> Option<PathBuf> {
        KNIFE_FILES
            .iter()
            .map(|file| chef_dir.join(file))
            .find(|candidate| signals.file_system.is_file(candidate))
    }
}

fn is_chef_bin(entry: &Path) -> bool {
    let normalized = entry
        .to_string_lossy()
        .replace('\\', "/")
        .trim_end_matches('/')
        .to_lowercase();
    normalized == "chef/bin" || normalized.ends_with("/chef/bin")
}

#[async_trait]
impl CapabilityProvider for ChefCapabilities {
    fn name(&self) -> &'static str {
        CHEF
    }

    async fn detect(&self, signals: &HostSignals) -> Result<Vec<Capability>, ProviderError> {
        let version = Self::version(signals);
        let chef_dir = Self::chef_directory(signals);

        let (Some(version), Some(chef_dir)) = (version, chef_dir) else {
            debug!("Chef version or directory missing, skipping");
            return Ok(Vec::new());
        };

        let mut capabilities = vec![Capability::new(CHEF, version)?];
        if let Some(knife) = Self::knife(signals, &chef_dir) {
            capabilities.push(Capability::new(KNIFE, knife.to_string_lossy())?);
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
    use crate::port::registry::mocks::MockRegistryStore;
    use std::sync::Arc;

    fn chef_bin() -> PathBuf {
        PathBuf::from("/opscode/chef/bin")
    }

    fn path_with_chef() -> MockEnvironment {
        let path = std::env::join_paths([PathBuf::from("/usr/bin"), chef_bin()])
            .unwrap()
            .into_string()
            .unwrap();
        MockEnvironment::new().with_var("PATH", path)
    }

    fn registry_with_version() -> MockRegistryStore {
        MockRegistryStore::new(true).with_string(
            Hive::LocalMachine,
            RegistryView::Registry32,
            VERSION_KEY,
            VERSION_VALUE,
            "12.4.1",
        )
    }

    #[test]
    fn test_chef_bin_detection() {
        assert!(is_chef_bin(Path::new(r"C:\opscode\chef\bin")));
        assert!(is_chef_bin(Path::new(r"C:\opscode\Chef\Bin\")));
        assert!(is_chef_bin(Path::new("/opt/chef/bin")));
        assert!(!is_chef_bin(Path::new("/opt/chefdk/bin")));
        assert!(!is_chef_bin(Path::new("/opt/chef/embedded/bin")));
    }

    #[tokio::test]
    async fn test_version_and_directory_yield_chef_and_knife() {
        let signals = empty_signals()
            .with_environment(Arc::new(path_with_chef()))
            .with_registry(Arc::new(registry_with_version()))
            .with_file_system(Arc::new(MockFileSystem::new().with_file(chef_bin().join("knife"))));

        let facts = ChefCapabilities.detect(&signals).await.unwrap();

        assert_eq!(
            facts,
            vec![
                Capability::new(CHEF, "12.4.1").unwrap(),
                Capability::new(KNIFE, chef_bin().join("knife").to_string_lossy()).unwrap(),
            ]
        );
    }

    #[tokio::test]
    async fn test_version_without_directory_yields_nothing() {
        let signals = empty_signals()
            .with_environment(Arc::new(MockEnvironment::new().with_var("PATH", "/usr/bin")))
            .with_registry(Arc::new(registry_with_version()));

        assert!(ChefCapabilities.detect(&signals).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_directory_without_version_yields_nothing() {
        let signals = empty_signals().with_environment(Arc::new(path_with_chef()));

        assert!(ChefCapabilities.detect(&signals).await.unwrap().is_empty());
    }
}
