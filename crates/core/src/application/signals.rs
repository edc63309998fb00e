// Host signal accessors bundled for providers

use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::{Hive, RegistryQuery, RegistryValue, RegistryView};
use crate::port::{EnvironmentReader, FileSystem, ProbeError, ProcessTable, RegistryStore};

/// Read-only accessors a provider may query
///
/// Cheap to clone (all `Arc`); one clone travels into each provider task.
#[derive(Clone)]
pub struct HostSignals {
    pub environment: Arc<dyn EnvironmentReader>,
    pub registry: Arc<dyn RegistryStore>,
    pub processes: Arc<dyn ProcessTable>,
    pub file_system: Arc<dyn FileSystem>,
}

impl HostSignals {
    pub fn new(
        environment: Arc<dyn EnvironmentReader>,
        registry: Arc<dyn RegistryStore>,
        processes: Arc<dyn ProcessTable>,
        file_system: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            environment,
            registry,
            processes,
            file_system,
        }
    }

    pub fn with_environment(mut self, environment: Arc<dyn EnvironmentReader>) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_registry(mut self, registry: Arc<dyn RegistryStore>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_processes(mut self, processes: Arc<dyn ProcessTable>) -> Self {
        self.processes = processes;
        self
    }

    pub fn with_file_system(mut self, file_system: Arc<dyn FileSystem>) -> Self {
        self.file_system = file_system;
        self
    }

    /// Environment lookup with tracing
    pub fn env(&self, name: &str) -> Option<String> {
        let value = self.environment.lookup(name);
        debug!(variable = %name, found = value.is_some(), "Checked environment variable");
        value
    }

    /// Read one string value from the configuration store
    ///
    /// A `Registry64` query on a 32-bit OS returns `Ok(None)` without
    /// touching the backend. Missing keys, missing values and non-string
    /// values are all `Ok(None)`.
    pub fn read_registry_string(&self, query: &RegistryQuery) -> Result<Option<String>, ProbeError> {
        if query.view.requires_64bit_os() && !self.registry.is_64bit_os() {
            debug!(
                hive = %query.hive,
                view = %query.view,
                key = %query.key_path,
                "Skipping 64-bit registry view on 32-bit OS"
            );
            return Ok(None);
        }

        let value = self
            .registry
            .read_value(query)?
            .and_then(RegistryValue::into_string);

        debug!(
            hive = %query.hive,
            view = %query.view,
            key = %query.key_path,
            value_name = %query.value_name,
            found = value.is_some(),
            "Checked registry value"
        );

        Ok(value)
    }

    /// Try `locations` in order and return the first non-blank trimmed value
    ///
    /// Later locations are not queried once a value is found. A probe error
    /// on one location is logged and the next location is tried.
    pub fn first_registry_string(
        &self,
        locations: &[(Hive, RegistryView)],
        key_path: &str,
        value_name: &str,
    ) -> Option<String> {
        for &(hive, view) in locations {
            let query = RegistryQuery::new(hive, view, key_path, value_name);
            match self.read_registry_string(&query) {
                Ok(Some(value)) => {
                    let trimmed = value.trim();
                    if !trimmed.is_empty() {
                        return Some(trimmed.to_string());
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        hive = %hive,
                        view = %view,
                        key = %key_path,
                        error = %e,
                        "Registry probe failed, trying next location"
                    );
                }
            }
        }
        None
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::port::environment::mocks::MockEnvironment;
    use crate::port::file_system::mocks::MockFileSystem;
    use crate::port::process_table::mocks::MockProcessTable;
    use crate::port::registry::mocks::MockRegistryStore;

    /// 64-bit host with no environment, registry values, processes or files
    pub fn empty_signals() -> HostSignals {
        HostSignals::new(
            Arc::new(MockEnvironment::new()),
            Arc::new(MockRegistryStore::new(true)),
            Arc::new(MockProcessTable::new()),
            Arc::new(MockFileSystem::new()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::empty_signals;
    use super::*;
    use crate::port::registry::mocks::MockRegistryStore;

    const KEY: &str = r"SOFTWARE\Tool";

    #[test]
    fn test_registry64_on_32bit_host_never_reaches_backend() {
        let registry = Arc::new(MockRegistryStore::new(false).with_string(
            Hive::LocalMachine,
            RegistryView::Registry64,
            KEY,
            "Path",
            "C:\\tool",
        ));
        let signals = empty_signals().with_registry(registry.clone());

        let query = RegistryQuery::new(Hive::LocalMachine, RegistryView::Registry64, KEY, "Path");
        assert_eq!(signals.read_registry_string(&query), Ok(None));
        assert!(registry.reads().is_empty());
    }

    #[test]
    fn test_non_string_values_are_absent() {
        let registry = Arc::new(MockRegistryStore::new(true).with_value(
            Hive::LocalMachine,
            RegistryView::Registry32,
            KEY,
            "Release",
            RegistryValue::Dword(528040),
        ));
        let signals = empty_signals().with_registry(registry);

        let query = RegistryQuery::new(Hive::LocalMachine, RegistryView::Registry32, KEY, "Release");
        assert_eq!(signals.read_registry_string(&query), Ok(None));
    }

    #[test]
    fn test_probe_error_propagates_from_single_read() {
        let registry = Arc::new(MockRegistryStore::new(true).with_failure(
            Hive::LocalMachine,
            RegistryView::Registry32,
            KEY,
            "Path",
            ProbeError::AccessDenied("HKLM".to_string()),
        ));
        let signals = empty_signals().with_registry(registry);

        let query = RegistryQuery::new(Hive::LocalMachine, RegistryView::Registry32, KEY, "Path");
        assert!(matches!(
            signals.read_registry_string(&query),
            Err(ProbeError::AccessDenied(_))
        ));
    }

    #[test]
    fn test_first_registry_string_skips_failures_and_blanks() {
        let registry = Arc::new(
            MockRegistryStore::new(true)
                .with_failure(
                    Hive::CurrentUser,
                    RegistryView::Default,
                    KEY,
                    "Path",
                    ProbeError::AccessDenied("HKCU".to_string()),
                )
                .with_string(Hive::LocalMachine, RegistryView::Registry64, KEY, "Path", "   ")
                .with_string(
                    Hive::LocalMachine,
                    RegistryView::Registry32,
                    KEY,
                    "Path",
                    "  C:\\tool  ",
                ),
        );
        let signals = empty_signals().with_registry(registry.clone());

        let value = signals.first_registry_string(
            &[
                (Hive::CurrentUser, RegistryView::Default),
                (Hive::LocalMachine, RegistryView::Registry64),
                (Hive::LocalMachine, RegistryView::Registry32),
            ],
            KEY,
            "Path",
        );

        assert_eq!(value.as_deref(), Some("C:\\tool"));
        assert_eq!(registry.reads().len(), 3);
    }
}
