// Single registry value provider

use async_trait::async_trait;

use super::{CapabilityProvider, ProviderError};
use crate::application::signals::HostSignals;
use crate::domain::{Capability, Hive, RegistryView};

/// Emits `{capability: value}` from the first location holding the value
#[derive(Debug, Clone, Copy)]
pub struct RegistryValueCapabilities {
    provider: &'static str,
    capability: &'static str,
    locations: &'static [(Hive, RegistryView)],
    key_path: &'static str,
    value_name: &'static str,
}

const MACHINE_64_THEN_32: &[(Hive, RegistryView)] = &[
    (Hive::LocalMachine, RegistryView::Registry64),
    (Hive::LocalMachine, RegistryView::Registry32),
];

impl RegistryValueCapabilities {
    pub const POWERSHELL: Self = Self::new(
        "PowerShell",
        "PowerShell",
        MACHINE_64_THEN_32,
        r"SOFTWARE\Microsoft\PowerShell\3\PowerShellEngine",
        "PowerShellVersion",
    );

    pub const SCVMM_ADMIN_CONSOLE: Self = Self::new(
        "ScvmmAdminConsole",
        "SCVMMAdminConsole",
        MACHINE_64_THEN_32,
        r"Software\Microsoft\Microsoft System Center Virtual Machine Manager Administrator Console\Setup",
        "InstallPath",
    );

    pub const XAMARIN_ANDROID: Self = Self::new(
        "XamarinAndroid",
        "Xamarin.Android",
        &[(Hive::LocalMachine, RegistryView::Registry32)],
        r"Software\Novell\Mono for Android",
        "InstalledVersion",
    );

    pub const fn new(
        provider: &'static str,
        capability: &'static str,
        locations: &'static [(Hive, RegistryView)],
        key_path: &'static str,
        value_name: &'static str,
    ) -> Self {
        Self {
            provider,
            capability,
            locations,
            key_path,
            value_name,
        }
    }
}

#[async_trait]
impl CapabilityProvider for RegistryValueCapabilities {
    fn name(&self) -> &'static str {
        self.provider
    }

    async fn detect(&self, signals: &HostSignals) -> Result<Vec<Capability>, ProviderError> {
        match signals.first_registry_string(self.locations, self.key_path, self.value_name) {
            Some(value) => Ok(vec![Capability::new(self.capability, value)?]),
            None => Ok(Vec::new()),
        }
    }
}
