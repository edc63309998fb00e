// Capability Providers and the registration table

pub mod android_sdk;
pub mod application;
pub mod azure_guest_agent;
pub mod chef;
pub mod environment;
pub mod placeholder;
pub mod registry_value;
pub mod script;

pub use android_sdk::AndroidSdkCapabilities;
pub use application::ApplicationCapabilities;
pub use azure_guest_agent::AzureGuestAgentCapabilities;
pub use chef::ChefCapabilities;
pub use environment::EnvironmentVariableCapabilities;
pub use placeholder::PlaceholderCapabilities;
pub use registry_value::RegistryValueCapabilities;
pub use script::ScriptCapabilities;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use super::config::ScanConfig;
use super::signals::HostSignals;
use crate::domain::{Capability, DomainError};
use crate::error::{AppError, Result};
use crate::port::{ProbeError, ScriptError, ScriptRunner};

/// Unexpected failure inside one provider
///
/// Caught at the scanner boundary; the provider contributes nothing.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Probe failed: {0}")]
    Probe(#[from] ProbeError),

    #[error("Invalid capability: {0}")]
    Domain(#[from] DomainError),

    #[error("Script failed: {0}")]
    Script(#[from] ScriptError),
}

/// Stateless detector contributing zero or more capabilities
///
/// Implementations keep no memory across calls; every `detect` is a fresh
/// probe of the host. "Signal absent" is `Ok(vec![])`, never an error.
#[async_trait]
pub trait CapabilityProvider: Send + Sync {
    /// Stable name used in logs and in `disabled_providers`
    fn name(&self) -> &'static str;

    async fn detect(&self, signals: &HostSignals) -> std::result::Result<Vec<Capability>, ProviderError>;

    /// Whether `detect` makes synchronous OS calls (registry, sysinfo, std::fs)
    ///
    /// Blocking providers run on the blocking pool so a stalled call cannot
    /// hold up the executor or the scanner's deadline.
    fn is_blocking(&self) -> bool {
        true
    }

    /// Timeout the provider enforces on itself, if longer than the probe timeout
    ///
    /// The scanner waits at least this long (plus a grace period) before
    /// giving up on the provider.
    fn time_budget(&self) -> Option<std::time::Duration> {
        None
    }
}

/// One row of the registration table
#[derive(Clone)]
pub struct RegisteredProvider {
    pub provider: Arc<dyn CapabilityProvider>,
    pub enabled: bool,
}

/// Name of the optional external-script contributor
pub const SCRIPT_PROVIDER: &str = script::PROVIDER_NAME;

/// Built-in providers in registration order
pub fn builtin_providers() -> Vec<Arc<dyn CapabilityProvider>> {
    vec![
        Arc::new(AndroidSdkCapabilities),
        Arc::new(EnvironmentVariableCapabilities::ANT),
        Arc::new(AzureGuestAgentCapabilities),
        Arc::new(PlaceholderCapabilities::AZURE_POWERSHELL),
        Arc::new(ChefCapabilities),
        Arc::new(PlaceholderCapabilities::DOTNET_FRAMEWORK),
        Arc::new(EnvironmentVariableCapabilities::JAVA),
        Arc::new(EnvironmentVariableCapabilities::MAVEN),
        Arc::new(PlaceholderCapabilities::MSBUILD),
        Arc::new(ApplicationCapabilities::NODE_TOOLS),
        Arc::new(RegistryValueCapabilities::POWERSHELL),
        Arc::new(RegistryValueCapabilities::SCVMM_ADMIN_CONSOLE),
        Arc::new(PlaceholderCapabilities::SQL_PACKAGE),
        Arc::new(PlaceholderCapabilities::VISUAL_STUDIO),
        Arc::new(PlaceholderCapabilities::WINDOWS_KIT),
        Arc::new(PlaceholderCapabilities::WINDOWS_SDK),
        Arc::new(RegistryValueCapabilities::XAMARIN_ANDROID),
    ]
}

/// Build the registration table for `config`
///
/// Built-ins come first in their fixed order; the script contributor, when
/// configured, is appended last.
///
/// # Errors
/// - `AppError::UnknownProvider` if `disabled_providers` names no provider
/// - `AppError::Config` if a script is configured but no runner was supplied
pub fn registration_table(
    config: &ScanConfig,
    script_runner: Option<Arc<dyn ScriptRunner>>,
) -> Result<Vec<RegisteredProvider>> {
    let mut providers = builtin_providers();

    if let Some(script) = &config.script {
        let runner = script_runner.ok_or_else(|| {
            AppError::Config("script configured but no script runner available".to_string())
        })?;
        providers.push(Arc::new(ScriptCapabilities::new(runner, script.invocation())));
    }

    for disabled in &config.disabled_providers {
        let known = providers
            .iter()
            .any(|p| p.name().eq_ignore_ascii_case(disabled))
            || disabled.eq_ignore_ascii_case(SCRIPT_PROVIDER);
        if !known {
            return Err(AppError::UnknownProvider(disabled.clone()));
        }
    }

    Ok(providers
        .into_iter()
        .map(|provider| RegisteredProvider {
            enabled: config.is_enabled(provider.name()),
            provider,
        })
        .collect())
}

/// Enabled providers of a registration table, order preserved
pub fn enabled_providers(table: &[RegisteredProvider]) -> Vec<Arc<dyn CapabilityProvider>> {
    table
        .iter()
        .filter(|row| row.enabled)
        .map(|row| Arc::clone(&row.provider))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::ScriptConfig;
    use crate::application::signals::mocks::empty_signals;
    use crate::port::script_runner::mocks::MockScriptRunner;

    #[test]
    fn test_builtin_order_is_fixed() {
        let names: Vec<_> = builtin_providers().iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            vec![
                "AndroidSdk",
                "Ant",
                "AzureGuestAgent",
                "AzurePowerShell",
                "Chef",
                "DotNetFramework",
                "Java",
                "Maven",
                "MSBuild",
                "NodeTools",
                "PowerShell",
                "ScvmmAdminConsole",
                "SqlPackage",
                "VisualStudio",
                "WindowsKit",
                "WindowsSdk",
                "XamarinAndroid",
            ]
        );
    }

    #[tokio::test]
    async fn test_every_builtin_is_empty_without_signals() {
        let signals = empty_signals();
        for provider in builtin_providers() {
            let facts = provider.detect(&signals).await.unwrap();
            assert!(facts.is_empty(), "{} emitted {:?}", provider.name(), facts);
        }
    }

    #[test]
    fn test_disabled_providers_are_marked() {
        let config = ScanConfig {
            disabled_providers: vec!["ant".to_string(), "NodeTools".to_string()],
            ..Default::default()
        };
        let table = registration_table(&config, None).unwrap();

        let disabled: Vec<_> = table
            .iter()
            .filter(|row| !row.enabled)
            .map(|row| row.provider.name())
            .collect();
        assert_eq!(disabled, vec!["Ant", "NodeTools"]);
        assert_eq!(enabled_providers(&table).len(), table.len() - 2);
    }

    #[test]
    fn test_unknown_disabled_provider_is_rejected() {
        let config = ScanConfig {
            disabled_providers: vec!["Gradle".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            registration_table(&config, None),
            Err(AppError::UnknownProvider(name)) if name == "Gradle"
        ));
    }

    #[test]
    fn test_script_is_appended_last() {
        let config = ScanConfig {
            script: Some(ScriptConfig {
                program: "add-capabilities.sh".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let runner: Arc<dyn ScriptRunner> = Arc::new(MockScriptRunner::with_lines(Vec::<String>::new()));
        let table = registration_table(&config, Some(runner)).unwrap();

        assert_eq!(table.last().unwrap().provider.name(), SCRIPT_PROVIDER);
        assert_eq!(table.len(), builtin_providers().len() + 1);
    }

    #[test]
    fn test_script_without_runner_is_config_error() {
        let config = ScanConfig {
            script: Some(ScriptConfig {
                program: "add-capabilities.sh".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(
            registration_table(&config, None),
            Err(AppError::Config(_))
        ));
    }
}
