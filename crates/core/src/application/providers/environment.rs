// Environment-variable capability provider

use async_trait::async_trait;
use tracing::debug;

use super::{CapabilityProvider, ProviderError};
use crate::application::signals::HostSignals;
use crate::domain::Capability;

/// Emits `{capability: $variable}` when one fixed variable is set and non-empty
#[derive(Debug, Clone, Copy)]
pub struct EnvironmentVariableCapabilities {
    provider: &'static str,
    capability: &'static str,
    variable: &'static str,
}

impl EnvironmentVariableCapabilities {
    pub const ANT: Self = Self::new("Ant", "ant", "ANT_HOME");
    pub const JAVA: Self = Self::new("Java", "java", "JAVA_HOME");
    pub const MAVEN: Self = Self::new("Maven", "maven", "M2_HOME");

    pub const fn new(provider: &'static str, capability: &'static str, variable: &'static str) -> Self {
        Self {
            provider,
            capability,
            variable,
        }
    }
}

#[async_trait]
impl CapabilityProvider for EnvironmentVariableCapabilities {
    fn name(&self) -> &'static str {
        self.provider
    }

    async fn detect(&self, signals: &HostSignals) -> Result<Vec<Capability>, ProviderError> {
        let Some(value) = signals.env(self.variable) else {
            debug!(provider = %self.provider, variable = %self.variable, "Value not found or empty");
            return Ok(Vec::new());
        };

        Ok(vec![Capability::new(self.capability, value)?])
    }
}
