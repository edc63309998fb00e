// No-op providers for platform features without a detection policy yet
//
// They keep their slot in the registration table and satisfy the provider
// contract by always returning an empty list.

use async_trait::async_trait;

use super::{CapabilityProvider, ProviderError};
use crate::application::signals::HostSignals;
use crate::domain::Capability;

#[derive(Debug, Clone, Copy)]
pub struct PlaceholderCapabilities {
    provider: &'static str,
}

impl PlaceholderCapabilities {
    pub const AZURE_POWERSHELL: Self = Self::new("AzurePowerShell");
    pub const DOTNET_FRAMEWORK: Self = Self::new("DotNetFramework");
    pub const MSBUILD: Self = Self::new("MSBuild");
    pub const SQL_PACKAGE: Self = Self::new("SqlPackage");
    pub const VISUAL_STUDIO: Self = Self::new("VisualStudio");
    pub const WINDOWS_KIT: Self = Self::new("WindowsKit");
    pub const WINDOWS_SDK: Self = Self::new("WindowsSdk");

    pub const fn new(provider: &'static str) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl CapabilityProvider for PlaceholderCapabilities {
    fn name(&self) -> &'static str {
        self.provider
    }

    async fn detect(&self, _signals: &HostSignals) -> Result<Vec<Capability>, ProviderError> {
        Ok(Vec::new())
    }
}
