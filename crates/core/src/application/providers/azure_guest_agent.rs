// Azure guest agent provider (running-process signal)

use async_trait::async_trait;
use tracing::debug;

use super::{CapabilityProvider, ProviderError};
use crate::application::signals::HostSignals;
use crate::domain::Capability;

pub const AZURE_GUEST_AGENT: &str = "AzureGuestAgent";

const PROCESS_NAME: &str = "WindowsAzureGuestAgent";

pub struct AzureGuestAgentCapabilities;

#[async_trait]
impl CapabilityProvider for AzureGuestAgentCapabilities {
    fn name(&self) -> &'static str {
        AZURE_GUEST_AGENT
    }

    async fn detect(&self, signals: &HostSignals) -> Result<Vec<Capability>, ProviderError> {
        let Some(process) = signals.processes.find_by_name(PROCESS_NAME)? else {
            debug!(process = %PROCESS_NAME, "Process not running");
            return Ok(Vec::new());
        };

        // Exited (or became unreadable) between enumeration and path lookup
        let Some(path) = process.executable_path else {
            debug!(process = %PROCESS_NAME, "Process has no readable executable path");
            return Ok(Vec::new());
        };

        Ok(vec![Capability::new(AZURE_GUEST_AGENT, path.to_string_lossy())?])
    }
}
