// Android SDK provider
//
// Source order: ANDROID_HOME, then the registry across three (hive, view)
// pairs. First hit wins. Installed platforms become `AndroidSDK_<level>`.

use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, warn};

use super::{CapabilityProvider, ProviderError};
use crate::application::signals::HostSignals;
use crate::domain::{Capability, Hive, RegistryView};

pub const ANDROID_SDK: &str = "AndroidSDK";

const ANDROID_HOME: &str = "ANDROID_HOME";
const REGISTRY_KEY: &str = r"SOFTWARE\Android SDK Tools";
const REGISTRY_VALUE: &str = "Path";
const REGISTRY_LOCATIONS: [(Hive, RegistryView); 3] = [
    (Hive::CurrentUser, RegistryView::Default),
    (Hive::LocalMachine, RegistryView::Registry64),
    (Hive::LocalMachine, RegistryView::Registry32),
];
const PLATFORMS_DIR: &str = "platforms";
const PLATFORM_PREFIX: &str = "android-";

pub struct AndroidSdkCapabilities;

impl AndroidSdkCapabilities {
    fn sdk_path(signals: &HostSignals) -> Option<String> {
        if let Some(path) = signals.env(ANDROID_HOME) {
            debug!("Found ANDROID_HOME in environment");
            return Some(path);
        }

        signals.first_registry_string(&REGISTRY_LOCATIONS, REGISTRY_KEY, REGISTRY_VALUE)
    }

    fn platform_capabilities(
        signals: &HostSignals,
        sdk_path: &str,
    ) -> Result<Vec<Capability>, ProviderError> {
        let platforms_dir = Path::new(sdk_path).join(PLATFORMS_DIR);

        let entries = match signals.file_system.list_directories(&platforms_dir) {
            Ok(Some(entries)) => entries,
            Ok(None) => {
                debug!(dir = %platforms_dir.display(), "No platforms directory");
                return Ok(Vec::new());
            }
            Err(e) => {
                warn!(dir = %platforms_dir.display(), error = %e, "Could not list Android platforms");
                return Ok(Vec::new());
            }
        };

        let platform_name = format!("{}_", ANDROID_SDK);
        let mut capabilities = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(dir_name) = entry.file_name().map(|n| n.to_string_lossy()) else {
                debug!(entry = %entry.display(), "Platform entry has no file name");
                continue;
            };
            let name = dir_name.replace(PLATFORM_PREFIX, &platform_name);
            capabilities.push(Capability::new(name, entry.to_string_lossy())?);
        }
        Ok(capabilities)
    }
}

#[async_trait]
impl CapabilityProvider for AndroidSdkCapabilities {
    fn name(&self) -> &'static str {
        "AndroidSdk"
    }

    async fn detect(&self, signals: &HostSignals) -> Result<Vec<Capability>, ProviderError> {
        let Some(sdk_path) = Self::sdk_path(signals) else {
            return Ok(Vec::new());
        };

        let mut capabilities = vec![Capability::new(ANDROID_SDK, sdk_path.as_str())?];
        capabilities.extend(Self::platform_capabilities(signals, &sdk_path)?);
        Ok(capabilities)
    }
}
