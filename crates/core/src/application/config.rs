// Scan configuration
//
// Deserialized by the binary (config crate layering); core only defines the
// shape, defaults and validation.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::constants::{DEFAULT_PROBE_TIMEOUT, DEFAULT_SCRIPT_ENV_ALLOWLIST, DEFAULT_SCRIPT_TIMEOUT};
use crate::error::{AppError, Result};
use crate::port::ScriptInvocation;

/// How providers are executed within one scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// One provider at a time, in registration order
    #[default]
    Sequential,
    /// One task per provider; results still joined in registration order
    Concurrent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub mode: ScanMode,
    pub probe_timeout_ms: u64,
    /// Provider names (case-insensitive) left out of the scan
    pub disabled_providers: Vec<String>,
    /// External capability script; absent means no script contributor
    pub script: Option<ScriptConfig>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            mode: ScanMode::default(),
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT.as_millis() as u64,
            disabled_providers: Vec::new(),
            script: None,
        }
    }
}

impl ScanConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn is_enabled(&self, provider: &str) -> bool {
        !self
            .disabled_providers
            .iter()
            .any(|d| d.eq_ignore_ascii_case(provider))
    }

    /// Reject values that would make every scan useless
    ///
    /// # Errors
    /// `AppError::Config` on a zero probe timeout or an empty script program
    pub fn validate(&self) -> Result<()> {
        if self.probe_timeout_ms == 0 {
            return Err(AppError::Config(
                "probe_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if let Some(script) = &self.script {
            script.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    pub program: String,
    pub args: Vec<String>,
    pub timeout_ms: u64,
    pub env_allowlist: Vec<String>,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            program: String::new(),
            args: Vec::new(),
            timeout_ms: DEFAULT_SCRIPT_TIMEOUT.as_millis() as u64,
            env_allowlist: DEFAULT_SCRIPT_ENV_ALLOWLIST
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ScriptConfig {
    fn validate(&self) -> Result<()> {
        if self.program.trim().is_empty() {
            return Err(AppError::Config("script.program must not be empty".to_string()));
        }
        if self.timeout_ms == 0 {
            return Err(AppError::Config(
                "script.timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn invocation(&self) -> ScriptInvocation {
        ScriptInvocation {
            program: self.program.clone(),
            args: self.args.clone(),
            timeout: Duration::from_millis(self.timeout_ms),
            env_allowlist: self.env_allowlist.clone(),
        }
    }
}
