// Capability Scanner - runs every provider once and folds their output

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info, warn};

use super::cancel::CancelToken;
use super::config::{ScanConfig, ScanMode};
use super::constants::{DEFAULT_PROBE_TIMEOUT, TIME_BUDGET_GRACE};
use super::panic_guard::{join_guarded, PanicGuardResult};
use super::providers::{CapabilityProvider, ProviderError};
use super::signals::HostSignals;
use crate::domain::Capability;

/// Scan-level failure
///
/// Provider failures never surface here; only conditions outside the
/// providers' control abort a scan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("Scan cancelled")]
    Cancelled,
}

type Detection = Result<Vec<Capability>, ProviderError>;

/// A provider task in flight
struct PendingDetection {
    provider: &'static str,
    handle: JoinHandle<Detection>,
    deadline: Instant,
}

/// Owns the ordered provider list for a scan
///
/// Output is the concatenation of every provider's facts in registration
/// order, with no deduplication, sorting or validation.
pub struct CapabilityScanner {
    providers: Vec<Arc<dyn CapabilityProvider>>,
    signals: HostSignals,
    mode: ScanMode,
    probe_timeout: Duration,
}

impl CapabilityScanner {
    pub fn new(providers: Vec<Arc<dyn CapabilityProvider>>, signals: HostSignals) -> Self {
        Self {
            providers,
            signals,
            mode: ScanMode::Sequential,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn from_config(
        providers: Vec<Arc<dyn CapabilityProvider>>,
        signals: HostSignals,
        config: &ScanConfig,
    ) -> Self {
        Self::new(providers, signals)
            .with_mode(config.mode)
            .with_probe_timeout(config.probe_timeout())
    }

    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    pub fn providers(&self) -> &[Arc<dyn CapabilityProvider>] {
        &self.providers
    }

    /// Run one complete scan
    ///
    /// # Errors
    /// `ScanError::Cancelled` if `cancel` fires before or during the scan;
    /// in-flight provider tasks are aborted.
    pub async fn scan(&self, cancel: &CancelToken) -> Result<Vec<Capability>, ScanError> {
        if cancel.is_cancelled() {
            warn!("Scan cancelled before any provider ran");
            return Err(ScanError::Cancelled);
        }

        info!(
            providers = self.providers.len(),
            mode = ?self.mode,
            "Starting capability scan"
        );

        let capabilities = match self.mode {
            ScanMode::Sequential => self.scan_sequential(cancel).await?,
            ScanMode::Concurrent => self.scan_concurrent(cancel).await?,
        };

        info!(capabilities = capabilities.len(), "Capability scan completed");
        Ok(capabilities)
    }

    async fn scan_sequential(&self, cancel: &CancelToken) -> Result<Vec<Capability>, ScanError> {
        let mut capabilities = Vec::new();
        for provider in &self.providers {
            let mut pending = self.spawn_detection(provider);
            capabilities.extend(self.collect(&mut pending, cancel).await?);
        }
        Ok(capabilities)
    }

    async fn scan_concurrent(&self, cancel: &CancelToken) -> Result<Vec<Capability>, ScanError> {
        let mut pending: Vec<PendingDetection> = self
            .providers
            .iter()
            .map(|provider| self.spawn_detection(provider))
            .collect();

        let mut capabilities = Vec::new();
        for index in 0..pending.len() {
            match self.collect(&mut pending[index], cancel).await {
                Ok(facts) => capabilities.extend(facts),
                Err(e) => {
                    for rest in &pending[index + 1..] {
                        rest.handle.abort();
                    }
                    return Err(e);
                }
            }
        }
        Ok(capabilities)
    }

    /// How long to wait for `provider` before treating it as stalled
    fn provider_timeout(&self, provider: &dyn CapabilityProvider) -> Duration {
        match provider.time_budget() {
            Some(budget) => self.probe_timeout.max(budget + TIME_BUDGET_GRACE),
            None => self.probe_timeout,
        }
    }

    /// Start `provider` on its own task
    ///
    /// Blocking providers go to the blocking pool. A stalled call there keeps
    /// its thread until it returns, but the scanner stops waiting at the deadline.
    fn spawn_detection(&self, provider: &Arc<dyn CapabilityProvider>) -> PendingDetection {
        let name = provider.name();
        let deadline = Instant::now() + self.provider_timeout(provider.as_ref());
        let provider = Arc::clone(provider);
        let signals = self.signals.clone();

        debug!(provider = %name, blocking = provider.is_blocking(), "Running provider");
        let handle = if provider.is_blocking() {
            let runtime = Handle::current();
            tokio::task::spawn_blocking(move || runtime.block_on(provider.detect(&signals)))
        } else {
            tokio::spawn(async move { provider.detect(&signals).await })
        };

        PendingDetection {
            provider: name,
            handle,
            deadline,
        }
    }

    /// Wait for one provider; any failure becomes "contributed nothing"
    async fn collect(
        &self,
        pending: &mut PendingDetection,
        cancel: &CancelToken,
    ) -> Result<Vec<Capability>, ScanError> {
        let provider = pending.provider;

        let outcome = tokio::select! {
            biased;
            outcome = join_guarded(&mut pending.handle) => outcome,
            _ = cancel.cancelled() => {
                pending.handle.abort();
                warn!(provider = %provider, "Scan cancelled while provider was running");
                return Err(ScanError::Cancelled);
            }
            _ = sleep_until(pending.deadline) => {
                pending.handle.abort();
                warn!(provider = %provider, "Provider timed out; contributing nothing");
                return Ok(Vec::new());
            }
        };

        match outcome {
            PanicGuardResult::Success(Ok(capabilities)) => {
                for capability in &capabilities {
                    info!(
                        provider = %provider,
                        name = %capability.name(),
                        value = %capability.value(),
                        "Adding capability"
                    );
                }
                Ok(capabilities)
            }
            PanicGuardResult::Success(Err(e)) => {
                warn!(provider = %provider, error = %e, "Provider failed; contributing nothing");
                Ok(Vec::new())
            }
            PanicGuardResult::Panicked(msg) => {
                error!(provider = %provider, panic_msg = %msg, "Provider panicked; contributing nothing");
                Ok(Vec::new())
            }
            PanicGuardResult::Aborted => {
                warn!(provider = %provider, "Provider task aborted; contributing nothing");
                Ok(Vec::new())
            }
        }
    }
}
