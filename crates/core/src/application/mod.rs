// Application Layer - Scanning, provider registration and runtime plumbing

pub mod cancel;
pub mod config;
pub mod constants;
mod panic_guard;
pub mod providers;
pub mod scanner;
pub mod signals;

// Re-exports
pub use cancel::{cancel_channel, CancelSender, CancelToken};
pub use config::{ScanConfig, ScanMode, ScriptConfig};
pub use panic_guard::{join_guarded, PanicGuardResult};
pub use providers::{
    builtin_providers, enabled_providers, registration_table, CapabilityProvider, ProviderError,
    RegisteredProvider,
};
pub use scanner::{CapabilityScanner, ScanError};
pub use signals::HostSignals;
