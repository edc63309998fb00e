// Scan constants (no magic values)
use std::time::Duration;

/// Upper bound for one provider's detection (10s)
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound for the external capability script (60s)
pub const DEFAULT_SCRIPT_TIMEOUT: Duration = Duration::from_secs(60);

/// Extra wait past a provider's own time budget so its internal timeout fires first
pub const TIME_BUDGET_GRACE: Duration = Duration::from_secs(1);

/// How long the runtime waits for stalled blocking probes at shutdown
pub const BLOCKING_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// Variables passed through to the external capability script
pub const DEFAULT_SCRIPT_ENV_ALLOWLIST: &[&str] = &[
    "PATH",
    "PATHEXT",
    "HOME",
    "USER",
    "USERPROFILE",
    "SystemRoot",
    "ProgramFiles",
    "ProgramFiles(x86)",
    "TEMP",
    "TMP",
];
