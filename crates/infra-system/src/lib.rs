// capscan Infrastructure - OS Signal Adapters
// Implements: EnvironmentReader, RegistryStore, ProcessTable, FileSystem, ScriptRunner

pub mod env_reader;
pub mod file_system_impl;
pub mod process_table_impl;
pub mod registry_impl;
pub mod script_runner_impl;

pub use env_reader::ProcessEnvironment;
pub use file_system_impl::LocalFileSystem;
pub use process_table_impl::SysinfoProcessTable;
pub use registry_impl::{native_registry, EmptyRegistry};
pub use script_runner_impl::SubprocessScriptRunner;

#[cfg(windows)]
pub use registry_impl::WindowsRegistry;

use capscan_core::application::HostSignals;
use std::sync::Arc;

/// Accessors over the real host
pub fn native_signals() -> HostSignals {
    HostSignals::new(
        Arc::new(ProcessEnvironment),
        native_registry(),
        Arc::new(SysinfoProcessTable::new()),
        Arc::new(LocalFileSystem),
    )
}
