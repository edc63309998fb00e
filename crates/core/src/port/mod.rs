// Port Layer - Read-only signal accessors and the script runner

pub mod environment;
pub mod error;
pub mod file_system;
pub mod process_table;
pub mod registry;
pub mod script_runner;

// Re-exports
pub use environment::EnvironmentReader;
pub use error::ProbeError;
pub use file_system::FileSystem;
pub use process_table::ProcessTable;
pub use registry::RegistryStore;
pub use script_runner::{ScriptError, ScriptInvocation, ScriptOutput, ScriptRunner};
