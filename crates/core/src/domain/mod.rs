// Domain Layer - Capability facts and signal value types

pub mod capability;
pub mod command;
pub mod error;
pub mod signal;

// Re-exports
pub use capability::Capability;
pub use command::LoggingCommand;
pub use error::DomainError;
pub use signal::{Hive, RegistryQuery, RegistryValue, RegistryView, RunningProcess};
