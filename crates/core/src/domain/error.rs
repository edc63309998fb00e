// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Capability name must not be empty (value: {value:?})")]
    EmptyCapabilityName { value: String },

    #[error("Malformed logging command: {0}")]
    MalformedCommand(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
