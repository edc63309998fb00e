// Probe errors: unexpected OS-level failures while reading a signal
//
// A missing signal is NOT an error; accessors return Ok(None) for it.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("OS error {code} while reading {target}")]
    Os { code: i64, target: String },

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ProbeError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => ProbeError::AccessDenied(err.to_string()),
            _ => ProbeError::Io(err.to_string()),
        }
    }
}
