// Signal value types shared by the accessor ports

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root of a configuration-store lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hive {
    CurrentUser,
    LocalMachine,
}

/// Logical subtree of the configuration store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistryView {
    /// Whatever view the current process gets without redirection flags
    Default,
    /// Native 64-bit view; unavailable on a 32-bit OS
    Registry64,
    /// WOW64 32-bit view
    Registry32,
}

impl RegistryView {
    pub fn requires_64bit_os(self) -> bool {
        matches!(self, RegistryView::Registry64)
    }
}

impl std::fmt::Display for Hive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Hive::CurrentUser => write!(f, "CurrentUser"),
            Hive::LocalMachine => write!(f, "LocalMachine"),
        }
    }
}

impl std::fmt::Display for RegistryView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryView::Default => write!(f, "Default"),
            RegistryView::Registry64 => write!(f, "Registry64"),
            RegistryView::Registry32 => write!(f, "Registry32"),
        }
    }
}

/// One attempt to read a single value from one view of the configuration store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryQuery {
    pub hive: Hive,
    pub view: RegistryView,
    pub key_path: String,
    pub value_name: String,
}

impl RegistryQuery {
    pub fn new(
        hive: Hive,
        view: RegistryView,
        key_path: impl Into<String>,
        value_name: impl Into<String>,
    ) -> Self {
        Self {
            hive,
            view,
            key_path: key_path.into(),
            value_name: value_name.into(),
        }
    }
}

/// Raw typed value as stored in the configuration store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryValue {
    String(String),
    ExpandString(String),
    MultiString(Vec<String>),
    Dword(u32),
    Qword(u64),
    Binary(Vec<u8>),
}

impl RegistryValue {
    /// String coercion: only string-typed, non-empty values count
    pub fn into_string(self) -> Option<String> {
        match self {
            RegistryValue::String(s) | RegistryValue::ExpandString(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}

/// Snapshot of a running process taken at detection time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunningProcess {
    pub name: String,
    /// None when the process exited (or denied access) before its image path was read
    pub executable_path: Option<PathBuf>,
}

impl RunningProcess {
    /// Name match used by every process table
    ///
    /// Case-insensitive, and a trailing `.exe` on the process image name is
    /// ignored so `WindowsAzureGuestAgent` matches `WindowsAzureGuestAgent.exe`.
    pub fn matches_name(&self, wanted: &str) -> bool {
        let name = self.name.as_str();
        let stem = match name.len().checked_sub(4) {
            Some(cut) if name.is_char_boundary(cut) && name[cut..].eq_ignore_ascii_case(".exe") => {
                &name[..cut]
            }
            _ => name,
        };
        stem.eq_ignore_ascii_case(wanted) || name.eq_ignore_ascii_case(wanted)
    }
}
