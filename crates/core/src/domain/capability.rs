// Capability Domain Model

use serde::{Deserialize, Serialize};

use super::error::{DomainError, Result};

/// A named fact describing a tool, SDK, or platform feature on the host
///
/// Names may share a prefix to express hierarchy (`AndroidSDK`, `AndroidSDK_23`).
/// Uniqueness across a scan is NOT enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    name: String,
    value: String,
}

impl Capability {
    /// Create a capability fact
    ///
    /// # Errors
    /// `DomainError::EmptyCapabilityName` if `name` is empty
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let value = value.into();

        if name.is_empty() {
            return Err(DomainError::EmptyCapabilityName { value });
        }

        Ok(Self { name, value })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_value_is_allowed() {
        let cap = Capability::new("PowerShell", "").unwrap();
        assert_eq!(cap.name(), "PowerShell");
        assert_eq!(cap.value(), "");
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let err = Capability::new("", "/opt/ant").unwrap_err();
        assert_eq!(
            err,
            DomainError::EmptyCapabilityName {
                value: "/opt/ant".to_string()
            }
        );
    }

    #[test]
    fn test_serializes_as_name_value_pair() {
        let cap = Capability::new("ant", "/opt/ant").unwrap();
        let json = serde_json::to_value(&cap).unwrap();
        assert_eq!(json, serde_json::json!({"name": "ant", "value": "/opt/ant"}));
    }
}
