// Environment variable accessor port

/// Read-only view of the process environment
pub trait EnvironmentReader: Send + Sync {
    /// Value of `name` if set and non-empty
    ///
    /// No trimming or case normalization; callers trim as needed.
    fn lookup(&self, name: &str) -> Option<String>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory environment that records lookup order
    #[derive(Default)]
    pub struct MockEnvironment {
        vars: HashMap<String, String>,
        lookups: Mutex<Vec<String>>,
    }

    impl MockEnvironment {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
            self.vars.insert(name.into(), value.into());
            self
        }

        pub fn lookups(&self) -> Vec<String> {
            self.lookups.lock().unwrap().clone()
        }
    }

    impl EnvironmentReader for MockEnvironment {
        fn lookup(&self, name: &str) -> Option<String> {
            self.lookups.lock().unwrap().push(name.to_string());
            self.vars.get(name).filter(|v| !v.is_empty()).cloned()
        }
    }
}
