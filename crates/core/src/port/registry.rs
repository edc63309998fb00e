// Configuration-store (registry) accessor port

use crate::domain::{RegistryQuery, RegistryValue};
use crate::port::ProbeError;

/// Raw configuration-store backend
///
/// The view/bitness contract and string coercion live in
/// `HostSignals::read_registry_string`; backends only open and read.
pub trait RegistryStore: Send + Sync {
    /// Whether the host OS is 64-bit (not the current process)
    fn is_64bit_os(&self) -> bool;

    /// Read one raw value
    ///
    /// # Returns
    /// - `Ok(Some(value))` when key and value exist
    /// - `Ok(None)` when the key or value does not exist
    ///
    /// # Errors
    /// `ProbeError` only for unexpected failures (e.g. access denied).
    /// Any handle opened here must be released before returning.
    fn read_value(&self, query: &RegistryQuery) -> Result<Option<RegistryValue>, ProbeError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::domain::{Hive, RegistryView};
    use std::collections::HashMap;
    use std::sync::Mutex;

    type Location = (Hive, RegistryView, String, String);

    /// In-memory registry that records every backend read
    pub struct MockRegistryStore {
        is_64bit: bool,
        values: HashMap<Location, RegistryValue>,
        failures: HashMap<Location, ProbeError>,
        reads: Mutex<Vec<RegistryQuery>>,
    }

    impl MockRegistryStore {
        pub fn new(is_64bit: bool) -> Self {
            Self {
                is_64bit,
                values: HashMap::new(),
                failures: HashMap::new(),
                reads: Mutex::new(Vec::new()),
            }
        }

        pub fn with_value(
            mut self,
            hive: Hive,
            view: RegistryView,
            key_path: &str,
            value_name: &str,
            value: RegistryValue,
        ) -> Self {
            self.values.insert(
                (hive, view, key_path.to_string(), value_name.to_string()),
                value,
            );
            self
        }

        pub fn with_string(
            self,
            hive: Hive,
            view: RegistryView,
            key_path: &str,
            value_name: &str,
            value: &str,
        ) -> Self {
            self.with_value(
                hive,
                view,
                key_path,
                value_name,
                RegistryValue::String(value.to_string()),
            )
        }

        pub fn with_failure(
            mut self,
            hive: Hive,
            view: RegistryView,
            key_path: &str,
            value_name: &str,
            error: ProbeError,
        ) -> Self {
            self.failures.insert(
                (hive, view, key_path.to_string(), value_name.to_string()),
                error,
            );
            self
        }

        /// Backend reads in call order
        pub fn reads(&self) -> Vec<RegistryQuery> {
            self.reads.lock().unwrap().clone()
        }
    }

    impl RegistryStore for MockRegistryStore {
        fn is_64bit_os(&self) -> bool {
            self.is_64bit
        }

        fn read_value(&self, query: &RegistryQuery) -> Result<Option<RegistryValue>, ProbeError> {
            self.reads.lock().unwrap().push(query.clone());

            let location = (
                query.hive,
                query.view,
                query.key_path.clone(),
                query.value_name.clone(),
            );
            if let Some(err) = self.failures.get(&location) {
                return Err(err.clone());
            }
            Ok(self.values.get(&location).cloned())
        }
    }
}
