// Running-process accessor port

use crate::domain::RunningProcess;
use crate::port::ProbeError;

/// Snapshot lookup over the host's running processes
pub trait ProcessTable: Send + Sync {
    /// First running process matching `name` (see `RunningProcess::matches_name`)
    ///
    /// Order among several matches is OS-defined. Returns `Ok(None)` when
    /// nothing matches. No caching across calls.
    fn find_by_name(&self, name: &str) -> Result<Option<RunningProcess>, ProbeError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::path::PathBuf;

    /// Fixed process list
    #[derive(Default)]
    pub struct MockProcessTable {
        processes: Vec<RunningProcess>,
    }

    impl MockProcessTable {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_process(mut self, name: &str, executable_path: Option<&str>) -> Self {
            self.processes.push(RunningProcess {
                name: name.to_string(),
                executable_path: executable_path.map(PathBuf::from),
            });
            self
        }
    }

    impl ProcessTable for MockProcessTable {
        fn find_by_name(&self, name: &str) -> Result<Option<RunningProcess>, ProbeError> {
            Ok(self
                .processes
                .iter()
                .find(|p| p.matches_name(name))
                .cloned())
        }
    }
}
