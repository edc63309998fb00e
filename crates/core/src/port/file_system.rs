// Filesystem layout accessor port

use crate::port::ProbeError;
use std::path::{Path, PathBuf};

/// Read-only filesystem queries used by providers
pub trait FileSystem: Send + Sync {
    /// Full paths of the directories directly under `path`, ordered by entry name
    ///
    /// # Returns
    /// `Ok(None)` when `path` does not exist or is not a directory
    fn list_directories(&self, path: &Path) -> Result<Option<Vec<PathBuf>>, ProbeError>;

    /// Whether `path` exists and is a regular file
    fn is_file(&self, path: &Path) -> bool;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};

    /// In-memory directory tree
    #[derive(Default)]
    pub struct MockFileSystem {
        dirs: BTreeMap<PathBuf, BTreeSet<PathBuf>>,
        files: BTreeSet<PathBuf>,
    }

    impl MockFileSystem {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register a directory (and link it into its parent)
        pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
            let path = path.into();
            if let Some(parent) = path.parent() {
                self.dirs
                    .entry(parent.to_path_buf())
                    .or_default()
                    .insert(path.clone());
            }
            self.dirs.entry(path).or_default();
            self
        }

        pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
            self.files.insert(path.into());
            self
        }
    }

    impl FileSystem for MockFileSystem {
        fn list_directories(&self, path: &Path) -> Result<Option<Vec<PathBuf>>, ProbeError> {
            Ok(self
                .dirs
                .get(path)
                .map(|children| children.iter().cloned().collect()))
        }

        fn is_file(&self, path: &Path) -> bool {
            self.files.contains(path)
        }
    }
}
