// Filesystem accessor over std::fs
use std::path::{Path, PathBuf};

use capscan_core::port::{FileSystem, ProbeError};

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn list_directories(&self, path: &Path) -> Result<Option<Vec<PathBuf>>, ProbeError> {
        if !path.is_dir() {
            return Ok(None);
        }

        let mut dirs = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry_path = entry?.path();
            // follows symlinks and junctions
            if entry_path.is_dir() {
                dirs.push(entry_path);
            }
        }
        dirs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        Ok(Some(dirs))
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}
