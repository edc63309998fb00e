// Process table implementation
// reason: sysinfo for cross-platform process enumeration
use sysinfo::System;
use tracing::debug;

use capscan_core::domain::RunningProcess;
use capscan_core::port::{ProbeError, ProcessTable};

/// Process table backed by sysinfo
///
/// Takes a fresh snapshot on every lookup; nothing is cached between scans.
#[derive(Debug, Default)]
pub struct SysinfoProcessTable;

impl SysinfoProcessTable {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessTable for SysinfoProcessTable {
    fn find_by_name(&self, name: &str) -> Result<Option<RunningProcess>, ProbeError> {
        let mut system = System::new();
        system.refresh_processes();

        // lowest pid first so repeated scans agree when several match
        let found = system
            .processes()
            .iter()
            .map(|(pid, process)| {
                (
                    pid.as_u32(),
                    RunningProcess {
                        name: process.name().to_string(),
                        executable_path: process.exe().map(|p| p.to_path_buf()),
                    },
                )
            })
            .filter(|(_, process)| process.matches_name(name))
            .min_by_key(|(pid, _)| *pid)
            .map(|(_, process)| process);

        debug!(
            process = %name,
            found = found.is_some(),
            scanned = system.processes().len(),
            "Process lookup completed"
        );

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_process_is_absent() {
        let table = SysinfoProcessTable::new();
        let found = table
            .find_by_name("capscan-no-such-process-4f1c")
            .unwrap();
        assert!(found.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_finds_running_child() {
        let mut child = std::process::Command::new("sleep")
            .arg("5")
            .spawn()
            .unwrap();

        let found = SysinfoProcessTable::new().find_by_name("sleep").unwrap();

        child.kill().unwrap();
        let _ = child.wait();

        let process = found.expect("sleep should be running");
        assert!(process.matches_name("sleep"));
    }
}
