// Subprocess script runner
// reason: tokio process for async spawn, timeout and kill-on-drop
use async_trait::async_trait;
use std::collections::HashMap;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::info;

use capscan_core::port::{ScriptError, ScriptInvocation, ScriptOutput, ScriptRunner};

/// Spawns the capability script with an allowlisted environment
///
/// The child is killed if the run times out or the scan is cancelled
/// (the future is dropped).
#[derive(Debug, Default, Clone, Copy)]
pub struct SubprocessScriptRunner;

impl SubprocessScriptRunner {
    pub fn new() -> Self {
        Self
    }

    /// Filter the agent's environment to the allowlist
    fn filter_env(
        env: impl Iterator<Item = (String, String)>,
        allowlist: &[String],
    ) -> HashMap<String, String> {
        env.filter(|(k, _)| allowlist.iter().any(|allowed| allowed.eq_ignore_ascii_case(k)))
            .collect()
    }

    fn build_output(output: std::process::Output) -> ScriptOutput {
        ScriptOutput {
            exit_code: output.status.code(),
            stdout_lines: String::from_utf8_lossy(&output.stdout)
                .lines()
                .map(str::to_string)
                .collect(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

#[async_trait]
impl ScriptRunner for SubprocessScriptRunner {
    async fn run(&self, invocation: &ScriptInvocation) -> Result<ScriptOutput, ScriptError> {
        let filtered_env = Self::filter_env(std::env::vars(), &invocation.env_allowlist);

        info!(
            program = %invocation.program,
            args = ?invocation.args,
            timeout_ms = invocation.timeout.as_millis() as u64,
            "Starting capability script"
        );

        let child = Command::new(&invocation.program)
            .args(&invocation.args)
            .env_clear()
            .envs(&filtered_env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ScriptError::SpawnFailed(e.to_string()))?;

        let output = match timeout(invocation.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(ScriptError::IoError(e.to_string())),
            Err(_) => return Err(ScriptError::Timeout(invocation.timeout.as_millis() as u64)),
        };

        let result = Self::build_output(output);

        info!(
            program = %invocation.program,
            exit_code = ?result.exit_code,
            lines = result.stdout_lines.len(),
            "Capability script completed"
        );

        Ok(result)
    }
}
