// External script contributor
//
// Runs a capability script and turns `##vso[agent.capability name=X]value`
// lines from its stdout into capabilities. Everything else is just output.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{CapabilityProvider, ProviderError};
use crate::application::signals::HostSignals;
use crate::domain::{Capability, LoggingCommand};
use crate::port::{ScriptInvocation, ScriptRunner};

pub const PROVIDER_NAME: &str = "Script";

const COMMAND_AREA: &str = "agent";
const COMMAND_EVENT: &str = "capability";
const NAME_PROPERTY: &str = "name";

pub struct ScriptCapabilities {
    runner: Arc<dyn ScriptRunner>,
    invocation: ScriptInvocation,
}

impl ScriptCapabilities {
    pub fn new(runner: Arc<dyn ScriptRunner>, invocation: ScriptInvocation) -> Self {
        Self { runner, invocation }
    }
}

/// Capability carried by one stdout line, if any
pub fn parse_capability_line(line: &str) -> Option<Capability> {
    let command = LoggingCommand::parse(line).ok()?;
    if !command.is(COMMAND_AREA, COMMAND_EVENT) {
        return None;
    }
    let name = command.property(NAME_PROPERTY).filter(|n| !n.is_empty())?;
    Capability::new(name, command.data.as_str()).ok()
}

#[async_trait]
impl CapabilityProvider for ScriptCapabilities {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    // tokio::process is fully async
    fn is_blocking(&self) -> bool {
        false
    }

    fn time_budget(&self) -> Option<Duration> {
        Some(self.invocation.timeout)
    }

    async fn detect(&self, _signals: &HostSignals) -> Result<Vec<Capability>, ProviderError> {
        let output = self.runner.run(&self.invocation).await?;

        if output.exit_code != Some(0) {
            warn!(
                program = %self.invocation.program,
                exit_code = ?output.exit_code,
                "Capability script exited unsuccessfully; keeping parsed capabilities"
            );
        }
        if !output.stderr.is_empty() {
            debug!(stderr = %output.stderr, "Capability script STDERR");
        }

        let mut capabilities = Vec::new();
        for line in &output.stdout_lines {
            debug!(line = %line, "Capability script STDOUT");
            if let Some(capability) = parse_capability_line(line) {
                info!(name = %capability.name(), value = %capability.value(), "Adding script capability");
                capabilities.push(capability);
            }
        }
        Ok(capabilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::signals::mocks::empty_signals;
    use crate::port::script_runner::mocks::{MockBehavior, MockScriptRunner};
    use crate::port::ScriptError;
    use std::time::Duration;

    fn invocation() -> ScriptInvocation {
        ScriptInvocation {
            program: "add-capabilities".to_string(),
            args: vec![],
            timeout: Duration::from_secs(5),
            env_allowlist: vec![],
        }
    }

    #[test]
    fn test_parse_capability_line() {
        assert_eq!(
            parse_capability_line("##vso[agent.capability name=Cmd]C:\\Windows\\cmd.exe"),
            Some(Capability::new("Cmd", "C:\\Windows\\cmd.exe").unwrap())
        );
        assert_eq!(
            parse_capability_line("##vso[Agent.Capability name=empty]"),
            Some(Capability::new("empty", "").unwrap())
        );
        assert_eq!(parse_capability_line("##vso[agent.capability]value"), None);
        assert_eq!(parse_capability_line("##vso[agent.capability name=]value"), None);
        assert_eq!(parse_capability_line("##vso[task.setvariable name=x]1"), None);
        assert_eq!(parse_capability_line("Checking: env:JAVA_HOME"), None);
    }

    #[tokio::test]
    async fn test_collects_capabilities_in_output_order() {
        let runner = Arc::new(MockScriptRunner::with_lines([
            "Checking: env:M2_HOME",
            "##vso[agent.capability name=maven]C:\\maven",
            "##vso[agent.capability name=Cmd]C:\\Windows\\system32\\cmd.exe",
            "Value not found or empty.",
        ]));
        let provider = ScriptCapabilities::new(runner.clone(), invocation());

        let facts = provider.detect(&empty_signals()).await.unwrap();

        assert_eq!(
            facts,
            vec![
                Capability::new("maven", "C:\\maven").unwrap(),
                Capability::new("Cmd", "C:\\Windows\\system32\\cmd.exe").unwrap(),
            ]
        );
        assert_eq!(runner.call_count(), 1);
    }

    #[tokio::test]
    async fn test_nonzero_exit_keeps_parsed_capabilities() {
        let runner = Arc::new(MockScriptRunner::new(MockBehavior::Exit(
            1,
            vec!["##vso[agent.capability name=svn]/usr/bin/svn".to_string()],
        )));
        let provider = ScriptCapabilities::new(runner, invocation());

        let facts = provider.detect(&empty_signals()).await.unwrap();
        assert_eq!(facts.len(), 1);
    }

    #[tokio::test]
    async fn test_runner_failure_is_provider_error() {
        let runner = Arc::new(MockScriptRunner::new(MockBehavior::Timeout(5000)));
        let provider = ScriptCapabilities::new(runner, invocation());

        let err = provider.detect(&empty_signals()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Script(ScriptError::Timeout(5000))));
    }

    #[test]
    fn test_script_declares_its_own_timeout() {
        let runner = Arc::new(MockScriptRunner::with_lines(Vec::<String>::new()));
        let provider = ScriptCapabilities::new(runner, invocation());

        assert!(!provider.is_blocking());
        assert_eq!(provider.time_budget(), Some(Duration::from_secs(5)));
    }
}
