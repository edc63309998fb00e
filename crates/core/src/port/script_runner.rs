// Script Runner Port
// Abstraction for running an external capability script and capturing stdout

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// What to run
#[derive(Debug, Clone)]
pub struct ScriptInvocation {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
    /// Only these variables are passed through to the child
    pub env_allowlist: Vec<String>,
}

/// Captured result of a finished script
#[derive(Debug, Clone, Default)]
pub struct ScriptOutput {
    pub exit_code: Option<i32>,
    pub stdout_lines: Vec<String>,
    pub stderr: String,
}

/// Script execution errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Script timeout after {0}ms")]
    Timeout(u64),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Script Runner trait
///
/// Implementations:
/// - SubprocessScriptRunner (infra-system): spawns the program with tokio
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    /// Run the script to completion and return its output
    ///
    /// A non-zero exit code is NOT an error; callers decide what to do with it.
    ///
    /// # Errors
    /// - ScriptError::SpawnFailed if the program cannot be started
    /// - ScriptError::Timeout if it runs past `invocation.timeout` (the child is killed)
    async fn run(&self, invocation: &ScriptInvocation) -> Result<ScriptOutput, ScriptError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock runner behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Exit with code and stdout lines
        Exit(i32, Vec<String>),
        /// Fail to spawn with message
        Fail(String),
        /// Time out after N ms
        Timeout(u64),
    }

    pub struct MockScriptRunner {
        behavior: MockBehavior,
        call_count: Arc<Mutex<usize>>,
    }

    impl MockScriptRunner {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior,
                call_count: Arc::new(Mutex::new(0)),
            }
        }

        pub fn with_lines<I, S>(lines: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self::new(MockBehavior::Exit(
                0,
                lines.into_iter().map(Into::into).collect(),
            ))
        }

        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl ScriptRunner for MockScriptRunner {
        async fn run(&self, _invocation: &ScriptInvocation) -> Result<ScriptOutput, ScriptError> {
            *self.call_count.lock().unwrap() += 1;

            match &self.behavior {
                MockBehavior::Exit(code, lines) => Ok(ScriptOutput {
                    exit_code: Some(*code),
                    stdout_lines: lines.clone(),
                    stderr: String::new(),
                }),
                MockBehavior::Fail(msg) => Err(ScriptError::SpawnFailed(msg.clone())),
                MockBehavior::Timeout(ms) => Err(ScriptError::Timeout(*ms)),
            }
        }
    }
}
