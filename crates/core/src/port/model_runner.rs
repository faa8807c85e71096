// Model Runner Port
// Abstraction over the external-process invocation bridge

use crate::domain::InvocationRequest;
use async_trait::async_trait;
use thiserror::Error;

/// Invocation failure taxonomy
///
/// A spawn failure (program missing or unrunnable) is a distinct class
/// from a process that starts and later exits non-zero.
#[derive(Error, Debug)]
pub enum InvocationError {
    #[error("Spawn failed: {0}")]
    Spawn(String),

    #[error("Stream IO error: {0}")]
    StreamIo(String),

    #[error("{}", exit_message(.code, .stderr))]
    Exit { code: Option<i32>, stderr: String },

    #[error("Process timeout after {0}ms")]
    Timeout(u64),
}

fn exit_message(code: &Option<i32>, stderr: &str) -> String {
    let code_text = match code {
        Some(c) => format!("code {}", c),
        None => "terminated by signal".to_string(),
    };
    if stderr.is_empty() {
        format!("Non-zero exit ({}), no diagnostic output", code_text)
    } else {
        format!("Non-zero exit ({}): {}", code_text, stderr.trim_end())
    }
}

impl InvocationError {
    /// Short failure class label for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            InvocationError::Spawn(_) => "spawn",
            InvocationError::StreamIo(_) => "stream_io",
            InvocationError::Exit { .. } => "non_zero_exit",
            InvocationError::Timeout(_) => "timeout",
        }
    }
}

/// Model Runner trait
///
/// Implementations:
/// - SubprocessRunner: spawns the external inference routine
/// - MockModelRunner: canned outcomes for tests
///
/// Exactly one outcome is produced per request; the bridge never retries
/// or forks the invocation internally.
#[async_trait]
pub trait ModelRunner: Send + Sync {
    /// Run one invocation to completion and return the frozen stdout
    /// buffer on a zero exit.
    ///
    /// # Errors
    /// - InvocationError::Spawn if the process cannot be started
    /// - InvocationError::StreamIo if reading stdout/stderr fails mid-flight
    /// - InvocationError::Exit if the process exits non-zero
    /// - InvocationError::Timeout if the invocation exceeds its bound
    async fn run(&self, request: &InvocationRequest) -> Result<Vec<u8>, InvocationError>;
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
        /// Always succeed with the given stdout bytes
        Success(Vec<u8>),
        /// Always fail with a spawn error
        SpawnFail(String),
        /// Always fail with a non-zero exit
        ExitFail { code: i32, stderr: String },
        /// Always fail with a timeout
        Timeout(u64),
    }

    /// Mock Model Runner for testing
    pub struct MockModelRunner {
        behavior: Arc<Mutex<MockBehavior>>,
        call_count: Arc<Mutex<usize>>,
    }

    impl MockModelRunner {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                call_count: Arc::new(Mutex::new(0)),
            }
        }

        pub fn new_success(stdout: impl Into<Vec<u8>>) -> Self {
            Self::new(MockBehavior::Success(stdout.into()))
        }

        pub fn new_spawn_fail(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::SpawnFail(message.into()))
        }

        pub fn new_exit_fail(code: i32, stderr: impl Into<String>) -> Self {
            Self::new(MockBehavior::ExitFail {
                code,
                stderr: stderr.into(),
            })
        }

        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl ModelRunner for MockModelRunner {
        async fn run(&self, _request: &InvocationRequest) -> Result<Vec<u8>, InvocationError> {
            *self.call_count.lock().unwrap() += 1;

            let behavior = self.behavior.lock().unwrap().clone();

            match behavior {
                MockBehavior::Success(stdout) => Ok(stdout),
                MockBehavior::SpawnFail(msg) => Err(InvocationError::Spawn(msg)),
                MockBehavior::ExitFail { code, stderr } => Err(InvocationError::Exit {
                    code: Some(code),
                    stderr,
                }),
                MockBehavior::Timeout(ms) => Err(InvocationError::Timeout(ms)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_message_with_stderr() {
        let err = InvocationError::Exit {
            code: Some(2),
            stderr: "model file missing\n".to_string(),
        };
        assert_eq!(err.to_string(), "Non-zero exit (code 2): model file missing");
    }

    #[test]
    fn test_exit_message_without_stderr() {
        let err = InvocationError::Exit {
            code: Some(1),
            stderr: String::new(),
        };
        assert_eq!(
            err.to_string(),
            "Non-zero exit (code 1), no diagnostic output"
        );
    }

    #[test]
    fn test_exit_message_signal() {
        let err = InvocationError::Exit {
            code: None,
            stderr: String::new(),
        };
        assert_eq!(
            err.to_string(),
            "Non-zero exit (terminated by signal), no diagnostic output"
        );
    }

    #[test]
    fn test_error_kind_labels() {
        assert_eq!(InvocationError::Spawn("x".into()).kind(), "spawn");
        assert_eq!(InvocationError::Timeout(5).kind(), "timeout");
    }
}
