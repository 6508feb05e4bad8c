//! Core types for batch execution

use serde::{Deserialize, Serialize};
use std::process::Output;

/// What an operation produced when it did not fail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Completion {
    /// Work finished; carries the captured output (may be empty)
    Done { output: String },
    /// Work finished but something deserves attention
    Warned { message: String },
}

impl Completion {
    /// Completion with the given output
    pub fn done(output: impl Into<String>) -> Self {
        Self::Done {
            output: output.into(),
        }
    }

    /// Completion carrying a warning
    pub fn warned(message: impl Into<String>) -> Self {
        Self::Warned {
            message: message.into(),
        }
    }
}

/// Classified outcome of one task in the batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// Operation completed
    Succeeded { output: String },
    /// Operation completed with a warning; still counts as success
    Warned { message: String },
    /// Operation failed (error or non-zero exit)
    Failed { error: String },
}

impl TaskOutcome {
    /// Check if the outcome counts as success
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Check if the outcome is a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl From<anyhow::Result<Completion>> for TaskOutcome {
    fn from(result: anyhow::Result<Completion>) -> Self {
        match result {
            Ok(Completion::Done { output }) => Self::Succeeded { output },
            Ok(Completion::Warned { message }) => Self::Warned { message },
            Err(e) => Self::Failed {
                error: format!("{e:#}"),
            },
        }
    }
}

/// Outcome of an auxiliary check
///
/// Auxiliary checks never fail a run. Anything other than a clean pass
/// becomes a warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuxOutcome {
    /// Check determined everything is fine
    Passed { message: String },
    /// Check found a problem or could not determine the answer
    Warning { message: String },
}

impl AuxOutcome {
    /// Check if this is a warning
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Warning { .. })
    }

    /// The message carried by either variant
    pub fn message(&self) -> &str {
        match self {
            Self::Passed { message } | Self::Warning { message } => message,
        }
    }
}

/// Output captured from an external command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub success: bool,
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: output.stdout,
            stderr: output.stderr,
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

impl CommandOutput {
    /// Get stdout as a string
    pub fn stdout_str(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }

    /// Get stderr as a string
    pub fn stderr_str(&self) -> String {
        String::from_utf8_lossy(&self.stderr).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_ok_result() {
        let outcome = TaskOutcome::from(Ok(Completion::done("42 files")));
        assert_eq!(
            outcome,
            TaskOutcome::Succeeded {
                output: "42 files".into()
            }
        );
        assert!(outcome.is_success());
    }

    #[test]
    fn test_outcome_from_warning_is_success() {
        let outcome = TaskOutcome::from(Ok(Completion::warned("careful")));
        assert!(outcome.is_success());
        assert!(!outcome.is_failure());
    }

    #[test]
    fn test_outcome_from_error_keeps_chain() {
        let err = anyhow::anyhow!("connection refused").context("migrate failed");
        let outcome = TaskOutcome::from(Err(err));
        match outcome {
            TaskOutcome::Failed { error } => {
                assert_eq!(error, "migrate failed: connection refused");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(TaskOutcome::Failed {
            error: "boom".into(),
        })
        .unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "boom");
    }

    #[test]
    fn test_aux_outcome_message() {
        let passed = AuxOutcome::Passed {
            message: "ok".into(),
        };
        let warning = AuxOutcome::Warning {
            message: "hmm".into(),
        };
        assert_eq!(passed.message(), "ok");
        assert!(!passed.is_warning());
        assert_eq!(warning.message(), "hmm");
        assert!(warning.is_warning());
    }
}
