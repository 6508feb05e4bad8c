//! Error types for batch operations.

use thiserror::Error;

/// Errors raised by the built-in operations.
///
/// The runner never lets these escape: they are converted into a failed
/// [`TaskOutcome`](crate::TaskOutcome) or a warning.
#[derive(Debug, Error)]
pub enum Error {
    /// The command could not be started at all (missing binary, bad cwd)
    #[error("failed to execute `{command}`: {source}")]
    Spawn {
        /// Rendered command line
        command: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The command ran and exited non-zero
    #[error("`{command}` exited with status {code}: {stderr}")]
    CommandFailed {
        /// Rendered command line
        command: String,
        /// Exit code
        code: i32,
        /// Trimmed standard error output
        stderr: String,
    },

    /// The command was killed by a signal
    #[error("`{command}` was terminated by a signal")]
    Terminated {
        /// Rendered command line
        command: String,
    },

    /// An in-process check reported an internal fault
    #[error("{0}")]
    Check(String),
}

impl Error {
    /// Standard error captured from a failed command, if any
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Error::CommandFailed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

/// Result type for batch operations.
pub type Result<T> = std::result::Result<T, Error>;
