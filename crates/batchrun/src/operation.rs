//! Operation trait and the labelled task wrapper
//!
//! An Operation is a zero-argument unit of work with an external side
//! effect. It either completes or fails; it is never allowed to take the
//! batch down with it.

use crate::types::Completion;
use anyhow::Result;
use std::fmt;

/// Capability every task in a batch wraps
///
/// Implementations are responsible for containing their own faults:
/// return `Err` instead of panicking, and capture child-process failures
/// instead of propagating them.
///
/// # Example
///
/// ```ignore
/// use batchrun::{Completion, Operation};
///
/// struct Touch(std::path::PathBuf);
///
/// impl Operation for Touch {
///     fn description(&self) -> String {
///         format!("Touching {}", self.0.display())
///     }
///
///     fn execute(&self) -> anyhow::Result<Completion> {
///         std::fs::write(&self.0, b"")?;
///         Ok(Completion::done(""))
///     }
/// }
/// ```
pub trait Operation {
    /// Progressive narration shown while the operation runs
    fn description(&self) -> String;

    /// Rendered command line, for operations backed by an external command
    fn command_line(&self) -> Option<String> {
        None
    }

    /// Perform the work
    fn execute(&self) -> Result<Completion>;
}

/// Type alias for boxed operations
pub type BoxedOperation = Box<dyn Operation>;

impl fmt::Debug for dyn Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("description", &self.description())
            .finish()
    }
}

/// An operation paired with its human-readable label
#[derive(Debug)]
pub struct Task {
    label: String,
    operation: BoxedOperation,
}

impl Task {
    /// Create a task from a label and any operation
    pub fn new(label: impl Into<String>, operation: impl Operation + 'static) -> Self {
        Self {
            label: label.into(),
            operation: Box::new(operation),
        }
    }

    /// Create a task from an already boxed operation
    pub fn boxed(label: impl Into<String>, operation: BoxedOperation) -> Self {
        Self {
            label: label.into(),
            operation,
        }
    }

    /// Label used in events and the run report
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The wrapped operation
    pub fn operation(&self) -> &dyn Operation {
        self.operation.as_ref()
    }
}
