//! In-process check operation

use crate::operation::Operation;
use crate::types::Completion;
use anyhow::Result;
use std::fmt;

type CheckFn = Box<dyn Fn() -> Result<Completion>>;

/// Operation backed by a closure running inside this process
///
/// Panics inside the closure are caught and reported as an error, so a
/// faulty check degrades the same way as one that returns `Err`.
pub struct InProcessCheck {
    description: String,
    check: CheckFn,
}

impl InProcessCheck {
    /// Wrap a closure as an operation
    pub fn new<F>(description: impl Into<String>, check: F) -> Self
    where
        F: Fn() -> Result<Completion> + 'static,
    {
        Self {
            description: description.into(),
            check: Box::new(check),
        }
    }
}

impl fmt::Debug for InProcessCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InProcessCheck")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl Operation for InProcessCheck {
    fn description(&self) -> String {
        self.description.clone()
    }

    fn execute(&self) -> Result<Completion> {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| (self.check)())) {
            Ok(result) => result,
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(ToString::to_string)
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                Err(crate::Error::Check(format!("check panicked: {reason}")).into())
            }
        }
    }
}
