//! Progress callback trait
//!
//! Lets the runner report what it is doing without depending on any
//! particular terminal UI.

use crate::preflight::MissingVars;
use crate::types::{AuxOutcome, TaskOutcome};

/// Progress callback for batch execution
///
/// Implement this trait to receive events during a run.
pub trait ProgressCallback {
    /// Called when the preflight gate passes
    fn on_preflight_passed(&mut self, _required: &[String]) {}

    /// Called when the preflight gate aborts the run
    fn on_preflight_failed(&mut self, _missing: &MissingVars) {}

    /// Called once before the first task, with the number of tasks
    fn on_batch_start(&mut self, _count: usize) {}

    /// Called before a task's operation is invoked
    fn on_task_start(&mut self, index: usize, label: &str, description: &str);

    /// Called after a task's operation returns, with its classified outcome
    fn on_task_complete(&mut self, index: usize, label: &str, outcome: &TaskOutcome);

    /// Called before an auxiliary check runs
    fn on_aux_start(&mut self, _label: &str, _description: &str) {}

    /// Called after an auxiliary check returns
    fn on_aux_complete(&mut self, _label: &str, _outcome: &AuxOutcome) {}

    /// Called once after everything has run
    fn on_batch_complete(&mut self) {}
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_task_start(&mut self, _index: usize, _label: &str, _description: &str) {}
    fn on_task_complete(&mut self, _index: usize, _label: &str, _outcome: &TaskOutcome) {}
}
