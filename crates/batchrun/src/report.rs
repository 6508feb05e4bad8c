//! Run report - the accumulated record of one batch run

use crate::types::{AuxOutcome, TaskOutcome};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Record of one executed task
#[derive(Debug, Clone, Serialize)]
pub struct TaskRecord {
    pub label: String,
    pub outcome: TaskOutcome,
    pub elapsed_ms: u64,
}

/// Record of one auxiliary check
#[derive(Debug, Clone, Serialize)]
pub struct AuxRecord {
    pub label: String,
    pub outcome: AuxOutcome,
}

/// Accumulated result of a batch run
///
/// `failed` holds exactly the labels of tasks whose outcome was a failure,
/// in task order. Auxiliary checks are recorded separately and never touch
/// it.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub tasks: Vec<TaskRecord>,
    pub auxiliary: Vec<AuxRecord>,
    failed: Vec<String>,
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

impl RunReport {
    /// Start an empty report stamped with the current time
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            tasks: Vec::new(),
            auxiliary: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Record a task's outcome
    pub fn record_task(&mut self, label: &str, outcome: TaskOutcome, elapsed: Duration) {
        if outcome.is_failure() {
            self.failed.push(label.to_string());
        }
        self.tasks.push(TaskRecord {
            label: label.to_string(),
            outcome,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        });
    }

    /// Record an auxiliary check's outcome
    pub fn record_aux(&mut self, label: &str, outcome: AuxOutcome) {
        self.auxiliary.push(AuxRecord {
            label: label.to_string(),
            outcome,
        });
    }

    /// Stamp the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Labels of failed tasks, in task order
    pub fn failed(&self) -> &[String] {
        &self.failed
    }

    /// True when no task failed
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Process exit code for this report
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.is_success())
    }

    /// Warnings from tasks and auxiliary checks
    pub fn warnings(&self) -> Vec<&str> {
        let task_warnings = self.tasks.iter().filter_map(|t| match &t.outcome {
            TaskOutcome::Warned { message } => Some(message.as_str()),
            _ => None,
        });
        let aux_warnings = self.auxiliary.iter().filter_map(|a| match &a.outcome {
            AuxOutcome::Warning { message } => Some(message.as_str()),
            AuxOutcome::Passed { .. } => None,
        });
        task_warnings.chain(aux_warnings).collect()
    }

    /// Total time from start to finish, if finished
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.finished_at.map(|end| end - self.started_at)
    }
}
