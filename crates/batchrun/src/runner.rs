//! Batch runner - preflight gate, ordered tasks, auxiliary checks
//!
//! Execution is strictly sequential. A task failure is recorded and the
//! runner moves on; only the preflight can stop a run, and only before the
//! first task starts.

use crate::context::ProgressCallback;
use crate::operation::{Operation, Task};
use crate::preflight::{EnvSource, MissingVars, Preflight};
use crate::report::RunReport;
use crate::types::{AuxOutcome, Completion, TaskOutcome};
use std::time::Instant;

/// Ordered batch of tasks followed by auxiliary checks
#[derive(Debug, Default)]
pub struct BatchRunner {
    tasks: Vec<Task>,
    auxiliary: Vec<Task>,
}

impl BatchRunner {
    /// Create an empty runner
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task to the batch
    pub fn task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    /// Append an auxiliary check, run after every task and never failing the run
    pub fn auxiliary(mut self, check: Task) -> Self {
        self.auxiliary.push(check);
        self
    }

    /// Tasks in execution order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Auxiliary checks in execution order
    pub fn auxiliary_checks(&self) -> &[Task] {
        &self.auxiliary
    }

    /// Gate on `preflight`, then run everything
    ///
    /// Returns the missing names without invoking any operation when the
    /// preflight fails.
    pub fn run<E, P>(
        &self,
        preflight: &Preflight,
        env: &E,
        progress: &mut P,
    ) -> Result<RunReport, MissingVars>
    where
        E: EnvSource + ?Sized,
        P: ProgressCallback + ?Sized,
    {
        if let Err(missing) = preflight.check(env) {
            log::warn!("preflight failed: {missing}");
            progress.on_preflight_failed(&missing);
            return Err(missing);
        }
        log::debug!("preflight passed ({} required)", preflight.required().len());
        progress.on_preflight_passed(preflight.required());
        Ok(self.run_unchecked(progress))
    }

    /// Run every task and auxiliary check without a preflight gate
    pub fn run_unchecked<P: ProgressCallback + ?Sized>(&self, progress: &mut P) -> RunReport {
        let mut report = RunReport::new();

        progress.on_batch_start(self.tasks.len());
        for (index, task) in self.tasks.iter().enumerate() {
            let operation = task.operation();
            progress.on_task_start(index, task.label(), &operation.description());

            let started = Instant::now();
            let outcome = TaskOutcome::from(operation.execute());
            let elapsed = started.elapsed();

            match &outcome {
                TaskOutcome::Failed { error } => {
                    log::info!("task '{}' failed: {}", task.label(), error);
                }
                _ => log::info!("task '{}' completed in {:?}", task.label(), elapsed),
            }

            progress.on_task_complete(index, task.label(), &outcome);
            report.record_task(task.label(), outcome, elapsed);
        }

        for check in &self.auxiliary {
            let outcome = run_auxiliary(check, progress);
            report.record_aux(check.label(), outcome);
        }

        report.finish();
        progress.on_batch_complete();
        report
    }
}

/// Run one auxiliary check, downgrading any fault to a warning
fn run_auxiliary<P: ProgressCallback + ?Sized>(check: &Task, progress: &mut P) -> AuxOutcome {
    let operation: &dyn Operation = check.operation();
    progress.on_aux_start(check.label(), &operation.description());

    let outcome = match operation.execute() {
        Ok(Completion::Done { output }) => AuxOutcome::Passed { message: output },
        Ok(Completion::Warned { message }) => AuxOutcome::Warning { message },
        Err(e) => AuxOutcome::Warning {
            message: format!("{e:#}"),
        },
    };

    if outcome.is_warning() {
        log::warn!("auxiliary check '{}': {}", check.label(), outcome.message());
    }
    progress.on_aux_complete(check.label(), &outcome);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::InProcessCheck;
    use crate::context::NoProgress;
    use anyhow::Result;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    /// Operation that records its invocation and succeeds or fails on demand
    struct Scripted {
        name: &'static str,
        fail: bool,
        calls: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Operation for Scripted {
        fn description(&self) -> String {
            format!("Running {}", self.name)
        }

        fn execute(&self) -> Result<Completion> {
            self.calls.borrow_mut().push(self.name);
            if self.fail {
                anyhow::bail!("{} exploded", self.name)
            }
            Ok(Completion::done(self.name))
        }
    }

    /// Records every event in order
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl ProgressCallback for Recorder {
        fn on_preflight_passed(&mut self, required: &[String]) {
            self.events.push(format!("preflight:{}", required.len()));
        }

        fn on_preflight_failed(&mut self, missing: &MissingVars) {
            self.events.push(format!("abort:{}", missing.names().join(",")));
        }

        fn on_batch_start(&mut self, count: usize) {
            self.events.push(format!("batch:{count}"));
        }

        fn on_task_start(&mut self, index: usize, label: &str, _description: &str) {
            self.events.push(format!("start:{index}:{label}"));
        }

        fn on_task_complete(&mut self, index: usize, label: &str, outcome: &TaskOutcome) {
            let kind = if outcome.is_success() { "ok" } else { "failed" };
            self.events.push(format!("{kind}:{index}:{label}"));
        }

        fn on_aux_complete(&mut self, label: &str, outcome: &AuxOutcome) {
            let kind = if outcome.is_warning() { "warn" } else { "pass" };
            self.events.push(format!("aux-{kind}:{label}"));
        }

        fn on_batch_complete(&mut self) {
            self.events.push("done".into());
        }
    }

    const NAMES: [&str; 3] = ["static", "migrate", "check"];

    fn runner_with(failures: [bool; 3], calls: &Rc<RefCell<Vec<&'static str>>>) -> BatchRunner {
        NAMES
            .into_iter()
            .zip(failures)
            .fold(BatchRunner::new(), |runner, (name, fail)| {
                runner.task(Task::new(
                    name,
                    Scripted {
                        name,
                        fail,
                        calls: Rc::clone(calls),
                    },
                ))
            })
    }

    fn env_with(keys: &[&str]) -> HashMap<String, String> {
        keys.iter()
            .map(|k| ((*k).to_string(), "set".to_string()))
            .collect()
    }

    #[test]
    fn test_every_outcome_combination_runs_all_and_reports_exact_failures() {
        for mask in 0u8..8 {
            let failures = [mask & 1 != 0, mask & 2 != 0, mask & 4 != 0];
            let calls = Rc::new(RefCell::new(Vec::new()));
            let runner = runner_with(failures, &calls);

            let report = runner.run_unchecked(&mut NoProgress);

            let expected: Vec<&str> = NAMES
                .iter()
                .zip(failures)
                .filter(|(_, fail)| *fail)
                .map(|(name, _)| *name)
                .collect();
            assert_eq!(report.failed(), expected.as_slice(), "mask {mask:03b}");
            assert_eq!(*calls.borrow(), NAMES, "all tasks run for mask {mask:03b}");
            assert_eq!(report.is_success(), mask == 0);
            assert_eq!(report.exit_code(), i32::from(mask != 0));
        }
    }

    #[test]
    fn test_preflight_failure_invokes_nothing() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let runner = runner_with([false; 3], &calls);
        let preflight = Preflight::new(["SECRET_KEY", "DATABASE_URL"]);

        let missing = runner
            .run(&preflight, &env_with(&["DATABASE_URL"]), &mut NoProgress)
            .unwrap_err();

        assert_eq!(missing.names(), ["SECRET_KEY"]);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_preflight_events_reach_progress() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let runner = runner_with([false; 3], &calls);
        let preflight = Preflight::new(["SECRET_KEY", "ALLOWED_HOSTS"]);

        let mut aborted = Recorder::default();
        let _ = runner.run(&preflight, &env_with(&[]), &mut aborted);
        assert_eq!(aborted.events, ["abort:SECRET_KEY,ALLOWED_HOSTS"]);

        let mut passed = Recorder::default();
        let env = env_with(&["SECRET_KEY", "ALLOWED_HOSTS"]);
        runner.run(&preflight, &env, &mut passed).unwrap();
        assert_eq!(passed.events.first().map(String::as_str), Some("preflight:2"));
        assert_eq!(passed.events.last().map(String::as_str), Some("done"));
    }

    #[test]
    fn test_preflight_pass_runs_batch() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let runner = runner_with([false, true, false], &calls);
        let preflight = Preflight::new(["SECRET_KEY"]);

        let report = runner
            .run(&preflight, &env_with(&["SECRET_KEY"]), &mut NoProgress)
            .unwrap();

        assert_eq!(report.failed(), ["migrate"]);
        assert_eq!(calls.borrow().len(), 3);
    }

    #[test]
    fn test_event_order() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let runner = runner_with([false, true, false], &calls).auxiliary(Task::new(
            "superuser",
            InProcessCheck::new("Checking", || Ok(Completion::done("exists"))),
        ));
        let mut recorder = Recorder::default();

        runner.run_unchecked(&mut recorder);

        assert_eq!(
            recorder.events,
            [
                "batch:3",
                "start:0:static",
                "ok:0:static",
                "start:1:migrate",
                "failed:1:migrate",
                "start:2:check",
                "ok:2:check",
                "aux-pass:superuser",
                "done",
            ]
        );
    }

    #[test]
    fn test_auxiliary_fault_is_warning_only() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let runner = runner_with([false; 3], &calls).auxiliary(Task::new(
            "superuser",
            InProcessCheck::new("Checking", || {
                Err(anyhow::anyhow!("relation auth_user does not exist")
                    .context("Could not check superuser status"))
            }),
        ));

        let report = runner.run_unchecked(&mut NoProgress);

        assert!(report.is_success());
        assert_eq!(report.auxiliary.len(), 1);
        assert_eq!(
            report.warnings(),
            ["Could not check superuser status: relation auth_user does not exist"]
        );
    }

    #[test]
    fn test_auxiliary_runs_even_when_tasks_fail() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let ran = Rc::new(RefCell::new(false));
        let ran_in_check = Rc::clone(&ran);
        let runner = runner_with([true; 3], &calls).auxiliary(Task::new(
            "superuser",
            InProcessCheck::new("Checking", move || {
                *ran_in_check.borrow_mut() = true;
                Ok(Completion::warned("No superuser found"))
            }),
        ));

        let report = runner.run_unchecked(&mut NoProgress);

        assert!(*ran.borrow());
        assert_eq!(report.failed().len(), 3);
        assert_eq!(report.warnings(), ["No superuser found"]);
    }

    #[test]
    fn test_empty_batch_succeeds() {
        let report = BatchRunner::new().run_unchecked(&mut NoProgress);
        assert!(report.is_success());
        assert!(report.tasks.is_empty());
        assert!(report.finished_at.is_some());
    }
}
