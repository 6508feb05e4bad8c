//! Console narration for deployment runs.
//!
//! Implements batchrun's progress callback with colored step lines and an
//! indicatif spinner while a command is running.

use batchrun::{AuxOutcome, MissingVars, ProgressCallback, TaskOutcome};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

use crate::ui::{self, Mark};

/// Print the outcome of the environment preflight
///
/// The failure is printed even in quiet mode.
pub fn print_preflight(result: Result<&[String], &MissingVars>, quiet: bool) {
    match result {
        Ok(_) if quiet => {}
        Ok(_) => ui::status(Mark::Ok, "All required environment variables are set"),
        Err(missing) => {
            ui::status(Mark::Fail, &missing.to_string());
            eprintln!("  {}", "Please set these variables before deployment.".dimmed());
        }
    }
}

/// Progress callback printing to the terminal
pub struct ConsoleProgress {
    quiet: bool,
    animate: bool,
    total: usize,
    spinner: Option<ProgressBar>,
}

impl ConsoleProgress {
    /// Narrating progress; spinners only when stdout is a terminal
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            animate: !quiet && std::io::stdout().is_terminal(),
            total: 0,
            spinner: None,
        }
    }

    fn start_spinner(&mut self, msg: String) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(msg);
        pb.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(pb);
    }

    fn stop_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }
}

impl ProgressCallback for ConsoleProgress {
    fn on_preflight_passed(&mut self, required: &[String]) {
        print_preflight(Ok(required), self.quiet);
    }

    fn on_preflight_failed(&mut self, missing: &MissingVars) {
        print_preflight(Err(missing), self.quiet);
    }

    fn on_batch_start(&mut self, count: usize) {
        self.total = count;
        if !self.quiet {
            println!();
        }
    }

    fn on_task_start(&mut self, index: usize, _label: &str, description: &str) {
        if self.quiet {
            return;
        }
        println!(
            "{} {description}...",
            format!("[{}/{}]", index + 1, self.total).blue().bold()
        );
        if self.animate {
            self.start_spinner(description.to_string());
        }
    }

    fn on_task_complete(&mut self, _index: usize, label: &str, outcome: &TaskOutcome) {
        self.stop_spinner();
        match outcome {
            TaskOutcome::Succeeded { .. } if self.quiet => {}
            TaskOutcome::Succeeded { .. } => {
                ui::status(Mark::Ok, &format!("{label} completed successfully"));
            }
            TaskOutcome::Warned { message } => ui::status(Mark::Warn, &format!("{label}: {message}")),
            TaskOutcome::Failed { error } => ui::status(Mark::Fail, &format!("{label} failed: {error}")),
        }
    }

    fn on_aux_start(&mut self, _label: &str, description: &str) {
        if !self.quiet {
            println!();
            ui::status(Mark::Note, &format!("{description}..."));
        }
    }

    fn on_aux_complete(&mut self, _label: &str, outcome: &AuxOutcome) {
        match outcome {
            AuxOutcome::Passed { .. } if self.quiet => {}
            AuxOutcome::Passed { message } => ui::status(Mark::Ok, message),
            AuxOutcome::Warning { message } => ui::status(Mark::Warn, message),
        }
    }

    fn on_batch_complete(&mut self) {
        self.stop_spinner();
    }
}
