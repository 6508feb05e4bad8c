//! # Batchrun
//!
//! A small framework for "preflight + ordered unsupervised batch" runs.
//!
//! A run is gated by a single preflight check. Once the gate passes, every
//! task in the batch executes in order, regardless of how earlier tasks
//! fared. Failures are collected into a [`RunReport`] and the caller decides
//! what to do with them at the end.
//!
//! ## Core Concepts
//!
//! - **Operation**: a unit of work returning either a completion or an error
//! - **Task**: an operation paired with a human-readable label
//! - **Preflight**: the one short-circuit gate (required environment values)
//! - **BatchRunner**: executes tasks, then auxiliary checks, into a report
//!
//! ## Example
//!
//! ```ignore
//! use batchrun::{BatchRunner, ExternalCommand, NoProgress, Preflight, ProcessEnv, Task};
//!
//! let preflight = Preflight::new(["SECRET_KEY", "DATABASE_URL"]);
//! let runner = BatchRunner::new()
//!     .task(Task::new(
//!         "Database migrations",
//!         ExternalCommand::new("python").args(["manage.py", "migrate"]),
//!     ));
//!
//! match runner.run(&preflight, &ProcessEnv, &mut NoProgress) {
//!     Ok(report) if report.is_success() => println!("done"),
//!     Ok(report) => eprintln!("failed: {:?}", report.failed()),
//!     Err(missing) => eprintln!("{missing}"),
//! }
//! ```
//!
//! ## Provider Traits
//!
//! - [`Operation`]: the capability every task wraps
//! - [`EnvSource`]: where the preflight reads values from
//! - [`ProgressCallback`]: receives start/complete events

pub mod check;
pub mod command;
pub mod context;
pub mod error;
pub mod operation;
pub mod preflight;
pub mod report;
pub mod runner;
pub mod types;

// Re-export main types at crate root
pub use check::InProcessCheck;
pub use command::ExternalCommand;
pub use context::{NoProgress, ProgressCallback};
pub use error::{Error, Result};
pub use operation::{BoxedOperation, Operation, Task};
pub use preflight::{EnvSource, MissingVars, Preflight, ProcessEnv};
pub use report::{AuxRecord, RunReport, TaskRecord};
pub use runner::BatchRunner;
pub use types::{AuxOutcome, CommandOutput, Completion, TaskOutcome};
