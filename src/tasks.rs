//! The fixed RepairMyBike deployment batch

use batchrun::{BatchRunner, ExternalCommand, Preflight, Task};

use crate::config::DeployConfig;
use crate::superuser::{self, ManagementShellProbe};

/// One management command in the deployment batch
pub struct DeployTask {
    pub label: &'static str,
    pub description: &'static str,
    pub args: &'static [&'static str],
}

/// Deployment tasks, in execution order
pub const DEPLOY_TASKS: [DeployTask; 3] = [
    DeployTask {
        label: "Static files collection",
        description: "Collecting static files",
        args: &["collectstatic", "--noinput"],
    },
    DeployTask {
        label: "Database migrations",
        description: "Applying database migrations",
        args: &["migrate"],
    },
    DeployTask {
        label: "Security checks",
        description: "Running security checks",
        args: &["check", "--deploy"],
    },
];

/// `<python> <manage script> <args...>` run inside the project directory
pub fn manage_command(config: &DeployConfig, args: &[&str]) -> ExternalCommand {
    ExternalCommand::new(&config.python)
        .arg(&config.manage_script)
        .args(args.iter().copied())
        .env("DJANGO_SETTINGS_MODULE", &config.settings_module)
        .current_dir(&config.project_dir)
}

/// Preflight over the configured required variables
pub fn preflight(config: &DeployConfig) -> Preflight {
    Preflight::new(config.required_vars.iter().cloned())
}

/// Build the runner: the three management tasks plus the superuser check
pub fn build_runner(config: &DeployConfig) -> BatchRunner {
    let runner = DEPLOY_TASKS.iter().fold(BatchRunner::new(), |runner, task| {
        runner.task(Task::new(
            task.label,
            manage_command(config, task.args).describe(task.description),
        ))
    });

    if config.superuser_check {
        runner.auxiliary(Task::new(
            superuser::LABEL,
            superuser::superuser_check(ManagementShellProbe::new(config)),
        ))
    } else {
        runner
    }
}
