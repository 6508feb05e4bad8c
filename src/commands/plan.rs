use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use crate::Context;
use crate::cli::ProjectArgs;
use crate::config::DeployConfig;
use crate::tasks;
use crate::ui;

/// Show what `run` would do, without running anything
pub fn run(ctx: &Context, args: ProjectArgs) -> Result<ExitCode> {
    let config = DeployConfig::resolve(&args.project_dir, &args.overrides())?;
    let runner = tasks::build_runner(&config);

    if ctx.quiet {
        for task in runner.tasks() {
            println!("{}", task.label());
        }
        return Ok(ExitCode::SUCCESS);
    }

    ui::title("Deployment Plan");
    ui::field("Project", &config.project_dir.display().to_string());
    ui::field("Python", &config.python);
    ui::field("Settings", &config.settings_module);

    ui::section("Required Environment Variables");
    for name in &config.required_vars {
        println!("  {} {}", "•".dimmed(), name);
    }

    ui::section("Tasks");
    for (i, task) in runner.tasks().iter().enumerate() {
        println!("  {} {}", format!("{}.", i + 1).bold(), task.label());
        if let Some(cmd) = task.operation().command_line() {
            println!("      {} {}", "$".dimmed(), cmd);
        }
    }

    ui::section("After Tasks");
    if runner.auxiliary_checks().is_empty() {
        println!("  {}", "Superuser check disabled".dimmed());
    } else {
        for check in runner.auxiliary_checks() {
            println!(
                "  {} {} {}",
                "○".dimmed(),
                check.label(),
                "(warning only)".dimmed()
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}
