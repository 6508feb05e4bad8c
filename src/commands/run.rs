//! Run command - the full deployment
//!
//! Env preflight, then static files, migrations and security checks in
//! order, then the superuser check. Every task runs even if an earlier one
//! failed; the exit status reflects the whole batch.

use anyhow::Result;
use batchrun::{NoProgress, ProcessEnv, RunReport};
use colored::Colorize;
use std::process::ExitCode;

use crate::Context;
use crate::cli::RunArgs;
use crate::config::DeployConfig;
use crate::progress::{self, ConsoleProgress};
use crate::tasks;
use crate::ui::{self, Mark};

const NEXT_STEPS: [&str; 5] = [
    "Set up your production environment variables",
    "Configure your web server (Nginx/Apache)",
    "Set up SSL certificates",
    "Configure monitoring and logging",
    "Set up backup procedures",
];

pub fn run(ctx: &Context, args: RunArgs) -> Result<ExitCode> {
    let config = DeployConfig::resolve(&args.project.project_dir, &args.overrides())?;
    log::debug!("resolved config: {config:?}");

    let narrate = !ctx.quiet && !args.json;
    if narrate {
        ui::banner();
        ui::title("Starting RepairMyBike Backend Deployment");
        ui::field("Project", &config.project_dir.display().to_string());
        ui::field("Settings", &config.settings_module);
        println!();
    }

    if !config.manage_path().exists() {
        log::warn!(
            "{} not found; management commands will fail",
            config.manage_path().display()
        );
    }

    let runner = tasks::build_runner(&config);
    let preflight = tasks::preflight(&config);

    let result = if args.json {
        // stdout is reserved for the report
        let result = runner.run(&preflight, &ProcessEnv, &mut NoProgress);
        if let Err(missing) = &result {
            progress::print_preflight(Err(missing), true);
        }
        result
    } else {
        runner.run(&preflight, &ProcessEnv, &mut ConsoleProgress::new(ctx.quiet))
    };

    let Ok(report) = result else {
        return Ok(ExitCode::FAILURE);
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report, ctx.quiet);
    }

    Ok(exit_code(&report))
}

/// 0 when every task succeeded, 1 otherwise
fn exit_code(report: &RunReport) -> ExitCode {
    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_summary(report: &RunReport, quiet: bool) {
    if !quiet {
        println!();
        ui::rule();
    }

    let failed = report.failed();
    if !failed.is_empty() {
        ui::status(Mark::Fail, &format!(
            "Deployment completed with {}:",
            ui::count(failed.len(), "failed task", "failed tasks")
        ));
        for label in failed {
            eprintln!("   - {}", label.red());
        }
        return;
    }

    ui::status(Mark::Ok, "Deployment completed successfully!");
    if quiet {
        return;
    }

    let warnings = report.warnings();
    if !warnings.is_empty() {
        ui::status(Mark::Warn, &format!(
            "{} raised during the run",
            ui::count(warnings.len(), "warning", "warnings")
        ));
    }
    if let Some(elapsed) = report.duration() {
        ui::field("Elapsed", &format!("{:.1}s", elapsed.num_milliseconds() as f64 / 1000.0));
    }

    println!();
    println!("🎉 {}", "RepairMyBike Backend is ready for production!".bold());

    ui::section("Next steps");
    for (i, step) in NEXT_STEPS.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
}
