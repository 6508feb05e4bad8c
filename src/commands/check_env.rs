use anyhow::Result;
use batchrun::{EnvSource, ProcessEnv};
use colored::Colorize;
use std::process::ExitCode;

use crate::Context;
use crate::cli::ProjectArgs;
use crate::config::DeployConfig;
use crate::progress;
use crate::tasks;
use crate::ui::{self, Mark};

/// Verify the required variables without touching the deployment
pub fn run(ctx: &Context, args: ProjectArgs) -> Result<ExitCode> {
    let config = DeployConfig::resolve(&args.project_dir, &args.overrides())?;
    let preflight = tasks::preflight(&config);

    if !ctx.quiet {
        ui::section("Required Environment Variables");
        for name in preflight.required() {
            // Names only; values are secrets
            if ProcessEnv.get(name).is_some_and(|v| !v.trim().is_empty()) {
                println!("  {} {}", Mark::Ok.symbol(), name);
            } else {
                println!("  {} {} {}", Mark::Fail.symbol(), name, "(missing)".red());
            }
        }
        println!();
    }

    match preflight.check(&ProcessEnv) {
        Ok(()) => {
            progress::print_preflight(Ok(preflight.required()), ctx.quiet);
            Ok(ExitCode::SUCCESS)
        }
        Err(missing) => {
            progress::print_preflight(Err(&missing), ctx.quiet);
            Ok(ExitCode::FAILURE)
        }
    }
}
