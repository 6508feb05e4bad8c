mod cli;
mod commands;
mod config;
mod progress;
mod secret;
mod superuser;
mod tasks;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;
use std::process::ExitCode;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    match with_project_env(cli).and_then(|cli| dispatch(&ctx, cli.command)) {
        Ok(code) => code,
        Err(e) => {
            ui::status(ui::Mark::Fail, &format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

/// Load the project's env file, then parse again so flags with an `env`
/// fallback (`--settings`, `--python`, `--project-dir`) see its values
fn with_project_env(cli: Cli) -> Result<Cli> {
    let Some(project) = cli.command.project() else {
        return Ok(cli);
    };
    let loaded = config::load_env_file(&project.project_dir, project.env_file.as_deref())?;
    Ok(if loaded.is_some() { Cli::parse() } else { cli })
}

fn dispatch(ctx: &Context, command: Command) -> Result<ExitCode> {
    log::debug!("verbosity {}", ctx.verbose);
    match command {
        Command::Run(args) => commands::run::run(ctx, args),
        Command::CheckEnv(args) => commands::check_env::run(ctx, args),
        Command::Plan(args) => commands::plan::run(ctx, args),
        Command::SecretKey { bytes } => commands::secret_key::run(bytes),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "rmb-deploy", &mut io::stdout());
            Ok(ExitCode::SUCCESS)
        }
    }
}
