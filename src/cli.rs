use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::ConfigOverrides;

#[derive(Parser)]
#[command(name = "rmb-deploy")]
#[command(author = "RepairMyBike Team")]
#[command(version)]
#[command(about = "Production deployment orchestrator for the RepairMyBike backend", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full deployment: env check, static files, migrations, security checks
    Run(RunArgs),

    /// Only verify that the required environment variables are set
    CheckEnv(ProjectArgs),

    /// Show the deployment tasks without running them
    Plan(ProjectArgs),

    /// Generate a new value for SECRET_KEY
    SecretKey {
        /// Bytes of entropy in the generated key
        #[arg(short, long, default_value_t = crate::secret::DEFAULT_ENTROPY_BYTES,
              value_parser = clap::value_parser!(u16).range(16..=512))]
        bytes: u16,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Command {
    /// Project arguments of the subcommands that operate on a backend checkout
    pub fn project(&self) -> Option<&ProjectArgs> {
        match self {
            Self::Run(args) => Some(&args.project),
            Self::CheckEnv(args) | Self::Plan(args) => Some(args),
            Self::SecretKey { .. } | Self::Completions { .. } => None,
        }
    }
}

// ============================================================================
// Shared project arguments
// ============================================================================

#[derive(Args, Clone, Debug)]
pub struct ProjectArgs {
    /// Backend project directory (where manage.py lives)
    #[arg(short = 'C', long, env = "RMB_PROJECT_DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Deploy config file (defaults to <project-dir>/deploy.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Load environment variables from this file (defaults to <project-dir>/.env when present)
    #[arg(short, long)]
    pub env_file: Option<PathBuf>,

    /// Python interpreter used to invoke manage.py
    #[arg(long, env = "RMB_DEPLOY_PYTHON")]
    pub python: Option<String>,

    /// Framework settings module passed to every management command
    #[arg(long, env = "DJANGO_SETTINGS_MODULE")]
    pub settings: Option<String>,
}

impl ProjectArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.config.clone(),
            python: self.python.clone(),
            settings_module: self.settings.clone(),
            skip_superuser_check: false,
        }
    }
}

// ============================================================================
// Run
// ============================================================================

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Do not query the database for a superuser after the tasks
    #[arg(long)]
    pub skip_superuser_check: bool,

    /// Print the run report as JSON instead of narrating progress
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            skip_superuser_check: self.skip_superuser_check,
            ..self.project.overrides()
        }
    }
}
