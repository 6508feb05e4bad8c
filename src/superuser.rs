//! Superuser existence check
//!
//! Read-only: asks the framework whether any superuser account exists and
//! never creates one. The answer only ever produces a warning.

use anyhow::{Context, Result};
use batchrun::{Completion, ExternalCommand, InProcessCheck};
use thiserror::Error;

use crate::config::DeployConfig;

pub const LABEL: &str = "Superuser check";
pub const NO_SUPERUSER: &str = "No superuser found. Create one manually after deployment.";
pub const SUPERUSER_EXISTS: &str = "Superuser already exists";

/// One-liner evaluated by the management shell; prints `True` or `False`
const PROBE_SNIPPET: &str = "from django.contrib.auth import get_user_model; \
print(get_user_model().objects.filter(is_superuser=True).exists())";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error("management shell printed nothing")]
    EmptyOutput,

    #[error("unexpected management shell output: {0}")]
    Unexpected(String),
}

/// Something that can tell whether a superuser exists
pub trait SuperuserProbe {
    fn superuser_exists(&self) -> Result<bool>;
}

/// Probe that asks the framework's management shell
#[derive(Debug, Clone)]
pub struct ManagementShellProbe {
    command: ExternalCommand,
}

impl ManagementShellProbe {
    pub fn new(config: &DeployConfig) -> Self {
        let command = ExternalCommand::new(&config.python)
            .args([config.manage_script.as_str(), "shell", "-c", PROBE_SNIPPET])
            .env("DJANGO_SETTINGS_MODULE", &config.settings_module)
            .current_dir(&config.project_dir);
        Self { command }
    }
}

impl SuperuserProbe for ManagementShellProbe {
    fn superuser_exists(&self) -> Result<bool> {
        let stdout = self.command.run_capture()?;
        Ok(parse_probe_output(&stdout)?)
    }
}

/// Interpret the last non-empty line printed by the management shell
pub fn parse_probe_output(stdout: &str) -> Result<bool, ProbeError> {
    let last = stdout
        .lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())
        .ok_or(ProbeError::EmptyOutput)?;

    match last {
        "True" => Ok(true),
        "False" => Ok(false),
        other => Err(ProbeError::Unexpected(other.to_string())),
    }
}

/// Wrap a probe as an in-process check that degrades to warnings
pub fn superuser_check<P: SuperuserProbe + 'static>(probe: P) -> InProcessCheck {
    InProcessCheck::new("Checking for superuser", move || {
        let exists = probe
            .superuser_exists()
            .context("Could not check superuser status")?;
        if exists {
            Ok(Completion::done(SUPERUSER_EXISTS))
        } else {
            Ok(Completion::warned(NO_SUPERUSER))
        }
    })
}
