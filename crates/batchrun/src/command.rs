//! External command operation
//!
//! Runs a single program to completion with stdout/stderr captured. A
//! non-zero exit becomes an [`Error::CommandFailed`] carrying the trimmed
//! stderr; a missing binary becomes [`Error::Spawn`].

use crate::error::Error;
use crate::operation::Operation;
use crate::types::{CommandOutput, Completion};
use anyhow::Result;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Operation backed by a blocking child process
#[derive(Debug, Clone)]
pub struct ExternalCommand {
    program: String,
    args: Vec<String>,
    envs: Vec<(String, OsString)>,
    current_dir: Option<PathBuf>,
    description: Option<String>,
}

impl ExternalCommand {
    /// Command running `program` with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            current_dir: None,
            description: None,
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child only
    pub fn env(mut self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Run the child in `dir`
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Narration shown while the command runs (defaults to the command line)
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Rendered command line, e.g. `python manage.py migrate`
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }

    /// Run the command and capture its output, whatever the exit status
    pub fn output(&self) -> crate::Result<CommandOutput> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }

        log::debug!("spawning: {}", self.display());
        let output = cmd.output().map_err(|source| Error::Spawn {
            command: self.display(),
            source,
        })?;
        Ok(output.into())
    }

    /// Run the command, turning a non-zero exit into an error
    pub fn run_capture(&self) -> crate::Result<String> {
        let output = self.output()?;
        if output.success {
            log::debug!("`{}` succeeded", self.display());
            return Ok(output.stdout_str().trim().to_string());
        }

        let stderr = output.stderr_str().trim().to_string();
        log::info!("`{}` failed: {}", self.display(), stderr);
        match output.code {
            Some(code) => Err(Error::CommandFailed {
                command: self.display(),
                code,
                stderr,
            }),
            None => Err(Error::Terminated {
                command: self.display(),
            }),
        }
    }
}

impl Operation for ExternalCommand {
    fn description(&self) -> String {
        self.description.clone().unwrap_or_else(|| self.display())
    }

    fn command_line(&self) -> Option<String> {
        Some(self.display())
    }

    fn execute(&self) -> Result<Completion> {
        let stdout = self.run_capture()?;
        Ok(Completion::Done { output: stdout })
    }
}
