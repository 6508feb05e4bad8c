//! Preflight gate: required environment values
//!
//! The preflight is the only point where a run short-circuits. It never
//! mutates the environment it reads.

use std::collections::HashMap;
use std::fmt;

/// Source of environment values
pub trait EnvSource {
    /// Look up a value by name
    fn get(&self, key: &str) -> Option<String>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl EnvSource for HashMap<&str, &str> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).map(|v| (*v).to_string())
    }
}

/// Names of required values that were absent or empty, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingVars(pub Vec<String>);

impl MissingVars {
    /// The missing names
    pub fn names(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for MissingVars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Missing environment variables: {}", self.0.join(", "))
    }
}

impl std::error::Error for MissingVars {}

/// Ordered, immutable set of required variable names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preflight {
    required: Vec<String>,
}

impl Preflight {
    /// Build a preflight from the required names
    pub fn new<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: required.into_iter().map(Into::into).collect(),
        }
    }

    /// Required names, in order
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Check every required name against `env`
    ///
    /// A value that is absent, empty or whitespace-only counts as missing.
    pub fn check<E: EnvSource + ?Sized>(&self, env: &E) -> Result<(), MissingVars> {
        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|name| env.get(name).is_none_or(|v| v.trim().is_empty()))
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(MissingVars(missing))
        }
    }
}
