use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Variables that must be non-empty before anything touches the deployment
pub const REQUIRED_VARS: [&str; 5] = [
    "SECRET_KEY",
    "DATABASE_URL",
    "DESCOPE_PROJECT_ID",
    "DESCOPE_MANAGEMENT_KEY",
    "ALLOWED_HOSTS",
];

pub const DEFAULT_PYTHON: &str = "python";
pub const DEFAULT_MANAGE_SCRIPT: &str = "manage.py";
pub const DEFAULT_SETTINGS_MODULE: &str = "repairmybike.settings";

/// Deploy config file looked up in the project directory
pub const CONFIG_FILE: &str = "deploy.toml";

/// Environment file looked up in the project directory
pub const ENV_FILE: &str = ".env";

/// Expand `~` in a user-supplied path
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&raw).as_ref())
}

// ============================================================================
// File config (deploy.toml)
// ============================================================================

/// Optional on-disk settings; every key may be omitted
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub python: Option<String>,
    pub manage_script: Option<String>,
    pub settings_module: Option<String>,
    pub required_vars: Option<Vec<String>>,
    pub superuser_check: Option<bool>,
}

impl FileConfig {
    /// Parse a deploy.toml file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid {} format", path.display()))
    }
}

/// Values supplied on the command line (or their env fallbacks)
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub python: Option<String>,
    pub settings_module: Option<String>,
    pub skip_superuser_check: bool,
}

// ============================================================================
// Resolved config
// ============================================================================

/// Immutable deployment configuration, resolved once at start-up
///
/// Precedence: command line / environment, then deploy.toml, then defaults.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub project_dir: PathBuf,
    pub python: String,
    pub manage_script: String,
    pub settings_module: String,
    pub required_vars: Vec<String>,
    pub superuser_check: bool,
}

impl DeployConfig {
    /// Resolve the config for `project_dir`
    pub fn resolve(project_dir: &Path, overrides: &ConfigOverrides) -> Result<Self> {
        let project_dir = expand_path(project_dir);
        if !project_dir.is_dir() {
            bail!("Project directory not found: {}", project_dir.display());
        }

        let file = match &overrides.config_path {
            Some(path) => FileConfig::load(&expand_path(path))?,
            None => {
                let default_path = project_dir.join(CONFIG_FILE);
                if default_path.exists() {
                    log::info!("Using {}", default_path.display());
                    FileConfig::load(&default_path)?
                } else {
                    FileConfig::default()
                }
            }
        };

        Ok(Self::merge(project_dir, file, overrides))
    }

    fn merge(project_dir: PathBuf, file: FileConfig, overrides: &ConfigOverrides) -> Self {
        let required_vars = file
            .required_vars
            .unwrap_or_else(|| REQUIRED_VARS.iter().map(ToString::to_string).collect());

        Self {
            project_dir,
            python: overrides
                .python
                .clone()
                .or(file.python)
                .unwrap_or_else(|| DEFAULT_PYTHON.to_string()),
            manage_script: file
                .manage_script
                .unwrap_or_else(|| DEFAULT_MANAGE_SCRIPT.to_string()),
            settings_module: overrides
                .settings_module
                .clone()
                .or(file.settings_module)
                .unwrap_or_else(|| DEFAULT_SETTINGS_MODULE.to_string()),
            required_vars,
            superuser_check: !overrides.skip_superuser_check
                && file.superuser_check.unwrap_or(true),
        }
    }

    /// Path to the management script
    pub fn manage_path(&self) -> PathBuf {
        self.project_dir.join(&self.manage_script)
    }
}

// ============================================================================
// .env loading
// ============================================================================

/// Load environment variables from `explicit`, or `<project_dir>/.env` if present
///
/// Values already in the environment are never overridden. Returns the file
/// that was loaded, if any.
pub fn load_env_file(project_dir: &Path, explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    let path = match explicit {
        Some(path) => expand_path(path),
        None => {
            let default_path = expand_path(project_dir).join(ENV_FILE);
            if !default_path.exists() {
                return Ok(None);
            }
            default_path
        }
    };

    dotenvy::from_path(&path).with_context(|| format!("Could not load {}", path.display()))?;
    log::info!("Loaded environment from {}", path.display());
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_config_file() {
        let dir = TempDir::new().unwrap();
        let config = DeployConfig::resolve(dir.path(), &ConfigOverrides::default()).unwrap();

        assert_eq!(config.python, "python");
        assert_eq!(config.manage_script, "manage.py");
        assert_eq!(config.settings_module, "repairmybike.settings");
        assert_eq!(config.required_vars, REQUIRED_VARS);
        assert!(config.superuser_check);
        assert_eq!(config.manage_path(), dir.path().join("manage.py"));
    }

    #[test]
    fn test_project_file_is_picked_up() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            CONFIG_FILE,
            r#"
python = "python3.12"
settings_module = "repairmybike.settings.production"
required_vars = ["SECRET_KEY"]
superuser_check = false
"#,
        );

        let config = DeployConfig::resolve(dir.path(), &ConfigOverrides::default()).unwrap();
        assert_eq!(config.python, "python3.12");
        assert_eq!(config.settings_module, "repairmybike.settings.production");
        assert_eq!(config.required_vars, ["SECRET_KEY"]);
        assert!(!config.superuser_check);
    }

    #[test]
    fn test_overrides_beat_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, CONFIG_FILE, "python = \"python3.11\"\n");

        let overrides = ConfigOverrides {
            python: Some("/opt/venv/bin/python".into()),
            settings_module: Some("custom.settings".into()),
            skip_superuser_check: true,
            ..Default::default()
        };
        let config = DeployConfig::resolve(dir.path(), &overrides).unwrap();

        assert_eq!(config.python, "/opt/venv/bin/python");
        assert_eq!(config.settings_module, "custom.settings");
        assert!(!config.superuser_check);
    }

    #[test]
    fn test_explicit_config_path() {
        let project = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let path = write(&elsewhere, "prod.toml", "manage_script = \"src/manage.py\"\n");

        let overrides = ConfigOverrides {
            config_path: Some(path),
            ..Default::default()
        };
        let config = DeployConfig::resolve(project.path(), &overrides).unwrap();
        assert_eq!(config.manage_path(), project.path().join("src/manage.py"));
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let dir = TempDir::new().unwrap();
        let overrides = ConfigOverrides {
            config_path: Some(dir.path().join("nope.toml")),
            ..Default::default()
        };
        let err = DeployConfig::resolve(dir.path(), &overrides).unwrap_err();
        assert!(format!("{err:#}").contains("Could not read"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let dir = TempDir::new().unwrap();
        write(&dir, CONFIG_FILE, "pyhton = \"typo\"\n");

        let err = DeployConfig::resolve(dir.path(), &ConfigOverrides::default()).unwrap_err();
        assert!(format!("{err:#}").contains("unknown field"));
    }

    #[test]
    fn test_missing_project_dir_is_error() {
        let dir = TempDir::new().unwrap();
        let err =
            DeployConfig::resolve(&dir.path().join("gone"), &ConfigOverrides::default())
                .unwrap_err();
        assert!(err.to_string().contains("Project directory not found"));
    }

    #[test]
    fn test_env_file_absent_is_fine() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load_env_file(dir.path(), None).unwrap(), None);
    }

    #[test]
    fn test_explicit_env_file_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("prod.env");
        assert!(load_env_file(dir.path(), Some(&missing)).is_err());
    }

    #[test]
    fn test_env_file_is_loaded() {
        let dir = TempDir::new().unwrap();
        write(&dir, ENV_FILE, "RMB_CONFIG_TEST_ONLY_VAR=loaded\n");

        let loaded = load_env_file(dir.path(), None).unwrap();
        assert_eq!(loaded, Some(dir.path().join(ENV_FILE)));
        assert_eq!(
            std::env::var("RMB_CONFIG_TEST_ONLY_VAR").as_deref(),
            Ok("loaded")
        );
    }
}
