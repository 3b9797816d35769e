use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "djangogen.toml";

/// Main configuration structure for djangogen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub project: ProjectConfig,
    pub runtime: RuntimeConfig,
    pub logging: LoggingConfig,
}

/// Where the Django project lives and which executables drive it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub root: PathBuf,
    /// Python package holding settings.py; detected when unset
    pub name: Option<String>,
    pub settings_module: Option<PathBuf>,
    pub urls_module: Option<PathBuf>,
    pub python: String,
    pub django_admin: String,
}

/// Runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Answer every prompt with its default
    pub assume_yes: bool,
    pub verbose: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub target: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            name: None,
            settings_module: None,
            urls_module: None,
            python: "python".to_string(),
            django_admin: "django-admin".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(), // pretty, json, compact
            target: "stderr".to_string(), // stdout, stderr
        }
    }
}

impl Config {
    /// Load configuration from multiple sources with precedence:
    /// 1. djangogen.toml file (if exists)
    /// 2. Environment variables (DJANGOGEN_*)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_dir(&std::env::current_dir()?)
    }

    /// Load configuration from a specific project directory
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        let config_file = dir.join(CONFIG_FILE);
        if config_file.exists() {
            builder = builder.add_source(File::from(config_file));
        }

        // DJANGOGEN_PROJECT__PYTHON=python3, DJANGOGEN_RUNTIME__ASSUME_YES=true
        builder = builder.add_source(
            Environment::with_prefix("DJANGOGEN")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .context("Failed to build configuration")?;

        let mut result: Config = config
            .try_deserialize()
            .context("Failed to read configuration")?;

        // A relative root in the file is relative to the directory it was found in
        if result.project.root.is_relative() {
            result.project.root = dir.join(&result.project.root);
        }

        result.merge_env_vars();

        Ok(result)
    }

    /// Create a new Config for testing
    #[cfg(test)]
    pub fn for_testing(root: &Path) -> Self {
        Self {
            project: ProjectConfig {
                root: root.to_path_buf(),
                name: Some("mysite".to_string()),
                ..ProjectConfig::default()
            },
            runtime: RuntimeConfig {
                assume_yes: true,
                verbose: true,
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
                ..LoggingConfig::default()
            },
        }
    }

    /// Merge well-known environment variables that predate the DJANGOGEN_ scheme
    fn merge_env_vars(&mut self) {
        if self.project.name.is_none() {
            if let Ok(module) = std::env::var("DJANGO_SETTINGS_MODULE") {
                if let Some(package) = module.split('.').next().filter(|p| !p.is_empty()) {
                    self.project.name = Some(package.to_string());
                }
            }
        }
        if std::env::var("DJANGOGEN_YES").is_ok() {
            self.runtime.assume_yes = true;
        }
        if std::env::var("DJANGOGEN_VERBOSE").is_ok() {
            self.runtime.verbose = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs::write;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Environment is process-global; tests touching it run one at a time
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    // Helper to create isolated environment for testing
    fn with_isolated_env<T>(f: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let keys = [
            "DJANGO_SETTINGS_MODULE",
            "DJANGOGEN_YES",
            "DJANGOGEN_VERBOSE",
            "DJANGOGEN_PROJECT__NAME",
            "DJANGOGEN_PROJECT__PYTHON",
            "DJANGOGEN_RUNTIME__ASSUME_YES",
            "DJANGOGEN_LOGGING__LEVEL",
        ];
        let saved: Vec<(&str, Option<String>)> =
            keys.iter().map(|k| (*k, env::var(k).ok())).collect();

        unsafe {
            for key in keys {
                env::remove_var(key);
            }
        }

        let result = f();

        unsafe {
            for (key, value) in saved {
                match value {
                    Some(val) => env::set_var(key, val),
                    None => env::remove_var(key),
                }
            }
        }

        result
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();

        assert_eq!(config.project.root, PathBuf::from("."));
        assert_eq!(config.project.name, None);
        assert_eq!(config.project.python, "python");
        assert_eq!(config.project.django_admin, "django-admin");
        assert!(!config.runtime.assume_yes);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.target, "stderr");
    }

    #[test]
    fn test_config_for_testing() {
        let config = Config::for_testing(Path::new("/tmp/site"));

        assert_eq!(config.project.root, PathBuf::from("/tmp/site"));
        assert_eq!(config.project.name.as_deref(), Some("mysite"));
        assert!(config.runtime.assume_yes);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_from_toml_file() -> Result<()> {
        with_isolated_env(|| -> Result<()> {
            let temp_dir = TempDir::new()?;
            write(
                temp_dir.path().join(CONFIG_FILE),
                r#"
[project]
name = "school"
python = "python3"
settings_module = "school/settings/base.py"

[runtime]
assume_yes = true

[logging]
level = "debug"
format = "json"
"#,
            )?;

            let config = Config::load_from_dir(temp_dir.path())?;

            assert_eq!(config.project.name.as_deref(), Some("school"));
            assert_eq!(config.project.python, "python3");
            assert_eq!(
                config.project.settings_module,
                Some(PathBuf::from("school/settings/base.py"))
            );
            assert_eq!(config.project.django_admin, "django-admin");
            assert!(config.runtime.assume_yes);
            assert_eq!(config.logging.format, "json");
            assert_eq!(config.logging.target, "stderr");

            Ok(())
        })
    }

    #[test]
    fn test_precedence_env_over_file() -> Result<()> {
        with_isolated_env(|| -> Result<()> {
            let temp_dir = TempDir::new()?;
            write(
                temp_dir.path().join(CONFIG_FILE),
                "[project]\nname = \"filename\"\npython = \"python3\"\n",
            )?;

            unsafe {
                env::set_var("DJANGOGEN_PROJECT__NAME", "envname");
            }

            let config = Config::load_from_dir(temp_dir.path())?;

            assert_eq!(config.project.name.as_deref(), Some("envname"));
            assert_eq!(config.project.python, "python3");

            Ok(())
        })
    }

    #[test]
    fn test_settings_module_env_fills_project_name() -> Result<()> {
        with_isolated_env(|| -> Result<()> {
            let temp_dir = TempDir::new()?;

            unsafe {
                env::set_var("DJANGO_SETTINGS_MODULE", "gradebook.settings");
                env::set_var("DJANGOGEN_YES", "1");
            }

            let config = Config::load_from_dir(temp_dir.path())?;

            assert_eq!(config.project.name.as_deref(), Some("gradebook"));
            assert!(config.runtime.assume_yes);
            assert_eq!(config.project.root, temp_dir.path().join("."));

            Ok(())
        })
    }
}
