//! Resolved view of the Django project a command operates on.
//!
//! Everything environment-derived (root directory, project package, settings
//! and url modules, executables) is resolved once into [`ProjectContext`] and
//! passed explicitly to every generator.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::ProjectConfig;
use crate::patch::{apply_rules, PatchRule};
use crate::{GenError, Result};

pub const FALLBACK_PROJECT_NAME: &str = "mysite";

#[derive(Debug, Clone, Serialize)]
pub struct ProjectContext {
    pub root: PathBuf,
    pub project_name: String,
    pub settings_path: PathBuf,
    pub urls_path: PathBuf,
    pub python: String,
    pub django_admin: String,
}

/// Outcome of patching one file on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilePatch {
    pub path: PathBuf,
    pub changed: bool,
    pub soft_misses: Vec<String>,
}

impl ProjectContext {
    pub fn resolve(config: &ProjectConfig) -> Self {
        let root = config.root.clone();
        let project_name = config
            .name
            .clone()
            .or_else(|| detect_project_name(&root))
            .unwrap_or_else(|| FALLBACK_PROJECT_NAME.to_string());

        let settings_path = config
            .settings_module
            .as_ref()
            .map(|p| root.join(p))
            .unwrap_or_else(|| root.join(&project_name).join("settings.py"));
        let urls_path = config
            .urls_module
            .as_ref()
            .map(|p| root.join(p))
            .unwrap_or_else(|| root.join(&project_name).join("urls.py"));

        debug!(
            "Resolved project '{}' at {} (settings: {})",
            project_name,
            root.display(),
            settings_path.display()
        );

        Self {
            root,
            project_name,
            settings_path,
            urls_path,
            python: config.python.clone(),
            django_admin: config.django_admin.clone(),
        }
    }

    pub fn has_manage_py(&self) -> bool {
        self.root.join("manage.py").exists()
    }

    pub fn app_dir(&self, app: &str) -> PathBuf {
        self.root.join(app)
    }

    pub fn app_exists(&self, app: &str) -> bool {
        self.app_dir(app).is_dir()
    }

    pub fn app_file(&self, app: &str, file: &str) -> PathBuf {
        self.app_dir(app).join(file)
    }

    /// `<app>/templates/<app>`, where the generated pages live
    pub fn app_templates_dir(&self, app: &str) -> PathBuf {
        self.app_dir(app).join("templates").join(app)
    }

    /// Path relative to the project root, for messages
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }

    /// Read a file that must exist for the current step.
    pub fn read(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(GenError::MissingPrerequisite(path.to_path_buf()));
        }
        Ok(fs::read_to_string(path)?)
    }

    /// Read the whole file, apply the rules in order and write it back only if
    /// something changed.
    pub fn patch_file(&self, path: &Path, rules: &[PatchRule]) -> Result<FilePatch> {
        let content = self.read(path)?;
        let batch = apply_rules(&content, rules);

        if batch.changed {
            fs::write(path, &batch.document)?;
            info!("Patched {}", self.display_path(path));
        } else {
            debug!("{} already up to date", self.display_path(path));
        }

        Ok(FilePatch {
            path: path.to_path_buf(),
            changed: batch.changed,
            soft_misses: batch.soft_misses,
        })
    }
}

/// First directory (in name order) holding a settings.py, when manage.py is present
fn detect_project_name(root: &Path) -> Option<String> {
    if !root.join("manage.py").exists() {
        return None;
    }
    let mut candidates: Vec<String> = fs::read_dir(root)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().join("settings.py").is_file())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

/// Project package name derived from a directory name (`my-site` -> `my_site`)
pub fn sanitize_project_name(dir_name: &str) -> String {
    dir_name.replace(['-', ' '], "_")
}
