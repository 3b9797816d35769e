//! Generation operations.
//!
//! Each operation takes the resolved [`ProjectContext`] plus answers collected
//! beforehand, writes or patches project files and returns a [`ScaffoldReport`]
//! listing what happened. None of them prompt.

pub mod app;
pub mod auth;
pub mod clean;
pub mod crud;
pub mod deploy;
pub mod entity;
pub mod extras;
pub mod manifest;
pub mod media;

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::patch::PatchRule;
use crate::project::ProjectContext;
use crate::templates::write_template_file;
use crate::{GenError, Result};

pub use app::register_app;
pub use clean::deep_clean;
pub use crud::{generate_form, generate_pages, generate_urls, generate_views};
pub use entity::{add_fields, create_entity, entity_exists};
pub use media::ensure_media_config;

/// Files touched by an operation, relative to the project root
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScaffoldReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub skipped: Vec<String>,
    pub warnings: Vec<String>,
}

impl ScaffoldReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, other: ScaffoldReport) {
        self.created.extend(other.created);
        self.updated.extend(other.updated);
        self.skipped.extend(other.skipped);
        self.warnings.extend(other.warnings);
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.skipped.is_empty() && self.warnings.is_empty()
    }

    pub fn touched(&self, path: &str) -> bool {
        self.created.iter().chain(self.updated.iter()).any(|p| p == path)
    }

    fn record_created(&mut self, ctx: &ProjectContext, path: &Path) {
        self.created.push(ctx.display_path(path));
    }

    fn record_skipped(&mut self, ctx: &ProjectContext, path: &Path, reason: &str) {
        self.skipped.push(format!("{} ({})", ctx.display_path(path), reason));
    }

    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }
}

/// Patch a file that must exist; soft misses become report warnings.
fn patch_into(report: &mut ScaffoldReport, ctx: &ProjectContext, path: &Path, rules: &[PatchRule]) -> Result<()> {
    let patch = ctx.patch_file(path, rules)?;
    let display = ctx.display_path(path);
    if patch.changed && !report.touched(&display) {
        report.updated.push(display.clone());
    }
    for miss in patch.soft_misses {
        report.warn(format!("{}: marker not found for {}", display, miss));
    }
    Ok(())
}

/// Like [`patch_into`] but a missing file only skips the step.
fn patch_optional(report: &mut ScaffoldReport, ctx: &ProjectContext, path: &Path, rules: &[PatchRule]) -> Result<()> {
    match patch_into(report, ctx, path, rules) {
        Err(GenError::MissingPrerequisite(missing)) => {
            report.record_skipped(ctx, &missing, "file not found");
            warn!("Skipping {}: file not found", missing.display());
            Ok(())
        }
        other => other,
    }
}

/// Create `path` with `content`, or patch it with `rules` when it already exists.
fn create_or_patch(
    report: &mut ScaffoldReport,
    ctx: &ProjectContext,
    path: &Path,
    content: &str,
    rules: &[PatchRule],
) -> Result<()> {
    if path.exists() {
        patch_into(report, ctx, path, rules)
    } else {
        write_template_file(path, content)?;
        info!("Created {}", ctx.display_path(path));
        report.record_created(ctx, path);
        Ok(())
    }
}

/// Write a generated file; an existing file is kept unless `force` is set.
fn write_generated(
    report: &mut ScaffoldReport,
    ctx: &ProjectContext,
    path: &Path,
    content: &str,
    force: bool,
) -> Result<()> {
    let existed = path.exists();
    if existed && !force {
        report.record_skipped(ctx, path, "already exists");
        return Ok(());
    }
    write_template_file(path, content)?;
    if existed {
        report.updated.push(ctx.display_path(path));
    } else {
        report.record_created(ctx, path);
    }
    Ok(())
}

/// Overwrite a file, recording whether it was new
fn overwrite(report: &mut ScaffoldReport, ctx: &ProjectContext, path: &Path, content: &str) -> Result<()> {
    write_generated(report, ctx, path, content, true)
}

/// Empty package marker, created only when missing
fn ensure_package(report: &mut ScaffoldReport, ctx: &ProjectContext, dir: &Path) -> Result<PathBuf> {
    let init = dir.join("__init__.py");
    if !init.exists() {
        write_template_file(&init, "")?;
        report.record_created(ctx, &init);
    }
    Ok(init)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::test_helpers::TestProject;

    #[test]
    fn test_patch_optional_skips_missing_file() {
        let project = TestProject::new().unwrap();
        let ctx = project.context();
        let mut report = ScaffoldReport::new();
        patch_optional(&mut report, &ctx, &ctx.settings_path, &[PatchRule::append("X = 1")]).unwrap();
        assert_eq!(report.skipped, vec!["mysite/settings.py (file not found)"]);
        assert!(report.updated.is_empty());
    }

    #[test]
    fn test_write_generated_respects_force() {
        let project = TestProject::new().unwrap();
        let ctx = project.context();
        let path = ctx.root.join("page.html");
        let mut report = ScaffoldReport::new();

        write_generated(&mut report, &ctx, &path, "one", false).unwrap();
        write_generated(&mut report, &ctx, &path, "two", false).unwrap();
        assert_eq!(project.read("page.html"), "one");
        write_generated(&mut report, &ctx, &path, "three", true).unwrap();
        assert_eq!(project.read("page.html"), "three");

        assert_eq!(report.created, vec!["page.html"]);
        assert_eq!(report.skipped, vec!["page.html (already exists)"]);
        assert_eq!(report.updated, vec!["page.html"]);
    }

    #[test]
    fn test_merge() {
        let mut a = ScaffoldReport::new();
        a.created.push("a".into());
        let mut b = ScaffoldReport::new();
        b.warnings.push("w".into());
        a.merge(b);
        assert_eq!(a.created.len(), 1);
        assert_eq!(a.warnings.len(), 1);
        assert!(!a.is_empty());
    }
}
