//! Deployment descriptors and production settings.

use std::fmt;
use std::str::FromStr;

use super::{patch_optional, write_generated, ScaffoldReport};
use crate::patch::PatchRule;
use crate::project::ProjectContext;
use crate::templates::deploy::{
    procfile, RenderBlueprint, ALLOWED_HOSTS_FROM_ENV, DEBUG_FROM_ENV, SECRET_KEY_FROM_ENV, STATIC_ROOT,
};
use crate::{GenError, Result};

pub const PYTHON_RUNTIME: &str = "python-3.11.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Render,
    Heroku,
}

impl FromStr for Platform {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "render" => Ok(Platform::Render),
            "heroku" => Ok(Platform::Heroku),
            other => Err(GenError::Validation(format!(
                "unknown platform '{}' (expected render or heroku)",
                other
            ))),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Render => f.write_str("render"),
            Platform::Heroku => f.write_str("heroku"),
        }
    }
}

/// settings.py edits reading DEBUG, ALLOWED_HOSTS and SECRET_KEY from the environment
pub fn production_settings_rules() -> Vec<PatchRule> {
    vec![
        PatchRule::prepend("import os").unless_line_starts_with("import os"),
        PatchRule::replace("DEBUG = True", DEBUG_FROM_ENV).unless_line_starts_with("DEBUG = os.environ"),
        PatchRule::replace("ALLOWED_HOSTS = []", ALLOWED_HOSTS_FROM_ENV)
            .unless_line_starts_with("ALLOWED_HOSTS = [h for h in os.environ"),
        PatchRule::replace("SECRET_KEY = '", SECRET_KEY_FROM_ENV).unless_present("os.environ.get('SECRET_KEY')"),
        PatchRule::setting("STATIC_ROOT", STATIC_ROOT),
    ]
}

/// Write the platform descriptors and switch settings.py to environment-driven values.
///
/// Existing descriptors are kept unless `force` is set.
pub fn configure(ctx: &ProjectContext, platform: Platform, force: bool) -> Result<ScaffoldReport> {
    let mut report = ScaffoldReport::new();

    write_generated(&mut report, ctx, &ctx.root.join("Procfile"), &procfile(&ctx.project_name), force)?;
    match platform {
        Platform::Render => {
            let blueprint = RenderBlueprint::for_project(&ctx.project_name).to_yaml()?;
            write_generated(&mut report, ctx, &ctx.root.join("render.yaml"), &blueprint, force)?;
        }
        Platform::Heroku => {
            write_generated(
                &mut report,
                ctx,
                &ctx.root.join("runtime.txt"),
                &format!("{}\n", PYTHON_RUNTIME),
                force,
            )?;
        }
    }

    patch_optional(&mut report, ctx, &ctx.settings_path, &production_settings_rules())?;

    let requirements = std::fs::read_to_string(ctx.root.join("requirements.txt")).unwrap_or_default();
    if !requirements.lines().any(|l| l.trim().to_lowercase().starts_with("gunicorn")) {
        report
            .warnings
            .push("gunicorn is not listed in requirements.txt; the Procfile needs it".to_string());
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::test_helpers::TestProject;

    #[test]
    fn test_platform_parse() {
        assert_eq!("Render".parse::<Platform>().unwrap(), Platform::Render);
        assert_eq!("heroku".parse::<Platform>().unwrap(), Platform::Heroku);
        assert!("fly".parse::<Platform>().is_err());
    }

    #[test]
    fn test_configure_render() {
        let project = TestProject::django("school").unwrap();
        let ctx = project.context();

        let report = configure(&ctx, Platform::Render, false).unwrap();
        assert_eq!(report.created, vec!["Procfile", "render.yaml"]);
        assert_eq!(report.updated, vec!["school/settings.py"]);
        assert_eq!(report.warnings.len(), 1);

        assert!(project.read("Procfile").starts_with("web: gunicorn school.wsgi"));
        assert!(project.read("render.yaml").contains("generateValue: true"));

        let settings = project.read("school/settings.py");
        assert!(settings.starts_with("import os\n"));
        assert!(settings.contains(DEBUG_FROM_ENV));
        assert!(settings.contains(ALLOWED_HOSTS_FROM_ENV));
        assert!(settings.contains("SECRET_KEY = os.environ.get('SECRET_KEY') or 'django-insecure-test'"));
        assert!(settings.ends_with("STATIC_ROOT = BASE_DIR / 'staticfiles'\n"));

        project.add_file("requirements.txt", "Django==5.0\ngunicorn==21.2.0\n").unwrap();
        let again = configure(&ctx, Platform::Render, false).unwrap();
        assert_eq!(again.skipped.len(), 2);
        assert!(again.updated.is_empty());
        assert!(again.warnings.is_empty());
        assert_eq!(project.read("school/settings.py"), settings);
    }

    #[test]
    fn test_configure_heroku_writes_runtime() {
        let project = TestProject::django("school").unwrap();
        let report = configure(&project.context(), Platform::Heroku, false).unwrap();
        assert_eq!(report.created, vec!["Procfile", "runtime.txt"]);
        assert_eq!(project.read("runtime.txt"), "python-3.11.0\n");
    }
}
