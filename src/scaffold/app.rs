use tracing::info;

use super::{patch_optional, ScaffoldReport};
use crate::models::validate_app_name;
use crate::patch::PatchRule;
use crate::project::ProjectContext;
use crate::Result;

pub const INSTALLED_APPS_MARKER: &str = "INSTALLED_APPS = [";

/// Rule adding `'<app>',` to INSTALLED_APPS unless the label is quoted anywhere already
pub fn installed_app_rule(app: &str) -> PatchRule {
    PatchRule::insert_after(INSTALLED_APPS_MARKER, &format!("    '{}',", app))
        .unless_present(&format!("'{}'", app))
        .unless_present(&format!("\"{}\"", app))
}

/// Register an app in settings.py.
pub fn register_app(ctx: &ProjectContext, app: &str) -> Result<ScaffoldReport> {
    validate_app_name(app)?;
    let mut report = ScaffoldReport::new();
    patch_optional(&mut report, ctx, &ctx.settings_path, &[installed_app_rule(app)])?;
    if !report.updated.is_empty() {
        info!("Registered '{}' in INSTALLED_APPS", app);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::test_helpers::TestProject;

    #[test]
    fn test_register_app_once() {
        let project = TestProject::django("school").unwrap();
        let ctx = project.context();

        let first = register_app(&ctx, "blog").unwrap();
        assert_eq!(first.updated, vec!["school/settings.py"]);
        let settings = project.read("school/settings.py");
        assert!(settings.contains("INSTALLED_APPS = [\n    'blog',\n    'django.contrib.admin',"));

        let second = register_app(&ctx, "blog").unwrap();
        assert!(second.updated.is_empty());
        assert_eq!(project.read("school/settings.py"), settings);
    }

    #[test]
    fn test_register_app_respects_double_quotes() {
        let project = TestProject::django("school").unwrap();
        project
            .add_file("school/settings.py", "INSTALLED_APPS = [\n    \"blog\",\n]\n")
            .unwrap();
        let report = register_app(&project.context(), "blog").unwrap();
        assert!(report.updated.is_empty());
    }

    #[test]
    fn test_register_app_rejects_invalid_label() {
        let project = TestProject::django("school").unwrap();
        assert!(register_app(&project.context(), "Blog-App").is_err());
    }
}
