//! Authentication app generation.

use tracing::info;
use uuid::Uuid;

use super::app::installed_app_rule;
use super::crud::root_include_rules;
use super::media::{media_settings_rules, media_urls_rules};
use super::{create_or_patch, overwrite, patch_optional, ScaffoldReport};
use crate::manage::Toolchain;
use crate::models::{validate_app_name, AuthOptions};
use crate::patch::PatchRule;
use crate::project::ProjectContext;
use crate::templates::auth::{
    bootstrap_script, guide, pages, ready_method, settings_entries, signals_module, urls_module, views_module,
    TestAccounts, FORMS_MODULE, MODELS_MODULE, SMTP_BLOCK, SMTP_MARKER,
};
use crate::Result;

pub const GUIDE_FILE: &str = "AUTH_GUIDE.md";

const ABSTRACT_USER_IMPORT: &str = "from django.contrib.auth.models import AbstractUser";

pub fn settings_rules(options: &AuthOptions) -> Vec<PatchRule> {
    let mut rules = vec![installed_app_rule(&options.app)];
    rules.extend(
        settings_entries(&options.app)
            .iter()
            .map(|(key, value)| PatchRule::setting(key, value)),
    );
    rules.push(PatchRule::append(SMTP_BLOCK).unless_present(SMTP_MARKER));
    rules.extend(media_settings_rules());
    rules
}

pub fn root_urls_rules(options: &AuthOptions) -> Vec<PatchRule> {
    let mut rules = root_include_rules(&options.app, &options.mount_prefix());
    if options.custom_admin() {
        rules.push(PatchRule::replace(
            "path('admin/', admin.site.urls)",
            &format!("path('{}/', admin.site.urls)", options.admin_url.trim_matches('/')),
        ));
    }
    rules.extend(media_urls_rules());
    rules
}

/// Custom user model appended to models.py unless already declared
fn models_rules() -> Vec<PatchRule> {
    let class_start = MODELS_MODULE.find("\n\n\nclass CustomUser").unwrap_or(0);
    vec![
        PatchRule::prepend(ABSTRACT_USER_IMPORT),
        PatchRule::append(&MODELS_MODULE[class_start..]).unless_line_starts_with("class CustomUser("),
    ]
}

fn apps_rules(app: &str) -> Vec<PatchRule> {
    vec![PatchRule::insert_after(&format!("name = '{}'", app), &ready_method(app)).unless_present("def ready(self):")]
}

/// Generate or update every file of the authentication app.
///
/// The app directory is expected to exist (created by `startapp`). Generated
/// modules (signals, forms, views, urls, pages) are rewritten from the options;
/// settings, models, apps.py and the project urls are patched.
pub fn generate_auth_app(ctx: &ProjectContext, options: &AuthOptions) -> Result<ScaffoldReport> {
    validate_app_name(&options.app)?;
    let app = options.app.as_str();
    let mut report = ScaffoldReport::new();

    patch_optional(&mut report, ctx, &ctx.settings_path, &settings_rules(options))?;

    create_or_patch(
        &mut report,
        ctx,
        &ctx.app_file(app, "models.py"),
        MODELS_MODULE,
        &models_rules(),
    )?;
    overwrite(&mut report, ctx, &ctx.app_file(app, "signals.py"), &signals_module(options))?;
    patch_optional(&mut report, ctx, &ctx.app_file(app, "apps.py"), &apps_rules(app))?;
    overwrite(&mut report, ctx, &ctx.app_file(app, "forms.py"), FORMS_MODULE)?;
    overwrite(&mut report, ctx, &ctx.app_file(app, "views.py"), &views_module(options))?;
    overwrite(&mut report, ctx, &ctx.app_file(app, "urls.py"), &urls_module(options))?;

    patch_optional(&mut report, ctx, &ctx.urls_path, &root_urls_rules(options))?;

    let templates = ctx.app_templates_dir(app);
    for (file, html) in pages(options, &ctx.project_name) {
        overwrite(&mut report, ctx, &templates.join(file), &html)?;
    }

    overwrite(
        &mut report,
        ctx,
        &ctx.root.join(GUIDE_FILE),
        &guide(options, &ctx.project_name),
    )?;

    info!(
        "Authentication app '{}' generated (default group {})",
        app, options.default_group
    );
    Ok(report)
}

/// Random passwords for the superuser and admin test accounts
pub fn test_accounts() -> TestAccounts {
    let password = || Uuid::new_v4().simple().to_string()[..16].to_string();
    TestAccounts {
        superuser_password: password(),
        admin_password: password(),
    }
}

/// Create the groups (and test users) through the project's Django shell.
pub async fn bootstrap(toolchain: &Toolchain, accounts: Option<&TestAccounts>) -> Result<()> {
    toolchain.shell(&bootstrap_script(accounts)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DefaultGroup;
    use crate::test_helpers::test_helpers::TestProject;

    fn project_with_accounts() -> TestProject {
        let project = TestProject::django("school").unwrap();
        project.add_app("accounts").unwrap();
        project
    }

    #[test]
    fn test_generate_auth_app_files() {
        let project = project_with_accounts();
        let ctx = project.context();
        let mut options = AuthOptions::new("accounts");
        options.default_group = DefaultGroup::Manager;

        let report = generate_auth_app(&ctx, &options).unwrap();
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        assert!(report.created.contains(&"accounts/signals.py".to_string()));
        assert!(report.created.contains(&"AUTH_GUIDE.md".to_string()));
        assert!(report.updated.contains(&"accounts/models.py".to_string()));

        let settings = project.read("school/settings.py");
        assert!(settings.contains("INSTALLED_APPS = [\n    'accounts',"));
        assert!(settings.contains("AUTH_USER_MODEL = 'accounts.CustomUser'\n"));
        assert!(settings.contains("LOGIN_URL = 'accounts:login'\n"));
        assert!(settings.contains("# SMTP settings"));

        let apps = project.read("accounts/apps.py");
        assert!(apps.contains("    name = 'accounts'\n\n    def ready(self):\n        import accounts.signals"));

        let models = project.read("accounts/models.py");
        assert!(models.starts_with(ABSTRACT_USER_IMPORT));
        assert!(models.contains("class CustomUser(AbstractUser):"));

        let root = project.read("school/urls.py");
        assert!(root.contains("    path('', include('accounts.urls')),"));
        assert!(root.contains("path('admin/', admin.site.urls)"));
        assert!(project.read("accounts/signals.py").contains("name='Manager'"));
        assert!(project.path("accounts/templates/accounts/landing.html").exists());
    }

    #[test]
    fn test_generate_auth_app_twice_keeps_patched_files() {
        let project = project_with_accounts();
        let ctx = project.context();
        let options = AuthOptions::new("accounts");

        generate_auth_app(&ctx, &options).unwrap();
        let settings = project.read("school/settings.py");
        let apps = project.read("accounts/apps.py");
        let models = project.read("accounts/models.py");
        let urls = project.read("school/urls.py");

        generate_auth_app(&ctx, &options).unwrap();
        assert_eq!(project.read("school/settings.py"), settings);
        assert_eq!(project.read("accounts/apps.py"), apps);
        assert_eq!(project.read("accounts/models.py"), models);
        assert_eq!(project.read("school/urls.py"), urls);
    }

    #[test]
    fn test_custom_admin_and_mount_point() {
        let project = project_with_accounts();
        let ctx = project.context();
        let mut options = AuthOptions::new("accounts");
        options.landing_page = false;
        options.admin_url = "backoffice".to_string();

        generate_auth_app(&ctx, &options).unwrap();
        let root = project.read("school/urls.py");
        assert!(root.contains("    path('accounts/', include('accounts.urls')),"));
        assert!(root.contains("path('backoffice/', admin.site.urls)"));
        assert!(!root.contains("path('admin/'"));
        assert!(!project.path("accounts/templates/accounts/landing.html").exists());
    }

    #[test]
    fn test_test_accounts_are_random() {
        let a = test_accounts();
        let b = test_accounts();
        assert_eq!(a.superuser_password.len(), 16);
        assert_ne!(a.superuser_password, b.superuser_password);
        assert_ne!(a.superuser_password, a.admin_password);
    }
}
