mod common;

use common::DjangoTree;
use djangogen::prompt::{collect_auth_options, ScriptedPrompter};
use djangogen::routes;
use djangogen::scaffold::auth::generate_auth_app;
use djangogen::scaffold::deploy::{configure, Platform};
use djangogen::scaffold::manifest::write_manifest;
use djangogen::AuthOptions;
use std::path::Path;

#[test]
fn test_auth_app_routes() {
    let tree = DjangoTree::new("school").with_app("accounts");
    let ctx = tree.context();

    let mut prompter = ScriptedPrompter::new(["", "", "", "", "", "", ""]);
    let options = collect_auth_options(&mut prompter, "accounts").unwrap().unwrap();
    let report = generate_auth_app(&ctx, &options).unwrap();
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);

    let found = routes::collect(&ctx).unwrap();
    let login = found.iter().find(|r| r.name == "login").unwrap();
    assert_eq!(login.pattern, "login/");
    assert_eq!(login.methods, "GET, POST");
    let logout = found.iter().find(|r| r.name == "logout").unwrap();
    assert_eq!(logout.methods, "POST");
    let landing = found.iter().find(|r| r.name == "landing").unwrap();
    assert_eq!(landing.pattern, "");
    assert!(found.iter().any(|r| r.pattern == "admin/"));
    assert!(!found.iter().any(|r| r.name == "verify_otp"));
}

#[test]
fn test_auth_app_named_like_docstring_example_is_mounted() {
    for app in ["blog", "shop"] {
        let tree = DjangoTree::new("school").with_app(app);
        let ctx = tree.context();
        let mut options = AuthOptions::new(app);
        options.landing_page = false;

        generate_auth_app(&ctx, &options).unwrap();
        let root = tree.read("school/urls.py");
        assert!(root.contains("\nfrom django.urls import path, include\n"), "{}", root);
        assert!(
            root.contains(&format!("urlpatterns = [\n    path('{0}/', include('{0}.urls')),\n", app)),
            "{}",
            root
        );

        let found = routes::collect(&ctx).unwrap();
        assert!(found.iter().any(|r| r.pattern == format!("{}/login/", app)));
    }
}

#[test]
fn test_two_factor_behind_custom_admin() {
    let tree = DjangoTree::new("school").with_app("accounts");
    let ctx = tree.context();

    let mut prompter = ScriptedPrompter::new(["yes", "", "no", "no", "staff", "3", "yes"]);
    let options = collect_auth_options(&mut prompter, "accounts").unwrap().unwrap();
    generate_auth_app(&ctx, &options).unwrap();

    let found = routes::collect(&ctx).unwrap();
    assert!(found.iter().any(|r| r.pattern == "accounts/verify-otp/"));
    assert!(found.iter().any(|r| r.pattern == "staff/"));
    assert!(tree.read("accounts/signals.py").contains("Admin_Site"));
    assert!(tree.read("AUTH_GUIDE.md").contains("/accounts/login/"));
}

#[test]
fn test_deployment_after_auth_keeps_auth_settings() {
    let tree = DjangoTree::new("school").with_app("accounts");
    let ctx = tree.context();
    let options = collect_auth_options(&mut djangogen::prompt::DefaultsPrompter, "accounts")
        .unwrap()
        .unwrap();
    generate_auth_app(&ctx, &options).unwrap();

    write_manifest(&ctx, "gunicorn==21.2.0\nDjango==5.0.1\n", Path::new("requirements.txt")).unwrap();
    let report = configure(&ctx, Platform::Render, false).unwrap();
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);

    let settings = tree.read("school/settings.py");
    assert!(settings.starts_with("import os\n"));
    assert!(settings.contains("AUTH_USER_MODEL = 'accounts.CustomUser'"));
    assert!(settings.contains("SECRET_KEY = os.environ.get('SECRET_KEY') or 'django-insecure-abc'"));
    assert!(!settings.contains("DEBUG = True"));

    let blueprint: serde_yaml::Value = serde_yaml::from_str(&tree.read("render.yaml")).unwrap();
    assert_eq!(blueprint["services"][0]["name"].as_str(), Some("school"));
    assert_eq!(blueprint["services"][0]["startCommand"].as_str(), Some("gunicorn school.wsgi"));

    let forced = configure(&ctx, Platform::Render, true).unwrap();
    assert_eq!(forced.updated, vec!["Procfile", "render.yaml"]);
}
