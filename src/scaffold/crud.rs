//! Form, views, url table and pages for one model.

use tracing::{debug, info};

use super::{create_or_patch, patch_optional, write_generated, ScaffoldReport};
use crate::models::EntityNames;
use crate::patch::{self, PatchRule};
use crate::project::ProjectContext;
use crate::templates::crud::{
    form_class, forms_module, include_line, models_import, pages, url_lines, url_presence,
    urls_module, view_classes, views_imports, views_module, FORMS_IMPORT, URLS_IMPORT, VIEWS_IMPORT,
};
use crate::Result;

pub const URLPATTERNS_MARKER: &str = "urlpatterns = [";

/// Prepend each import that is missing, keeping the given order at the top of the file
fn import_rules(imports: &[String]) -> Vec<PatchRule> {
    imports
        .iter()
        .rev()
        .map(|line| PatchRule::prepend(line).unless_line(line))
        .collect()
}

pub fn generate_form(ctx: &ProjectContext, app: &str, names: &EntityNames) -> Result<ScaffoldReport> {
    let path = ctx.app_file(app, "forms.py");
    let mut rules = import_rules(&[FORMS_IMPORT.to_string(), models_import(names)]);
    rules.push(
        PatchRule::append(&form_class(names)).unless_line_starts_with(&format!("class {}Form(", names.class)),
    );

    let mut report = ScaffoldReport::new();
    create_or_patch(&mut report, ctx, &path, &forms_module(names), &rules)?;
    info!("Form {}Form ready in {}", names.class, ctx.display_path(&path));
    Ok(report)
}

pub fn generate_views(ctx: &ProjectContext, app: &str, names: &EntityNames) -> Result<ScaffoldReport> {
    let path = ctx.app_file(app, "views.py");
    let mut rules = import_rules(&views_imports(names));
    rules.push(
        PatchRule::append(&view_classes(app, names))
            .unless_line_starts_with(&format!("class {}ListView(", names.class)),
    );

    let mut report = ScaffoldReport::new();
    create_or_patch(&mut report, ctx, &path, &views_module(app, names), &rules)?;
    Ok(report)
}

const URLS_IMPORT_PREFIX: &str = "from django.urls import";

/// Rules mounting `<app>.urls` in the project urls module under `prefix`.
///
/// Guards only match code lines, so the docstring `startproject` writes
/// (which quotes both the import and an `include` example) does not count.
pub fn root_include_rules(app: &str, prefix: &str) -> Vec<PatchRule> {
    let include = include_line(app, prefix);
    vec![
        PatchRule::replace("from django.urls import path", "from django.urls import path, include")
            .unless_line_with(URLS_IMPORT_PREFIX, "include"),
        PatchRule::insert_after(URLPATTERNS_MARKER, &include)
            .unless_line_starts_with(&format!("path('{}', include('{}.urls')", prefix, app)),
    ]
}

/// App url table with the five CRUD routes, mounted under `'<app>/'` in the project urls.
pub fn generate_urls(ctx: &ProjectContext, app: &str, names: &EntityNames) -> Result<ScaffoldReport> {
    let path = ctx.app_file(app, "urls.py");
    let mut rules = import_rules(&[URLS_IMPORT.to_string(), VIEWS_IMPORT.to_string()]);
    rules.push(
        PatchRule::insert_before("urlpatterns", &format!("app_name = '{}'\n", app))
            .unless_line_starts_with("app_name"),
    );
    rules.push(PatchRule::insert_after(URLPATTERNS_MARKER, &url_lines(names).join("\n")).unless_present(&url_presence(names)));

    let mut report = ScaffoldReport::new();
    create_or_patch(&mut report, ctx, &path, &urls_module(app, names), &rules)?;
    patch_optional(&mut report, ctx, &ctx.urls_path, &root_include_rules(app, &format!("{}/", app)))?;
    Ok(report)
}

/// Column names for the pages; empty when the model cannot be read.
fn page_fields(ctx: &ProjectContext, app: &str, names: &EntityNames) -> Vec<String> {
    ctx.read(&ctx.app_file(app, "models.py"))
        .and_then(|content| patch::entity_field_names(&content, &names.class))
        .unwrap_or_else(|e| {
            debug!("Using generic page columns for {}: {}", names, e);
            Vec::new()
        })
}

/// List, detail, form and delete confirmation pages under `<app>/templates/<app>/`.
pub fn generate_pages(ctx: &ProjectContext, app: &str, names: &EntityNames, force: bool) -> Result<ScaffoldReport> {
    let dir = ctx.app_templates_dir(app);
    let fields = page_fields(ctx, app, names);

    let mut report = ScaffoldReport::new();
    if fields.is_empty() {
        report
            .warnings
            .push(format!("No fields found for {}; pages use generic placeholders", names));
    }
    for (file, html) in pages(app, names, &fields) {
        write_generated(&mut report, ctx, &dir.join(file), &html, force)?;
    }
    Ok(report)
}
