use tracing::info;

use super::{create_or_patch, ensure_package, write_generated, ScaffoldReport};
use crate::models::{validate_app_name, validate_identifier};
use crate::patch::PatchRule;
use crate::project::ProjectContext;
use crate::templates::extras::{command_module, service_class, service_declaration, SERVICES_HEADER};
use crate::Result;

/// `<app>/management/commands/<name>.py`, with the package markers it needs.
pub fn generate_command(ctx: &ProjectContext, app: &str, name: &str, help: &str) -> Result<ScaffoldReport> {
    validate_app_name(app)?;
    validate_identifier(name, "command")?;

    let management = ctx.app_dir(app).join("management");
    let commands = management.join("commands");
    let mut report = ScaffoldReport::new();

    ensure_package(&mut report, ctx, &management)?;
    ensure_package(&mut report, ctx, &commands)?;
    write_generated(
        &mut report,
        ctx,
        &commands.join(format!("{}.py", name)),
        &command_module(name, help),
        false,
    )?;

    info!("Management command '{}' ready: python manage.py {}", name, name);
    Ok(report)
}

/// Add `<Name>Service` to `<app>/services.py`, creating the module if needed.
pub fn generate_service(ctx: &ProjectContext, app: &str, name: &str) -> Result<ScaffoldReport> {
    validate_app_name(app)?;
    validate_identifier(name, "service")?;

    let path = ctx.app_file(app, "services.py");
    let declaration = service_declaration(name);
    let class = service_class(name);
    let rules = [
        PatchRule::prepend("from django.db import transaction"),
        PatchRule::append(&class)
            .unless_line_starts_with(&format!("{}:", declaration))
            .unless_line_starts_with(&format!("{}(", declaration)),
    ];

    let mut report = ScaffoldReport::new();
    create_or_patch(&mut report, ctx, &path, &format!("{}{}", SERVICES_HEADER, class), &rules)?;
    Ok(report)
}
