pub mod app;
pub mod auth;
pub mod deploy;
pub mod entity;
pub mod extras;
pub mod init;
pub mod manifest;
pub mod resource;
pub mod routes;

use anyhow::{Context, Result};

use djangogen::models::{validate_app_name, EntityNames};
use djangogen::prompt::collect_fields;
use djangogen::scaffold;

use crate::cli::utils::{print_error, print_info, print_report, print_success};
use crate::cli::Session;

/// Create the app with `startapp` when its directory is missing, then register it.
///
/// A failed `startapp` stops the command.
pub async fn ensure_app(session: &mut Session, app: &str) -> Result<()> {
    validate_app_name(app)?;

    if !session.ctx.app_exists(app) {
        print_info(&format!("App '{}' does not exist. Creating it...", app));
        session
            .toolchain()
            .start_app(app)
            .await
            .with_context(|| format!("Failed to create app '{}' via manage.py", app))?;
        print_success(&format!("App '{}' created.", app));
    }

    let report = scaffold::register_app(&session.ctx, app)?;
    if !report.updated.is_empty() {
        print_success(&format!("Registered '{}' in INSTALLED_APPS.", app));
    }
    print_report(&report);
    Ok(())
}

/// Prompt for fields, then create the model or extend the existing one.
pub fn ensure_entity(session: &mut Session, app: &str, names: &EntityNames) -> Result<()> {
    let exists = scaffold::entity_exists(&session.ctx, app, names)?;
    if exists {
        print_info(&format!("Model '{}' already exists in '{}'.", names, app));
    }

    let collection = collect_fields(session.prompter.as_mut(), exists)?;

    let report = if exists {
        if collection.is_empty() {
            return Ok(());
        }
        scaffold::add_fields(&session.ctx, app, names, &collection.fields)?
    } else {
        print_info(&format!("Creating model '{}' in '{}'...", names, app));
        scaffold::create_entity(&session.ctx, app, names, &collection.fields)?
    };
    print_report(&report);

    if collection.needs_media() {
        print_info("File fields detected, configuring media serving...");
        print_report(&scaffold::ensure_media_config(&session.ctx)?);
    }

    print_success(&format!("Model '{}' ready.", names));
    Ok(())
}

/// Offer to run `makemigrations` + `migrate`; failures are reported, not fatal.
pub async fn migration_prompt(session: &mut Session) -> Result<()> {
    println!("\n{}", "=".repeat(40));
    if !session
        .prompter
        .confirm("Do you want to apply database migrations now?", true)?
    {
        print_info("Skipping migrations.");
        return Ok(());
    }

    println!("Running makemigrations and migrate...");
    match session.toolchain().apply_migrations(None).await {
        Ok(()) => print_success("Migrations applied successfully."),
        Err(e) => print_error(&format!("Error applying migrations: {}", e)),
    }
    Ok(())
}
