use anyhow::Result;
use clap::ArgMatches;

use djangogen::scaffold::{self, ScaffoldReport};
use djangogen::EntityNames;

use crate::cli::commands::{ensure_app, ensure_entity, migration_prompt};
use crate::cli::utils::{positional, print_report, print_success, print_usage};
use crate::cli::Session;

/// Which generators a resource command runs
#[derive(Debug, Clone, Copy)]
struct Parts {
    form: bool,
    handlers: bool,
    migrate: bool,
}

pub async fn handle_create_form(matches: &ArgMatches, session: &mut Session) -> Result<()> {
    let parts = Parts { form: true, handlers: false, migrate: false };
    run(matches, session, "create-form", parts).await
}

pub async fn handle_create_handlers(matches: &ArgMatches, session: &mut Session) -> Result<()> {
    let parts = Parts { form: false, handlers: true, migrate: false };
    run(matches, session, "create-handlers", parts).await
}

pub async fn handle_create_full_resource(matches: &ArgMatches, session: &mut Session) -> Result<()> {
    let parts = Parts { form: true, handlers: true, migrate: true };
    run(matches, session, "create-full-resource", parts).await
}

async fn run(matches: &ArgMatches, session: &mut Session, command: &str, parts: Parts) -> Result<()> {
    let (Some(app), Some(entity)) = (positional(matches, "app"), positional(matches, "entity")) else {
        print_usage(&format!("{} <app_name> <EntityName>", command));
        return Ok(());
    };
    let force = matches.try_get_one::<bool>("force").ok().flatten().copied().unwrap_or(false);
    let names = EntityNames::new(entity)?;

    ensure_app(session, app).await?;
    ensure_entity(session, app, &names)?;

    let ctx = &session.ctx;
    let mut report = ScaffoldReport::new();
    if parts.form {
        println!("\n📝 Generating form for {}...", names);
        report.merge(scaffold::generate_form(ctx, app, &names)?);
    }
    if parts.handlers {
        println!("\n🧭 Generating views, urls and templates for {}...", names);
        report.merge(scaffold::generate_views(ctx, app, &names)?);
        report.merge(scaffold::generate_urls(ctx, app, &names)?);
        report.merge(scaffold::generate_pages(ctx, app, &names, force)?);
    }
    print_report(&report);

    if parts.handlers {
        print_success(&format!(
            "{} resource available at /{}/{}/",
            names, app, names.lower
        ));
    } else {
        print_success(&format!("{}Form ready in {}/forms.py", names, app));
    }

    if parts.migrate {
        migration_prompt(session).await?;
    }
    Ok(())
}
