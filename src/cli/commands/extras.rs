use anyhow::Result;
use clap::ArgMatches;

use djangogen::scaffold::extras::{generate_command, generate_service};

use crate::cli::commands::ensure_app;
use crate::cli::utils::{positional, print_info, print_report, print_success, print_usage};
use crate::cli::Session;

pub async fn handle_create_command(matches: &ArgMatches, session: &mut Session) -> Result<()> {
    let (Some(app), Some(name)) = (positional(matches, "app"), positional(matches, "name")) else {
        print_usage("create-command <app_name> <command_name>");
        return Ok(());
    };
    let default_help = format!("Custom {} command", name);
    let help = matches
        .get_one::<String>("description")
        .map(|s| s.as_str())
        .unwrap_or(default_help.as_str());

    ensure_app(session, app).await?;
    let report = generate_command(&session.ctx, app, name, help)?;
    print_report(&report);

    if report.created.iter().any(|p| p.ends_with(&format!("{}.py", name))) {
        print_success(&format!("Management command '{}' created.", name));
    }
    print_info(&format!("Run it with: python manage.py {}", name));
    Ok(())
}

pub async fn handle_create_service(matches: &ArgMatches, session: &mut Session) -> Result<()> {
    let (Some(app), Some(name)) = (positional(matches, "app"), positional(matches, "name")) else {
        print_usage("create-service <app_name> <ServiceName>");
        return Ok(());
    };

    ensure_app(session, app).await?;
    let report = generate_service(&session.ctx, app, name)?;
    if report.is_empty() {
        print_info(&format!("{}Service already exists in {}/services.py", name, app));
    } else {
        print_report(&report);
        print_success(&format!("{}Service ready in {}/services.py", name, app));
    }
    Ok(())
}
