use anyhow::Result;
use clap::ArgMatches;

use djangogen::scaffold::deploy::{configure, Platform};

use crate::cli::utils::{print_info, print_report, print_success, print_warning};
use crate::cli::Session;

pub async fn handle_configure_deployment(matches: &ArgMatches, session: &mut Session) -> Result<()> {
    let platform: Platform = matches
        .get_one::<String>("platform-name")
        .map(|s| s.as_str())
        .unwrap_or("render")
        .parse()?;
    let force = matches.get_flag("force");

    println!("🚀 Configuring deployment for {} ({})", session.ctx.project_name, platform);

    let report = configure(&session.ctx, platform, force)?;
    print_report(&report);

    println!("Collecting static files...");
    match session.toolchain().collect_static().await {
        Ok(()) => print_success("Static files collected."),
        Err(e) => print_warning(&format!("collectstatic failed: {}", e)),
    }

    print_success(&format!("Deployment configured for {}.", platform));
    match platform {
        Platform::Render => print_info("Push the repository and create a Blueprint from render.yaml."),
        Platform::Heroku => print_info("Set SECRET_KEY and ALLOWED_HOSTS with `heroku config:set` before deploying."),
    }
    Ok(())
}
