use anyhow::Result;
use clap::ArgMatches;

use crate::cli::commands::ensure_app;
use crate::cli::utils::{positional, print_usage};
use crate::cli::Session;

pub async fn handle_create_app(matches: &ArgMatches, session: &mut Session) -> Result<()> {
    let Some(app) = positional(matches, "app") else {
        print_usage("create-app <app_name>");
        return Ok(());
    };

    ensure_app(session, app).await
}
