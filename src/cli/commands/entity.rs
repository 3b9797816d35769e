use anyhow::Result;
use clap::ArgMatches;

use djangogen::EntityNames;

use crate::cli::commands::{ensure_app, ensure_entity, migration_prompt};
use crate::cli::utils::{positional, print_usage};
use crate::cli::Session;

pub async fn handle_create_entity(matches: &ArgMatches, session: &mut Session) -> Result<()> {
    let (Some(app), Some(entity)) = (positional(matches, "app"), positional(matches, "entity")) else {
        print_usage("create-entity <app_name> <EntityName>");
        return Ok(());
    };
    let names = EntityNames::new(entity)?;

    ensure_app(session, app).await?;
    ensure_entity(session, app, &names)?;
    migration_prompt(session).await
}
