use anyhow::Result;
use clap::ArgMatches;

use djangogen::routes;

use crate::cli::utils::{pluralize, print_info};
use crate::cli::Session;

pub fn handle_list_routes(matches: &ArgMatches, session: &Session) -> Result<()> {
    let format = matches
        .get_one::<String>("format")
        .map(|s| s.as_str())
        .unwrap_or("table");

    let entries = routes::collect(&session.ctx)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&entries)?),
        _ => {
            println!();
            print!("{}", routes::render_table(&entries));
            print_info(&format!("{} found", pluralize("route", entries.len())));
        }
    }
    Ok(())
}
