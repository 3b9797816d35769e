use anyhow::{Context, Result};
use clap::ArgMatches;
use std::path::PathBuf;

use djangogen::scaffold::manifest::{write_manifest, DEFAULT_MANIFEST};

use crate::cli::utils::{pluralize, print_report, print_success};
use crate::cli::Session;

pub async fn handle_generate_manifest(matches: &ArgMatches, session: &mut Session) -> Result<()> {
    let output = matches
        .get_one::<PathBuf>("output")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST));

    println!("📦 Freezing installed packages...");
    let freeze = session
        .toolchain()
        .pip_freeze()
        .await
        .context("pip freeze failed")?;
    let count = freeze
        .lines()
        .filter(|l| !l.trim().is_empty() && !l.trim_start().starts_with('#'))
        .count();

    let report = write_manifest(&session.ctx, &freeze, &output)?;
    print_report(&report);
    print_success(&format!(
        "Wrote {} to {}",
        pluralize("package", count),
        output.display()
    ));
    Ok(())
}
