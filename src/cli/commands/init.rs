use anyhow::{bail, Context, Result};

use djangogen::project::sanitize_project_name;

use crate::cli::utils::{print_info, print_success};
use crate::cli::Session;

pub async fn handle_init_project(session: &mut Session) -> Result<()> {
    if session.ctx.has_manage_py() {
        bail!("manage.py found. A project likely already exists here.");
    }

    let root = session
        .ctx
        .root
        .canonicalize()
        .with_context(|| format!("Cannot resolve project root {}", session.ctx.root.display()))?;
    let dir_name = root
        .file_name()
        .and_then(|n| n.to_str())
        .context("Project root has no usable directory name")?;
    let project_name = sanitize_project_name(dir_name);

    println!("🎯 Initializing Django project '{}' in {}", project_name, root.display());

    session
        .toolchain()
        .start_project(&project_name)
        .await
        .context("Failed to run startproject. Ensure django-admin is in your PATH (pip install django)")?;

    print_success(&format!("Project '{}' initialized successfully.", project_name));
    print_info("Next: djangogen create-app <app_name>");
    Ok(())
}
