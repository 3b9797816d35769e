//! Subprocess calls into the Django toolchain (`manage.py`, `django-admin`, `pip`).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::project::ProjectContext;
use crate::{GenError, Result};

/// Runs toolchain commands from the project root, one at a time
#[derive(Debug, Clone)]
pub struct Toolchain {
    root: PathBuf,
    python: String,
    django_admin: String,
}

impl Toolchain {
    pub fn new(ctx: &ProjectContext) -> Self {
        Self {
            root: ctx.root.clone(),
            python: ctx.python.clone(),
            django_admin: ctx.django_admin.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run with inherited stdio so the user sees the tool's own output
    async fn run(&self, program: &str, args: &[&str]) -> Result<()> {
        let command = display_command(program, args);
        info!("Running {}", command);

        let status = Command::new(program)
            .args(args)
            .current_dir(&self.root)
            .status()
            .await
            .map_err(|e| spawn_error(program, e))?;

        if status.success() {
            Ok(())
        } else {
            Err(GenError::Subprocess {
                command,
                code: status.code(),
            })
        }
    }

    /// Run and capture stdout
    async fn capture(&self, program: &str, args: &[&str]) -> Result<String> {
        let command = display_command(program, args);
        debug!("Capturing output of {}", command);

        let output = Command::new(program)
            .args(args)
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| spawn_error(program, e))?;

        if !output.status.success() {
            return Err(GenError::Subprocess {
                command,
                code: output.status.code(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn manage(&self, args: &[&str]) -> Result<()> {
        let mut full = vec!["manage.py"];
        full.extend_from_slice(args);
        self.run(&self.python, &full).await
    }

    pub async fn start_project(&self, name: &str) -> Result<()> {
        self.run(&self.django_admin, &["startproject", name, "."]).await
    }

    pub async fn start_app(&self, app: &str) -> Result<()> {
        self.manage(&["startapp", app]).await
    }

    pub async fn make_migrations(&self, app: Option<&str>) -> Result<()> {
        match app {
            Some(app) => self.manage(&["makemigrations", app]).await,
            None => self.manage(&["makemigrations"]).await,
        }
    }

    pub async fn migrate(&self) -> Result<()> {
        self.manage(&["migrate"]).await
    }

    /// `makemigrations` followed by `migrate`; stops at the first failure
    pub async fn apply_migrations(&self, app: Option<&str>) -> Result<()> {
        self.make_migrations(app).await?;
        self.migrate().await
    }

    pub async fn collect_static(&self) -> Result<()> {
        self.manage(&["collectstatic", "--noinput"]).await
    }

    /// Execute a Python snippet inside the project's Django shell
    pub async fn shell(&self, script: &str) -> Result<()> {
        self.manage(&["shell", "-c", script]).await
    }

    pub async fn pip_freeze(&self) -> Result<String> {
        self.capture(&self.python, &["-m", "pip", "freeze"]).await
    }
}

fn display_command(program: &str, args: &[&str]) -> String {
    let mut parts = vec![program.to_string()];
    parts.extend(args.iter().map(|a| {
        if a.contains(char::is_whitespace) {
            "<script>".to_string()
        } else {
            a.to_string()
        }
    }));
    parts.join(" ")
}

fn spawn_error(program: &str, err: std::io::Error) -> GenError {
    if err.kind() == ErrorKind::NotFound {
        GenError::CommandNotFound(program.to_string())
    } else {
        GenError::Io(err)
    }
}
