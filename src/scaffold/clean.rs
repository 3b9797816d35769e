use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::Result;

pub const DATABASE_FILE: &str = "db.sqlite3";

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

fn is_migration(path: &Path) -> bool {
    let in_migrations = path
        .parent()
        .and_then(Path::file_name)
        .is_some_and(|dir| dir == "migrations");
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    in_migrations && name.ends_with(".py") && name != "__init__.py"
}

/// Delete the SQLite database and every generated migration under `root`.
///
/// Hidden directories (virtualenvs, `.git`) are not entered. Returns the removed files.
pub fn deep_clean(root: &Path) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();

    let database = root.join(DATABASE_FILE);
    if database.is_file() {
        fs::remove_file(&database)?;
        removed.push(database);
    }

    let walker = WalkDir::new(root).into_iter().filter_entry(|e| !is_hidden(e));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable path during clean: {}", e);
                continue;
            }
        };
        if entry.file_type().is_file() && is_migration(entry.path()) {
            match fs::remove_file(entry.path()) {
                Ok(()) => {
                    debug!("Removed {}", entry.path().display());
                    removed.push(entry.into_path());
                }
                Err(e) => warn!("Could not remove {}: {}", entry.path().display(), e),
            }
        }
    }

    info!("Deep clean removed {} file(s)", removed.len());
    Ok(removed)
}
