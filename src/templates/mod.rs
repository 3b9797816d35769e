//! Fixed skeletons for every generated artifact.
//!
//! Renderers are pure functions from names and field lists to text. Skeletons
//! use `{{KEY}}` placeholders (no spaces), which never collide with Django's
//! own `{{ variable }}` syntax.

pub mod auth;
pub mod crud;
pub mod deploy;
pub mod extras;

use std::fs;
use std::path::Path;

use crate::Result;

pub fn write_template_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

pub fn replace_placeholders(template: &str, project_name: &str) -> String {
    template
        .replace("{{PROJECT_NAME}}", project_name)
        .replace("{{PROJECT_NAME_UPPER}}", &project_name.to_uppercase())
        .replace("{{PROJECT_NAME_LOWER}}", &project_name.to_lowercase())
        .replace("{{YEAR}}", &chrono::Utc::now().format("%Y").to_string())
        .replace("{{DATE}}", &chrono::Utc::now().format("%Y-%m-%d").to_string())
}

/// Substitute `{{KEY}}` for each `(KEY, value)` pair
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{{{}}}}}", key), value)
    })
}

/// Capitalise the first letter, as used for table headers (`created_at` -> `Created_at`)
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
