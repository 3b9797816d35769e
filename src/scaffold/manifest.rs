use std::path::Path;

use super::{overwrite, ScaffoldReport};
use crate::project::ProjectContext;
use crate::Result;

pub const DEFAULT_MANIFEST: &str = "requirements.txt";

/// Turn `pip freeze` output into a sorted, deduplicated requirements file.
pub fn format_manifest(freeze: &str) -> String {
    let mut packages: Vec<&str> = freeze
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();
    packages.sort_by_key(|line| line.to_lowercase());
    packages.dedup_by(|a, b| a.eq_ignore_ascii_case(*b));

    let mut out = format!(
        "# Generated by djangogen on {}\n",
        chrono::Utc::now().format("%Y-%m-%d")
    );
    for package in packages {
        out.push_str(package);
        out.push('\n');
    }
    out
}

/// Write the manifest to `output`, relative to the project root unless absolute.
pub fn write_manifest(ctx: &ProjectContext, freeze: &str, output: &Path) -> Result<ScaffoldReport> {
    let path = if output.is_absolute() {
        output.to_path_buf()
    } else {
        ctx.root.join(output)
    };
    let mut report = ScaffoldReport::new();
    overwrite(&mut report, ctx, &path, &format_manifest(freeze))?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::test_helpers::TestProject;

    #[test]
    fn test_format_manifest_sorts_and_dedups() {
        let manifest = format_manifest("gunicorn==21.2.0\nDjango==5.0\n\nasgiref==3.7.2\ndjango==5.0\n");
        let lines: Vec<&str> = manifest.lines().collect();
        assert!(lines[0].starts_with("# Generated by djangogen on "));
        assert_eq!(&lines[1..], &["asgiref==3.7.2", "Django==5.0", "gunicorn==21.2.0"]);
    }

    #[test]
    fn test_write_manifest_relative_output() {
        let project = TestProject::django("school").unwrap();
        let ctx = project.context();
        let report = write_manifest(&ctx, "Django==5.0\n", Path::new("deploy/requirements.txt")).unwrap();
        assert_eq!(report.created, vec!["deploy/requirements.txt"]);
        assert!(project.read("deploy/requirements.txt").ends_with("Django==5.0\n"));

        let again = write_manifest(&ctx, "Django==5.1\n", Path::new("deploy/requirements.txt")).unwrap();
        assert_eq!(again.updated, vec!["deploy/requirements.txt"]);
    }
}
