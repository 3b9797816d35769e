use std::fs;
use tracing::{debug, info};

use super::{create_or_patch, ScaffoldReport};
use crate::models::{EntityNames, FieldSpec};
use crate::patch::{self, PatchRule};
use crate::project::ProjectContext;
use crate::templates::crud::{default_fields, model_block, MODELS_HEADER};
use crate::{GenError, Result};

const MODELS_IMPORT: &str = "from django.db import models";

/// Whether `<app>/models.py` declares `class <Entity>`; a missing file means no.
pub fn entity_exists(ctx: &ProjectContext, app: &str, names: &EntityNames) -> Result<bool> {
    match ctx.read(&ctx.app_file(app, "models.py")) {
        Ok(content) => Ok(patch::entity_exists(&content, "class", &names.class)),
        Err(GenError::MissingPrerequisite(_)) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Append a new model class to `<app>/models.py`, creating the file if needed.
///
/// An empty field list gets the default `description` and `created_at` fields.
pub fn create_entity(
    ctx: &ProjectContext,
    app: &str,
    names: &EntityNames,
    fields: &[FieldSpec],
) -> Result<ScaffoldReport> {
    let fields = if fields.is_empty() {
        debug!("No fields given for {}, using defaults", names);
        default_fields()
    } else {
        fields.to_vec()
    };
    let block = model_block(names, &fields);
    let path = ctx.app_file(app, "models.py");

    let rules = [
        PatchRule::prepend(MODELS_IMPORT),
        PatchRule::append(&block).unless_line_starts_with(&format!("class {}(", names.class)),
    ];

    let mut report = ScaffoldReport::new();
    create_or_patch(&mut report, ctx, &path, &format!("{}{}", MODELS_HEADER, block), &rules)?;
    info!("Model {} written to {}", names, ctx.display_path(&path));
    Ok(report)
}

/// Insert fields into an existing model class, skipping names it already declares.
pub fn add_fields(
    ctx: &ProjectContext,
    app: &str,
    names: &EntityNames,
    fields: &[FieldSpec],
) -> Result<ScaffoldReport> {
    let path = ctx.app_file(app, "models.py");
    let content = ctx.read(&path)?;
    let declared = patch::entity_field_names(&content, &names.class)?;

    let mut report = ScaffoldReport::new();
    let mut lines = Vec::new();
    for field in fields {
        if declared.contains(&field.name) {
            report
                .skipped
                .push(format!("{}.{} (already declared)", names.class, field.name));
        } else {
            lines.push(field.render());
        }
    }

    if lines.is_empty() {
        return Ok(report);
    }

    let updated = patch::insert_into_entity(&content, "class", &names.class, &lines)?;
    fs::write(&path, updated)?;
    info!("Added {} field(s) to {}", lines.len(), names);
    report.updated.push(ctx.display_path(&path));
    Ok(report)
}
