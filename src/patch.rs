//! Idempotent text patching for generated project files.
//!
//! Every edit the generators make to an existing file goes through this module.
//! A patch is located by a literal marker and guarded by a presence check, so
//! running the same generator twice leaves the file untouched the second time.
//!
//! Two primitives live here:
//!
//! - [`apply`] / [`PatchRule`]: insert text before or after the first occurrence
//!   of a marker (or at either end of the document) unless a presence marker is
//!   already in the document. A missing location marker falls back to appending
//!   at the end and is reported as a soft miss.
//! - [`insert_into_entity`]: insert member lines into the body of a named block
//!   (`class Foo(...)`), found by scanning lines.
//!
//! Both work on plain text with substring and line-prefix searches. They do not
//! parse the target language.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::{GenError, Result};

static FIELD_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s+)([A-Za-z_][A-Za-z0-9_]*)\s*=\s*models\.[A-Za-z_][A-Za-z0-9_]*\(")
        .expect("field assignment pattern is valid")
});

/// Where an insertion goes relative to its marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Placement {
    /// On its own line(s) before the line holding the marker
    BeforeMarker,
    /// Directly after the marker text, starting on a new line
    AfterMarker,
    StartOfFile,
    EndOfFile,
}

impl Placement {
    fn needs_marker(self) -> bool {
        matches!(self, Placement::BeforeMarker | Placement::AfterMarker)
    }
}

/// What a single patch did to the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PatchOutcome {
    Applied,
    AlreadyPresent,
    /// Location marker missing, insertion appended at the end instead
    FellBackToEnd,
    /// Replacement target missing, nothing changed
    MarkerMissing,
}

impl PatchOutcome {
    pub fn is_soft_miss(self) -> bool {
        matches!(self, PatchOutcome::FellBackToEnd | PatchOutcome::MarkerMissing)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchResult {
    pub document: String,
    pub changed: bool,
    pub outcome: PatchOutcome,
}

impl PatchResult {
    fn unchanged(document: &str, outcome: PatchOutcome) -> Self {
        Self {
            document: document.to_string(),
            changed: false,
            outcome,
        }
    }

    fn changed(document: String, outcome: PatchOutcome) -> Self {
        Self {
            document,
            changed: true,
            outcome,
        }
    }
}

/// Insert `insertion` into `document` once.
///
/// Nothing happens when `presence` already occurs anywhere in the document.
/// An empty `presence` stands for the trimmed insertion itself. Otherwise the
/// text is placed according to `placement`, using the first occurrence of
/// `marker` only.
pub fn apply(
    document: &str,
    presence: &str,
    marker: &str,
    insertion: &str,
    placement: Placement,
) -> PatchResult {
    let presence = if presence.is_empty() { insertion.trim() } else { presence };
    if document.contains(presence) {
        debug!("Presence marker {:?} found, skipping insertion", presence);
        return PatchResult::unchanged(document, PatchOutcome::AlreadyPresent);
    }
    insert(document, marker, insertion, placement)
}

fn insert(document: &str, marker: &str, insertion: &str, placement: Placement) -> PatchResult {
    let text = insertion.trim_end_matches(['\n', '\r']);

    let found = if placement.needs_marker() && !marker.is_empty() {
        document.find(marker)
    } else {
        None
    };

    match (placement, found) {
        (Placement::StartOfFile, _) => {
            PatchResult::changed(format!("{}\n{}", text, document), PatchOutcome::Applied)
        }
        (Placement::EndOfFile, _) => {
            PatchResult::changed(append_line(document, text), PatchOutcome::Applied)
        }
        (Placement::AfterMarker, Some(idx)) => {
            let end = idx + marker.len();
            let mut out = String::with_capacity(document.len() + text.len() + 1);
            out.push_str(&document[..end]);
            out.push('\n');
            out.push_str(text);
            out.push_str(&document[end..]);
            PatchResult::changed(out, PatchOutcome::Applied)
        }
        (Placement::BeforeMarker, Some(idx)) => {
            let line_start = document[..idx].rfind('\n').map(|i| i + 1).unwrap_or(0);
            let mut out = String::with_capacity(document.len() + text.len() + 1);
            out.push_str(&document[..line_start]);
            out.push_str(text);
            out.push('\n');
            out.push_str(&document[line_start..]);
            PatchResult::changed(out, PatchOutcome::Applied)
        }
        (_, None) => {
            warn!("Marker {:?} not found, appending at end of document", marker);
            PatchResult::changed(append_line(document, text), PatchOutcome::FellBackToEnd)
        }
    }
}

fn append_line(document: &str, text: &str) -> String {
    let mut out = String::with_capacity(document.len() + text.len() + 2);
    out.push_str(document);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(text);
    out.push('\n');
    out
}

/// Test that decides whether a rule has already been applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    /// Literal text anywhere in the document
    Substring(String),
    /// A line whose left-trimmed content starts with this text
    LinePrefix(String),
    /// A line equal to this text, ignoring surrounding whitespace
    Line(String),
    /// A line starting with `prefix` (after indentation) that also contains `needle`
    LineWith { prefix: String, needle: String },
}

impl Presence {
    pub fn found_in(&self, document: &str) -> bool {
        match self {
            Presence::Substring(text) => document.contains(text.as_str()),
            Presence::LinePrefix(prefix) => document
                .lines()
                .any(|line| line.trim_start().starts_with(prefix.as_str())),
            Presence::Line(text) => document.lines().any(|line| line.trim() == text.trim()),
            Presence::LineWith { prefix, needle } => document.lines().any(|line| {
                let line = line.trim_start();
                line.starts_with(prefix.as_str()) && line.contains(needle.as_str())
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Insert { text: String, placement: Placement },
    /// Replace the first occurrence of the marker
    Replace { with: String },
}

/// A named, idempotent edit of one document.
///
/// Without explicit presence markers the rule guards itself with its own
/// inserted (or replacement) text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRule {
    presence: Vec<Presence>,
    marker: String,
    edit: Edit,
}

impl PatchRule {
    fn insertion(marker: &str, text: &str, placement: Placement) -> Self {
        Self {
            presence: Vec::new(),
            marker: marker.to_string(),
            edit: Edit::Insert {
                text: text.to_string(),
                placement,
            },
        }
    }

    pub fn insert_after(marker: &str, text: &str) -> Self {
        Self::insertion(marker, text, Placement::AfterMarker)
    }

    pub fn insert_before(marker: &str, text: &str) -> Self {
        Self::insertion(marker, text, Placement::BeforeMarker)
    }

    pub fn prepend(text: &str) -> Self {
        Self::insertion("", text, Placement::StartOfFile)
    }

    pub fn append(text: &str) -> Self {
        Self::insertion("", text, Placement::EndOfFile)
    }

    pub fn replace(marker: &str, with: &str) -> Self {
        Self {
            presence: Vec::new(),
            marker: marker.to_string(),
            edit: Edit::Replace {
                with: with.to_string(),
            },
        }
    }

    /// Append a `KEY = value` line unless a line already assigns `KEY`,
    /// with or without spaces around `=`.
    pub fn setting(key: &str, value: &str) -> Self {
        Self::append(&format!("{} = {}", key, value))
            .unless_line_starts_with(&format!("{} ", key))
            .unless_line_starts_with(&format!("{}=", key))
    }

    pub fn unless_present(mut self, text: &str) -> Self {
        self.presence.push(Presence::Substring(text.to_string()));
        self
    }

    pub fn unless_line_starts_with(mut self, prefix: &str) -> Self {
        self.presence.push(Presence::LinePrefix(prefix.to_string()));
        self
    }

    pub fn unless_line(mut self, text: &str) -> Self {
        self.presence.push(Presence::Line(text.to_string()));
        self
    }

    pub fn unless_line_with(mut self, prefix: &str, needle: &str) -> Self {
        self.presence.push(Presence::LineWith {
            prefix: prefix.to_string(),
            needle: needle.to_string(),
        });
        self
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn edit(&self) -> &Edit {
        &self.edit
    }

    pub fn is_present(&self, document: &str) -> bool {
        if self.presence.is_empty() {
            return match &self.edit {
                Edit::Insert { text, .. } => document.contains(text.trim()),
                Edit::Replace { with } => document.contains(with.as_str()),
            };
        }
        self.presence.iter().any(|p| p.found_in(document))
    }

    pub fn apply(&self, document: &str) -> PatchResult {
        if self.is_present(document) {
            return PatchResult::unchanged(document, PatchOutcome::AlreadyPresent);
        }

        match &self.edit {
            Edit::Insert { text, placement } => insert(document, &self.marker, text, *placement),
            Edit::Replace { with } => match document.find(self.marker.as_str()) {
                Some(_) if !self.marker.is_empty() => PatchResult::changed(
                    document.replacen(self.marker.as_str(), with, 1),
                    PatchOutcome::Applied,
                ),
                _ => {
                    warn!("Replacement target {:?} not found", self.marker);
                    PatchResult::unchanged(document, PatchOutcome::MarkerMissing)
                }
            },
        }
    }

    /// Short human description used in soft-miss reports
    pub fn describe(&self) -> String {
        let subject = match &self.edit {
            Edit::Insert { text, .. } => text.trim().lines().next().unwrap_or_default().to_string(),
            Edit::Replace { with } => with.lines().next().unwrap_or_default().to_string(),
        };
        if self.marker.is_empty() {
            subject
        } else {
            format!("{} (marker {:?})", subject, self.marker)
        }
    }
}

/// Result of applying an ordered list of rules to one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    pub document: String,
    pub changed: bool,
    pub outcomes: Vec<PatchOutcome>,
    pub soft_misses: Vec<String>,
}

/// Apply rules in order; each rule sees the text produced by the previous ones.
pub fn apply_rules(document: &str, rules: &[PatchRule]) -> BatchResult {
    let mut current = document.to_string();
    let mut changed = false;
    let mut outcomes = Vec::with_capacity(rules.len());
    let mut soft_misses = Vec::new();

    for rule in rules {
        let result = rule.apply(&current);
        if result.outcome.is_soft_miss() {
            soft_misses.push(rule.describe());
        }
        changed |= result.changed;
        outcomes.push(result.outcome);
        current = result.document;
    }

    BatchResult {
        document: current,
        changed,
        outcomes,
        soft_misses,
    }
}

fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

fn declares(line: &str, keyword: &str, name: &str) -> bool {
    let Some(rest) = line.trim_start().strip_prefix(keyword) else {
        return false;
    };
    if !rest.starts_with(char::is_whitespace) {
        return false;
    }
    match rest.trim_start().strip_prefix(name) {
        Some(after) => after
            .chars()
            .next()
            .map_or(true, |c| !(c.is_alphanumeric() || c == '_')),
        None => false,
    }
}

fn starts_member(trimmed: &str) -> bool {
    trimmed.starts_with("def ")
        || trimmed.starts_with("async def ")
        || trimmed.starts_with("class ")
        || trimmed.starts_with('@')
}

/// Index of the first line declaring `<keyword> <name>`
pub fn find_entity(document: &str, keyword: &str, name: &str) -> Option<usize> {
    document.split('\n').position(|line| declares(line, keyword, name))
}

pub fn entity_exists(document: &str, keyword: &str, name: &str) -> bool {
    find_entity(document, keyword, name).is_some()
}

fn ends_block(line: &str, decl_indent: usize) -> bool {
    let trimmed = line.trim_start();
    !trimmed.is_empty() && !trimmed.starts_with('#') && indent_width(line) <= decl_indent
}

fn member_insertion_index(lines: &[&str], decl: usize) -> usize {
    let decl_indent = indent_width(lines[decl]);
    let mut idx = lines.len();

    for (i, line) in lines.iter().enumerate().skip(decl + 1) {
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            continue;
        }
        if ends_block(line, decl_indent) || starts_member(trimmed) {
            idx = i;
            break;
        }
    }

    while idx > decl + 1 && lines[idx - 1].trim().is_empty() {
        idx -= 1;
    }
    idx
}

/// Insert `members` into the body of the block declared by `<keyword> <name>`.
///
/// The lines go after the last body line that precedes the first nested
/// definition or the end of the block. Fails with [`GenError::EntityNotFound`]
/// when no such declaration exists.
pub fn insert_into_entity(
    document: &str,
    keyword: &str,
    name: &str,
    members: &[String],
) -> Result<String> {
    let lines: Vec<&str> = document.split('\n').collect();
    let decl = lines
        .iter()
        .position(|line| declares(line, keyword, name))
        .ok_or_else(|| GenError::EntityNotFound(name.to_string()))?;

    let at = member_insertion_index(&lines, decl);
    let new_lines: Vec<&str> = members
        .iter()
        .flat_map(|m| m.trim_end_matches(['\n', '\r']).split('\n'))
        .collect();

    debug!(
        "Inserting {} line(s) into {} {} at line {}",
        new_lines.len(),
        keyword,
        name,
        at + 1
    );

    let mut out: Vec<&str> = Vec::with_capacity(lines.len() + new_lines.len());
    out.extend_from_slice(&lines[..at]);
    out.extend(new_lines);
    out.extend_from_slice(&lines[at..]);
    Ok(out.join("\n"))
}

/// Field names assigned as `name = models.X(...)` directly in the class body.
pub fn entity_field_names(document: &str, name: &str) -> Result<Vec<String>> {
    let lines: Vec<&str> = document.split('\n').collect();
    let decl = lines
        .iter()
        .position(|line| declares(line, "class", name))
        .ok_or_else(|| GenError::EntityNotFound(name.to_string()))?;

    let decl_indent = indent_width(lines[decl]);
    let mut body_indent = None;
    let mut fields = Vec::new();

    for line in &lines[decl + 1..] {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if ends_block(line, decl_indent) {
            break;
        }
        let indent = *body_indent.get_or_insert(indent_width(line));
        if indent_width(line) != indent {
            continue;
        }
        if let Some(caps) = FIELD_ASSIGNMENT.captures(line) {
            fields.push(caps[2].to_string());
        }
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODELS: &str = "class Foo(Model):\n    a = Field()\n\nclass Bar(Model):\n    b = Field()\n";

    #[test]
    fn test_after_marker_inserts_on_next_line() {
        let result = apply(
            "urlpatterns = [\n]\n",
            "path('x/')",
            "urlpatterns = [",
            "    path('x/'),",
            Placement::AfterMarker,
        );
        assert!(result.changed);
        assert_eq!(result.document, "urlpatterns = [\n    path('x/'),\n]\n");
    }

    #[test]
    fn test_before_marker_uses_line_start() {
        let doc = "import os\nurlpatterns = []\n";
        let result = apply(doc, "import sys", "urlpatterns", "import sys", Placement::BeforeMarker);
        assert_eq!(result.document, "import os\nimport sys\nurlpatterns = []\n");
    }

    #[test]
    fn test_first_marker_wins() {
        let doc = "a = [\n]\nb = [\n]\n";
        let result = apply(doc, "x", "= [", "    x,", Placement::AfterMarker);
        assert_eq!(result.document, "a = [\n    x,\n]\nb = [\n]\n");
    }

    #[test]
    fn test_end_of_file_adds_missing_newline() {
        let result = apply("DEBUG = True", "SECRET", "", "SECRET = 1", Placement::EndOfFile);
        assert_eq!(result.document, "DEBUG = True\nSECRET = 1\n");
    }

    #[test]
    fn test_start_of_file() {
        let rule = PatchRule::prepend("from django.conf import settings\n");
        let result = rule.apply("urlpatterns = []\n");
        assert_eq!(result.document, "from django.conf import settings\nurlpatterns = []\n");
        assert!(!rule.apply(&result.document).changed);
    }

    #[test]
    fn test_replace_first_occurrence_only() {
        let rule = PatchRule::replace("path('admin/'", "path('hidden/'");
        let result = rule.apply("path('admin/', a)\npath('admin/', b)\n");
        assert_eq!(result.document, "path('hidden/', a)\npath('admin/', b)\n");
        assert_eq!(result.outcome, PatchOutcome::Applied);
    }

    #[test]
    fn test_replace_missing_marker_is_soft_miss() {
        let rule = PatchRule::replace("from django.urls import path", "from django.urls import path, include");
        let result = rule.apply("x = 1\n");
        assert!(!result.changed);
        assert_eq!(result.outcome, PatchOutcome::MarkerMissing);
    }

    #[test]
    fn test_setting_checks_line_prefix() {
        let rule = PatchRule::setting("LOGIN_URL", "'accounts:login'");
        let doc = "# LOGIN_URL = 'x'\nLOGIN_REDIRECT_URL = 'y'\n";
        let result = rule.apply(doc);
        assert!(result.changed);
        assert!(result.document.ends_with("LOGIN_URL = 'accounts:login'\n"));
        assert!(!rule.apply(&result.document).changed);
    }

    #[test]
    fn test_setting_detects_compact_assignment() {
        let rule = PatchRule::setting("MEDIA_URL", "'/uploads/'");
        let doc = "MEDIA_URL='/files/'\n";
        let result = rule.apply(doc);
        assert!(!result.changed);
        assert_eq!(result.outcome, PatchOutcome::AlreadyPresent);
    }

    #[test]
    fn test_empty_presence_guards_with_insertion() {
        let first = apply("DEBUG = True\n", "", "", "SECRET = 1\n", Placement::EndOfFile);
        assert!(first.changed);
        assert_eq!(first.document, "DEBUG = True\nSECRET = 1\n");
        let second = apply(&first.document, "", "", "SECRET = 1\n", Placement::EndOfFile);
        assert!(!second.changed);
    }

    #[test]
    fn test_line_with_ignores_indented_prose() {
        let presence = Presence::LineWith {
            prefix: "from django.urls import".to_string(),
            needle: "include".to_string(),
        };
        let docstring = "\"\"\"\n    1. Import: from django.urls import include, path\n\"\"\"\nfrom django.urls import path\n";
        assert!(!presence.found_in(docstring));
        assert!(presence.found_in("from django.urls import re_path, include\n"));
    }

    #[test]
    fn test_import_line_matches_whole_line() {
        let rule = PatchRule::prepend("from .models import Boo").unless_line("from .models import Boo");
        let doc = "from .models import Book\n";
        let result = rule.apply(doc);
        assert_eq!(result.document, "from .models import Boo\nfrom .models import Book\n");
        assert!(!rule.apply(&result.document).changed);
    }

    #[test]
    fn test_apply_rules_collects_soft_misses() {
        let rules = vec![
            PatchRule::insert_after("INSTALLED_APPS = [", "    'blog',"),
            PatchRule::append("MEDIA_URL = '/uploads/'"),
        ];
        let batch = apply_rules("DEBUG = True\n", &rules);
        assert!(batch.changed);
        assert_eq!(batch.outcomes, vec![PatchOutcome::FellBackToEnd, PatchOutcome::Applied]);
        assert_eq!(batch.soft_misses.len(), 1);
        assert_eq!(batch.document, "DEBUG = True\n    'blog',\nMEDIA_URL = '/uploads/'\n");
    }

    #[test]
    fn test_declares_requires_whole_name() {
        assert!(declares("class Foo(Model):", "class", "Foo"));
        assert!(declares("    class Foo:", "class", "Foo"));
        assert!(!declares("class FooBar(Model):", "class", "Foo"));
        assert!(!declares("classFoo", "class", "Foo"));
    }

    #[test]
    fn test_insert_into_entity_stops_before_methods() {
        let doc = "class Foo(Model):\n    a = Field()\n\n    def __str__(self):\n        return 'x'\n";
        let out = insert_into_entity(doc, "class", "Foo", &["    b = Field()".to_string()]).unwrap();
        assert_eq!(
            out,
            "class Foo(Model):\n    a = Field()\n    b = Field()\n\n    def __str__(self):\n        return 'x'\n"
        );
    }

    #[test]
    fn test_insert_into_last_entity_keeps_trailing_newline() {
        let out = insert_into_entity(MODELS, "class", "Bar", &["    c = Field()\n".to_string()]).unwrap();
        assert_eq!(
            out,
            "class Foo(Model):\n    a = Field()\n\nclass Bar(Model):\n    b = Field()\n    c = Field()\n"
        );
    }

    #[test]
    fn test_entity_field_names_skip_nested_blocks() {
        let doc = "class Post(models.Model):\n    title = models.CharField(max_length=10)\n\n    class Meta:\n        ordering = models.F('x')\n\n    body = models.TextField()\n";
        let fields = entity_field_names(doc, "Post").unwrap();
        assert_eq!(fields, vec!["title", "body"]);
    }
}
