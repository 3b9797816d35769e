//! Interactive input boundary.
//!
//! Commands gather every answer through a [`Prompter`] before touching the
//! project, so generators never block on input and can be tested with
//! [`ScriptedPrompter`].

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use tracing::warn;

use crate::models::{
    AuthOptions, DefaultGroup, FieldDetail, FieldKind, FieldSpec, FIELD_TYPES, RELATION_TYPES,
};
use crate::{GenError, Result};

pub trait Prompter {
    /// Ask a free-form question; an empty answer yields `default`.
    fn ask(&mut self, question: &str, default: &str) -> Result<String>;

    /// Print an informational line that is not a question
    fn note(&mut self, message: &str);

    /// Yes/no question; an empty answer yields `default`.
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let hint = if default { "yes" } else { "no" };
        let answer = self.ask(&format!("{} (yes/no)", question), hint)?;
        Ok(parse_yes(&answer, default))
    }
}

/// `yes`, `y` and `true` are affirmative; `no`, `n` and `false` negative
pub fn parse_yes(answer: &str, default: bool) -> bool {
    match answer.trim().to_lowercase().as_str() {
        "" => default,
        "yes" | "y" | "true" => true,
        "no" | "n" | "false" => false,
        _ => default,
    }
}

/// Reads answers from stdin
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, question: &str, default: &str) -> Result<String> {
        let mut stdout = io::stdout();
        if default.is_empty() {
            write!(stdout, "{}: ", question)?;
        } else {
            write!(stdout, "{} [{}]: ", question, default)?;
        }
        stdout.flush()?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            // stdin closed: behave as if the user accepted the default
            return Ok(default.to_string());
        }
        let answer = line.trim();
        Ok(if answer.is_empty() { default.to_string() } else { answer.to_string() })
    }

    fn note(&mut self, message: &str) {
        println!("{}", message);
    }
}

/// Accepts every default without reading input (`--yes`)
#[derive(Debug, Default)]
pub struct DefaultsPrompter;

impl Prompter for DefaultsPrompter {
    fn ask(&mut self, _question: &str, default: &str) -> Result<String> {
        Ok(default.to_string())
    }

    fn note(&mut self, _message: &str) {}
}

/// Replays a fixed list of answers; running out is an error
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
    pub notes: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &str, default: &str) -> Result<String> {
        self.asked.push(question.to_string());
        let answer = self
            .answers
            .pop_front()
            .ok_or_else(|| GenError::Internal(format!("no scripted answer for '{}'", question)))?;
        let answer = answer.trim();
        Ok(if answer.is_empty() { default.to_string() } else { answer.to_string() })
    }

    fn note(&mut self, message: &str) {
        self.notes.push(message.to_string());
    }
}

/// Fields gathered by [`collect_fields`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldCollection {
    pub fields: Vec<FieldSpec>,
}

impl FieldCollection {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// File and image fields need MEDIA_URL / MEDIA_ROOT configured
    pub fn needs_media(&self) -> bool {
        self.fields.iter().any(|f| f.kind.needs_media())
    }
}

/// Run the field loop: name, type, type detail, nullable; an empty name stops.
///
/// For an existing entity the user is first asked whether to add fields at all.
pub fn collect_fields(prompter: &mut dyn Prompter, existing: bool) -> Result<FieldCollection> {
    let mut collection = FieldCollection::default();

    prompter.note(&"=".repeat(40));
    prompter.note("Add fields. Press <Enter> on the property name to stop.");
    prompter.note(&"=".repeat(40));

    if existing && !prompter.confirm("Model exists. Add more fields?", false)? {
        return Ok(collection);
    }

    loop {
        let name = prompter.ask("> New property name (or <Enter> to stop)", "")?;
        let name = name.trim();
        if name.is_empty() {
            break;
        }
        if let Err(e) = crate::models::validate_identifier(name, "field") {
            prompter.note(&format!("  {}", e));
            continue;
        }
        if collection.fields.iter().any(|f| f.name == name) {
            prompter.note(&format!("  Field '{}' was already added", name));
            continue;
        }

        prompter.note(&format!("  Field types: {} (default: string)", FIELD_TYPES.join(", ")));
        prompter.note(&format!("  Relations: {}", RELATION_TYPES.join(", ")));
        let type_answer = prompter.ask("  > Field type", "string")?;

        let kind = match FieldKind::keyword(&type_answer) {
            Some(keyword) => {
                let detail = match FieldKind::detail_for(keyword) {
                    FieldDetail::None => String::new(),
                    FieldDetail::MaxLength => prompter.ask("  > Max length", "255")?,
                    FieldDetail::UploadTo => prompter.ask("  > Upload to", "uploads/")?,
                    FieldDetail::RelatedModel => {
                        prompter.ask("  > Related model (e.g. 'auth.User' or 'OtherModel')", "")?
                    }
                };
                match FieldKind::build(keyword, &detail) {
                    Ok(kind) => kind,
                    Err(e) => {
                        prompter.note(&format!("  {}; field skipped", e));
                        continue;
                    }
                }
            }
            None => {
                warn!("Unknown field type '{}', using CharField", type_answer);
                prompter.note(&format!(
                    "  Unknown type '{}', defaulting to CharField.",
                    type_answer.trim()
                ));
                FieldKind::String { max_length: crate::models::DEFAULT_MAX_LENGTH }
            }
        };

        if matches!(kind, FieldKind::Image { .. }) {
            prompter.note("  (ImageField requires the Pillow library)");
        }

        let nullable = prompter.confirm("  > Can this field be null in the database?", false)?;
        collection.fields.push(FieldSpec::new(name, kind).nullable(nullable));
        prompter.note(&format!("  ✓ Added field '{}'", name));
    }

    Ok(collection)
}

/// Ask every authentication setup question, then for confirmation.
///
/// Returns `None` when the user declines to proceed.
pub fn collect_auth_options(prompter: &mut dyn Prompter, app: &str) -> Result<Option<AuthOptions>> {
    let mut options = AuthOptions::new(app);

    options.two_factor = prompter.confirm("Add 2FA (double authentication)?", false)?;
    options.welcome_email = prompter.confirm("Send welcome email on registration?", true)?;
    options.create_test_users = prompter.confirm("Create default test users (superuser & admin)?", true)?;
    options.landing_page = prompter.confirm("Add a public landing page?", true)?;

    let admin_url = prompter.ask("Custom admin URL path (e.g. 'secret-admin')", "admin")?;
    let admin_url = admin_url.trim().trim_matches('/');
    if !admin_url.is_empty() {
        options.admin_url = admin_url.to_string();
    }

    prompter.note("");
    prompter.note("Available default groups for new users:");
    for (i, group) in DefaultGroup::ALL.iter().enumerate() {
        let suffix = if *group == DefaultGroup::default() { " (default)" } else { "" };
        prompter.note(&format!("{}. {}{}", i + 1, group, suffix));
    }
    options.default_group = DefaultGroup::from_choice(&prompter.ask("Choose default group (1/2/3)", "1")?);

    let on_off = |flag: bool| if flag { "ON" } else { "OFF" };
    prompter.note(&format!(
        "\nConfig: 2FA={}, WelcomeEmail={}, DefaultGroup={}\n",
        on_off(options.two_factor),
        on_off(options.welcome_email),
        options.default_group
    ));

    if prompter.confirm("Proceed with setup?", true)? {
        Ok(Some(options))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yes() {
        assert!(parse_yes("Y", false));
        assert!(parse_yes("", true));
        assert!(!parse_yes("no", true));
        assert!(!parse_yes("maybe", false));
    }

    #[test]
    fn test_collect_fields_flow() {
        let mut prompter = ScriptedPrompter::new([
            "title", "", "120", "no", // string with custom length
            "cover", "image", "", "yes", // image with default upload dir
            "author", "foreignkey", "auth.User", "", // relation
            "",
        ]);
        let collection = collect_fields(&mut prompter, false).unwrap();

        assert_eq!(prompter.remaining(), 0);
        let rendered: Vec<String> = collection.fields.iter().map(|f| f.render()).collect();
        assert_eq!(
            rendered,
            vec![
                "    title = models.CharField(max_length=120)",
                "    cover = models.ImageField(upload_to='uploads/', null=True, blank=True)",
                "    author = models.ForeignKey('auth.User', on_delete=models.CASCADE)",
            ]
        );
        assert!(collection.needs_media());
    }

    #[test]
    fn test_unknown_type_defaults_to_charfield() {
        let mut prompter = ScriptedPrompter::new(["code", "uuid", "no", ""]);
        let collection = collect_fields(&mut prompter, false).unwrap();
        assert_eq!(
            collection.fields[0].kind,
            FieldKind::String { max_length: 255 }
        );
        assert!(prompter.notes.iter().any(|n| n.contains("Unknown type 'uuid'")));
    }

    #[test]
    fn test_existing_model_declined() {
        let mut prompter = ScriptedPrompter::new([""]);
        let collection = collect_fields(&mut prompter, true).unwrap();
        assert!(collection.is_empty());
        assert_eq!(prompter.remaining(), 0);
    }

    #[test]
    fn test_invalid_and_duplicate_names_are_reprompted() {
        let mut prompter = ScriptedPrompter::new([
            "9lives", "body", "text", "no", "body", "",
        ]);
        let collection = collect_fields(&mut prompter, false).unwrap();
        assert_eq!(collection.fields.len(), 1);
        assert_eq!(collection.fields[0].name, "body");
    }

    #[test]
    fn test_defaults_prompter() {
        let mut prompter = DefaultsPrompter;
        assert!(prompter.confirm("Apply migrations?", true).unwrap());
        assert!(!prompter.confirm("Reset database?", false).unwrap());
        assert_eq!(prompter.ask("Admin path", "admin").unwrap(), "admin");
    }

    #[test]
    fn test_collect_auth_options() {
        let mut prompter = ScriptedPrompter::new(["yes", "no", "", "n", "/backoffice/", "2", ""]);
        let options = collect_auth_options(&mut prompter, "accounts").unwrap().unwrap();

        assert!(options.two_factor);
        assert!(!options.welcome_email);
        assert!(options.create_test_users);
        assert!(!options.landing_page);
        assert_eq!(options.admin_url, "backoffice");
        assert_eq!(options.default_group, DefaultGroup::Manager);
        assert!(prompter.notes.iter().any(|n| n.contains("1. Member (default)")));
    }

    #[test]
    fn test_collect_auth_options_cancelled() {
        let mut prompter = ScriptedPrompter::new(["", "", "", "", "", "", "no"]);
        assert!(collect_auth_options(&mut prompter, "accounts").unwrap().is_none());
    }

    #[test]
    fn test_auth_defaults() {
        let options = collect_auth_options(&mut DefaultsPrompter, "accounts").unwrap().unwrap();
        assert_eq!(options, AuthOptions::new("accounts"));
    }
}
