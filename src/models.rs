use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{GenError, Result};

pub const DEFAULT_MAX_LENGTH: u32 = 255;
pub const DEFAULT_UPLOAD_TO: &str = "uploads/";

/// Model field type as offered by the field prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    String { max_length: u32 },
    Text,
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
    Email,
    File { upload_to: String },
    Image { upload_to: String },
    ForeignKey { related: String },
    OneToOne { related: String },
    ManyToMany { related: String },
}

/// Type names accepted by the field prompt, in display order
pub const FIELD_TYPES: &[&str] = &[
    "string", "text", "int", "float", "bool", "date", "datetime", "email", "file", "image",
];
pub const RELATION_TYPES: &[&str] = &["foreignkey", "onetoone", "manytomany"];

/// Second question a field type needs before it can be rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDetail {
    None,
    MaxLength,
    UploadTo,
    RelatedModel,
}

impl FieldKind {
    /// Normalise a prompt answer; `None` for unknown type names.
    pub fn keyword(input: &str) -> Option<&'static str> {
        match input.trim().to_lowercase().as_str() {
            "" | "string" | "str" | "char" => Some("string"),
            "text" => Some("text"),
            "int" | "integer" => Some("int"),
            "float" => Some("float"),
            "bool" | "boolean" => Some("bool"),
            "date" => Some("date"),
            "datetime" => Some("datetime"),
            "email" => Some("email"),
            "file" => Some("file"),
            "image" => Some("image"),
            "foreignkey" | "fk" => Some("foreignkey"),
            "onetoone" => Some("onetoone"),
            "manytomany" | "m2m" => Some("manytomany"),
            _ => None,
        }
    }

    pub fn detail_for(keyword: &str) -> FieldDetail {
        match keyword {
            "string" => FieldDetail::MaxLength,
            "file" | "image" => FieldDetail::UploadTo,
            "foreignkey" | "onetoone" | "manytomany" => FieldDetail::RelatedModel,
            _ => FieldDetail::None,
        }
    }

    /// Build a kind from a normalised keyword and the answer to its detail question.
    pub fn build(keyword: &str, detail: &str) -> Result<Self> {
        let detail = detail.trim();
        let kind = match keyword {
            "string" => FieldKind::String {
                max_length: if detail.is_empty() {
                    DEFAULT_MAX_LENGTH
                } else {
                    detail.parse().map_err(|_| {
                        GenError::Validation(format!("max length must be a number, got '{}'", detail))
                    })?
                },
            },
            "text" => FieldKind::Text,
            "int" => FieldKind::Integer,
            "float" => FieldKind::Float,
            "bool" => FieldKind::Boolean,
            "date" => FieldKind::Date,
            "datetime" => FieldKind::DateTime,
            "email" => FieldKind::Email,
            "file" => FieldKind::File {
                upload_to: or_default_upload(detail),
            },
            "image" => FieldKind::Image {
                upload_to: or_default_upload(detail),
            },
            "foreignkey" | "onetoone" | "manytomany" => {
                if detail.is_empty() {
                    return Err(GenError::Validation("a related model is required".to_string()));
                }
                let related = detail.to_string();
                match keyword {
                    "foreignkey" => FieldKind::ForeignKey { related },
                    "onetoone" => FieldKind::OneToOne { related },
                    _ => FieldKind::ManyToMany { related },
                }
            }
            other => return Err(GenError::Validation(format!("unknown field type '{}'", other))),
        };
        Ok(kind)
    }

    pub fn needs_media(&self) -> bool {
        matches!(self, FieldKind::File { .. } | FieldKind::Image { .. })
    }

    fn definition(&self) -> String {
        match self {
            FieldKind::String { max_length } => format!("models.CharField(max_length={})", max_length),
            FieldKind::Text => "models.TextField()".to_string(),
            FieldKind::Integer => "models.IntegerField()".to_string(),
            FieldKind::Float => "models.FloatField()".to_string(),
            FieldKind::Boolean => "models.BooleanField(default=False)".to_string(),
            FieldKind::Date => "models.DateField()".to_string(),
            FieldKind::DateTime => "models.DateTimeField(auto_now_add=True)".to_string(),
            FieldKind::Email => "models.EmailField()".to_string(),
            FieldKind::File { upload_to } => format!("models.FileField(upload_to='{}')", upload_to),
            FieldKind::Image { upload_to } => format!("models.ImageField(upload_to='{}')", upload_to),
            FieldKind::ForeignKey { related } => {
                format!("models.ForeignKey('{}', on_delete=models.CASCADE)", related)
            }
            FieldKind::OneToOne { related } => {
                format!("models.OneToOneField('{}', on_delete=models.CASCADE)", related)
            }
            FieldKind::ManyToMany { related } => format!("models.ManyToManyField('{}')", related),
        }
    }
}

fn or_default_upload(detail: &str) -> String {
    if detail.is_empty() {
        DEFAULT_UPLOAD_TO.to_string()
    } else {
        detail.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub nullable: bool,
}

impl FieldSpec {
    pub fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            nullable: false,
        }
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Right-hand side of the field assignment
    pub fn definition(&self) -> String {
        let base = self.kind.definition();
        if !self.nullable {
            return base;
        }
        if let Some(stripped) = base.strip_suffix("()") {
            format!("{}(null=True, blank=True)", stripped)
        } else {
            let open = &base[..base.len() - 1];
            format!("{}, null=True, blank=True)", open)
        }
    }

    /// Full line as it appears in a model body
    pub fn render(&self) -> String {
        format!("    {} = {}", self.name, self.definition())
    }
}

/// Derived spellings of an entity name used across generated files
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityNames {
    pub class: String,
    pub lower: String,
    pub plural: String,
}

impl EntityNames {
    pub fn new(name: &str) -> Result<Self> {
        validate_identifier(name, "entity")?;
        let lower = name.to_lowercase();
        Ok(Self {
            class: name.to_string(),
            plural: format!("{}s", lower),
            lower,
        })
    }
}

impl fmt::Display for EntityNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class)
    }
}

/// Reject names that cannot be used as Python identifiers
pub fn validate_identifier(name: &str, what: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(GenError::Validation(format!(
            "'{}' is not a valid {} name (letters, digits and underscores, not starting with a digit)",
            name, what
        )))
    }
}

/// App labels are module names: lowercase identifiers
pub fn validate_app_name(name: &str) -> Result<()> {
    validate_identifier(name, "app")?;
    if name.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(GenError::Validation(format!("app name '{}' must be lowercase", name)));
    }
    Ok(())
}

/// One resolved url pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub pattern: String,
    pub methods: String,
    pub view: String,
    pub name: String,
}

/// Group new accounts join on registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DefaultGroup {
    #[default]
    Member,
    Manager,
    AdminSite,
}

impl DefaultGroup {
    pub const ALL: [DefaultGroup; 3] = [DefaultGroup::Member, DefaultGroup::Manager, DefaultGroup::AdminSite];

    pub fn group_name(self) -> &'static str {
        match self {
            DefaultGroup::Member => "Member",
            DefaultGroup::Manager => "Manager",
            DefaultGroup::AdminSite => "Admin_Site",
        }
    }

    /// Menu choice `1`, `2` or `3`; anything else selects `Member`.
    pub fn from_choice(choice: &str) -> Self {
        match choice.trim() {
            "2" => DefaultGroup::Manager,
            "3" => DefaultGroup::AdminSite,
            _ => DefaultGroup::Member,
        }
    }
}

impl fmt::Display for DefaultGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.group_name())
    }
}

/// Answers gathered before the authentication app is generated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthOptions {
    pub app: String,
    pub two_factor: bool,
    pub welcome_email: bool,
    pub create_test_users: bool,
    pub landing_page: bool,
    pub admin_url: String,
    pub default_group: DefaultGroup,
}

impl AuthOptions {
    pub fn new(app: &str) -> Self {
        Self {
            app: app.to_string(),
            two_factor: false,
            welcome_email: true,
            create_test_users: true,
            landing_page: true,
            admin_url: "admin".to_string(),
            default_group: DefaultGroup::default(),
        }
    }

    /// Url prefix the app is mounted under in the project urls
    pub fn mount_prefix(&self) -> String {
        if self.landing_page {
            String::new()
        } else {
            format!("{}/", self.app)
        }
    }

    pub fn custom_admin(&self) -> bool {
        self.admin_url != "admin"
    }
}
