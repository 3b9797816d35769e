use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenError>;

#[derive(Error, Debug)]
pub enum GenError {
    // Standard library errors with automatic conversion
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Text patching
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    #[error("Missing prerequisite: {}", .0.display())]
    MissingPrerequisite(PathBuf),

    // External commands
    #[error("Command `{command}` failed with exit code {}", exit_code(.code))]
    Subprocess { command: String, code: Option<i32> },

    #[error("Command not found: {0}")]
    CommandNotFound(String),

    // Interactive flow
    #[error("Cancelled by user")]
    UserAbort,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn exit_code(code: &Option<i32>) -> String {
    code.map(|c| c.to_string()).unwrap_or_else(|| "none".to_string())
}

impl GenError {
    /// Soft failures are reported to the user but never stop a run.
    pub fn is_soft(&self) -> bool {
        matches!(self, GenError::MissingPrerequisite(_) | GenError::UserAbort)
    }
}

impl From<&str> for GenError {
    fn from(msg: &str) -> Self {
        GenError::Internal(msg.to_string())
    }
}

impl From<String> for GenError {
    fn from(msg: String) -> Self {
        GenError::Internal(msg)
    }
}

// Convert from anyhow::Error for CLI integration
impl From<anyhow::Error> for GenError {
    fn from(err: anyhow::Error) -> Self {
        GenError::Internal(err.to_string())
    }
}
