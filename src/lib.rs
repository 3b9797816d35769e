pub mod config;
pub mod error;
pub mod logging;
pub mod manage;
pub mod models;
pub mod patch;
pub mod project;
pub mod prompt;
pub mod routes;
pub mod scaffold;
pub mod templates;
pub mod test_helpers;

pub use error::{GenError, Result};
pub use models::{AuthOptions, EntityNames, FieldKind, FieldSpec, RouteEntry};
pub use project::ProjectContext;
