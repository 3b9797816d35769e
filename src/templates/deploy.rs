//! Deployment descriptors.

use serde::{Deserialize, Serialize};

use crate::Result;

pub const BUILD_COMMAND: &str = "pip install -r requirements.txt && python manage.py collectstatic --noinput";

pub fn procfile(project_name: &str) -> String {
    format!(
        "web: gunicorn {}.wsgi --log-file -\nrelease: python manage.py migrate --noinput\n",
        project_name
    )
}

/// Settings lines that read production values from the environment
pub const DEBUG_FROM_ENV: &str = "DEBUG = os.environ.get('DEBUG', 'False').lower() in ('1', 'true', 'yes')";
pub const ALLOWED_HOSTS_FROM_ENV: &str =
    "ALLOWED_HOSTS = [h for h in os.environ.get('ALLOWED_HOSTS', 'localhost,127.0.0.1').split(',') if h]";
pub const SECRET_KEY_FROM_ENV: &str = "SECRET_KEY = os.environ.get('SECRET_KEY') or '";
pub const STATIC_ROOT: &str = "BASE_DIR / 'staticfiles'";

/// `render.yaml` blueprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderBlueprint {
    pub services: Vec<RenderService>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderService {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub runtime: String,
    pub build_command: String,
    pub start_command: String,
    pub env_vars: Vec<EnvVar>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvVar {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate_value: Option<bool>,
}

impl EnvVar {
    fn value(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: Some(value.to_string()),
            generate_value: None,
        }
    }

    /// Value generated by the platform on first deploy
    fn generated(key: &str) -> Self {
        Self {
            key: key.to_string(),
            value: None,
            generate_value: Some(true),
        }
    }
}

impl RenderBlueprint {
    pub fn for_project(project_name: &str) -> Self {
        let service_name = project_name.replace('_', "-");
        Self {
            services: vec![RenderService {
                kind: "web".to_string(),
                name: service_name.clone(),
                runtime: "python".to_string(),
                build_command: BUILD_COMMAND.to_string(),
                start_command: format!("gunicorn {}.wsgi", project_name),
                env_vars: vec![
                    EnvVar::generated("SECRET_KEY"),
                    EnvVar::value("DEBUG", "False"),
                    EnvVar::value("ALLOWED_HOSTS", &format!("{}.onrender.com", service_name)),
                    EnvVar::value("PYTHON_VERSION", "3.11.0"),
                ],
            }],
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_procfile() {
        assert_eq!(
            procfile("school"),
            "web: gunicorn school.wsgi --log-file -\nrelease: python manage.py migrate --noinput\n"
        );
    }

    #[test]
    fn test_render_blueprint_yaml() {
        let yaml = RenderBlueprint::for_project("my_school").to_yaml().unwrap();
        assert!(yaml.contains("type: web"));
        assert!(yaml.contains("name: my-school"));
        assert!(yaml.contains("startCommand: gunicorn my_school.wsgi"));
        assert!(yaml.contains("generateValue: true"));
        assert!(!yaml.contains("generateValue: null"));

        let parsed: RenderBlueprint = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.services[0].env_vars.len(), 4);
    }
}
