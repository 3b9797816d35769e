//! Minimal Django project tree for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use djangogen::config::ProjectConfig;
use djangogen::ProjectContext;

const SETTINGS_PY: &str = "from pathlib import Path

BASE_DIR = Path(__file__).resolve().parent.parent

SECRET_KEY = 'django-insecure-abc'

DEBUG = True

ALLOWED_HOSTS = []

INSTALLED_APPS = [
    'django.contrib.admin',
    'django.contrib.auth',
    'django.contrib.contenttypes',
    'django.contrib.sessions',
    'django.contrib.messages',
    'django.contrib.staticfiles',
]

STATIC_URL = 'static/'
";

const URLS_PY: &str = r#""""
URL configuration for {{PROJECT}} project.

The `urlpatterns` list routes URLs to views. For more information please see:
    https://docs.djangoproject.com/en/5.0/topics/http/urls/
Examples:
Function views
    1. Add an import:  from my_app import views
    2. Add a URL to urlpatterns:  path('', views.home, name='home')
Class-based views
    1. Add an import:  from other_app.views import Home
    2. Add a URL to urlpatterns:  path('', Home.as_view(), name='home')
Including another URLconf
    1. Import the include() function: from django.urls import include, path
    2. Add a URL to urlpatterns:  path('blog/', include('blog.urls'))
"""
from django.contrib import admin
from django.urls import path

urlpatterns = [
    path('admin/', admin.site.urls),
]
"#;

pub struct DjangoTree {
    dir: TempDir,
    pub name: String,
}

impl DjangoTree {
    pub fn new(name: &str) -> Self {
        let tree = Self {
            dir: TempDir::new().expect("temp dir"),
            name: name.to_string(),
        };
        tree.write("manage.py", "#!/usr/bin/env python\n");
        tree.write(&format!("{}/__init__.py", name), "");
        tree.write(&format!("{}/settings.py", name), SETTINGS_PY);
        tree.write(&format!("{}/urls.py", name), &URLS_PY.replace("{{PROJECT}}", name));
        tree
    }

    /// Files `manage.py startapp` would create, minus admin and tests
    pub fn with_app(self, app: &str) -> Self {
        self.write(&format!("{}/__init__.py", app), "");
        self.write(
            &format!("{}/apps.py", app),
            &format!(
                "from django.apps import AppConfig\n\n\nclass AppNameConfig(AppConfig):\n    default_auto_field = 'django.db.models.BigAutoField'\n    name = '{}'\n",
                app
            ),
        );
        self.write(&format!("{}/models.py", app), "from django.db import models\n\n# Create your models here.\n");
        self.write(&format!("{}/migrations/__init__.py", app), "");
        self
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, content).expect("write file");
        path
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap_or_else(|e| panic!("read {}: {}", relative, e))
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn context(&self) -> ProjectContext {
        ProjectContext::resolve(&ProjectConfig {
            root: self.root().to_path_buf(),
            ..ProjectConfig::default()
        })
    }

    /// Every file under the root with its content, sorted by path
    pub fn snapshot(&self) -> Vec<(PathBuf, String)> {
        let mut files: Vec<(PathBuf, String)> = walkdir::WalkDir::new(self.root())
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                let content = fs::read_to_string(e.path()).unwrap_or_default();
                (e.into_path(), content)
            })
            .collect();
        files.sort();
        files
    }
}
