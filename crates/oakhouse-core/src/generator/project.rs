//! Project skeleton: the directories and files `oakhouse new` writes.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;
use crate::templates::embedded;
use crate::templates::renderer::TemplateRenderer;

/// Directories created in every new project.
pub const PROJECT_DIRS: &[&str] = &[
    "cmd",
    "config",
    "adapter",
    "handler",
    "service",
    "repository",
    "model",
    "dto",
    "scope",
    "route",
    "util",
    "middleware",
];

/// Skeleton files and their templates, in write order.
pub const PROJECT_FILES: &[(&str, &str)] = &[
    ("go.mod", embedded::GO_MOD),
    (".env.example", embedded::ENV_EXAMPLE),
    (".gitignore", embedded::GITIGNORE),
    ("Dockerfile", embedded::DOCKERFILE),
    ("Makefile", embedded::MAKEFILE),
    ("cmd/main.go", embedded::MAIN_GO),
    ("cmd/app_server.go", embedded::APP_SERVER),
    ("config/env_config.go", embedded::ENV_CONFIG),
    ("route/v1.go", embedded::ROUTE_V1),
    ("adapter/database_adapter.go", embedded::DATABASE_ADAPTER),
    ("util/response.go", embedded::RESPONSE_UTIL),
    ("util/pagination.go", embedded::PAGINATION_UTIL),
    ("scope/base_scope.go", embedded::BASE_SCOPE),
    ("middleware/auth.go", embedded::AUTH_MIDDLEWARE),
];

/// Template context for skeleton files.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectContext {
    pub name: String,
    pub module: String,
    pub version: String,
}

/// Render every skeleton file into `project_dir`, returning the relative paths written.
pub fn render_skeleton(
    project_dir: &Path,
    ctx: &ProjectContext,
    renderer: &TemplateRenderer,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(PROJECT_FILES.len());
    for (rel, template) in PROJECT_FILES {
        let content = renderer.render(template, ctx)?;
        let path = project_dir.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        tracing::debug!("wrote {rel}");
        written.push(PathBuf::from(rel));
    }
    Ok(written)
}
