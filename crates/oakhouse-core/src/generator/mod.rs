//! File-writing generators for resources, scopes and project skeletons.
//!
//! A [`Generator`] is bound to a project root and its [`ProjectConfig`]. Each
//! operation renders embedded templates with a serializable context and writes
//! the result below the root, refusing to overwrite existing files unless
//! [`Generator::overwrite`] is set. Scope files are the exception: they are
//! appended to idempotently, see [`scope`], and integrations patch existing
//! files in place, see [`integrate`].

pub mod integrate;
pub mod project;
pub mod resource;
pub mod routes;
pub mod scope;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::ProjectConfig;
use crate::error::{OakhouseError, Result};
use crate::fields::{FieldSpec, FieldType, FieldView};
use crate::naming::ResourceName;
use crate::project::load_project;
use crate::templates::renderer::TemplateRenderer;

pub use integrate::{IntegrationReport, PatchStatus};
pub use resource::{ResourcePaths, ResourceReport};
pub use scope::ScopeReport;

/// Template context shared by all resource templates.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceContext {
    pub module: String,
    /// Go type name (`BlogPost`).
    pub model_name: String,
    /// Local variable name (`blogPost`).
    pub var_name: String,
    /// Package name for the DTO and scope packages (`blogpost`).
    pub package_name: String,
    pub table_name: String,
    /// URL segment the routes are mounted on (`blogposts`).
    pub route_path: String,
    pub fields: Vec<FieldView>,
    pub needs_uuid: bool,
    /// Imports the field types require (`time`, `github.com/google/uuid`).
    pub field_imports: Vec<String>,
}

impl ResourceContext {
    pub fn new(module: &str, name: &ResourceName, fields: &[FieldSpec]) -> Self {
        let has = |ty| fields.iter().any(|f| f.resolved_type == ty);
        let needs_time = has(FieldType::Timestamp);
        let needs_uuid = has(FieldType::Identifier);

        let mut field_imports = Vec::new();
        if needs_time {
            field_imports.push("time".to_string());
        }
        if needs_uuid {
            field_imports.push("github.com/google/uuid".to_string());
        }

        Self {
            module: module.to_string(),
            model_name: name.as_str().to_string(),
            var_name: name.camel(),
            package_name: name.lower(),
            table_name: name.table_name(),
            route_path: name.plural_lower(),
            fields: fields.iter().map(FieldSpec::view).collect(),
            needs_uuid,
            field_imports,
        }
    }
}

/// Writes generated files into one project.
pub struct Generator {
    root: PathBuf,
    config: ProjectConfig,
    renderer: TemplateRenderer,
    overwrite: bool,
}

impl Generator {
    pub fn new(root: &Path, config: ProjectConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
            renderer: TemplateRenderer::new(),
            overwrite: false,
        }
    }

    /// Load the project at `root` and bind a generator to it.
    pub fn open(root: &Path) -> Result<Self> {
        let config = load_project(root)?;
        Ok(Self::new(root, config))
    }

    /// Allow replacing files that already exist.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Absolute path of the central route file.
    pub fn route_file(&self) -> PathBuf {
        self.root.join(&self.config.routes.file)
    }

    fn context(&self, name: &ResourceName, fields: &[FieldSpec]) -> ResourceContext {
        ResourceContext::new(&self.config.module, name, fields)
    }

    /// Render `template` and write it to `rel` below the root.
    fn render_to<T: Serialize>(&self, rel: &Path, template: &str, data: &T) -> Result<PathBuf> {
        let content = self.renderer.render(template, data)?;
        self.write_file(rel, &content)
    }

    fn write_file(&self, rel: &Path, content: &str) -> Result<PathBuf> {
        let path = self.root.join(rel);
        if path.exists() && !self.overwrite {
            return Err(OakhouseError::FileConflict(vec![rel.to_path_buf()]));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        tracing::info!("wrote {}", rel.display());
        Ok(rel.to_path_buf())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;

    use super::Generator;
    use crate::config::ProjectConfig;
    use crate::templates::{embedded, renderer::TemplateRenderer};

    /// A generator over a minimal project with the default route file.
    pub fn generator(root: &Path) -> Generator {
        let renderer = TemplateRenderer::new();
        let route = renderer
            .render(
                embedded::ROUTE_V1,
                &serde_json::json!({ "name": "shop", "module": "example.com/shop" }),
            )
            .unwrap();
        std::fs::create_dir_all(root.join("route")).unwrap();
        std::fs::write(root.join("route/v1.go"), route).unwrap();
        Generator::new(root, ProjectConfig::new("shop", "example.com/shop"))
    }
}
