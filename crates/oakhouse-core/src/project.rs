//! Project directory creation and config I/O.
//!
//! Provides [`create_project`] for `oakhouse new`, and [`load_project`] for
//! every other command to locate an existing project's configuration.
//!
//! ## Directory layout
//!
//! ```text
//! <project>/
//! ├── oakhouse.config.json   # ProjectConfig
//! ├── go.mod
//! ├── cmd/                   # main.go, app_server.go
//! ├── route/v1.go            # SetupRoutes, where resources are registered
//! ├── model/ repository/ service/ handler/ dto/ scope/
//! └── adapter/ config/ util/ middleware/
//! ```

use std::path::{Path, PathBuf};

use crate::config::{ProjectConfig, CONFIG_FILE};
use crate::error::{OakhouseError, Result};
use crate::generator::project::{render_skeleton, ProjectContext, PROJECT_DIRS};
use crate::templates::renderer::TemplateRenderer;

/// Check a project name before using it as a directory and Go module path.
pub fn validate_project_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| OakhouseError::InvalidProjectName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let mut chars = name.chars();
    match chars.next() {
        None => return Err(invalid("project name cannot be empty")),
        Some(c) if !c.is_ascii_alphabetic() => return Err(invalid("must start with a letter")),
        Some(_) => {}
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(invalid("may only contain letters, digits, '-' and '_'"));
    }
    Ok(())
}

/// Create the project directory structure.
pub fn create_project_dirs(project_dir: &Path) -> Result<()> {
    if project_dir.exists() {
        return Err(OakhouseError::ProjectExists(project_dir.to_path_buf()));
    }

    std::fs::create_dir_all(project_dir)?;
    for dir in PROJECT_DIRS {
        std::fs::create_dir_all(project_dir.join(dir))?;
    }
    Ok(())
}

/// Scaffold a new project in `project_dir`, returning the files written.
pub fn create_project(project_dir: &Path, name: &str, module: &str) -> Result<Vec<PathBuf>> {
    validate_project_name(name)?;
    create_project_dirs(project_dir)?;

    let config = ProjectConfig::new(name, module);
    let ctx = ProjectContext {
        name: name.to_string(),
        module: module.to_string(),
        version: config.generator_version.clone(),
    };
    let mut files = render_skeleton(project_dir, &ctx, &TemplateRenderer::new())?;

    config.save(&project_dir.join(CONFIG_FILE))?;
    files.push(PathBuf::from(CONFIG_FILE));

    tracing::info!("created project {name} at {}", project_dir.display());
    Ok(files)
}

/// Load the configuration of the project rooted at `project_dir`.
///
/// Projects without `oakhouse.config.json` get the default config with the
/// module path read from `go.mod`. An empty `module` in the config is filled
/// the same way.
pub fn load_project(project_dir: &Path) -> Result<ProjectConfig> {
    let config_path = project_dir.join(CONFIG_FILE);
    let go_mod = project_dir.join("go.mod");

    let mut config = if config_path.exists() {
        ProjectConfig::load(&config_path)?
    } else if go_mod.exists() {
        tracing::debug!("no {CONFIG_FILE}, using defaults");
        ProjectConfig::default()
    } else {
        return Err(OakhouseError::NotAProject(project_dir.to_path_buf()));
    };

    if config.module.is_empty() {
        config.module = module_name(&go_mod)?;
    }
    if config.name.is_empty() {
        config.name = config.module.rsplit('/').next().unwrap_or_default().to_string();
    }
    Ok(config)
}

/// Read the module path from a `go.mod` file.
pub fn module_name(go_mod: &Path) -> Result<String> {
    let content = std::fs::read_to_string(go_mod).map_err(|source| OakhouseError::ConfigRead {
        path: go_mod.to_path_buf(),
        source,
    })?;
    content
        .lines()
        .filter_map(|line| line.trim().strip_prefix("module"))
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .map(|rest| rest.trim().trim_matches('"').to_string())
        .find(|module| !module.is_empty())
        .ok_or_else(|| OakhouseError::ModuleNameMissing(go_mod.to_path_buf()))
}
