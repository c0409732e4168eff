//! Project configuration (`oakhouse.config.json`).
//!
//! Written by `oakhouse new` into the project root. Every key has a serde
//! default, so hand-edited or partial configs still load; projects created
//! before the config existed are handled by [`crate::project::load_project`],
//! which falls back to defaults plus the module path from `go.mod`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{OakhouseError, Result};
use crate::splice::RouteLayout;

/// File name of the project configuration, relative to the project root.
pub const CONFIG_FILE: &str = "oakhouse.config.json";

/// Top-level project configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Project (directory) name.
    pub name: String,
    /// Go module path, used in generated import paths.
    pub module: String,
    /// Version of oakhouse that scaffolded the project.
    pub generator_version: String,
    pub routes: RoutesConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            module: String::new(),
            generator_version: crate::VERSION.to_string(),
            routes: RoutesConfig::default(),
        }
    }
}

/// Where the central route file lives and how registrations are spliced into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Route file, relative to the project root.
    pub file: PathBuf,
    #[serde(flatten)]
    pub layout: RouteLayout,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("route/v1.go"),
            layout: RouteLayout::default(),
        }
    }
}

impl ProjectConfig {
    /// Config for a freshly scaffolded project.
    pub fn new(name: &str, module: &str) -> Self {
        Self {
            name: name.to_string(),
            module: module.to_string(),
            ..Self::default()
        }
    }

    /// Load a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| OakhouseError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| OakhouseError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save the config as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(|e| OakhouseError::Other(e.into()))?;
        std::fs::write(path, content + "\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let mut config = ProjectConfig::new("shop", "github.com/acme/shop");
        config.routes.layout.group_path = "/api/v2".into();
        config.save(&path).unwrap();

        let loaded = ProjectConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_layout_keys_are_flattened() {
        let json = serde_json::to_value(ProjectConfig::new("shop", "shop")).unwrap();
        assert_eq!(json["routes"]["file"], "route/v1.go");
        assert_eq!(json["routes"]["group_var"], "v1");
        assert_eq!(json["routes"]["section_comment"], "// Setup resource routes");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: ProjectConfig =
            serde_json::from_str(r#"{"name": "shop", "routes": {"group_path": "/v2"}}"#).unwrap();
        assert_eq!(config.name, "shop");
        assert_eq!(config.module, "");
        assert_eq!(config.routes.file, PathBuf::from("route/v1.go"));
        assert_eq!(config.routes.layout.group_path, "/v2");
        assert_eq!(config.routes.layout.group_var, "v1");
        assert_eq!(config.routes.layout.setup_markers.len(), 2);
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        let err = ProjectConfig::load(&path).unwrap_err();
        assert!(matches!(err, OakhouseError::ConfigParse { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProjectConfig::load(&dir.path().join(CONFIG_FILE)).unwrap_err();
        assert!(matches!(err, OakhouseError::ConfigRead { .. }));
    }
}
