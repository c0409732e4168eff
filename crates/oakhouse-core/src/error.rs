//! Unified error types for the oakhouse toolkit.

use std::path::PathBuf;
use thiserror::Error;

use crate::splice::SpliceError;

/// All errors that can occur during oakhouse operations.
#[derive(Error, Debug)]
pub enum OakhouseError {
    // --- Configuration ---

    /// `oakhouse.config.json` exists but could not be read.
    #[error("failed to read config at {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file exists but contains invalid JSON.
    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // --- Project ---

    /// Attempted to create a project in a directory that already exists.
    #[error("project directory already exists: {0}")]
    ProjectExists(PathBuf),

    /// The directory has neither `oakhouse.config.json` nor `go.mod`.
    #[error("not an oakhouse project (missing oakhouse.config.json and go.mod) at {0}")]
    NotAProject(PathBuf),

    /// `go.mod` was found but has no `module` line.
    #[error("module name not found in {0}")]
    ModuleNameMissing(PathBuf),

    // --- Validation ---

    /// The project name cannot be used as a directory and module path.
    #[error("invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    /// The resource name is empty, not PascalCase, or a Go keyword.
    #[error("invalid resource name '{name}': {reason}")]
    InvalidResourceName { name: String, reason: String },

    /// A `name:type` token was rejected by strict validation.
    #[error("invalid field '{token}': {reason}")]
    InvalidField { token: String, reason: String },

    /// Generated files already exist and overwriting was not requested.
    #[error("{} file(s) already exist (use --force to overwrite)", .0.len())]
    FileConflict(Vec<PathBuf>),

    // --- Templates ---

    /// Handlebars template rendering failed (invalid template or missing variables).
    #[error("template rendering failed: {0}")]
    TemplateRender(String),

    // --- Routes ---

    /// The central route file does not exist.
    #[error("route file not found at {path} (run from the root of an oakhouse project)")]
    RouteFileNotFound { path: PathBuf },

    /// The route file exists but its setup function could not be edited.
    #[error("cannot register routes in {path}")]
    RouteSplice {
        path: PathBuf,
        #[source]
        source: SpliceError,
    },

    // --- Integrations ---

    /// A project file an integration patches does not exist.
    #[error("cannot integrate: {path} not found")]
    PatchTargetNotFound { path: PathBuf },

    /// A project file no longer has the code an integration patches around.
    #[error("cannot integrate: {path} has no `{anchor}`")]
    PatchAnchorNotFound { path: PathBuf, anchor: String },

    // --- Toolchain ---

    /// A required external tool (`go`) is not installed.
    #[error("required tool '{name}' not found; install: {install}")]
    MissingTool { name: String, install: String },

    /// An external command exited unsuccessfully.
    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    // --- General ---

    /// A filesystem I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A catch-all for errors from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Alias for `Result<T, OakhouseError>`.
pub type Result<T> = std::result::Result<T, OakhouseError>;
