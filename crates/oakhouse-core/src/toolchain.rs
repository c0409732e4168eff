//! Wrapper around the Go toolchain, plus version parsing for prerequisite checks.
//!
//! `oakhouse new` runs `go mod tidy` in the fresh project, `oakhouse serve`
//! runs the app (through `air` when it is installed, for live reload), and
//! `oakhouse build` compiles it to `bin/app`. A Go older than
//! [`MIN_GO_VERSION`] only produces a warning.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{OakhouseError, Result};

/// Oldest Go release the generated `go.mod` targets.
pub const MIN_GO_VERSION: Version = Version {
    major: 1,
    minor: 21,
    patch: 0,
};

/// Where `oakhouse build` puts the binary, relative to the project root.
pub const BUILD_OUTPUT: &str = "bin/app";

/// A semver-like version with major.minor.patch components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Parse the first `X.Y` or `X.Y.Z` pattern found in a string.
    ///
    /// Handles common formats:
    /// - `"1.21.5"`
    /// - `"go version go1.22.0 linux/amd64"`
    /// - `"go version go1.20 darwin/arm64"` (patch defaults to 0)
    /// - `"air v1.49.0"`
    pub fn parse(s: &str) -> Option<Self> {
        s.char_indices()
            .filter(|(_, c)| c.is_ascii_digit())
            .find_map(|(i, _)| Self::parse_at(&s[i..]))
    }

    fn parse_at(s: &str) -> Option<Self> {
        let (major, rest) = leading_number(s)?;
        let (minor, rest) = leading_number(rest.strip_prefix('.')?)?;
        let patch = rest
            .strip_prefix('.')
            .and_then(leading_number)
            .map_or(0, |(patch, _)| patch);
        Some(Self {
            major,
            minor,
            patch,
        })
    }
}

fn leading_number(s: &str) -> Option<(u32, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let value = s[..end].parse().ok()?;
    Some((value, &s[end..]))
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Run `tool <args>` and parse a version from its output.
///
/// Returns `None` if the tool is not found, exits with error, or
/// produces output that doesn't contain a version pattern.
pub fn detect_version(tool: &str, args: &[&str]) -> Option<Version> {
    let output = Command::new(tool).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Version::parse(&String::from_utf8_lossy(&output.stdout))
        .or_else(|| Version::parse(&String::from_utf8_lossy(&output.stderr)))
}

/// Installed Go version, if `go` is on `PATH`.
pub fn detect_go_version() -> Option<Version> {
    detect_version("go", &["version"])
}

/// How `oakhouse serve` starts the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeMode {
    /// `air`, rebuilding on file changes.
    LiveReload,
    /// `go run ./cmd`.
    GoRun,
}

/// Wrapper around the `go` CLI.
pub struct GoCli {
    binary: PathBuf,
}

impl GoCli {
    /// Create a new wrapper, verifying Go is installed.
    pub fn new() -> Result<Self> {
        let binary = which::which("go").map_err(|_| OakhouseError::MissingTool {
            name: "go".into(),
            install: "https://go.dev/dl/".into(),
        })?;
        Ok(Self { binary })
    }

    /// Installed version, warning when it is older than [`MIN_GO_VERSION`].
    pub fn check_version(&self) -> Option<Version> {
        let version = detect_version(&self.binary.to_string_lossy(), &["version"]);
        match version {
            Some(v) if v < MIN_GO_VERSION => {
                tracing::warn!("Go {v} is older than the supported minimum {MIN_GO_VERSION}");
            }
            Some(v) => tracing::debug!("found Go {v}"),
            None => tracing::warn!("could not determine the installed Go version"),
        }
        version
    }

    /// Run `go mod tidy` in `project_dir`.
    pub fn mod_tidy(&self, project_dir: &Path) -> Result<()> {
        tracing::info!("running go mod tidy in {}", project_dir.display());
        let output = Command::new(&self.binary)
            .args(["mod", "tidy"])
            .current_dir(project_dir)
            .output()?;

        if !output.status.success() {
            return Err(OakhouseError::CommandFailed {
                command: "go mod tidy".into(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }

    /// Compile the project to [`BUILD_OUTPUT`], returning the binary path.
    pub fn build(&self, project_dir: &Path) -> Result<PathBuf> {
        require_entrypoint(project_dir)?;

        let output = Command::new(&self.binary)
            .args(["build", "-o", BUILD_OUTPUT, "./cmd"])
            .current_dir(project_dir)
            .output()?;

        if !output.status.success() {
            return Err(OakhouseError::CommandFailed {
                command: format!("go build -o {BUILD_OUTPUT} ./cmd"),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(project_dir.join(BUILD_OUTPUT))
    }

    /// Run the application in the foreground until it exits.
    ///
    /// `host` and `port` are passed to the app as `APP_HOST`, `APP_PORT` and `PORT`.
    pub fn serve(&self, project_dir: &Path, host: &str, port: u16) -> Result<ServeMode> {
        require_entrypoint(project_dir)?;

        let (mut cmd, mode, label) = match which::which("air") {
            Ok(air) => (Command::new(air), ServeMode::LiveReload, "air".to_string()),
            Err(_) => {
                tracing::info!("air not found, falling back to go run");
                let mut cmd = Command::new(&self.binary);
                cmd.args(["run", "./cmd"]);
                (cmd, ServeMode::GoRun, "go run ./cmd".to_string())
            }
        };

        let status = cmd
            .current_dir(project_dir)
            .env("APP_HOST", host)
            .env("APP_PORT", port.to_string())
            .env("PORT", port.to_string())
            .status()?;

        if !status.success() {
            return Err(OakhouseError::CommandFailed {
                command: label,
                stderr: status.to_string(),
            });
        }
        Ok(mode)
    }
}

fn require_entrypoint(project_dir: &Path) -> Result<()> {
    if project_dir.join("cmd/main.go").exists() {
        Ok(())
    } else {
        Err(OakhouseError::NotAProject(project_dir.to_path_buf()))
    }
}
