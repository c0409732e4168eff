//! Route file I/O around the pure splicer.
//!
//! The whole file is read, the new text is computed in memory, and the file is
//! written back with a single `fs::write`, only when something changed. A
//! splice error leaves the file untouched.

use std::path::Path;

use crate::error::{OakhouseError, Result};
use crate::splice::{RouteLayout, RouteSplicer, SpliceOutcome, SpliceStatus};

/// Compute the registration of `resource` in the route file without writing.
pub fn preview_route_registration(path: &Path, layout: &RouteLayout, resource: &str) -> Result<SpliceOutcome> {
    if !path.exists() {
        return Err(OakhouseError::RouteFileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path)?;
    RouteSplicer::new(layout.clone())
        .splice(&text, resource)
        .map_err(|source| OakhouseError::RouteSplice {
            path: path.to_path_buf(),
            source,
        })
}

/// Register `Setup<resource>Routes` in the route file at `path`.
pub fn register_route_file(path: &Path, layout: &RouteLayout, resource: &str) -> Result<SpliceStatus> {
    let outcome = preview_route_registration(path, layout, resource)?;
    match outcome.status {
        SpliceStatus::Registered => {
            std::fs::write(path, &outcome.text)?;
            tracing::info!("registered {resource} routes in {}", path.display());
        }
        SpliceStatus::AlreadyRegistered => {
            tracing::info!("{resource} routes already registered in {}", path.display());
        }
    }
    Ok(outcome.status)
}
