//! Idempotent route registration in the central route file.
//!
//! Every generated resource ships a `Setup<Name>Routes(router)` function in
//! `route/<name>.go`. To make those routes live, a call to it has to appear
//! inside the project's route setup function (`SetupRoutes` in
//! `route/v1.go`). [`RouteSplicer`] computes that edit as a pure
//! text-to-text function:
//!
//! 1. locate the setup function (hard error if absent),
//! 2. return the text unchanged if the resource is already registered,
//! 3. add the router group declaration if missing, above any existing
//!    section comment,
//! 4. reuse the last section comment after the group, or add one above the
//!    first known anchor comment or else before the closing brace,
//! 5. insert the call after the last registration in the section.
//!
//! Only insertions are made; every other line keeps its bytes and order, and
//! inserted lines follow the file's line ending. A one-line function body (`func SetupRoutes(app) { }`) is first expanded onto
//! separate lines.
//!
//! The file read and write live in [`crate::generator::routes`]. The route
//! file is assumed to have a single writer: two generator runs against the
//! same project at once can lose a registration.

pub mod locate;
pub mod state;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use locate::{FunctionBounds, FunctionLocator, LineScanLocator};
pub use state::RouteFileState;

/// Why the route file could not be edited.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpliceError {
    /// No line declares the setup function.
    #[error("setup function not found (expected a line containing `{marker}`)")]
    SetupFunctionNotFound { marker: String },

    /// The declaration was found but no `}` closes it at the same indentation.
    #[error(
        "setup function `{marker}` declared on line {line} has no closing brace at its indentation \
         (unsupported formatting; restore the generated layout or re-scaffold the file)"
    )]
    UnterminatedFunction { marker: String, line: usize },

    /// The resource cannot form a `Setup<Name>Routes` identifier.
    #[error("`{resource}` is not a valid Go identifier for a route registration")]
    InvalidResource { resource: String },
}

/// Shape of the route file the splicer expects and the lines it inserts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteLayout {
    /// Declaration markers, tried in order.
    pub setup_markers: Vec<String>,
    /// Variable holding the versioned router group.
    pub group_var: String,
    /// Path prefix passed to `Group(...)` when the group has to be created.
    pub group_path: String,
    /// Comment inserted above a created group declaration.
    pub group_comment: String,
    /// Comment heading the block of registration calls.
    pub section_comment: String,
    /// Comments the section is placed above when it has to be created.
    pub section_anchors: Vec<String>,
}

impl Default for RouteLayout {
    fn default() -> Self {
        Self {
            setup_markers: vec!["func SetupRoutes(".into(), "func SetupV1Routes(".into()],
            group_var: "v1".into(),
            group_path: "/api/v1".into(),
            group_comment: "// API v1 routes".into(),
            section_comment: "// Setup resource routes".into(),
            section_anchors: vec!["// Initialize repositories".into(), "// Public routes".into()],
        }
    }
}

impl RouteLayout {
    /// The registration statement for `resource`, e.g. `SetupUserRoutes(v1)`.
    pub fn registration_call(&self, resource: &str) -> String {
        format!("Setup{resource}Routes({})", self.group_var)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpliceStatus {
    Registered,
    AlreadyRegistered,
}

/// New file text plus what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpliceOutcome {
    pub text: String,
    pub status: SpliceStatus,
}

/// Computes route registration edits.
#[derive(Debug, Clone)]
pub struct RouteSplicer<L = LineScanLocator> {
    layout: RouteLayout,
    locator: L,
}

impl RouteSplicer<LineScanLocator> {
    /// Splicer using the line-scan locator over the layout's markers.
    pub fn new(layout: RouteLayout) -> Self {
        let locator = LineScanLocator::new(layout.setup_markers.clone());
        Self { layout, locator }
    }
}

impl Default for RouteSplicer<LineScanLocator> {
    fn default() -> Self {
        Self::new(RouteLayout::default())
    }
}

impl<L: FunctionLocator> RouteSplicer<L> {
    pub fn with_locator(layout: RouteLayout, locator: L) -> Self {
        Self { layout, locator }
    }

    pub fn layout(&self) -> &RouteLayout {
        &self.layout
    }

    /// Locate the setup function in `text`.
    pub fn locate(&self, text: &str) -> Result<FunctionBounds, SpliceError> {
        self.locator.locate(text)
    }

    /// Register `resource` in `text`, returning the full new text.
    pub fn splice(&self, text: &str, resource: &str) -> Result<SpliceOutcome, SpliceError> {
        if !is_identifier(resource) {
            return Err(SpliceError::InvalidResource {
                resource: resource.to_string(),
            });
        }

        let state = RouteFileState::scan(text, &self.locator, &self.layout)?;

        if state.is_registered(resource) {
            tracing::debug!("{resource} routes already registered");
            return Ok(SpliceOutcome {
                text: text.to_string(),
                status: SpliceStatus::AlreadyRegistered,
            });
        }

        if state.function_bounds.inline {
            let expanded = expand_inline(text, &state.function_bounds, &state.body_indent);
            return self.splice(&expanded, resource);
        }

        let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        let declaration = state.function_bounds.declaration_line;
        let mut closing = state.function_bounds.closing_line;
        let indent = state.body_indent.as_str();
        let eol = line_ending(&lines[declaration]);

        let group = match state.group_declaration_index {
            Some(index) => index,
            None => {
                // Above an existing section so its registrations follow the group.
                let at = state.section_comment_indices.first().copied().unwrap_or(closing);
                tracing::debug!("adding `{}` group declaration", self.layout.group_var);
                let mut block = Vec::new();
                if needs_separator(&lines, at, declaration) {
                    block.push(String::new());
                }
                block.push(format!("{indent}{}", self.layout.group_comment));
                block.push(format!(
                    "{indent}{} := {}.Group(\"{}\")",
                    self.layout.group_var, state.router_param, self.layout.group_path
                ));
                let index = at + block.len() - 1;
                if at < closing {
                    block.push(String::new());
                }
                closing += insert_lines(&mut lines, at, block, eol);
                index
            }
        };

        let existing_section = (group + 1..closing)
            .rev()
            .find(|&i| lines[i].trim_start().starts_with(self.layout.section_comment.as_str()));
        let section = match existing_section {
            Some(index) => index,
            None => {
                let anchor = self.layout.section_anchors.iter().find_map(|anchor| {
                    (group + 1..closing).find(|&i| lines[i].trim_start().starts_with(anchor.as_str()))
                });
                match anchor {
                    Some(index) => {
                        tracing::debug!("adding section comment above `{}`", lines[index].trim());
                        let block = vec![format!("{indent}{}", self.layout.section_comment), String::new()];
                        closing += insert_lines(&mut lines, index, block, eol);
                        index
                    }
                    None => {
                        tracing::debug!("adding section comment before closing brace");
                        let mut block = Vec::new();
                        if needs_separator(&lines, closing, declaration) {
                            block.push(String::new());
                        }
                        block.push(format!("{indent}{}", self.layout.section_comment));
                        let index = closing + block.len() - 1;
                        closing += insert_lines(&mut lines, closing, block, eol);
                        index
                    }
                }
            }
        };

        let mut last_registration = None;
        for (i, line) in lines.iter().enumerate().take(closing).skip(section + 1) {
            if state::registration_name(line).is_some() {
                last_registration = Some(i);
            } else if !line.trim().is_empty() {
                break;
            }
        }

        let section_indent = locate::leading_whitespace(&lines[section]).to_string();
        let at = last_registration.unwrap_or(section) + 1;
        lines.insert(
            at,
            format!("{section_indent}{}{eol}", self.layout.registration_call(resource)),
        );

        Ok(SpliceOutcome {
            text: lines.join("\n"),
            status: SpliceStatus::Registered,
        })
    }

    /// Register `resource` in `text`, returning only the new text.
    pub fn register(&self, text: &str, resource: &str) -> Result<String, SpliceError> {
        self.splice(text, resource).map(|outcome| outcome.text)
    }
}

/// Register `resource` using the default layout.
pub fn register_route(text: &str, resource: &str) -> Result<String, SpliceError> {
    RouteSplicer::default().register(text, resource)
}

/// Locate the setup function using the default layout.
pub fn locate_setup_function(text: &str) -> Result<FunctionBounds, SpliceError> {
    RouteSplicer::default().locate(text)
}

/// Insert `block` at `at`, each line terminated like the rest of the file.
fn insert_lines(lines: &mut Vec<String>, at: usize, block: Vec<String>, eol: &str) -> usize {
    let count = block.len();
    lines.splice(at..at, block.into_iter().map(|line| format!("{line}{eol}")));
    count
}

/// `"\r"` for CRLF files, since lines are split on `\n` only.
fn line_ending(line: &str) -> &'static str {
    if line.ends_with('\r') {
        "\r"
    } else {
        ""
    }
}

/// `[A-Za-z][A-Za-z0-9_]*`: the resource part of `Setup<Name>Routes`.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A blank line goes before an inserted block unless it opens the body or
/// already follows a blank line.
fn needs_separator(lines: &[String], at: usize, declaration: usize) -> bool {
    at > declaration + 1 && !lines[at - 1].trim().is_empty()
}

/// Rewrite `func X(...) { body }` as a multi-line function.
fn expand_inline(text: &str, bounds: &FunctionBounds, body_indent: &str) -> String {
    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    let line = lines[bounds.declaration_line].clone();
    let Some((open, close)) = locate::inline_body(&line, &bounds.marker) else {
        return text.to_string();
    };

    let eol = line_ending(&line);
    let mut block = vec![format!("{}{eol}", line[..=open].trim_end())];
    let body = line[open + 1..close].trim();
    if !body.is_empty() {
        block.push(format!("{body_indent}{body}{eol}"));
    }
    block.push(format!("{}{}", bounds.indent, &line[close..]));

    lines.splice(bounds.declaration_line..=bounds.declaration_line, block);
    lines.join("\n")
}
