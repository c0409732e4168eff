//! Field specification parser.
//!
//! Resources are described on the command line as a list of `name:type`
//! tokens, e.g. `title:string price:float64 publishedAt:time`. This module
//! turns those tokens into [`FieldSpec`] records that the templates render
//! into struct fields, GORM column tags, JSON keys and query filters.
//!
//! Parsing is lenient and total: a malformed token is skipped and an unknown
//! type keyword falls back to [`FieldType::String`]. Every decision is kept
//! as a [`FieldOutcome`] so stricter callers can see what was dropped or
//! defaulted; [`validate_tokens`] is the strict counterpart used by the CLI
//! before generation.

use serde::Serialize;

use crate::error::{OakhouseError, Result};
use crate::naming::capitalize;

/// Target Go types a field can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldType {
    String,
    Int,
    Int64,
    Float64,
    Bool,
    Timestamp,
    Identifier,
}

impl FieldType {
    /// Look up a type keyword, case-insensitively.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "string" | "text" => Some(Self::String),
            "int" => Some(Self::Int),
            "int64" => Some(Self::Int64),
            "float" | "float64" => Some(Self::Float64),
            "bool" | "boolean" => Some(Self::Bool),
            "time" | "time.time" | "timestamp" => Some(Self::Timestamp),
            "uuid" => Some(Self::Identifier),
            _ => None,
        }
    }

    /// The Go type expression emitted into generated code.
    pub fn go_type(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Bool => "bool",
            Self::Timestamp => "time.Time",
            Self::Identifier => "uuid.UUID",
        }
    }
}

/// One parsed `name:type` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Identifier as the user typed it (`firstName`).
    pub name: String,
    /// Type keyword as the user typed it (`String`, `time`, `bogus`).
    pub type_token: String,
    pub resolved_type: FieldType,
    /// Lower-cased name, used for column and JSON keys (`firstname`).
    pub serialization_key: String,
}

impl FieldSpec {
    fn new(name: &str, type_token: &str, resolved_type: FieldType) -> Self {
        Self {
            name: name.to_string(),
            type_token: type_token.to_string(),
            resolved_type,
            serialization_key: name.to_lowercase(),
        }
    }

    /// Exported Go field name (`FirstName`).
    pub fn display_name(&self) -> String {
        capitalize(&self.name)
    }

    /// Template view of this field.
    pub fn view(&self) -> FieldView {
        let go_type = self.resolved_type.go_type();
        FieldView {
            name: self.display_name(),
            go_type: go_type.to_string(),
            query_type: format!("*{go_type}"),
            gorm_tag: format!("column:{}", self.serialization_key),
            json_tag: self.serialization_key.clone(),
            column: self.serialization_key.clone(),
            is_string: self.resolved_type == FieldType::String,
        }
    }
}

/// Serializable projection of a [`FieldSpec`] handed to the templates.
#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub name: String,
    pub go_type: String,
    pub query_type: String,
    pub gorm_tag: String,
    pub json_tag: String,
    pub column: String,
    pub is_string: bool,
}

/// Why a token produced no field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The token does not contain exactly one `:`.
    Separator,
    /// The name part is not `[a-zA-Z][a-zA-Z0-9]*`.
    InvalidName,
}

/// Result of parsing a single token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    Parsed(FieldSpec),
    /// The type keyword was unknown; the field resolved to `String`.
    DefaultedType(FieldSpec),
    Skipped { token: String, reason: SkipReason },
}

impl FieldOutcome {
    /// The field produced by this outcome, if any.
    pub fn spec(&self) -> Option<&FieldSpec> {
        match self {
            Self::Parsed(spec) | Self::DefaultedType(spec) => Some(spec),
            Self::Skipped { .. } => None,
        }
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// Parse one token into its tagged outcome.
pub fn parse_token(token: &str) -> FieldOutcome {
    let skipped = |reason| FieldOutcome::Skipped {
        token: token.to_string(),
        reason,
    };

    let mut parts = token.split(':');
    let (name, type_token) = match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(type_token), None) => (name, type_token),
        _ => return skipped(SkipReason::Separator),
    };

    if !is_valid_name(name) {
        return skipped(SkipReason::InvalidName);
    }

    match FieldType::from_token(type_token) {
        Some(resolved) => FieldOutcome::Parsed(FieldSpec::new(name, type_token, resolved)),
        None => FieldOutcome::DefaultedType(FieldSpec::new(name, type_token, FieldType::String)),
    }
}

/// Parse every token, keeping skipped and defaulted tokens visible.
pub fn parse_outcomes<S: AsRef<str>>(tokens: &[S]) -> Vec<FieldOutcome> {
    tokens
        .iter()
        .map(|token| {
            let outcome = parse_token(token.as_ref());
            match &outcome {
                FieldOutcome::Skipped { token, reason } => {
                    tracing::debug!("skipping field token '{token}' ({reason:?})");
                }
                FieldOutcome::DefaultedType(spec) => {
                    tracing::debug!(
                        "unknown type '{}' for field '{}', using string",
                        spec.type_token,
                        spec.name
                    );
                }
                FieldOutcome::Parsed(_) => {}
            }
            outcome
        })
        .collect()
}

/// Parse tokens into fields, dropping malformed ones.
///
/// Never fails. Duplicate names are passed through in input order.
pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Vec<FieldSpec> {
    parse_outcomes(tokens)
        .into_iter()
        .filter_map(|outcome| match outcome {
            FieldOutcome::Parsed(spec) | FieldOutcome::DefaultedType(spec) => Some(spec),
            FieldOutcome::Skipped { .. } => None,
        })
        .collect()
}

/// Strict check used before generation: every token must parse without
/// skipping or defaulting.
pub fn validate_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<()> {
    for token in tokens {
        let token = token.as_ref();
        let reason = match parse_token(token) {
            FieldOutcome::Parsed(_) => continue,
            FieldOutcome::Skipped {
                reason: SkipReason::Separator,
                ..
            } => "expected 'name:type'".to_string(),
            FieldOutcome::Skipped {
                reason: SkipReason::InvalidName,
                ..
            } => "name must start with a letter and contain only letters and digits".to_string(),
            FieldOutcome::DefaultedType(spec) => format!(
                "unsupported type '{}' (supported: string, text, int, int64, float, float64, bool, time, uuid)",
                spec.type_token
            ),
        };
        return Err(OakhouseError::InvalidField {
            token: token.to_string(),
            reason,
        });
    }
    Ok(())
}
