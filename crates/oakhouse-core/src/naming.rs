//! Resource names and the identifiers derived from them.
//!
//! A resource is written PascalCase on the command line (`User`, `BlogPost`).
//! Generated Go code uses several spellings of it: the type name as given,
//! a lower-cased package/file name, a lowerCamel variable name, and a naive
//! English plural for table names and URL paths.

use std::fmt;

use crate::error::{OakhouseError, Result};

/// Go keywords a resource may not be named after (compared case-insensitively).
const GO_KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// A resource name such as `User`, with its derived spellings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceName {
    name: String,
}

impl ResourceName {
    /// Validate `raw` as a resource name.
    ///
    /// Accepts `^[A-Z][a-zA-Z0-9]*$` that is not a Go keyword.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = |reason: &str| OakhouseError::InvalidResourceName {
            name: raw.to_string(),
            reason: reason.to_string(),
        };

        let mut chars = raw.chars();
        match chars.next() {
            None => return Err(invalid("resource name cannot be empty")),
            Some(c) if !c.is_ascii_uppercase() => {
                return Err(invalid("must start with an uppercase letter"))
            }
            Some(_) => {}
        }
        if !chars.all(|c| c.is_ascii_alphanumeric()) {
            return Err(invalid("must contain only alphanumeric characters"));
        }

        if is_go_keyword(raw) {
            return Err(invalid("cannot be a Go reserved keyword"));
        }

        Ok(Self {
            name: raw.to_string(),
        })
    }

    /// Accept `raw` without validation (`--skip-validation`).
    pub fn unchecked(raw: &str) -> Self {
        Self {
            name: raw.to_string(),
        }
    }

    /// The name as given, used for Go type names (`User`).
    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Lower-cased name used for packages, files and JSON (`blogpost`).
    pub fn lower(&self) -> String {
        self.name.to_lowercase()
    }

    /// lowerCamel name used for local variables (`blogPost`).
    pub fn camel(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Plural of [`lower`](Self::lower), used for URL paths.
    pub fn plural_lower(&self) -> String {
        pluralize(&self.lower())
    }

    /// Database table name (`BlogPost` → `blog_posts`).
    pub fn table_name(&self) -> String {
        pluralize(&snake_case(&self.name))
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Whether `word` is a Go keyword, ignoring case.
pub fn is_go_keyword(word: &str) -> bool {
    GO_KEYWORDS.contains(&word.to_ascii_lowercase().as_str())
}

/// `BlogPost` → `blog_post`.
pub fn snake_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len() + 4);
    for (i, c) in word.chars().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            out.push('_');
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

/// Naive English pluralisation: `y` → `ies`, `s`/`x`/`z` → `es`, else `s`.
pub fn pluralize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('y') {
        format!("{stem}ies")
    } else if word.ends_with('s') || word.ends_with('x') || word.ends_with('z') {
        format!("{word}es")
    } else {
        format!("{word}s")
    }
}

/// Upper-case the first character, leaving the rest untouched (`firstName` → `FirstName`).
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
