//! Handlebars-based template renderer for generated Go code.
//!
//! Wraps the [`handlebars::Handlebars`] engine with **strict mode** enabled.
//! Strict mode ensures that any `{{variable}}` referenced in a template must be
//! present in the data context, otherwise rendering returns an error. Templates
//! produce Go source; a silently missing variable would generate code that
//! fails `go build` far from the actual cause.
//!
//! HTML escaping is turned off: Go struct tags and string literals contain
//! quotes that must be emitted verbatim.
//!
//! ## Usage
//!
//! ```ignore
//! use oakhouse_core::templates::{embedded, renderer::TemplateRenderer};
//!
//! let renderer = TemplateRenderer::new();
//! let data = serde_json::json!({ "module": "shop", "name": "shop" });
//! let output = renderer.render(embedded::GO_MOD, &data)?;
//! ```

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::{OakhouseError, Result};

/// Template renderer using Handlebars for generating project files.
pub struct TemplateRenderer {
    hbs: Handlebars<'static>,
}

impl TemplateRenderer {
    /// Create a new renderer with strict mode enabled and escaping disabled.
    pub fn new() -> Self {
        let mut hbs = Handlebars::new();
        hbs.set_strict_mode(true);
        hbs.register_escape_fn(handlebars::no_escape);
        Self { hbs }
    }

    /// Render a template string with the given data context.
    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String> {
        self.hbs
            .render_template(template, data)
            .map_err(|e| OakhouseError::TemplateRender(e.to_string()))
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}
