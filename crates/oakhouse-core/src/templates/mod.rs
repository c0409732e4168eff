//! Template system for generated Go code.
//!
//! Templates are embedded into the binary at compile-time via [`include_str!`] in the
//! [`embedded`] module, then rendered at runtime with [Handlebars](https://handlebarsjs.com/)
//! via the [`renderer::TemplateRenderer`].
//!
//! ## Template variables
//!
//! Resource templates receive a [`crate::generator::ResourceContext`]:
//! - `{{module}}`: Go module path used in imports
//! - `{{model_name}}`, `{{var_name}}`, `{{package_name}}`, `{{table_name}}`, `{{route_path}}`
//! - `{{#each fields}}` over [`crate::fields::FieldView`] records
//!
//! Project templates receive `{{name}}`, `{{module}}` and `{{version}}`.
//!
//! **Warning**: Template files in `templates/` and constants in [`embedded`] must stay in sync.

pub mod embedded;
pub mod renderer;
