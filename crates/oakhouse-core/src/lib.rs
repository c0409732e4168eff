//! Core library for the oakhouse scaffolding tool.
//!
//! oakhouse generates Go web-application code (Fiber + GORM): models,
//! repositories, services, handlers, DTOs, query scopes, routes, middleware
//! and whole project skeletons. Most of that is template rendering; the two
//! pieces of real logic are:
//!
//! - [`fields`]: parsing `name:type` tokens into typed [`fields::FieldSpec`]s
//! - [`splice`]: idempotently registering `Setup<Name>Routes(v1)` in the
//!   project's central route file
//!
//! [`generator::Generator`] ties them together and writes files; the
//! [`toolchain`] module drives the `go` CLI for `serve` and `build`.

pub mod config;
pub mod error;
pub mod fields;
pub mod generator;
pub mod naming;
pub mod project;
pub mod splice;
pub mod templates;
pub mod toolchain;

/// Version of this crate, recorded in generated project configs.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
