//! Compile-time embedded templates for generated Go code.
//!
//! Each constant loads a template file from `crates/oakhouse-core/templates/` via
//! [`include_str!`]. The paths are relative to this source file.
//!
//! ## Adding a new template
//!
//! 1. Place the `.hbs` file under the matching `templates/` subdirectory
//! 2. Add a `pub const` here with `include_str!("../../templates/<path>")`
//! 3. Reference the constant from the generator that writes the file
//!
//! Do NOT rename template variables without updating the context structs in
//! [`crate::generator`]; rendering runs in strict mode.

// -------------------------------------------------------
// Resource templates
// -------------------------------------------------------

pub const MODEL: &str = include_str!("../../templates/resource/model.go.hbs");
pub const REPOSITORY: &str = include_str!("../../templates/resource/repository.go.hbs");
pub const SERVICE: &str = include_str!("../../templates/resource/service.go.hbs");
pub const HANDLER: &str = include_str!("../../templates/resource/handler.go.hbs");
pub const GET_DTO: &str = include_str!("../../templates/resource/get_dto.go.hbs");
pub const CREATE_DTO: &str = include_str!("../../templates/resource/create_dto.go.hbs");
pub const UPDATE_DTO: &str = include_str!("../../templates/resource/update_dto.go.hbs");
pub const RESOURCE_ROUTE: &str = include_str!("../../templates/resource/route.go.hbs");
pub const MIDDLEWARE: &str = include_str!("../../templates/resource/middleware.go.hbs");

// -------------------------------------------------------
// Scope templates
// -------------------------------------------------------

pub const SCOPE_FILTER: &str = include_str!("../../templates/scope/filter.go.hbs");
pub const SCOPE_FIELD_FILTER: &str = include_str!("../../templates/scope/field_filter.go.hbs");
pub const SCOPE_PAGINATION: &str = include_str!("../../templates/scope/pagination.go.hbs");

// -------------------------------------------------------
// Project skeleton templates
// -------------------------------------------------------

pub const GO_MOD: &str = include_str!("../../templates/project/go.mod.hbs");
pub const ENV_EXAMPLE: &str = include_str!("../../templates/project/env.example.hbs");
pub const DOCKERFILE: &str = include_str!("../../templates/project/Dockerfile.hbs");
pub const MAKEFILE: &str = include_str!("../../templates/project/Makefile.hbs");
pub const GITIGNORE: &str = include_str!("../../templates/project/gitignore.hbs");
pub const MAIN_GO: &str = include_str!("../../templates/project/main.go.hbs");
pub const APP_SERVER: &str = include_str!("../../templates/project/app_server.go.hbs");
pub const ENV_CONFIG: &str = include_str!("../../templates/project/env_config.go.hbs");
pub const ROUTE_V1: &str = include_str!("../../templates/project/v1.go.hbs");
pub const DATABASE_ADAPTER: &str = include_str!("../../templates/project/database_adapter.go.hbs");
pub const RESPONSE_UTIL: &str = include_str!("../../templates/project/response.go.hbs");
pub const PAGINATION_UTIL: &str = include_str!("../../templates/project/pagination.go.hbs");
pub const BASE_SCOPE: &str = include_str!("../../templates/project/base_scope.go.hbs");
pub const AUTH_MIDDLEWARE: &str = include_str!("../../templates/project/auth.go.hbs");

// -------------------------------------------------------
// Integration templates
// -------------------------------------------------------

pub const REDIS_ADAPTER: &str = include_str!("../../templates/integrate/redis_adapter.go.hbs");
pub const REDIS_UTIL: &str = include_str!("../../templates/integrate/redis_util.go.hbs");
