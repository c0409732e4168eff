//! Scope generator: GORM filter helpers under `scope/<name>/filter.go`.
//!
//! The filter file is created once with a date range filter, then grown by
//! appending. A `FilterBy<Field>` group is appended only when the file does
//! not already declare it, and pagination helpers only when `PaginationScope`
//! is missing, so re-running a scope or resource generation never duplicates
//! functions or discards hand edits.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::Generator;
use crate::error::Result;
use crate::fields::{FieldSpec, FieldType};
use crate::naming::{is_go_keyword, ResourceName};
use crate::templates::embedded;

const UUID_IMPORT: &str = "\t\"github.com/google/uuid\"\n";

/// What [`Generator::scope`] did to the filter file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeReport {
    pub path: PathBuf,
    /// The filter file did not exist before.
    pub created: bool,
    /// Functions appended, e.g. `FilterByTitle`, `PaginationScope`.
    pub added: Vec<String>,
}

#[derive(Serialize)]
struct FieldFilterContext<'a> {
    model_name: &'a str,
    field_name: String,
    param_name: String,
    param_type: &'static str,
    column: &'a str,
    is_string: bool,
}

impl<'a> FieldFilterContext<'a> {
    fn new(model_name: &'a str, field: &'a FieldSpec) -> Self {
        let key = field.serialization_key.as_str();
        let param_name = if is_go_keyword(key) {
            format!("{key}Value")
        } else {
            key.to_string()
        };
        Self {
            model_name,
            field_name: field.display_name(),
            param_name,
            param_type: field.resolved_type.go_type(),
            column: key,
            is_string: field.resolved_type == FieldType::String,
        }
    }
}

impl Generator {
    /// Create or extend `scope/<name>/filter.go` with filters for `fields`.
    pub fn scope(&self, name: &ResourceName, fields: &[FieldSpec], pagination: bool) -> Result<ScopeReport> {
        self.ensure_base_scope()?;

        let rel = Path::new("scope").join(name.lower()).join("filter.go");
        let path = self.root.join(&rel);
        let created = !path.exists();

        let mut content = if created {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            self.renderer
                .render(embedded::SCOPE_FILTER, &self.context(name, &[]))?
        } else {
            std::fs::read_to_string(&path)?
        };

        let mut added = Vec::new();
        for field in fields {
            let func = format!("FilterBy{}", field.display_name());
            if content.contains(&format!("func {func}(")) || added.contains(&func) {
                tracing::debug!("{func} already present in {}", rel.display());
                continue;
            }
            let ctx = FieldFilterContext::new(name.as_str(), field);
            content.push_str(&self.renderer.render(embedded::SCOPE_FIELD_FILTER, &ctx)?);
            if field.resolved_type == FieldType::Identifier {
                content = with_uuid_import(content);
            }
            added.push(func);
        }

        if pagination && !content.contains("func PaginationScope(") {
            content.push_str(
                &self
                    .renderer
                    .render(embedded::SCOPE_PAGINATION, &self.context(name, &[]))?,
            );
            added.push("PaginationScope".to_string());
        }

        if created || !added.is_empty() {
            std::fs::write(&path, &content)?;
            tracing::info!("wrote {} ({} function(s) added)", rel.display(), added.len());
        }

        Ok(ScopeReport {
            path: rel,
            created,
            added,
        })
    }

    /// Write `scope/base_scope.go` if the project lacks it.
    fn ensure_base_scope(&self) -> Result<()> {
        let rel = Path::new("scope/base_scope.go");
        if self.root.join(rel).exists() {
            return Ok(());
        }
        let data = serde_json::json!({ "name": self.config.name, "module": self.config.module });
        self.render_to(rel, embedded::BASE_SCOPE, &data)?;
        Ok(())
    }
}

/// Add the uuid import to a filter file's import block if it is missing.
fn with_uuid_import(content: String) -> String {
    if content.contains("\"github.com/google/uuid\"") {
        return content;
    }
    content.replacen("import (\n", &format!("import (\n{UUID_IMPORT}"), 1)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::generator;
    use super::*;
    use crate::fields;

    #[test]
    fn test_scope_creates_filter_file() {
        let dir = tempfile::tempdir().unwrap();
        let gen = generator(dir.path());
        let name = ResourceName::parse("Product").unwrap();

        let report = gen.scope(&name, &fields::parse(&["title:string", "stock:int"]), false).unwrap();
        assert!(report.created);
        assert_eq!(report.added, ["FilterByTitle", "FilterByStock"]);
        assert!(dir.path().join("scope/base_scope.go").exists());

        let content = std::fs::read_to_string(dir.path().join(&report.path)).unwrap();
        assert!(content.starts_with("package product\n"));
        assert!(content.contains("func FilterByDateRange(start, end *time.Time)"));
        assert!(content.contains("func FilterByTitle(title string) func(db *gorm.DB) *gorm.DB {"));
        assert!(content.contains("func FilterByTitleLike(title string)"));
        assert!(content.contains("func FilterByStockIn(stocks []int)"));
        assert!(!content.contains("FilterByStockLike"));
        assert!(!content.contains("PaginationScope"));
    }

    #[test]
    fn test_scope_append_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let gen = generator(dir.path());
        let name = ResourceName::parse("Product").unwrap();
        let specs = fields::parse(&["title:string"]);

        gen.scope(&name, &specs, true).unwrap();
        let first = std::fs::read_to_string(dir.path().join("scope/product/filter.go")).unwrap();

        let report = gen.scope(&name, &specs, true).unwrap();
        assert!(!report.created);
        assert!(report.added.is_empty());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("scope/product/filter.go")).unwrap(),
            first
        );

        let report = gen.scope(&name, &fields::parse(&["title:string", "sku:string"]), false).unwrap();
        assert_eq!(report.added, ["FilterBySku"]);
        let content = std::fs::read_to_string(dir.path().join("scope/product/filter.go")).unwrap();
        assert!(content.starts_with(&first));
        assert_eq!(content.matches("func PaginationScope(").count(), 1);
    }

    #[test]
    fn test_scope_prefix_names_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let gen = generator(dir.path());
        let name = ResourceName::parse("Product").unwrap();

        gen.scope(&name, &fields::parse(&["nameSuffix:string"]), false).unwrap();
        let report = gen.scope(&name, &fields::parse(&["name:string"]), false).unwrap();
        assert_eq!(report.added, ["FilterByName"]);
    }

    #[test]
    fn test_scope_keyword_params_are_renamed() {
        let dir = tempfile::tempdir().unwrap();
        let gen = generator(dir.path());
        let name = ResourceName::parse("Event").unwrap();

        gen.scope(&name, &fields::parse(&["type:string"]), false).unwrap();
        let content = std::fs::read_to_string(dir.path().join("scope/event/filter.go")).unwrap();
        assert!(content.contains("func FilterByType(typeValue string)"));
        assert!(content.contains("db.Where(\"type = ?\", typeValue)"));
    }

    #[test]
    fn test_uuid_filter_adds_import() {
        let dir = tempfile::tempdir().unwrap();
        let gen = generator(dir.path());
        let name = ResourceName::parse("Order").unwrap();

        gen.scope(&name, &fields::parse(&["customerId:uuid", "ownerId:uuid"]), false).unwrap();
        let content = std::fs::read_to_string(dir.path().join("scope/order/filter.go")).unwrap();
        assert_eq!(content.matches("\"github.com/google/uuid\"").count(), 1);
        assert!(content.contains("func FilterByCustomerId(customerid uuid.UUID)"));
    }

    #[test]
    fn test_duplicate_fields_append_once() {
        let dir = tempfile::tempdir().unwrap();
        let gen = generator(dir.path());
        let name = ResourceName::parse("Tag").unwrap();

        let report = gen.scope(&name, &fields::parse(&["label:string", "label:string"]), false).unwrap();
        assert_eq!(report.added, ["FilterByLabel"]);
    }
}
