//! Resource generators: model, repository, service, handler, DTOs, route and middleware.

use std::path::{Path, PathBuf};

use serde_json::json;

use super::{routes, Generator};
use crate::error::{OakhouseError, Result};
use crate::fields::FieldSpec;
use crate::naming::ResourceName;
use crate::splice::SpliceStatus;
use crate::templates::embedded;

/// Project-relative paths of the files generated for one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePaths {
    pub model: PathBuf,
    pub repository: PathBuf,
    pub service: PathBuf,
    pub handler: PathBuf,
    pub get_dto: PathBuf,
    pub create_dto: PathBuf,
    pub update_dto: PathBuf,
    /// Scope file; appended to rather than overwritten.
    pub scope: PathBuf,
    pub route: PathBuf,
}

impl ResourcePaths {
    pub fn new(name: &ResourceName) -> Self {
        let lower = name.lower();
        let dto_dir = Path::new("dto").join(&lower);
        Self {
            model: PathBuf::from(format!("model/{lower}.go")),
            repository: PathBuf::from(format!("repository/{lower}_repository.go")),
            service: PathBuf::from(format!("service/{lower}_service.go")),
            handler: PathBuf::from(format!("handler/{lower}_handler.go")),
            get_dto: dto_dir.join(format!("get_{lower}_dto.go")),
            create_dto: dto_dir.join(format!("create_{lower}_dto.go")),
            update_dto: dto_dir.join(format!("update_{lower}_dto.go")),
            scope: Path::new("scope").join(&lower).join("filter.go"),
            route: PathBuf::from(format!("route/{lower}.go")),
        }
    }

    /// All files in generation order.
    pub fn all(&self) -> Vec<PathBuf> {
        vec![
            self.model.clone(),
            self.repository.clone(),
            self.service.clone(),
            self.handler.clone(),
            self.get_dto.clone(),
            self.create_dto.clone(),
            self.update_dto.clone(),
            self.scope.clone(),
            self.route.clone(),
        ]
    }

    /// Files that are replaced wholesale when regenerated.
    pub fn overwritten(&self) -> Vec<PathBuf> {
        self.all().into_iter().filter(|p| p != &self.scope).collect()
    }
}

/// What [`Generator::resource`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceReport {
    /// Files written, in order.
    pub files: Vec<PathBuf>,
    pub route_status: SpliceStatus,
}

impl Generator {
    /// Files `resource` would write, in order.
    pub fn planned_files(&self, name: &ResourceName) -> Vec<PathBuf> {
        ResourcePaths::new(name).all()
    }

    /// Planned files that already exist and would be overwritten.
    pub fn conflicts(&self, name: &ResourceName) -> Vec<PathBuf> {
        ResourcePaths::new(name)
            .overwritten()
            .into_iter()
            .filter(|p| self.root.join(p).exists())
            .collect()
    }

    pub fn model(&self, name: &ResourceName, fields: &[FieldSpec]) -> Result<PathBuf> {
        let paths = ResourcePaths::new(name);
        self.render_to(&paths.model, embedded::MODEL, &self.context(name, fields))
    }

    pub fn repository(&self, name: &ResourceName) -> Result<PathBuf> {
        let paths = ResourcePaths::new(name);
        self.render_to(&paths.repository, embedded::REPOSITORY, &self.context(name, &[]))
    }

    /// The service filters through the resource's scope package, so callers
    /// should also generate [`Generator::scope`] for the same fields.
    pub fn service(&self, name: &ResourceName, fields: &[FieldSpec]) -> Result<PathBuf> {
        let paths = ResourcePaths::new(name);
        self.render_to(&paths.service, embedded::SERVICE, &self.context(name, fields))
    }

    pub fn handler(&self, name: &ResourceName) -> Result<PathBuf> {
        let paths = ResourcePaths::new(name);
        self.render_to(&paths.handler, embedded::HANDLER, &self.context(name, &[]))
    }

    /// Get, create and update DTOs.
    pub fn dto(&self, name: &ResourceName, fields: &[FieldSpec]) -> Result<Vec<PathBuf>> {
        let paths = ResourcePaths::new(name);
        let ctx = self.context(name, fields);
        Ok(vec![
            self.render_to(&paths.get_dto, embedded::GET_DTO, &ctx)?,
            self.render_to(&paths.create_dto, embedded::CREATE_DTO, &ctx)?,
            self.render_to(&paths.update_dto, embedded::UPDATE_DTO, &ctx)?,
        ])
    }

    /// Write `route/<name>.go` and register it in the central route file.
    ///
    /// The route file is checked before anything is written, so a missing or
    /// unrecognised route file leaves the project unchanged.
    pub fn route(&self, name: &ResourceName) -> Result<(PathBuf, SpliceStatus)> {
        let route_file = self.route_file();
        let layout = &self.config.routes.layout;
        routes::preview_route_registration(&route_file, layout, name.as_str())?;

        let paths = ResourcePaths::new(name);
        let written = self.render_to(&paths.route, embedded::RESOURCE_ROUTE, &self.context(name, &[]))?;
        let status = routes::register_route_file(&route_file, layout, name.as_str())?;
        Ok((written, status))
    }

    /// `middleware/<name>.go` with an empty `fiber.Handler` named `name`.
    pub fn middleware(&self, name: &ResourceName) -> Result<PathBuf> {
        let rel = PathBuf::from(format!("middleware/{}.go", name.lower()));
        self.render_to(&rel, embedded::MIDDLEWARE, &json!({ "middleware_name": name.as_str() }))
    }

    /// Generate every part of a resource and register its routes.
    ///
    /// `on_file` is called after each file is written. Existing files are
    /// checked up front so a conflict aborts before anything is written.
    pub fn resource(
        &self,
        name: &ResourceName,
        fields: &[FieldSpec],
        mut on_file: impl FnMut(&Path),
    ) -> Result<ResourceReport> {
        if !self.overwrite {
            let conflicts = self.conflicts(name);
            if !conflicts.is_empty() {
                return Err(OakhouseError::FileConflict(conflicts));
            }
        }
        routes::preview_route_registration(&self.route_file(), &self.config.routes.layout, name.as_str())?;

        let mut files = Vec::new();
        let mut record = |path: PathBuf| {
            on_file(&path);
            files.push(path);
        };

        record(self.model(name, fields)?);
        record(self.repository(name)?);
        record(self.service(name, fields)?);
        record(self.handler(name)?);
        for path in self.dto(name, fields)? {
            record(path);
        }
        record(self.scope(name, fields, false)?.path);
        let (route, route_status) = self.route(name)?;
        record(route);

        Ok(ResourceReport { files, route_status })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::generator;
    use super::*;
    use crate::fields;

    fn read(root: &Path, rel: &str) -> String {
        std::fs::read_to_string(root.join(rel)).unwrap()
    }

    #[test]
    fn test_resource_writes_all_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let gen = generator(dir.path());
        let name = ResourceName::parse("Product").unwrap();
        let specs = fields::parse(&["title:string", "price:float64", "launchedAt:time"]);

        let mut seen = Vec::new();
        let report = gen.resource(&name, &specs, |p| seen.push(p.to_path_buf())).unwrap();

        assert_eq!(report.files, gen.planned_files(&name));
        assert_eq!(seen, report.files);
        assert_eq!(report.route_status, SpliceStatus::Registered);
        for file in &report.files {
            assert!(dir.path().join(file).exists(), "missing {}", file.display());
        }

        let model = read(dir.path(), "model/product.go");
        assert!(model.contains("type Product struct {"));
        assert!(model.contains("\tTitle string `gorm:\"column:title\" json:\"title\"`\n"));
        assert!(model.contains("\tLaunchedAt time.Time `gorm:\"column:launchedat\" json:\"launchedat\"`\n"));
        assert!(model.contains("return \"products\""));

        let service = read(dir.path(), "service/product_service.go");
        assert!(service.contains("tscope \"example.com/shop/scope/product\""));
        assert!(service.contains("if getDto.Title != nil && *getDto.Title != \"\" {"));
        assert!(service.contains("if getDto.Price != nil {"));

        let create = read(dir.path(), "dto/product/create_product_dto.go");
        assert!(create.contains("import \"time\""));
        assert!(create.contains("\tPrice float64 `json:\"price\" validate:\"required\"`"));

        let update = read(dir.path(), "dto/product/update_product_dto.go");
        assert!(update.contains("\tPrice *float64 `json:\"price,omitempty\"`"));

        let route = read(dir.path(), "route/product.go");
        assert!(route.contains("func SetupProductRoutes(api fiber.Router) {"));
        assert!(route.contains("api.Group(\"/products\")"));

        let v1 = read(dir.path(), "route/v1.go");
        assert!(v1.contains("\tSetupProductRoutes(v1)\n"));
    }

    #[test]
    fn test_resource_refuses_conflicts_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let gen = generator(dir.path());
        let name = ResourceName::parse("User").unwrap();
        std::fs::create_dir_all(dir.path().join("handler")).unwrap();
        std::fs::write(dir.path().join("handler/user_handler.go"), "custom").unwrap();

        let err = gen.resource(&name, &[], |_| {}).unwrap_err();
        assert!(matches!(err, OakhouseError::FileConflict(ref p) if p == &[PathBuf::from("handler/user_handler.go")]));
        assert!(!dir.path().join("model/user.go").exists());
        assert_eq!(read(dir.path(), "handler/user_handler.go"), "custom");
        assert!(!read(dir.path(), "route/v1.go").contains("SetupUserRoutes"));
    }

    #[test]
    fn test_resource_regenerate_with_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let name = ResourceName::parse("User").unwrap();
        let specs = fields::parse(&["email:string"]);

        generator(dir.path()).resource(&name, &specs, |_| {}).unwrap();
        let v1_before = read(dir.path(), "route/v1.go");

        let gen = super::super::Generator::new(dir.path(), gen_config()).overwrite(true);
        let report = gen.resource(&name, &specs, |_| {}).unwrap();
        assert_eq!(report.route_status, SpliceStatus::AlreadyRegistered);
        assert_eq!(read(dir.path(), "route/v1.go"), v1_before);

        let scope = read(dir.path(), "scope/user/filter.go");
        assert_eq!(scope.matches("func FilterByEmail(").count(), 1);
    }

    fn gen_config() -> crate::config::ProjectConfig {
        crate::config::ProjectConfig::new("shop", "example.com/shop")
    }

    #[test]
    fn test_route_requires_route_file() {
        let dir = tempfile::tempdir().unwrap();
        let gen = super::super::Generator::new(dir.path(), gen_config());
        let name = ResourceName::parse("User").unwrap();

        let err = gen.route(&name).unwrap_err();
        assert!(matches!(err, OakhouseError::RouteFileNotFound { .. }));
        assert!(!dir.path().join("route/user.go").exists());
    }

    #[test]
    fn test_successive_resources_share_one_group() {
        let dir = tempfile::tempdir().unwrap();
        let gen = generator(dir.path());
        for raw in ["Alpha", "Beta"] {
            let name = ResourceName::parse(raw).unwrap();
            gen.route(&name).unwrap();
        }
        let v1 = read(dir.path(), "route/v1.go");
        assert_eq!(v1.matches("v1 := app.Group(\"/api/v1\")").count(), 1);
        assert!(v1.find("SetupAlphaRoutes(v1)").unwrap() < v1.find("SetupBetaRoutes(v1)").unwrap());
    }

    #[test]
    fn test_middleware() {
        let dir = tempfile::tempdir().unwrap();
        let gen = generator(dir.path());
        let name = ResourceName::parse("RateLimit").unwrap();

        let path = gen.middleware(&name).unwrap();
        assert_eq!(path, PathBuf::from("middleware/ratelimit.go"));
        assert!(read(dir.path(), "middleware/ratelimit.go").contains("func RateLimit() fiber.Handler {"));
    }

    #[test]
    fn test_uuid_fields_import_uuid() {
        let dir = tempfile::tempdir().unwrap();
        let gen = generator(dir.path());
        let name = ResourceName::parse("Order").unwrap();
        gen.dto(&name, &fields::parse(&["customerId:uuid"])).unwrap();

        let get = read(dir.path(), "dto/order/get_order_dto.go");
        assert!(get.contains("\"github.com/google/uuid\""));
        assert!(get.contains("\tCustomerId *uuid.UUID `query:\"customerid\"`"));
    }
}
