//! Integrations: optional features patched into an existing project.
//!
//! `integrate redis` adds the go-redis dependency, Redis settings in
//! `.env.example` and `config/env_config.go`, a `RedisAdapter` and a cache
//! helper, and wires the adapter through `cmd/main.go` and
//! `cmd/app_server.go`.
//!
//! Every step checks for its own marker first and leaves the file alone when
//! it is already there, so running an integration twice changes nothing. All
//! edits are computed before the first write; a missing file or anchor aborts
//! with the project untouched.

use std::path::{Path, PathBuf};

use serde_json::json;

use super::Generator;
use crate::error::{OakhouseError, Result};
use crate::splice::locate::{is_comment, leading_whitespace};
use crate::templates::embedded;

pub const REDIS_MODULE: &str = "github.com/redis/go-redis/v9";
pub const REDIS_VERSION: &str = "v9.3.0";

const REDIS_ENV: &str = "\n# Redis (leave REDIS_URL empty to disable)\nREDIS_URL=localhost:6379\nREDIS_PASSWORD=\nREDIS_DB=0\n";

/// What an integration did to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchStatus {
    Created,
    Updated,
    /// The file already had the integration.
    Unchanged,
}

/// Files touched by an integration, in the order they were handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrationReport {
    pub files: Vec<(PathBuf, PatchStatus)>,
}

impl IntegrationReport {
    /// True when at least one file was created or updated.
    pub fn changed(&self) -> bool {
        self.files.iter().any(|(_, status)| *status != PatchStatus::Unchanged)
    }
}

/// A computed but not yet written change.
struct Step {
    rel: PathBuf,
    content: Option<String>,
    status: PatchStatus,
}

type Patch = fn(&str, &Path) -> Result<Option<String>>;

impl Generator {
    /// Add Redis support to the project.
    pub fn integrate_redis(&self) -> Result<IntegrationReport> {
        let ctx = json!({ "module": self.config.module, "name": self.config.name });

        let steps = vec![
            self.patch_file("go.mod", add_redis_dependency)?,
            self.redis_env()?,
            self.patch_file("config/env_config.go", add_redis_config)?,
            self.create_if_missing("adapter/redis_adapter.go", embedded::REDIS_ADAPTER, &ctx)?,
            self.create_if_missing("util/redis_util.go", embedded::REDIS_UTIL, &ctx)?,
            self.patch_file("cmd/main.go", add_redis_init)?,
            self.patch_file("cmd/app_server.go", add_redis_to_server)?,
        ];
        self.apply(steps)
    }

    fn apply(&self, steps: Vec<Step>) -> Result<IntegrationReport> {
        let mut files = Vec::with_capacity(steps.len());
        for step in steps {
            if let Some(content) = &step.content {
                let path = self.root.join(&step.rel);
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&path, content)?;
                tracing::info!("{:?} {}", step.status, step.rel.display());
            } else {
                tracing::debug!("{} already integrated", step.rel.display());
            }
            files.push((step.rel, step.status));
        }
        Ok(IntegrationReport { files })
    }

    fn patch_file(&self, rel: &str, patch: Patch) -> Result<Step> {
        let rel = PathBuf::from(rel);
        let path = self.root.join(&rel);
        if !path.exists() {
            return Err(OakhouseError::PatchTargetNotFound { path: rel });
        }
        let text = std::fs::read_to_string(&path)?;
        let content = patch(&text, &rel)?;
        let status = if content.is_some() {
            PatchStatus::Updated
        } else {
            PatchStatus::Unchanged
        };
        Ok(Step { rel, content, status })
    }

    fn create_if_missing(&self, rel: &str, template: &str, ctx: &serde_json::Value) -> Result<Step> {
        let rel = PathBuf::from(rel);
        if self.root.join(&rel).exists() {
            return Ok(Step {
                rel,
                content: None,
                status: PatchStatus::Unchanged,
            });
        }
        Ok(Step {
            content: Some(self.renderer.render(template, ctx)?),
            rel,
            status: PatchStatus::Created,
        })
    }

    /// `.env.example` is optional; it is created when absent.
    fn redis_env(&self) -> Result<Step> {
        if self.root.join(".env.example").exists() {
            return self.patch_file(".env.example", add_redis_env);
        }
        Ok(Step {
            rel: PathBuf::from(".env.example"),
            content: Some(REDIS_ENV.trim_start().to_string()),
            status: PatchStatus::Created,
        })
    }
}

fn anchor_missing(rel: &Path, anchor: &str) -> OakhouseError {
    OakhouseError::PatchAnchorNotFound {
        path: rel.to_path_buf(),
        anchor: anchor.to_string(),
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}

/// Index of the first non-comment line containing `needle`.
fn find_line(lines: &[String], needle: &str) -> Option<usize> {
    lines.iter().position(|line| !is_comment(line) && line.contains(needle))
}

/// The line closing the block opened on line `start`: `}` at the same indentation.
fn block_close(lines: &[String], start: usize) -> Option<usize> {
    let closing = format!("{}}}", leading_whitespace(&lines[start]));
    (start + 1..lines.len()).find(|&i| lines[i].trim_end() == closing)
}

/// Insert `lines` before the closing brace of the block opened on the line
/// containing `opener`, indented one level deeper than the brace.
fn insert_in_block(lines: &mut Vec<String>, opener: &str, body: &[&str], rel: &Path) -> Result<()> {
    let start = find_line(lines, opener).ok_or_else(|| anchor_missing(rel, opener))?;
    let close = block_close(lines, start).ok_or_else(|| anchor_missing(rel, opener))?;
    let indent = format!("{}\t", leading_whitespace(&lines[close]));
    let block: Vec<String> = body.iter().map(|line| format!("{indent}{line}")).collect();
    lines.splice(close..close, block);
    Ok(())
}

/// Append `arg` to the argument or parameter list opened by `call` on `line`.
fn append_argument(line: &str, call: &str, arg: &str) -> Option<String> {
    let open = line.find(call)? + call.len();
    let close = open + line[open..].find(')')?;
    let separator = if line[open..close].trim().is_empty() { "" } else { ", " };
    Some(format!("{}{separator}{arg}{}", &line[..close], &line[close..]))
}

/// Add go-redis to the `require` block of `go.mod`.
pub fn add_redis_dependency(text: &str, rel: &Path) -> Result<Option<String>> {
    if text.contains(REDIS_MODULE) {
        return Ok(None);
    }
    let requirement = format!("{REDIS_MODULE} {REDIS_VERSION}");
    let mut lines = split_lines(text);

    match lines.iter().position(|line| line.trim_start().starts_with("require (")) {
        Some(start) => {
            let end = (start + 1..lines.len())
                .find(|&i| lines[i].trim() == ")")
                .ok_or_else(|| anchor_missing(rel, "require ( ... )"))?;
            lines.insert(end, format!("\t{requirement}"));
            Ok(Some(lines.join("\n")))
        }
        None => Ok(Some(format!("{}\n\nrequire {requirement}\n", text.trim_end()))),
    }
}

/// Append the Redis settings to `.env.example`.
pub fn add_redis_env(text: &str, _rel: &Path) -> Result<Option<String>> {
    if text.contains("REDIS_URL") {
        return Ok(None);
    }
    let mut out = text.to_string();
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(REDIS_ENV);
    Ok(Some(out))
}

/// Add Redis fields to `Config` and to the literal returned by `LoadConfig`.
pub fn add_redis_config(text: &str, rel: &Path) -> Result<Option<String>> {
    if text.contains("RedisURL") {
        return Ok(None);
    }
    let mut lines = split_lines(text);
    insert_in_block(
        &mut lines,
        "type Config struct {",
        &["RedisURL      string", "RedisPassword string", "RedisDB       string"],
        rel,
    )?;
    insert_in_block(
        &mut lines,
        "return &Config{",
        &[
            "RedisURL:      getEnv(\"REDIS_URL\", \"\"),",
            "RedisPassword: getEnv(\"REDIS_PASSWORD\", \"\"),",
            "RedisDB:       getEnv(\"REDIS_DB\", \"0\"),",
        ],
        rel,
    )?;
    Ok(Some(lines.join("\n")))
}

/// Connect Redis after the database in `main` and pass it to the server.
pub fn add_redis_init(text: &str, rel: &Path) -> Result<Option<String>> {
    if text.contains("RedisAdapter") {
        return Ok(None);
    }
    const DB_INIT: &str = "adapter.InitializeDatabase(";
    const SERVER: &str = "NewAppServer(";

    let mut lines = split_lines(text);
    let db_init = find_line(&lines, DB_INIT).ok_or_else(|| anchor_missing(rel, DB_INIT))?;
    let indent = leading_whitespace(&lines[db_init]).to_string();
    // The `if err != nil { ... }` check that follows the call.
    let after = match lines.get(db_init + 1) {
        Some(next) if next.trim_start().starts_with("if err") => block_close(&lines, db_init + 1).unwrap_or(db_init),
        _ => db_init,
    };

    let block = [
        "",
        "var redisAdapter *adapter.RedisAdapter",
        "if cfg.RedisURL != \"\" {",
        "\tredisAdapter, err = adapter.NewRedisAdapter(cfg)",
        "\tif err != nil {",
        "\t\tlog.Fatal(\"Failed to connect to Redis: \", err)",
        "\t}",
        "\tlog.Println(\"Redis connected\")",
        "}",
    ]
    .iter()
    .map(|line| if line.is_empty() { String::new() } else { format!("{indent}{line}") });
    lines.splice(after + 1..after + 1, block);

    let server = (0..lines.len())
        .find(|&i| !is_comment(&lines[i]) && lines[i].contains(SERVER) && !lines[i].contains("func "))
        .ok_or_else(|| anchor_missing(rel, SERVER))?;
    lines[server] = append_argument(&lines[server], SERVER, "redisAdapter").ok_or_else(|| anchor_missing(rel, SERVER))?;

    Ok(Some(lines.join("\n")))
}

/// Give `AppServer` a `redisAdapter` field and constructor parameter.
pub fn add_redis_to_server(text: &str, rel: &Path) -> Result<Option<String>> {
    if text.contains("redisAdapter") {
        return Ok(None);
    }
    const CONSTRUCTOR: &str = "func NewAppServer(";
    const RETURN: &str = "return &AppServer{";

    let mut lines = split_lines(text);
    insert_in_block(&mut lines, "type AppServer struct {", &["redisAdapter *adapter.RedisAdapter"], rel)?;

    let constructor = find_line(&lines, CONSTRUCTOR).ok_or_else(|| anchor_missing(rel, CONSTRUCTOR))?;
    lines[constructor] = append_argument(&lines[constructor], CONSTRUCTOR, "redisAdapter *adapter.RedisAdapter")
        .ok_or_else(|| anchor_missing(rel, CONSTRUCTOR))?;

    let ret = find_line(&lines, RETURN).ok_or_else(|| anchor_missing(rel, RETURN))?;
    let line = lines[ret].trim_end();
    if line.ends_with('}') {
        // One-line literal: `return &AppServer{app: app, db: db}`.
        let brace = line.len() - 1;
        let separator = if line[..brace].ends_with('{') { "" } else { ", " };
        lines[ret] = format!("{}{separator}redisAdapter: redisAdapter{}", &line[..brace], &lines[ret][brace..]);
    } else {
        insert_in_block(&mut lines, RETURN, &["redisAdapter: redisAdapter,"], rel)?;
    }

    Ok(Some(lines.join("\n")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::create_project;

    fn project(root: &Path) -> Generator {
        create_project(root, "shop", "example.com/shop").unwrap();
        Generator::open(root).unwrap()
    }

    fn read(root: &Path, rel: &str) -> String {
        std::fs::read_to_string(root.join(rel)).unwrap()
    }

    #[test]
    fn test_integrate_redis_into_new_project() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("shop");
        let gen = project(&root);

        let report = gen.integrate_redis().unwrap();
        assert!(report.changed());
        assert_eq!(
            report.files,
            vec![
                (PathBuf::from("go.mod"), PatchStatus::Updated),
                (PathBuf::from(".env.example"), PatchStatus::Updated),
                (PathBuf::from("config/env_config.go"), PatchStatus::Updated),
                (PathBuf::from("adapter/redis_adapter.go"), PatchStatus::Created),
                (PathBuf::from("util/redis_util.go"), PatchStatus::Created),
                (PathBuf::from("cmd/main.go"), PatchStatus::Updated),
                (PathBuf::from("cmd/app_server.go"), PatchStatus::Updated),
            ]
        );

        assert!(read(&root, "go.mod").contains("\tgithub.com/redis/go-redis/v9 v9.3.0\n)"));
        assert!(read(&root, ".env.example").contains("\nREDIS_URL=localhost:6379\n"));

        let config = read(&root, "config/env_config.go");
        assert!(config.contains("\tJWTSecret  string\n\tRedisURL      string\n"));
        assert!(config.contains("\tRedisDB       string\n}"));
        assert!(config.contains("\t\tRedisDB:       getEnv(\"REDIS_DB\", \"0\"),\n\t}"));

        assert!(read(&root, "adapter/redis_adapter.go").contains("\"example.com/shop/config\""));
        assert!(read(&root, "util/redis_util.go").contains("\"example.com/shop/adapter\""));

        let main = read(&root, "cmd/main.go");
        assert!(main.contains("server := NewAppServer(cfg, db, redisAdapter)"));
        let db = main.find("adapter.InitializeDatabase(").unwrap();
        let redis = main.find("adapter.NewRedisAdapter(cfg)").unwrap();
        let server = main.find("NewAppServer(").unwrap();
        assert!(db < redis && redis < server);

        let server = read(&root, "cmd/app_server.go");
        assert!(server.contains(
            "func NewAppServer(cfg *config.Config, db *adapter.DatabaseAdapter, redisAdapter *adapter.RedisAdapter) *AppServer {"
        ));
        assert!(server.contains("\tredisAdapter *adapter.RedisAdapter\n}"));
        assert!(server.contains("return &AppServer{app: app, cfg: cfg, db: db, redisAdapter: redisAdapter}"));
    }

    #[test]
    fn test_integrate_redis_twice_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("shop");
        let gen = project(&root);
        gen.integrate_redis().unwrap();

        let files = ["go.mod", ".env.example", "config/env_config.go", "cmd/main.go", "cmd/app_server.go"];
        let before: Vec<String> = files.iter().map(|f| read(&root, f)).collect();

        let report = gen.integrate_redis().unwrap();
        assert!(!report.changed());
        assert!(report.files.iter().all(|(_, status)| *status == PatchStatus::Unchanged));
        let after: Vec<String> = files.iter().map(|f| read(&root, f)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_missing_anchor_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("shop");
        let gen = project(&root);
        std::fs::write(root.join("cmd/main.go"), "package main\n\nfunc main() {\n}\n").unwrap();
        let go_mod = read(&root, "go.mod");

        let err = gen.integrate_redis().unwrap_err();
        assert!(matches!(
            err,
            OakhouseError::PatchAnchorNotFound { ref path, .. } if path == Path::new("cmd/main.go")
        ));
        assert_eq!(read(&root, "go.mod"), go_mod);
        assert!(!root.join("adapter/redis_adapter.go").exists());
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("shop");
        let gen = project(&root);
        std::fs::remove_file(root.join("config/env_config.go")).unwrap();

        let err = gen.integrate_redis().unwrap_err();
        assert!(matches!(err, OakhouseError::PatchTargetNotFound { .. }));
        assert!(!read(&root, "go.mod").contains(REDIS_MODULE));
    }

    #[test]
    fn test_go_mod_without_require_block() {
        let out = add_redis_dependency("module shop\n\ngo 1.21\n", Path::new("go.mod"))
            .unwrap()
            .unwrap();
        assert_eq!(out, "module shop\n\ngo 1.21\n\nrequire github.com/redis/go-redis/v9 v9.3.0\n");
    }

    #[test]
    fn test_multiline_server_literal() {
        let text = "type AppServer struct {\n\tapp *fiber.App\n}\n\nfunc NewAppServer(cfg *config.Config) *AppServer {\n\treturn &AppServer{\n\t\tapp: app,\n\t}\n}\n";
        let out = add_redis_to_server(text, Path::new("cmd/app_server.go")).unwrap().unwrap();
        assert!(out.contains("func NewAppServer(cfg *config.Config, redisAdapter *adapter.RedisAdapter) *AppServer {"));
        assert!(out.contains("\t\tapp: app,\n\t\tredisAdapter: redisAdapter,\n\t}"));
    }

    #[test]
    fn test_append_argument() {
        assert_eq!(
            append_argument("\tserver := NewAppServer(cfg, db)", "NewAppServer(", "redis").as_deref(),
            Some("\tserver := NewAppServer(cfg, db, redis)")
        );
        assert_eq!(
            append_argument("\ts := NewAppServer()", "NewAppServer(", "redis").as_deref(),
            Some("\ts := NewAppServer(redis)")
        );
    }
}
