use std::path::Path;

use anyhow::Result;

use oakhouse_core::project;
use oakhouse_core::toolchain::{self, GoCli};

use crate::output;

/// Create a new oakhouse project.
///
/// Writes the skeleton and `oakhouse.config.json` into `<dir>/<name>`, then
/// runs `go mod tidy` unless `skip_tidy` is set. A missing or failing Go
/// toolchain only produces a warning; the project is still usable.
pub fn run(dir: &Path, name: &str, module: Option<&str>, skip_tidy: bool) -> Result<()> {
    output::print_header(&format!("oakhouse new: {name}"));

    let project_dir = dir.join(name);
    let module = module.unwrap_or(name);
    let total = if skip_tidy { 1 } else { 2 };

    output::print_step(1, total, &format!("Creating project in {}/", project_dir.display()));
    let files = project::create_project(&project_dir, name, module)?;
    for file in &files {
        output::print_file("create", file);
    }

    if skip_tidy {
        match toolchain::detect_go_version() {
            Some(version) => output::print_key_value("Go", &version.to_string()),
            None => output::print_warning("Go not found on PATH; install it from https://go.dev/dl/"),
        }
    } else {
        output::print_step(2, total, "Downloading dependencies (go mod tidy)");
        match GoCli::new() {
            Ok(go) => {
                go.check_version();
                let spinner = output::spinner("go mod tidy");
                let result = go.mod_tidy(&project_dir);
                spinner.finish_and_clear();
                if let Err(e) = result {
                    output::print_error(&e.to_string());
                    output::print_warning("Run `go mod tidy` in the project once the problem is fixed");
                }
            }
            Err(e) => output::print_warning(&e.to_string()),
        }
    }

    output::print_success(&format!("Project '{name}' created"));
    output::print_key_value("Module", module);
    println!();
    println!("  Next steps:");
    println!("    cd {}", project_dir.display());
    println!("    oakhouse generate resource User name:string email:string");
    println!("    oakhouse serve");
    println!();

    Ok(())
}
