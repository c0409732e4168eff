use std::path::Path;

use anyhow::Result;

use oakhouse_core::project;
use oakhouse_core::toolchain::GoCli;

use crate::output;

/// Compile the project to `bin/app`.
pub fn run(dir: &Path) -> Result<()> {
    output::print_header("oakhouse build");

    let config = project::load_project(dir)?;
    let go = GoCli::new()?;
    if let Some(version) = go.check_version() {
        output::print_key_value("Go", &version.to_string());
    }
    output::print_key_value("Module", &config.module);

    let spinner = output::spinner("go build");
    let result = go.build(dir);
    spinner.finish_and_clear();
    let binary = result?;

    output::print_success("Build complete");
    output::print_key_value("Binary", &binary.display().to_string());
    Ok(())
}
