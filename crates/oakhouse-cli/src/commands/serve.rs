use std::path::Path;

use anyhow::Result;

use oakhouse_core::project;
use oakhouse_core::toolchain::{GoCli, ServeMode};

use crate::output;

/// Run the project's application in the foreground.
pub fn run(dir: &Path, host: &str, port: u16) -> Result<()> {
    output::print_header("oakhouse serve");

    let config = project::load_project(dir)?;
    let go = GoCli::new()?;
    if let Some(version) = go.check_version() {
        output::print_key_value("Go", &version.to_string());
    }
    output::print_key_value("Project", &config.name);
    output::print_key_value("Listening", &format!("http://{host}:{port}"));
    println!();

    match go.serve(dir, host, port)? {
        ServeMode::LiveReload => output::print_success("air exited"),
        ServeMode::GoRun => output::print_success("Server stopped"),
    }
    Ok(())
}
