use std::path::Path;

use anyhow::Result;

use oakhouse_core::generator::{Generator, PatchStatus};

use crate::output;
use crate::IntegrateTarget;

pub fn run(dir: &Path, target: IntegrateTarget) -> Result<()> {
    match target {
        IntegrateTarget::Redis => redis(dir),
    }
}

fn redis(dir: &Path) -> Result<()> {
    let gen = Generator::open(dir)?;
    output::print_header("oakhouse integrate redis");

    let report = gen.integrate_redis()?;
    for (path, status) in &report.files {
        match status {
            PatchStatus::Created => output::print_file("create", path),
            PatchStatus::Updated => output::print_file("update", path),
            PatchStatus::Unchanged => output::print_key_value("unchanged", &path.display().to_string()),
        }
    }

    if !report.changed() {
        output::print_success("Redis is already integrated");
        return Ok(());
    }
    output::print_success("Redis integrated");
    println!();
    println!("  Next steps:");
    println!("    go mod tidy");
    println!("    set REDIS_URL in .env (leave it empty to run without Redis)");
    println!();
    Ok(())
}
