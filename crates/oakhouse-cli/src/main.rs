//! oakhouse CLI: scaffolding for Go web APIs built on Fiber and GORM.
//!
//! `new` creates a project skeleton and `generate` (alias `g`) writes
//! resources and their parts. `integrate` adds optional features such as
//! Redis to an existing project. `serve` runs the app and `build` compiles it.
//!
//! All generation goes through [`oakhouse_core::generator::Generator`].

mod commands;
mod output;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "oakhouse",
    about = "Scaffolding for Go web APIs built on Fiber and GORM",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root to operate in
    #[arg(short = 'C', long = "dir", global = true, default_value = ".")]
    dir: PathBuf,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project
    New {
        /// Project name (creates a directory with this name)
        name: String,

        /// Go module path (default: the project name)
        #[arg(long)]
        module: Option<String>,

        /// Do not run `go mod tidy` after scaffolding
        #[arg(long)]
        skip_tidy: bool,
    },

    /// Generate code inside an existing project
    #[command(alias = "g")]
    Generate {
        #[command(subcommand)]
        target: GenerateTarget,
    },

    /// Add an optional integration to an existing project
    Integrate {
        #[command(subcommand)]
        target: IntegrateTarget,
    },

    /// Run the application (with live reload when `air` is installed)
    Serve {
        /// Address the app listens on
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port the app listens on
        #[arg(long, short, env = "APP_PORT", default_value_t = 8080)]
        port: u16,
    },

    /// Compile the application to bin/app
    Build,
}

#[derive(Subcommand)]
pub enum GenerateTarget {
    /// Model, repository, service, handler, DTOs, scope and route for a resource
    Resource(ResourceArgs),

    /// GORM model
    Model(FieldsArgs),

    /// Repository interface and implementation
    #[command(alias = "repo")]
    Repository(NameArgs),

    /// Service interface and implementation
    Service(FieldsArgs),

    /// HTTP handler stub
    Handler(NameArgs),

    /// Get, create and update DTOs
    Dto(FieldsArgs),

    /// Route file, registered in the central route file
    Route(NameArgs),

    /// Middleware stub
    Middleware(NameArgs),

    /// Query filter scopes
    Scope {
        #[command(flatten)]
        target: FieldsArgs,

        /// Also add pagination and sort helpers
        #[arg(long)]
        pagination: bool,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrateTarget {
    /// Redis client adapter, cache helper and config wiring
    Redis,
}

#[derive(Args)]
pub struct ResourceArgs {
    /// Resource name in PascalCase (e.g. User, BlogPost)
    #[arg(required_unless_present = "interactive")]
    pub name: Option<String>,

    /// Fields as name:type (e.g. title:string price:float64)
    pub fields: Vec<String>,

    /// Prompt for the name and fields
    #[arg(short, long)]
    pub interactive: bool,

    /// Show what would be generated without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Accept names and fields that fail validation
    #[arg(long)]
    pub skip_validation: bool,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct FieldsArgs {
    /// Resource name in PascalCase
    pub name: String,

    /// Fields as name:type
    pub fields: Vec<String>,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct NameArgs {
    /// Name in PascalCase
    pub name: String,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::New {
            name,
            module,
            skip_tidy,
        } => {
            commands::new::run(&cli.dir, &name, module.as_deref(), skip_tidy)?;
        }
        Commands::Generate { target } => {
            commands::generate::run(&cli.dir, target)?;
        }
        Commands::Integrate { target } => {
            commands::integrate::run(&cli.dir, target)?;
        }
        Commands::Serve { host, port } => {
            commands::serve::run(&cli.dir, &host, port)?;
        }
        Commands::Build => {
            commands::build::run(&cli.dir)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_alias_and_fields() {
        let cli = Cli::try_parse_from(["oakhouse", "g", "resource", "User", "name:string", "age:int", "--force"])
            .unwrap();
        match cli.command {
            Commands::Generate {
                target: GenerateTarget::Resource(args),
            } => {
                assert_eq!(args.name.as_deref(), Some("User"));
                assert_eq!(args.fields, ["name:string", "age:int"]);
                assert!(args.force);
                assert!(!args.dry_run);
            }
            _ => panic!("expected generate resource"),
        }
    }

    #[test]
    fn test_resource_name_optional_when_interactive() {
        assert!(Cli::try_parse_from(["oakhouse", "generate", "resource"]).is_err());
        assert!(Cli::try_parse_from(["oakhouse", "generate", "resource", "-i"]).is_ok());
    }

    #[test]
    fn test_integrate_redis() {
        let cli = Cli::try_parse_from(["oakhouse", "integrate", "redis"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Integrate {
                target: IntegrateTarget::Redis
            }
        ));
        assert!(Cli::try_parse_from(["oakhouse", "integrate", "mongo"]).is_err());
    }

    #[test]
    fn test_global_dir_flag() {
        let cli = Cli::try_parse_from(["oakhouse", "generate", "repo", "User", "-C", "/tmp/shop"]).unwrap();
        assert_eq!(cli.dir, PathBuf::from("/tmp/shop"));
        assert!(matches!(
            cli.command,
            Commands::Generate {
                target: GenerateTarget::Repository(_)
            }
        ));
    }
}
