use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use dialoguer::{Confirm, Input, Select};

use oakhouse_core::fields::{self, FieldOutcome, FieldSpec, SkipReason};
use oakhouse_core::generator::{routes, Generator, ResourcePaths};
use oakhouse_core::naming::ResourceName;
use oakhouse_core::splice::SpliceStatus;

use crate::output;
use crate::{FieldsArgs, GenerateTarget, NameArgs, ResourceArgs};

/// Type keywords offered by the interactive prompt.
const FIELD_TYPES: &[&str] = &["string", "text", "int", "int64", "float64", "bool", "time", "uuid"];

/// Generate code for one target inside the project at `dir`.
pub fn run(dir: &Path, target: GenerateTarget) -> Result<()> {
    match target {
        GenerateTarget::Resource(args) => resource(dir, args),
        GenerateTarget::Model(args) => {
            let (gen, name, specs) = with_fields(dir, &args, "model")?;
            output::print_file("create", &gen.model(&name, &specs)?);
            Ok(())
        }
        GenerateTarget::Repository(args) => {
            let (gen, name) = with_name(dir, &args, "repository")?;
            output::print_file("create", &gen.repository(&name)?);
            Ok(())
        }
        GenerateTarget::Service(args) => {
            let (gen, name, specs) = with_fields(dir, &args, "service")?;
            output::print_file("create", &gen.service(&name, &specs)?);
            let paths = ResourcePaths::new(&name);
            if !gen.root().join(&paths.scope).exists() || !gen.root().join(&paths.get_dto).exists() {
                output::print_warning(&format!(
                    "The service imports dto/{0} and scope/{0}; generate them with `oakhouse g dto` and `oakhouse g scope`",
                    name.lower()
                ));
            }
            Ok(())
        }
        GenerateTarget::Handler(args) => {
            let (gen, name) = with_name(dir, &args, "handler")?;
            output::print_file("create", &gen.handler(&name)?);
            Ok(())
        }
        GenerateTarget::Dto(args) => {
            let (gen, name, specs) = with_fields(dir, &args, "dto")?;
            for path in gen.dto(&name, &specs)? {
                output::print_file("create", &path);
            }
            Ok(())
        }
        GenerateTarget::Route(args) => {
            let (gen, name) = with_name(dir, &args, "route")?;
            let (path, status) = gen.route(&name)?;
            output::print_file("create", &path);
            print_route_status(&gen, &name, status);
            Ok(())
        }
        GenerateTarget::Middleware(args) => {
            let (gen, name) = with_name(dir, &args, "middleware")?;
            output::print_file("create", &gen.middleware(&name)?);
            Ok(())
        }
        GenerateTarget::Scope { target, pagination } => {
            let (gen, name, specs) = with_fields(dir, &target, "scope")?;
            let report = gen.scope(&name, &specs, pagination)?;
            output::print_file(if report.created { "create" } else { "update" }, &report.path);
            for func in &report.added {
                output::print_key_value("added", func);
            }
            if !report.created && report.added.is_empty() {
                output::print_success("All requested filters already exist");
            }
            Ok(())
        }
    }
}

fn resource(dir: &Path, args: ResourceArgs) -> Result<()> {
    let (raw_name, tokens) = if args.interactive {
        prompt_resource(args.name, args.fields)?
    } else {
        (args.name.unwrap_or_default(), args.fields)
    };

    let name = if args.skip_validation {
        ResourceName::unchecked(&raw_name)
    } else {
        let name = ResourceName::parse(&raw_name)?;
        fields::validate_tokens(&tokens)?;
        name
    };
    let specs = parse_fields(&tokens);
    let gen = Generator::open(dir)?.overwrite(args.force);

    output::print_header(&format!("oakhouse generate resource: {name}"));
    for spec in &specs {
        output::print_key_value(&spec.display_name(), spec.resolved_type.go_type());
    }

    if args.dry_run {
        return dry_run(&gen, &name);
    }

    let conflicts = gen.conflicts(&name);
    if !conflicts.is_empty() && !args.force {
        for path in &conflicts {
            output::print_error(&format!("{} already exists", path.display()));
        }
        bail!(
            "{} file(s) already exist; re-run with --force to overwrite",
            conflicts.len()
        );
    }

    let bar = output::file_progress(gen.planned_files(&name).len());
    let result = gen.resource(&name, &specs, |path| {
        bar.set_message(path.display().to_string());
        bar.inc(1);
    });
    bar.finish_and_clear();
    let report = result?;

    for path in &report.files {
        output::print_file("create", path);
    }
    print_route_status(&gen, &name, report.route_status);
    output::print_success(&format!("Resource '{name}' generated ({} files)", report.files.len()));
    Ok(())
}

fn dry_run(gen: &Generator, name: &ResourceName) -> Result<()> {
    output::print_warning("Dry run: nothing will be written");

    let conflicts = gen.conflicts(name);
    for path in gen.planned_files(name) {
        let action = if conflicts.contains(&path) {
            "overwrite"
        } else if gen.root().join(&path).exists() {
            "update"
        } else {
            "create"
        };
        output::print_file(action, &path);
    }

    let route_file = gen.route_file();
    match routes::preview_route_registration(&route_file, &gen.config().routes.layout, name.as_str()) {
        Ok(outcome) if outcome.status == SpliceStatus::Registered => {
            output::print_file("register", &gen.config().routes.file);
        }
        Ok(_) => output::print_key_value("Routes", "already registered"),
        Err(e) => output::print_error(&format!("{:#}", anyhow::Error::from(e))),
    }

    if !conflicts.is_empty() {
        output::print_warning(&format!(
            "{} existing file(s) would need --force",
            conflicts.len()
        ));
    }
    Ok(())
}

fn print_route_status(gen: &Generator, name: &ResourceName, status: SpliceStatus) {
    let file: &PathBuf = &gen.config().routes.file;
    match status {
        SpliceStatus::Registered => output::print_success(&format!(
            "Registered Setup{name}Routes in {}",
            file.display()
        )),
        SpliceStatus::AlreadyRegistered => output::print_key_value(
            "Routes",
            &format!("Setup{name}Routes already registered in {}", file.display()),
        ),
    }
}

/// Open the project and validate the name for a single-part target.
fn with_name(dir: &Path, args: &NameArgs, what: &str) -> Result<(Generator, ResourceName)> {
    let name = ResourceName::parse(&args.name)?;
    let gen = Generator::open(dir)?.overwrite(args.force);
    output::print_header(&format!("oakhouse generate {what}: {name}"));
    Ok((gen, name))
}

fn with_fields(dir: &Path, args: &FieldsArgs, what: &str) -> Result<(Generator, ResourceName, Vec<FieldSpec>)> {
    let name = ResourceName::parse(&args.name)?;
    let gen = Generator::open(dir)?.overwrite(args.force);
    output::print_header(&format!("oakhouse generate {what}: {name}"));
    Ok((gen, name, parse_fields(&args.fields)))
}

/// Lenient field parsing; skipped and defaulted tokens are reported.
fn parse_fields(tokens: &[String]) -> Vec<FieldSpec> {
    fields::parse_outcomes(tokens)
        .into_iter()
        .filter_map(|outcome| {
            match &outcome {
                FieldOutcome::Parsed(_) => {}
                FieldOutcome::DefaultedType(spec) => output::print_warning(&format!(
                    "Unknown type '{}' for field '{}', using string",
                    spec.type_token, spec.name
                )),
                FieldOutcome::Skipped { token, reason } => {
                    let why = match reason {
                        SkipReason::Separator => "expected name:type",
                        SkipReason::InvalidName => "invalid field name",
                    };
                    output::print_warning(&format!("Skipping field '{token}' ({why})"));
                }
            }
            outcome.spec().cloned()
        })
        .collect()
}

fn prompt_resource(name: Option<String>, mut tokens: Vec<String>) -> Result<(String, Vec<String>)> {
    let name = match name {
        Some(name) => name,
        None => Input::<String>::new()
            .with_prompt("Resource name (PascalCase)")
            .validate_with(|input: &String| -> std::result::Result<(), String> {
                ResourceName::parse(input).map(|_| ()).map_err(|e| e.to_string())
            })
            .interact_text()?,
    };

    loop {
        let field = Input::<String>::new()
            .with_prompt("Field name (empty to finish)")
            .allow_empty(true)
            .validate_with(|input: &String| -> std::result::Result<(), String> {
                match fields::parse_token(&format!("{input}:string")) {
                    _ if input.is_empty() => Ok(()),
                    FieldOutcome::Skipped { .. } => {
                        Err("must start with a letter and contain only letters and digits".into())
                    }
                    _ => Ok(()),
                }
            })
            .interact_text()?;
        if field.is_empty() {
            break;
        }

        let choice = Select::new()
            .with_prompt(format!("Type of '{field}'"))
            .items(FIELD_TYPES)
            .default(0)
            .interact()?;
        tokens.push(format!("{field}:{}", FIELD_TYPES[choice]));
    }

    let confirmed = Confirm::new()
        .with_prompt(format!("Generate {name} with {} field(s)?", tokens.len()))
        .default(true)
        .interact()?;
    if !confirmed {
        bail!("aborted");
    }
    Ok((name, tokens))
}
