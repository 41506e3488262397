use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use oam_core::config::{self, CONFIG_FILE_NAME, OamConfig};
use oam_core::model::{ComponentKind, Document};
use oam_core::render::{self, Format};
use oam_core::validate::validate;
use oam_core::{Fragment, SealOptions, fragment, parse};

#[derive(Parser)]
#[command(name = "oam", about = "Merge and resolve OpenAPI 3.1 documents", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge fragment files into one OpenAPI document
    Build {
        /// Config file to use instead of `.oam.yaml` in the current directory
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fragment files (YAML or JSON); defaults to the configured inputs
        #[arg(short, long)]
        input: Vec<PathBuf>,

        /// Output file; defaults to the configured output
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format; guessed from the output extension when omitted
        #[arg(long)]
        format: Option<Format>,
    },

    /// Validate an OpenAPI document
    Validate {
        /// Path to the OpenAPI document (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Follow references in an OpenAPI document
    Deref {
        /// Path to the OpenAPI document
        #[arg(short, long)]
        input: PathBuf,

        /// Pointer (`#/a/b`) or dotted path (`a.b`) to dereference; prints
        /// the fully inlined document when omitted
        #[arg(short, long)]
        pointer: Option<String>,

        #[arg(long, default_value = "yaml")]
        format: Format,
    },

    /// Summarize the operations and components of an OpenAPI document
    Inspect {
        /// Path to the OpenAPI document
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long, default_value = "yaml")]
        format: Format,
    },

    /// Initialize a new oam configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build { config, input, output, format } => {
            let cfg = try_load_config(config.as_deref())?.unwrap_or_default();
            cmd_build(&cfg, input, output, format)
        }

        Commands::Validate { input } => cmd_validate(&input),

        Commands::Deref { input, pointer, format } => cmd_deref(&input, pointer.as_deref(), format),

        Commands::Inspect { input, format } => cmd_inspect(&input, format),

        Commands::Init { force } => cmd_init(Path::new(CONFIG_FILE_NAME), force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "oam", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Load an explicitly named config file, or try the project config file in
/// the current directory.
fn try_load_config(path: Option<&Path>) -> Result<Option<OamConfig>> {
    match path {
        Some(path) => match config::load_config(path).map_err(|e| anyhow::anyhow!(e))? {
            Some(cfg) => Ok(Some(cfg)),
            None => anyhow::bail!("config file {} not found", path.display()),
        },
        None => config::load_config(Path::new(CONFIG_FILE_NAME)).map_err(|e| anyhow::anyhow!(e)),
    }
}

fn is_json(path: &Path) -> bool {
    Format::from_path(path) == Format::Json
}

fn load_fragments(paths: &[PathBuf]) -> Result<Vec<Fragment>> {
    let mut fragments = Vec::new();
    for path in paths {
        let content =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let loaded = if is_json(path) {
            fragment::from_json(&content)
        } else {
            fragment::from_yaml(&content)
        }
        .with_context(|| format!("failed to load fragments from {}", path.display()))?;
        log::info!("{}: {} fragments", path.display(), loaded.len());
        fragments.extend(loaded);
    }
    Ok(fragments)
}

fn load_document(path: &Path) -> Result<Document> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let document = if is_json(path) {
        parse::from_json(&content)?
    } else {
        parse::from_yaml(&content)?
    };
    Ok(document)
}

fn cmd_build(
    cfg: &OamConfig,
    input: Vec<PathBuf>,
    output: Option<PathBuf>,
    format: Option<Format>,
) -> Result<()> {
    let inputs = if input.is_empty() { cfg.inputs.clone() } else { input };
    if inputs.is_empty() {
        anyhow::bail!("no input fragments. Pass --input or list `inputs` in {CONFIG_FILE_NAME}.");
    }
    let output = output.unwrap_or_else(|| cfg.output.clone());
    let format = format.unwrap_or_else(|| Format::from_path(&output));

    let fragments = load_fragments(&inputs)?;
    let sealed = oam_core::build(&fragments, cfg)?;
    let rendered = render::render(&sealed, format)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    fs::write(&output, rendered).with_context(|| format!("failed to write {}", output.display()))?;

    eprintln!(
        "Merged {} fragments from {} files into {} ({} paths)",
        fragments.len(),
        inputs.len(),
        output.display(),
        sealed.paths().len()
    );
    Ok(())
}

fn cmd_validate(input: &Path) -> Result<()> {
    let document = load_document(input)?;
    let issues = validate(&document);

    eprintln!(
        "OpenAPI {} document: {}",
        document.openapi(),
        document.info().title()
    );
    eprintln!("  Version: {}", document.info().version());
    eprintln!("  Paths: {}", document.paths().len());
    eprintln!("  Operations: {}", document.operations().count());
    eprintln!("  Schemas: {}", document.components().count(ComponentKind::Schemas));

    let sealed = document.seal_with(&SealOptions {
        fill_response_descriptions: false,
        ..SealOptions::default()
    })?;
    let registry = sealed.registry()?;
    eprintln!("  Addressable elements: {}", registry.len());

    if issues.is_empty() {
        eprintln!("Validation successful.");
        return Ok(());
    }
    for issue in &issues {
        eprintln!("  warning: {issue}");
    }
    anyhow::bail!("{} validation issues found", issues.len())
}

fn cmd_deref(input: &Path, pointer: Option<&str>, format: Format) -> Result<()> {
    let sealed = load_document(input)?.seal()?;
    let resolver = sealed.resolver()?;

    match pointer {
        Some(pointer) => {
            let target = resolver.dereference(pointer)?;
            println!("{target}");
            print!("{}", render::render(resolver.value_at(&target)?, format)?);
        }
        None => print!("{}", render::render(&resolver.dereferenced(), format)?),
    }
    Ok(())
}

fn cmd_inspect(input: &Path, format: Format) -> Result<()> {
    let document = load_document(input)?;
    let summary = build_inspect_summary(&document);
    print!("{}", render::render(&summary, format)?);
    Ok(())
}

fn build_inspect_summary(document: &Document) -> serde_json::Value {
    let operations: Vec<serde_json::Value> = document
        .operations()
        .map(|(path, method, op)| {
            serde_json::json!({
                "method": method.as_str(),
                "path": path,
                "operation_id": op.operation_id(),
                "tags": op.tags(),
                "responses": op.responses().codes().collect::<Vec<_>>(),
            })
        })
        .collect();

    let components: serde_json::Map<String, serde_json::Value> = ComponentKind::ALL
        .into_iter()
        .map(|kind| (kind.as_str().to_string(), document.components().count(kind).into()))
        .filter(|(_, count)| count != &serde_json::Value::from(0))
        .collect();

    serde_json::json!({
        "info": {
            "title": document.info().title(),
            "version": document.info().version(),
        },
        "servers": document.servers().iter().map(|s| s.url()).collect::<Vec<_>>(),
        "tags": document.tags().iter().map(|t| t.name()).collect::<Vec<_>>(),
        "operations": operations,
        "webhooks": document.webhooks().keys().collect::<Vec<_>>(),
        "components": components,
    })
}

fn cmd_init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
