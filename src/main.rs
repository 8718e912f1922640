//! SceneBridge CLI
//!
//! Converts scene dumps written by the authoring application into Babylon.js
//! `.babylon` scenes, and inspects dumps before export.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use scenebridge_export::logging::{init_with_config, TracingConfig};
use scenebridge_export::{ExportOptions, ParentMode, SceneExporter};
use scenebridge_scene::{outline, AdaptedDocument, SceneDump, SceneSummary};

/// SceneBridge - authoring scene to Babylon.js exporter
#[derive(Parser)]
#[command(name = "scenebridge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format for reports
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Export a scene dump to a .babylon file
    Export(ExportArgs),

    /// Print the scene tree outline of a dump
    Describe(DescribeArgs),

    /// Show element counts of a dump
    Info(InfoArgs),
}

#[derive(Args)]
struct ExportArgs {
    /// Scene dump written by the host script
    input: PathBuf,

    /// Output .babylon file (defaults to the input with a .babylon extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// YAML file with export options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write compact JSON
    #[arg(long)]
    compact: bool,

    /// Emit parentId for meshes nested under other meshes
    #[arg(long)]
    hierarchy: bool,
}

#[derive(Args)]
struct DescribeArgs {
    /// Scene dump written by the host script
    input: PathBuf,
}

#[derive(Args)]
struct InfoArgs {
    /// Scene dump written by the host script
    input: PathBuf,
}

fn setup_logging(verbosity: u8) {
    init_with_config(TracingConfig::for_verbosity(verbosity));
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Export(args) => cmd_export(args, cli.format),
        Commands::Describe(args) => cmd_describe(args),
        Commands::Info(args) => cmd_info(args, cli.format),
    }
}

fn load_document(input: &Path) -> Result<AdaptedDocument> {
    if !input.exists() {
        bail!("File not found: {:?}", input);
    }

    let dump = SceneDump::from_path(input).with_context(|| format!("Failed to read scene dump {:?}", input))?;
    AdaptedDocument::adapt(&dump).context("Failed to adapt scene dump")
}

fn cmd_export(args: ExportArgs, format: OutputFormat) -> Result<()> {
    let mut options = match &args.config {
        Some(path) => ExportOptions::from_yaml_path(path)
            .with_context(|| format!("Failed to load export options {:?}", path))?,
        None => ExportOptions::default(),
    };
    if args.compact {
        options.pretty = false;
    }
    if args.hierarchy {
        options.parent_mode = ParentMode::Hierarchy;
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("babylon"));

    info!("Exporting {:?} to {:?}", args.input, output);

    let document = load_document(&args.input)?;
    let exporter = SceneExporter::with_options(options);
    let outcome = exporter.build_scene(&document).context("Export failed")?;
    exporter
        .write_scene(&outcome.scene, &output)
        .context("Failed to write scene")?;

    if !outcome.diagnostics.is_empty() {
        warn!(
            count = outcome.diagnostics.len(),
            "Export finished with recovered problems"
        );
    }

    let stats = outcome.stats;
    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "output": output,
                "stats": stats,
                "diagnostics": outcome.diagnostics.iter().map(ToString::to_string).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            println!("Exported {}", output.display());
            println!(
                "  {} meshes, {} lights, {} cameras, {} materials ({} textures)",
                stats.meshes, stats.lights, stats.cameras, stats.materials, stats.textures
            );
            println!("  {} vertices, {} triangles", stats.vertices, stats.triangles);
            println!("  {} ms", stats.elapsed_ms);
            for diagnostic in outcome.diagnostics.iter() {
                println!("  warning: {}", diagnostic);
            }
        }
    }

    Ok(())
}

fn cmd_describe(args: DescribeArgs) -> Result<()> {
    let document = load_document(&args.input)?;
    print!("{}", outline(&document.nodes));
    Ok(())
}

fn cmd_info(args: InfoArgs, format: OutputFormat) -> Result<()> {
    let document = load_document(&args.input)?;
    let summary = SceneSummary::of(&document);

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "path": args.input,
                "summary": summary,
                "materials": document.materials.iter().map(|m| &m.name).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            println!("Scene dump: {}", args.input.display());
            println!("{}", summary);
        }
    }

    Ok(())
}
