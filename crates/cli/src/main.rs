use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use storybase_structure::{
    structure_options, Story, Structure, StructureConfig, StructureType, TocFormat, TocOptions,
};

mod report;

const CONFIG_ENV: &str = "STORYBASE_CONFIG";

#[derive(Parser)]
#[command(name = "storybase")]
#[command(about = "Reading order, navigation and outlines for Storybase stories", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Structure config file (TOML); falls back to STORYBASE_CONFIG
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Structure type (linear|spider); overrides the story document
    #[arg(long, global = true)]
    structure: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print sections in reading order
    Flat(FlatArgs),

    /// Print the previous and next section of one section
    Nav(NavArgs),

    /// Print the structure JSON payload
    Json(JsonArgs),

    /// Render a table of contents
    Toc(TocArgs),

    /// Print sections left out of the reading order
    Orphans(FlatArgs),

    /// List known structure types
    Structures(StructuresArgs),
}

#[derive(Args)]
struct FlatArgs {
    /// Story document (JSON); `-` reads stdin
    story: PathBuf,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct NavArgs {
    /// Story document (JSON); `-` reads stdin
    story: PathBuf,

    /// Section to navigate from
    section_id: String,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct JsonArgs {
    /// Story document (JSON); `-` reads stdin
    story: PathBuf,

    /// Open the reading order with the summary pseudo-section
    #[arg(long)]
    summary: bool,

    /// Close the reading order with the call-to-action pseudo-section
    #[arg(long)]
    call_to_action: bool,

    /// One entry per section in reading order, children as ids
    #[arg(long)]
    flat: bool,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct TocArgs {
    /// Story document (JSON); `-` reads stdin
    story: PathBuf,

    /// Output format
    #[arg(long, default_value = "html")]
    format: String,

    /// Class attribute of the outer list
    #[arg(long = "class")]
    html_class: Option<String>,

    /// Add an entry for the summary pseudo-section
    #[arg(long)]
    summary: bool,

    /// Add an entry for the call-to-action pseudo-section
    #[arg(long)]
    call_to_action: bool,
}

#[derive(Args)]
struct StructuresArgs {
    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stderr quiet when stdout carries JSON for another program
    let json_output = match &cli.command {
        Commands::Flat(args) | Commands::Orphans(args) => args.json,
        Commands::Nav(args) => args.json,
        Commands::Json(_) => true,
        Commands::Structures(args) => args.json,
        Commands::Toc(_) => false,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = load_config(cli.config.as_deref())?;
    let structure_override = cli
        .structure
        .as_deref()
        .map(StructureType::from_id)
        .transpose()?;

    match cli.command {
        Commands::Flat(args) => {
            let structure = build_structure(&args.story, structure_override, &config)?;
            let sections = structure.sections_flat();
            if args.json {
                print_json(&report::sections_value(&sections), false)?;
            } else {
                print!("{}", report::render_sections(&sections));
            }
        }
        Commands::Nav(args) => {
            let structure = build_structure(&args.story, structure_override, &config)?;
            let previous = structure.get_previous_section(&args.section_id)?;
            let next = structure.get_next_section(&args.section_id)?;
            if args.json {
                print_json(
                    &json!({
                        "section_id": args.section_id,
                        "previous_section_id": previous.map(|s| &s.section_id),
                        "next_section_id": next.map(|s| &s.section_id),
                    }),
                    false,
                )?;
            } else {
                print!("{}", report::render_nav(previous, next));
            }
        }
        Commands::Json(args) => {
            let structure = build_structure(&args.story, structure_override, &config)?;
            if args.flat {
                let document = structure.sections_json_flat(args.summary, args.call_to_action);
                print_json(&serde_json::to_value(document)?, args.pretty)?;
            } else {
                let document = structure.sections_json(args.summary, args.call_to_action)?;
                print_json(&serde_json::to_value(document)?, args.pretty)?;
            }
        }
        Commands::Toc(args) => {
            let format: TocFormat = args.format.parse()?;
            let structure = build_structure(&args.story, structure_override, &config)?;
            let options = TocOptions {
                html_class: args.html_class,
                include_summary: args.summary,
                include_call_to_action: args.call_to_action,
            };
            println!("{}", structure.render_toc(format, &options)?);
        }
        Commands::Orphans(args) => {
            let structure = build_structure(&args.story, structure_override, &config)?;
            let orphans = structure.orphans();
            if args.json {
                print_json(&report::sections_value(&orphans), false)?;
            } else {
                print!("{}", report::render_sections(&orphans));
            }
        }
        Commands::Structures(args) => {
            let options = structure_options();
            if args.json {
                let value: Vec<_> = options
                    .iter()
                    .map(|(id, name)| json!({ "id": id, "name": name }))
                    .collect();
                print_json(&serde_json::Value::Array(value), false)?;
            } else {
                print!("{}", report::render_structures(&options, config.default_structure));
            }
        }
    }

    Ok(())
}

fn load_config(flag: Option<&Path>) -> Result<StructureConfig> {
    let path = flag
        .map(Path::to_path_buf)
        .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));

    match path {
        Some(path) => StructureConfig::load(&path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(StructureConfig::default()),
    }
}

fn read_story(path: &Path) -> Result<serde_json::Value> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read story from stdin")?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read story {}", path.display()))?
    };
    serde_json::from_str(&raw).context("Story document is not valid JSON")
}

/// The structure type comes from `--structure`, then the story document,
/// then the configured default.
fn build_structure(
    path: &Path,
    structure_override: Option<StructureType>,
    config: &StructureConfig,
) -> Result<Structure> {
    let raw = read_story(path)?;
    let declared = raw.get("structure_type").is_some() || raw.get("structure").is_some();
    let story: Story = serde_json::from_value(raw).context("Invalid story document")?;

    let kind = match structure_override {
        Some(kind) => kind,
        None if declared => story.structure_type,
        None => config.default_structure,
    };
    log::debug!("Interpreting story '{}' as {}", story.title, kind);

    Structure::with_config(kind, &story, config.clone())
        .with_context(|| format!("Failed to build structure for {}", path.display()))
}

fn print_json(value: &serde_json::Value, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}
