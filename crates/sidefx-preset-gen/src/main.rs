use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use sidefx_preset::{
    factory::factory_shapes, load_shapes, shapes_to_json, EncodeOptions, PresetLibrary,
    ShapeDefinition, UnsetCurvePolicy,
};
use tracing_subscriber::EnvFilter;

mod settings;

use settings::GeneratorSettings;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init()
        .ok();

    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => settings::load_from(path)?,
        None => settings::load_default(),
    };
    match cli.command {
        Commands::Generate(args) => execute_generate(args, &settings),
        Commands::List(args) => execute_list(args, &settings),
        Commands::Inspect(args) => execute_inspect(args),
    }
}

#[derive(Parser)]
#[command(
    name = "sidefx-preset-gen",
    author,
    version,
    about = "Generate REAPER preset libraries for the SideFX Modulator"
)]
struct Cli {
    /// Settings file (JSON). Defaults to the per-user config directory.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode the shape table into a preset library.
    Generate(GenerateArgs),
    /// List the shapes that would be encoded.
    List(ListArgs),
    /// Decode an existing preset library and print its shapes.
    Inspect(InspectArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// JSON shape table to use instead of the built-in shapes.
    #[arg(long, value_name = "FILE")]
    shapes: Option<PathBuf>,
    /// Write the library here instead of stdout.
    #[arg(long, short, value_name = "FILE")]
    output: Option<PathBuf>,
    /// How to fill curve slots a shape does not set.
    #[arg(long, value_enum)]
    unset_curves: Option<CurvePolicy>,
    /// Encode shapes on all cores. Output order is unchanged.
    #[arg(long)]
    parallel: bool,
}

#[derive(Args)]
struct ListArgs {
    /// JSON shape table to use instead of the built-in shapes.
    #[arg(long, value_name = "FILE")]
    shapes: Option<PathBuf>,
    /// Print the table as JSON, usable as a `--shapes` file.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct InspectArgs {
    /// Preset library (.rpl) to decode.
    file: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CurvePolicy {
    /// Keep `-` so the plug-in default applies.
    Placeholder,
    /// Write `0` (a straight segment).
    Zero,
}

impl From<CurvePolicy> for UnsetCurvePolicy {
    fn from(policy: CurvePolicy) -> Self {
        match policy {
            CurvePolicy::Placeholder => UnsetCurvePolicy::Placeholder,
            CurvePolicy::Zero => UnsetCurvePolicy::Zero,
        }
    }
}

fn resolve_shapes(path: Option<&Path>) -> Result<Vec<ShapeDefinition>> {
    match path {
        Some(path) => load_shapes(path)
            .with_context(|| format!("failed to load shapes from {}", path.display())),
        None => Ok(factory_shapes()),
    }
}

fn execute_generate(args: GenerateArgs, settings: &GeneratorSettings) -> Result<()> {
    let shapes = resolve_shapes(args.shapes.as_deref().or(settings.shapes.as_deref()))?;
    let options = EncodeOptions {
        unset_curves: args
            .unset_curves
            .map(UnsetCurvePolicy::from)
            .unwrap_or(settings.unset_curves),
        parallel: args.parallel || settings.parallel,
    };

    let library = PresetLibrary::build(&shapes, &options)?;
    let text = library.to_string();

    match args.output.as_ref().or(settings.output.as_ref()) {
        Some(path) => {
            fs::write(path, &text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(
                presets = library.len(),
                path = %path.display(),
                "wrote preset library"
            );
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .context("failed to write preset library to stdout")?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn execute_list(args: ListArgs, settings: &GeneratorSettings) -> Result<()> {
    let shapes = resolve_shapes(args.shapes.as_deref().or(settings.shapes.as_deref()))?;
    if args.json {
        println!("{}", shapes_to_json(&shapes)?);
        return Ok(());
    }
    for shape in shapes {
        println!(
            "{}: {} points, {} curves",
            shape.name,
            shape.point_count,
            shape.curves().len()
        );
    }
    Ok(())
}

fn execute_inspect(args: InspectArgs) -> Result<()> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let library = PresetLibrary::parse(&text)
        .with_context(|| format!("{} is not a preset library", args.file.display()))?;

    println!("{} ({} presets)", library.name(), library.len());
    for record in library.records() {
        let preset = record
            .decode()
            .with_context(|| format!("preset {:?} has a malformed payload", record.name))?;
        println!("{} ({} points)", preset.name, preset.point_count);
        let points: Vec<String> = preset
            .points
            .iter()
            .map(|point| format!("({}, {})", point.x, point.y))
            .collect();
        println!("  points: {}", points.join(" "));
        let curves: Vec<String> = preset
            .curves
            .iter()
            .enumerate()
            .filter_map(|(segment, value)| value.map(|value| format!("{segment}:{value}")))
            .collect();
        if curves.is_empty() {
            println!("  curves: none");
        } else {
            println!("  curves: {}", curves.join(" "));
        }
    }
    Ok(())
}
