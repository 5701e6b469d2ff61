use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use featurefinder::core::{midpoint, Point};
use featurefinder::pipeline::DetectionPipeline;
use featurefinder::profile::ProfileCatalog;
use featurefinder::resolve::{DetectionCandidate, ReferenceLabel};

#[cfg(not(feature = "tracing"))]
use featurefinder::core::init_with_level;
#[cfg(not(feature = "tracing"))]
use log::LevelFilter;
#[cfg(feature = "tracing")]
use tracing::{info, warn};
#[cfg(not(feature = "tracing"))]
use log::{info, warn};

#[derive(Parser, Debug)]
#[command(version, about = "Resolve fiducial detections into left/right reference points")]
struct Cli {
    /// Log debug details to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a JSON list of candidates and print the report as JSON.
    Resolve(ResolveArgs),
    /// Print the normalized profile of a test system as JSON.
    Profile(ProfileArgs),
    /// List the test systems of the catalog.
    Systems {
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct ProfileArgs {
    /// Test system name, e.g. `galileo`.
    #[arg(short, long)]
    system: String,
    /// Rig specialization tag, e.g. `BAT`.
    #[arg(short, long)]
    tag: Option<String>,
    /// JSON catalog replacing the built-in one.
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ResolveArgs {
    #[command(flatten)]
    profile: ProfileArgs,
    /// JSON array of `{center: [x, y], size_metric, circularity}`.
    #[arg(short, long)]
    candidates: PathBuf,
    /// Image width in pixels (for the image-center pivot).
    #[arg(long, requires = "height")]
    width: Option<u32>,
    #[arg(long, requires = "width")]
    height: Option<u32>,
    /// Image file to take the dimensions from instead of --width/--height.
    #[arg(long, conflicts_with_all = ["width", "height"])]
    image: Option<PathBuf>,
    /// Write the report here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    #[cfg(not(feature = "tracing"))]
    init_with_level(if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    })?;

    #[cfg(feature = "tracing")]
    featurefinder::core::init_tracing(if cli.verbose { "debug" } else { "warn" }, false);

    match cli.command {
        Command::Resolve(args) => run_resolve(args),
        Command::Profile(args) => {
            let pipeline = load_pipeline(args.catalog.as_deref())?;
            let profile = pipeline.profile(&args.system, args.tag.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
            Ok(())
        }
        Command::Systems { catalog } => {
            let pipeline = load_pipeline(catalog.as_deref())?;
            for name in pipeline.catalog().system_names() {
                println!("{name}");
            }
            Ok(())
        }
    }
}

#[cfg_attr(feature = "tracing", tracing::instrument(level = "info", skip(args)))]
fn run_resolve(args: ResolveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = load_pipeline(args.profile.catalog.as_deref())?;
    let raw = fs::read_to_string(&args.candidates)?;
    let candidates: Vec<DetectionCandidate> = serde_json::from_str(&raw)?;
    info!(
        "{} candidates from {}",
        candidates.len(),
        args.candidates.display()
    );

    let center = image_center(&args)?;
    let report = pipeline.resolve_report(
        &args.profile.system,
        args.profile.tag.as_deref(),
        &candidates,
        center,
    )?;
    if report.find(ReferenceLabel::Left).is_none() || report.find(ReferenceLabel::Right).is_none()
    {
        warn!("not every reference slot was matched");
    }

    let json = serde_json::to_string_pretty(&report)?;
    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, json)?;
            info!("wrote report JSON to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn load_pipeline(catalog: Option<&Path>) -> Result<DetectionPipeline, Box<dyn std::error::Error>> {
    Ok(match catalog {
        Some(path) => DetectionPipeline::with_catalog(ProfileCatalog::from_path(path)?),
        None => DetectionPipeline::new(),
    })
}

fn image_center(args: &ResolveArgs) -> Result<Point, Box<dyn std::error::Error>> {
    if let (Some(w), Some(h)) = (args.width, args.height) {
        return Ok(midpoint(
            &Point::origin(),
            &Point::new(f64::from(w), f64::from(h)),
        ));
    }
    if let Some(path) = &args.image {
        #[cfg(feature = "image")]
        {
            let artifacts = featurefinder::artifacts::load_artifacts(path)?;
            return artifacts
                .center()
                .ok_or_else(|| "image has no pixel data".into());
        }
        #[cfg(not(feature = "image"))]
        return Err(format!(
            "cannot read {}: built without the `image` feature",
            path.display()
        )
        .into());
    }
    Err("image dimensions required: pass --width/--height or --image".into())
}
