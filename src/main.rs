use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

use coastmask::api::fetch_coastline;
use coastmask::config::FileConfig;
use coastmask::mask::{validate_rings, write_land_mask};
use coastmask::osm::{read_mainland, read_segments};
use coastmask::pipeline::build_land_mask;

/// Rebuild a land-mask polygon set from OpenStreetMap coastline ways
///
/// Input and output paths are fixed (data/coastline.json, data/mainland.json
/// -> data/land_mask.geojson) and can only be changed in coastmask.toml.
/// Running with no arguments builds the land mask; `--config`, `-v` and the
/// `fetch` subcommand are optional and never change the build result.
///
/// Examples:
///   # Download coastline ways for the configured bbox
///   coastmask fetch
///
///   # Build the land mask
///   coastmask
#[derive(Parser, Debug)]
#[command(name = "coastmask")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches coastmask.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Stitch coastline ways into the land mask (default)
    Build,
    /// Download coastline ways for the configured bbox from Overpass
    Fetch,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .init();

    let file_config = if let Some(ref config_path) = args.config {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .context(format!("Failed to read config file: {:?}", config_path))?;
            toml::from_str(&contents).context("Failed to parse config file")?
        } else {
            bail!("Config file not found: {:?}", config_path);
        }
    } else {
        FileConfig::load().unwrap_or_default()
    };

    file_config.validate()?;

    match args.command.unwrap_or(Command::Build) {
        Command::Build => run_build(&file_config),
        Command::Fetch => run_fetch(&file_config),
    }
}

fn run_build(config: &FileConfig) -> Result<()> {
    let total_start = Instant::now();

    info!(
        "Stitch policy: precision={} force_close_min_points={} max_iterations={}",
        config.stitch.precision, config.stitch.force_close_min_points, config.stitch.max_iterations
    );
    info!(
        "Filter policy: min_area={} max_rings={}",
        config.filter.min_area, config.filter.max_rings
    );

    let spinner = create_spinner("Reading coastline ways...");
    let start = Instant::now();
    let intake = read_segments(&config.input)?;
    let mainland = read_mainland(&config.mainland)?;
    spinner.finish_with_message(format!(
        "Read {} segments ({} malformed skipped) [{:.1}s]",
        intake.segments.len(),
        intake.malformed,
        start.elapsed().as_secs_f32()
    ));

    let spinner = create_spinner("Stitching rings...");
    let start = Instant::now();
    let build = build_land_mask(&intake.segments, mainland, config.stitch, &config.filter);
    spinner.finish_with_message(format!(
        "Built {} rings, kept {} significant [{:.1}s]",
        build.candidate_rings,
        build.land_mask.coastline_count(),
        start.elapsed().as_secs_f32()
    ));

    if config.validate.check_simple {
        let spinner = create_spinner("Checking ring simplicity...");
        let result = validate_rings(&build.land_mask);
        for warning in &result.warnings {
            warn!("{}", warning);
        }
        spinner.finish_with_message(result.summary());
    }

    let spinner = create_spinner("Writing land mask...");
    write_land_mask(&config.output, &build.land_mask).context("Failed to write land mask")?;
    spinner.finish_with_message(format!(
        "Wrote {} polygons to {}",
        build.land_mask.len(),
        config.output.display()
    ));

    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );

    Ok(())
}

fn run_fetch(config: &FileConfig) -> Result<()> {
    let Some(bbox) = config.bbox else {
        bail!("fetch needs a bbox = {{ south, west, north, east }} entry in coastmask.toml");
    };
    let overpass = config.overpass.clone().unwrap_or_default();

    let spinner = create_spinner("Fetching coastline from OpenStreetMap...");
    let start = Instant::now();
    let body = fetch_coastline(&bbox, &overpass)
        .context("Failed to fetch coastline from Overpass API")?;
    spinner.finish_with_message(format!(
        "Fetched {:.1} KB [{:.1}s]",
        body.len() as f64 / 1024.0,
        start.elapsed().as_secs_f32()
    ));

    write_raw(&config.input, &body)?;
    println!("Output: {}", config.input.display());

    Ok(())
}

fn write_raw(path: &Path, body: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, body)
        .with_context(|| format!("Failed to write coastline file: {}", path.display()))
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
