use clap::Parser;
use fisheye_rectify::imaging::{RectifyParams, Rounding, RustBackend, plan_rectify, rectify_file};
use fisheye_rectify::{config, output};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rectify")]
#[command(about = "Unroll a circular fisheye image into a rectilinear strip")]
#[command(long_about = "\
Unroll a circular fisheye image into a rectilinear strip

The source is read as a disc centered on its midpoint. Each output column is
an angle around that center, each output row a distance from it: the top row
is the outer rim, the bottom row the center. Output width is the rim's
circumference, output height its radius. Points that fall outside the source
are black.

Settings are read from ./rectify.toml when present (or --config FILE), then
overridden by flags. Run 'rectify --gen-config' for a documented template.")]
#[command(version)]
struct Cli {
    /// Fisheye source image (JPEG, PNG, TIFF, WebP)
    #[arg(required_unless_present = "gen_config")]
    input: Option<PathBuf>,

    /// Destination for the strip (.png and .tif/.tiff are lossless; anything else is JPEG)
    #[arg(required_unless_present = "gen_config")]
    output: Option<PathBuf>,

    /// Config file (default: ./rectify.toml if it exists)
    #[arg(long)]
    config: Option<PathBuf>,

    /// How fractional source coordinates snap to pixels
    #[arg(long, value_enum)]
    rounding: Option<Rounding>,

    /// JPEG quality (1-100)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    quality: Option<u32>,

    /// Maximum worker threads (capped at the number of cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,

    /// Read only the source header and print the output geometry; write nothing
    #[arg(long, conflicts_with = "json")]
    dry_run: bool,

    /// Print a stock rectify.toml with all options documented
    #[arg(long, exclusive = true)]
    gen_config: bool,

    /// Log debug details to stderr (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }
    let (Some(input), Some(output_path)) = (cli.input, cli.output) else {
        return Err("both <INPUT> and <OUTPUT> are required".into());
    };

    let cwd = std::env::current_dir()?;
    let mut settings = config::load_config(cli.config.as_deref(), &cwd)?;
    if let Some(rounding) = cli.rounding {
        settings.projection.rounding = rounding;
    }
    if let Some(quality) = cli.quality {
        settings.output.quality = quality;
    }
    if let Some(threads) = cli.threads {
        settings.processing.max_processes = Some(threads);
    }
    settings.validate()?;
    debug!(?settings, "resolved configuration");

    let backend = RustBackend::new();
    if cli.dry_run {
        let geometry = plan_rectify(&backend, &input)?;
        output::print_plan(&input, &output_path, &geometry);
        return Ok(());
    }

    init_thread_pool(&settings.processing);

    let params = RectifyParams {
        source: input,
        output: output_path,
        quality: settings.quality(),
        rounding: settings.projection.rounding,
    };
    let report = rectify_file(&backend, &params)?;

    if cli.json {
        println!("{}", output::format_report_json(&report)?);
    } else {
        output::print_report(&report);
    }
    Ok(())
}

/// Route `tracing` events to stderr so stdout stays clean for the report.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    debug!(threads, "initializing worker pool");
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
