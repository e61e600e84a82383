//! Entry point for the tc-text application.
//! Resolves the conversion config, then either lists the dataset contents or
//! writes the pressure-filtered text file.

use clap::Parser;
use std::process;
use tc_text::cli::Args;
use tc_text::config::{ConfigLayer, ConversionConfig};
use tc_text::errors::{Result, TrackTextError};
use tc_text::metadata::{describe_dataset, list_variables_and_dimensions};
use tc_text::netcdf_io::IbtracsReader;
use tc_text::parallel::ParallelConfig;
use tc_text::{convert, ConversionSummary};
use tracing::debug;

fn main() {
    let args = Args::parse();
    setup_logging(&args);

    if let Err(error) = run(&args) {
        eprintln!("❌ {}", error);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<Option<ConversionSummary>> {
    if args.list_vars {
        list_dataset(args)?;
        return Ok(None);
    }

    let config = resolve_config(args)?;
    ParallelConfig::new(config.threads).setup_global_pool()?;

    println!(
        "🌀 Converting {} (pressure <= {} hPa)",
        config.input_path.display(),
        config.pressure_threshold
    );
    let summary = convert(&config)?;
    summary.print(&config);

    Ok(Some(summary))
}

fn resolve_config(args: &Args) -> Result<ConversionConfig> {
    let mut layers = Vec::new();
    if let Some(preset) = args.preset {
        layers.push(preset.layer());
    }
    if let Some(path) = &args.config {
        layers.push(ConfigLayer::load(path)?);
    }
    layers.push(args.overrides());

    let config = ConversionConfig::resolve(layers)?;
    debug!("Resolved configuration: {:?}", config);
    Ok(config)
}

fn list_dataset(args: &Args) -> Result<()> {
    // Only the input path and variable names matter here.
    let mut layer = ConfigLayer::default();
    if let Some(preset) = args.preset {
        layer = layer.merge(preset.layer());
    }
    if let Some(path) = &args.config {
        layer = layer.merge(ConfigLayer::load(path)?);
    }
    let layer = layer.merge(args.overrides());

    let input = layer
        .input_path
        .ok_or_else(|| TrackTextError::invalid_config("no input path given"))?;
    let reader = IbtracsReader::open(&input, layer.variables.unwrap_or_default())?;
    println!("Successfully opened NetCDF file: {}", input.display());

    list_variables_and_dimensions(reader.file())?;

    let layout = describe_dataset(reader.file(), reader.variables());
    layout.print();
    let missing = layout.missing_variables();
    if !missing.is_empty() {
        println!("\n⚠ Missing track variables: {}", missing.join(", "));
    }

    Ok(())
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tc_text={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}
