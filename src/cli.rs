//! Defines command-line interface options using `clap` for the tc-text application.

use crate::config::{ConfigLayer, Preset, VariableNames};
use crate::track::RecordLayout;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Convert tropical-cyclone tracks from NetCDF into pressure-filtered text
#[derive(Parser, Debug)]
#[command(
    version,
    name = "tc-text",
    about = "Write tropical-cyclone observations at or below a central pressure threshold as text"
)]
pub struct Args {
    /// Start from one of the historical conversions
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// JSON config file (fields: input_path, output_path, pressure_threshold, layout, variables, threads)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the NetCDF track file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Path of the text file to write
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Central pressure threshold in hPa; observations at or below it are written [default: 980]
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Append the basin code to every line
    #[arg(long)]
    pub basin: bool,

    /// Use IBTrACS v03 variable names (storm_sn, time_wmo, lat_wmo, lon_wmo, pres_wmo)
    #[arg(long)]
    pub variables_v03: bool,

    /// Number of threads to use for parallel processing. Defaults to number of CPU cores.
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// List all variables and dimensions in the NetCDF file instead of converting
    #[arg(long)]
    pub list_vars: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Configuration given directly on the command line
    pub fn overrides(&self) -> ConfigLayer {
        ConfigLayer {
            input_path: self.file.clone(),
            output_path: self.output.clone(),
            pressure_threshold: self.threshold,
            layout: self.basin.then_some(RecordLayout::PressureBasin),
            variables: self.variables_v03.then(VariableNames::ibtracs_v03),
            threads: self.threads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_flag() {
        let args = Args::try_parse_from(["tc-text", "--preset", "stochastic-basin"]).unwrap();
        assert_eq!(args.preset, Some(Preset::StochasticBasin));
        assert_eq!(args.overrides(), ConfigLayer::default());
    }

    #[test]
    fn test_overrides_from_flags() {
        let args = Args::try_parse_from([
            "tc-text",
            "-f",
            "IBTrACS.ALL.v04r00.nc",
            "-o",
            "out.txt",
            "--threshold",
            "950",
            "--basin",
            "--variables-v03",
            "-t",
            "4",
            "-vv",
        ])
        .unwrap();

        let layer = args.overrides();
        assert_eq!(layer.input_path, Some(PathBuf::from("IBTrACS.ALL.v04r00.nc")));
        assert_eq!(layer.output_path, Some(PathBuf::from("out.txt")));
        assert_eq!(layer.pressure_threshold, Some(950.0));
        assert_eq!(layer.layout, Some(RecordLayout::PressureBasin));
        assert_eq!(layer.variables, Some(VariableNames::ibtracs_v03()));
        assert_eq!(layer.threads, Some(4));
        assert_eq!(args.get_log_level(), "debug");
    }

    #[test]
    fn test_unknown_preset_rejected() {
        assert!(Args::try_parse_from(["tc-text", "--preset", "atlantic"]).is_err());
    }
}
