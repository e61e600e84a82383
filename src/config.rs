//! Conversion configuration
//!
//! A [`ConversionConfig`] is resolved from layered partial configurations:
//! a [`Preset`] (the two historical invocations), an optional JSON config
//! file, and command-line overrides. Later layers win field by field.

use crate::errors::{Result, TrackTextError};
use crate::track::RecordLayout;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Central pressure threshold (hPa) used by both historical conversions
pub const DEFAULT_PRESSURE_THRESHOLD: f64 = 980.0;

/// Names of the track variables inside the dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VariableNames {
    pub storm_id: String,
    pub time: String,
    pub lat: String,
    pub lon: String,
    pub pressure: String,
    pub basin: String,
}

impl VariableNames {
    /// IBTrACS v04 naming (WMO agency columns)
    pub fn ibtracs_v04() -> Self {
        Self {
            storm_id: "sid".to_string(),
            time: "time".to_string(),
            lat: "lat".to_string(),
            lon: "lon".to_string(),
            pressure: "wmo_pres".to_string(),
            basin: "basin".to_string(),
        }
    }

    /// IBTrACS v03 naming
    pub fn ibtracs_v03() -> Self {
        Self {
            storm_id: "storm_sn".to_string(),
            time: "time_wmo".to_string(),
            lat: "lat_wmo".to_string(),
            lon: "lon_wmo".to_string(),
            pressure: "pres_wmo".to_string(),
            basin: "basin".to_string(),
        }
    }
}

impl Default for VariableNames {
    fn default() -> Self {
        Self::ibtracs_v04()
    }
}

/// The two historical conversions, with their original parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Pressure records for the TC-DeadlyHeat project
    DeadlyHeat,
    /// Pressure and basin records for the consolidated stochastic TC set
    StochasticBasin,
}

impl Preset {
    pub fn layer(&self) -> ConfigLayer {
        let (dir, output, layout) = match self {
            Preset::DeadlyHeat => (
                "/media/gytm3/WD12TB/TropicalCyclones/TC-DeadlyHeat/Data",
                "Hurricanes_press.txt",
                RecordLayout::Pressure,
            ),
            Preset::StochasticBasin => (
                "/media/gytm3/WD12TB/TropicalCyclones/Consolidated/Stochastic/TCs",
                "Hurricanes_press_basin.txt",
                RecordLayout::PressureBasin,
            ),
        };
        let dir = Path::new(dir);

        ConfigLayer {
            input_path: Some(dir.join("IBTrACS.ALL.hotel1.nc")),
            output_path: Some(dir.join(output)),
            pressure_threshold: Some(DEFAULT_PRESSURE_THRESHOLD),
            layout: Some(layout),
            ..ConfigLayer::default()
        }
    }
}

/// Partial configuration, as read from a JSON file or built from CLI flags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub pressure_threshold: Option<f64>,
    pub layout: Option<RecordLayout>,
    pub variables: Option<VariableNames>,
    pub threads: Option<usize>,
}

impl ConfigLayer {
    /// Load a layer from a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            input_path: other.input_path.or(self.input_path),
            output_path: other.output_path.or(self.output_path),
            pressure_threshold: other.pressure_threshold.or(self.pressure_threshold),
            layout: other.layout.or(self.layout),
            variables: other.variables.or(self.variables),
            threads: other.threads.or(self.threads),
        }
    }
}

/// Fully resolved conversion parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub pressure_threshold: f64,
    pub layout: RecordLayout,
    pub variables: VariableNames,
    pub threads: Option<usize>,
}

impl ConversionConfig {
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        pressure_threshold: f64,
        layout: RecordLayout,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            pressure_threshold,
            layout,
            variables: VariableNames::default(),
            threads: None,
        }
    }

    pub fn from_preset(preset: Preset) -> Result<Self> {
        Self::resolve([preset.layer()])
    }

    /// Merge layers in order and validate the result.
    pub fn resolve(layers: impl IntoIterator<Item = ConfigLayer>) -> Result<Self> {
        let merged = layers
            .into_iter()
            .fold(ConfigLayer::default(), ConfigLayer::merge);

        let config = Self {
            input_path: merged
                .input_path
                .ok_or_else(|| TrackTextError::invalid_config("no input path given"))?,
            output_path: merged
                .output_path
                .ok_or_else(|| TrackTextError::invalid_config("no output path given"))?,
            pressure_threshold: merged
                .pressure_threshold
                .unwrap_or(DEFAULT_PRESSURE_THRESHOLD),
            layout: merged.layout.unwrap_or_default(),
            variables: merged.variables.unwrap_or_default(),
            threads: merged.threads,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.pressure_threshold.is_finite() {
            return Err(TrackTextError::invalid_config(format!(
                "pressure threshold must be finite, got {}",
                self.pressure_threshold
            )));
        }
        if self.threads == Some(0) {
            return Err(TrackTextError::invalid_config(
                "thread count must be at least 1",
            ));
        }
        if self.input_path == self.output_path {
            return Err(TrackTextError::invalid_config(
                "output path must differ from the input dataset",
            ));
        }
        Ok(())
    }
}
