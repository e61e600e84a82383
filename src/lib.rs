//! tc_text: tropical-cyclone tracks from NetCDF to pressure-filtered text
//!
//! Reads IBTrACS-style track datasets, keeps every observation whose central
//! pressure is at or below a threshold, and writes one text line per kept
//! observation, optionally with the ocean basin code.
//!
//! ## Module Organization
//!
//! - [`convert`]: the conversion pipeline and the two historical entry points
//! - [`netcdf_io`]: reading track grids from NetCDF files
//! - [`filter`]: central-pressure selection
//! - [`text_io`]: line format and atomic text output
//! - [`config`]: layered configuration and presets
//! - [`metadata`]: dataset inspection
//! - [`basin`], [`cf_time`], [`track`]: data model helpers
//! - [`parallel`]: thread pool configuration
//! - [`errors`]: centralized error handling
//!
//! ## Usage
//! ```rust,no_run
//! use tc_text::prelude::*;
//!
//! // Same parameters as the historical "pressure" conversion
//! let summary = tc_text::nc_to_text_pressure(
//!     "IBTrACS.ALL.hotel1.nc",
//!     980.0,
//!     "Hurricanes_press.txt",
//! )
//! .unwrap();
//! println!("{} observations written", summary.points_written);
//!
//! // Or run a preset
//! let config = ConversionConfig::from_preset(Preset::StochasticBasin).unwrap();
//! tc_text::convert(&config).unwrap();
//! ```

pub mod basin;
pub mod cf_time;
pub mod cli;
pub mod config;
pub mod convert;
pub mod errors;
pub mod filter;
pub mod metadata;
pub mod netcdf_io;
pub mod parallel;
pub mod text_io;
pub mod track;

pub use convert::{
    convert, convert_source, nc_to_text_pressure, nc_to_text_pressure_basin, ConversionSummary,
};
pub use errors::{Result, TrackTextError};

pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::basin::Basin;
    pub use crate::config::{ConfigLayer, ConversionConfig, Preset, VariableNames};
    pub use crate::convert::ConversionSummary;
    pub use crate::errors::{Result, TrackTextError};
    pub use crate::netcdf_io::IbtracsReader;
    pub use crate::parallel::ParallelConfig;
    pub use crate::track::{RecordLayout, StormTrack, TrackPoint, TrackSource};
}
