//! NetCDF track dataset to pressure-filtered text
//!
//! [`nc_to_text_pressure`] and [`nc_to_text_pressure_basin`] are the two
//! historical conversions with explicit parameters. [`convert`] runs a fully
//! resolved [`ConversionConfig`], and [`convert_source`] runs the same
//! pipeline over any [`TrackSource`].

use crate::config::ConversionConfig;
use crate::errors::Result;
use crate::filter::{select_tracks, PressureFilter};
use crate::netcdf_io::IbtracsReader;
use crate::text_io::TextWriter;
use crate::track::{RecordLayout, TrackSource};
use std::path::Path;
use tracing::info;

/// Counts reported after a conversion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub storms_scanned: usize,
    pub points_scanned: usize,
    pub storms_written: usize,
    pub points_written: usize,
}

impl ConversionSummary {
    pub fn print(&self, config: &ConversionConfig) {
        println!(
            "✅ Wrote {} observations from {} storms to {}",
            self.points_written,
            self.storms_written,
            config.output_path.display()
        );
        println!(
            "   Scanned {} observations in {} storms (pressure <= {} hPa)",
            self.points_scanned, self.storms_scanned, config.pressure_threshold
        );
    }
}

/// Write every observation with central pressure at or below `thresh`.
pub fn nc_to_text_pressure(
    ncfile: impl AsRef<Path>,
    thresh: f64,
    fo: impl AsRef<Path>,
) -> Result<ConversionSummary> {
    convert(&ConversionConfig::new(
        ncfile.as_ref(),
        fo.as_ref(),
        thresh,
        RecordLayout::Pressure,
    ))
}

/// Like [`nc_to_text_pressure`], with the basin code appended to each line.
pub fn nc_to_text_pressure_basin(
    ncfile: impl AsRef<Path>,
    thresh: f64,
    fo: impl AsRef<Path>,
) -> Result<ConversionSummary> {
    convert(&ConversionConfig::new(
        ncfile.as_ref(),
        fo.as_ref(),
        thresh,
        RecordLayout::PressureBasin,
    ))
}

/// Run a conversion from the netCDF dataset named in `config`.
pub fn convert(config: &ConversionConfig) -> Result<ConversionSummary> {
    config.validate()?;
    let reader = IbtracsReader::open(&config.input_path, config.variables.clone())?;
    convert_source(&reader, config)
}

/// Run a conversion over any track source. `config.input_path` is only used
/// for reporting.
pub fn convert_source<S: TrackSource + ?Sized>(
    source: &S,
    config: &ConversionConfig,
) -> Result<ConversionSummary> {
    let filter = PressureFilter::new(config.pressure_threshold)?;

    info!(
        "Converting {} -> {} (pressure <= {} hPa, {:?})",
        config.input_path.display(),
        config.output_path.display(),
        filter.threshold(),
        config.layout
    );

    let tracks = source.read_tracks(config.layout)?;
    let selection = select_tracks(&tracks, &filter);
    let written = TextWriter::new(&config.output_path, config.layout).write(&selection)?;

    let summary = ConversionSummary {
        storms_scanned: selection.storms_scanned,
        points_scanned: selection.points_scanned,
        storms_written: selection.storms_selected(),
        points_written: written,
    };
    info!("Conversion finished: {:?}", summary);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basin::Basin;
    use crate::errors::TrackTextError;
    use crate::track::{StormTrack, TrackPoint};
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    fn obs(day: u32, pressure: Option<f64>, basin: Basin) -> TrackPoint {
        TrackPoint {
            time: NaiveDate::from_ymd_opt(1992, 8, day).and_then(|d| d.and_hms_opt(6, 0, 0)),
            lat: Some(25.5),
            lon: Some(-80.3),
            pressure,
            basin: Some(basin),
        }
    }

    fn tracks() -> Vec<StormTrack> {
        vec![
            StormTrack::new(
                "1992230N11325",
                vec![
                    obs(22, Some(1000.0), Basin::NorthAtlantic),
                    obs(23, Some(922.0), Basin::NorthAtlantic),
                    obs(24, Some(980.0), Basin::NorthAtlantic),
                ],
            ),
            StormTrack::new("1992231N13150", vec![obs(25, None, Basin::WesternPacific)]),
        ]
    }

    #[test]
    fn test_convert_source_pressure_layout() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("Hurricanes_press.txt");
        let config = ConversionConfig::new("memory", &out, 980.0, RecordLayout::Pressure);

        let summary = convert_source(&tracks(), &config).unwrap();
        assert_eq!(
            summary,
            ConversionSummary {
                storms_scanned: 2,
                points_scanned: 4,
                storms_written: 1,
                points_written: 2,
            }
        );
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "1992230N11325 1992-08-23T06:00 25.50 -80.30 922.0\n\
             1992230N11325 1992-08-24T06:00 25.50 -80.30 980.0\n"
        );
    }

    #[test]
    fn test_convert_source_basin_layout() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("Hurricanes_press_basin.txt");
        let config = ConversionConfig::new("memory", &out, 980.0, RecordLayout::PressureBasin);

        convert_source(&tracks(), &config).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.lines().all(|l| l.ends_with(" NA")));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_intense_point_without_position_is_not_written() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("partial.txt");
        let config = ConversionConfig::new("memory", &out, 980.0, RecordLayout::Pressure);

        let mut unplaced = obs(23, Some(922.0), Basin::NorthAtlantic);
        unplaced.lon = None;
        let source = vec![StormTrack::new(
            "1992230N11325",
            vec![unplaced, obs(24, Some(950.0), Basin::NorthAtlantic)],
        )];

        let summary = convert_source(&source, &config).unwrap();
        assert_eq!(summary.points_scanned, 2);
        assert_eq!(summary.points_written, 1);
        assert_eq!(
            fs::read_to_string(&out).unwrap().lines().count(),
            summary.points_written
        );
    }

    #[test]
    fn test_empty_selection_writes_empty_file() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("none.txt");
        let config = ConversionConfig::new("memory", &out, 900.0, RecordLayout::Pressure);

        let summary = convert_source(&tracks(), &config).unwrap();
        assert_eq!(summary.points_written, 0);
        assert_eq!(fs::read_to_string(&out).unwrap(), "");
    }

    #[test]
    fn test_missing_input_produces_no_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("IBTrACS.ALL.hotel1.nc");
        let out = dir.path().join("Hurricanes_press.txt");

        let result = nc_to_text_pressure(&input, 980.0, &out);
        match result {
            Err(TrackTextError::InputNotFound { path }) => assert_eq!(path, input),
            other => panic!("Expected InputNotFound, got {:?}", other),
        }
        assert!(!out.exists());

        let result = nc_to_text_pressure_basin(&input, 980.0, &out);
        assert!(matches!(result, Err(TrackTextError::InputNotFound { .. })));
        assert!(!out.exists());
    }
}
