//! NetCDF track reading
//!
//! IBTrACS stores every track variable as a `(storm, observation)` grid,
//! padded with fill values after the last observation of each storm. Char
//! variables (storm ids, basin codes) carry an extra trailing string-length
//! dimension. [`IbtracsReader`] turns those grids into [`StormTrack`]s.

use crate::basin::Basin;
use crate::cf_time::TimeUnits;
use crate::config::VariableNames;
use crate::errors::{Result, TrackTextError};
use crate::track::{RecordLayout, StormTrack, TrackPoint, TrackSource};
use ndarray::Array2;
use netcdf::{AttributeValue, File, Variable};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Values at or beyond this magnitude are netCDF default fill values for
/// float and double variables.
const DEFAULT_FLOAT_FILL: f64 = 9.9e36;

/// Reader for IBTrACS-style track datasets
pub struct IbtracsReader {
    path: PathBuf,
    file: File,
    variables: VariableNames,
}

impl IbtracsReader {
    /// Open a dataset. A nonexistent path is reported as
    /// [`TrackTextError::InputNotFound`] before netCDF is involved.
    pub fn open(path: &Path, variables: VariableNames) -> Result<Self> {
        if !path.exists() {
            return Err(TrackTextError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        let file = netcdf::open(path)?;
        debug!("Opened track dataset {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            file,
            variables,
        })
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn variables(&self) -> &VariableNames {
        &self.variables
    }

    fn variable(&self, name: &str) -> Result<Variable<'_>> {
        self.file
            .variable(name)
            .ok_or_else(|| TrackTextError::VariableNotFound {
                var: name.to_string(),
            })
    }

    fn read_time_grid(&self) -> Result<Array2<Option<chrono::NaiveDateTime>>> {
        let name = &self.variables.time;
        let var = self.variable(name)?;

        let units = match var.attribute("units").map(|a| a.value()).transpose()? {
            Some(AttributeValue::Str(units)) => units,
            _ => {
                return Err(TrackTextError::malformed(format!(
                    "time variable '{}' has no units attribute",
                    name
                )))
            }
        };
        let units = TimeUnits::parse(&units)?;

        let offsets = read_numeric_grid(&var)?;
        Ok(offsets.mapv(|v| present(v).and_then(|v| units.to_datetime(v))))
    }

    fn read_storm_ids(&self, n_storms: usize) -> Result<Vec<String>> {
        let Some(var) = self.file.variable(&self.variables.storm_id) else {
            debug!(
                "No '{}' variable, identifying storms by index",
                self.variables.storm_id
            );
            return Ok((0..n_storms).map(|i| i.to_string()).collect());
        };

        let ids = match var.dimensions().len() {
            2 => read_char_cells(&var)?,
            1 => {
                let packing = Packing::from_variable(&var);
                var.get_values::<f64, _>(..)?
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| match packing.unpack(v) {
                        Some(v) if v.fract() == 0.0 => format!("{}", v as i64),
                        Some(v) => v.to_string(),
                        None => i.to_string(),
                    })
                    .collect()
            }
            n => {
                return Err(TrackTextError::malformed(format!(
                    "storm id variable '{}' has {} dimensions, expected 1 or 2",
                    var.name(),
                    n
                )))
            }
        };

        if ids.len() != n_storms {
            return Err(TrackTextError::malformed(format!(
                "storm id variable '{}' has {} entries for {} storms",
                var.name(),
                ids.len(),
                n_storms
            )));
        }
        Ok(ids)
    }

    fn read_basin_grid(&self, shape: (usize, usize)) -> Result<Array2<Option<Basin>>> {
        let var = self.variable(&self.variables.basin)?;

        let grid = match var.dimensions().len() {
            3 => {
                let dims = var.dimensions();
                check_shape(
                    &self.variables.basin,
                    (dims[0].len(), dims[1].len()),
                    shape,
                )?;
                let codes = read_char_cells(&var)?;
                Array2::from_shape_vec(shape, codes)?.mapv(|code| Basin::from_code(&code))
            }
            2 => read_numeric_grid(&var)?
                .mapv(|v| present(v).and_then(|v| Basin::from_legacy_index(v.round() as i64))),
            n => {
                return Err(TrackTextError::malformed(format!(
                    "basin variable '{}' has {} dimensions, expected 2 or 3",
                    var.name(),
                    n
                )))
            }
        };

        check_shape(&self.variables.basin, grid.dim(), shape)?;
        Ok(grid)
    }
}

impl TrackSource for IbtracsReader {
    fn read_tracks(&self, layout: RecordLayout) -> Result<Vec<StormTrack>> {
        let names = &self.variables;

        let pressure = read_numeric_grid(&self.variable(&names.pressure)?)?;
        let shape = pressure.dim();

        let lat = read_numeric_grid(&self.variable(&names.lat)?)?;
        check_shape(&names.lat, lat.dim(), shape)?;
        let lon = read_numeric_grid(&self.variable(&names.lon)?)?;
        check_shape(&names.lon, lon.dim(), shape)?;
        let time = self.read_time_grid()?;
        check_shape(&names.time, time.dim(), shape)?;

        let basin = if layout.includes_basin() {
            Some(self.read_basin_grid(shape)?)
        } else {
            None
        };
        let ids = self.read_storm_ids(shape.0)?;

        info!(
            "Read {} storms x {} observation slots from {}",
            shape.0,
            shape.1,
            self.path.display()
        );

        let tracks = ids
            .into_par_iter()
            .enumerate()
            .map(|(s, id)| {
                let points = (0..shape.1)
                    .map(|o| TrackPoint {
                        time: time[[s, o]],
                        lat: present(lat[[s, o]]),
                        lon: present(lon[[s, o]]),
                        pressure: present(pressure[[s, o]]),
                        basin: basin.as_ref().and_then(|b| b[[s, o]]),
                    })
                    .filter(|p| !p.is_padding())
                    .collect();
                StormTrack::new(id, points)
            })
            .collect();

        Ok(tracks)
    }
}

/// Decoding attributes of a packed numeric variable
#[derive(Debug, Clone, PartialEq)]
pub struct Packing {
    pub scale: f64,
    pub offset: f64,
    pub missing: Vec<f64>,
}

impl Default for Packing {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: 0.0,
            missing: Vec::new(),
        }
    }
}

impl Packing {
    /// Collect `scale_factor`, `add_offset`, `_FillValue` and `missing_value`.
    pub fn from_variable(var: &Variable) -> Self {
        let number = |name: &str| {
            var.attribute(name)
                .and_then(|attr| attr.value().ok())
                .and_then(attribute_as_f64)
        };

        Self {
            scale: number("scale_factor").unwrap_or(1.0),
            offset: number("add_offset").unwrap_or(0.0),
            missing: ["_FillValue", "missing_value"]
                .iter()
                .filter_map(|name| number(*name))
                .collect(),
        }
    }

    /// Unpack a raw stored value; `None` when it marks missing data.
    pub fn unpack(&self, raw: f64) -> Option<f64> {
        if !raw.is_finite() || raw.abs() >= DEFAULT_FLOAT_FILL || self.missing.contains(&raw) {
            return None;
        }
        Some(raw * self.scale + self.offset)
    }
}

/// Interpret a numeric attribute as f64, using the first element of arrays.
pub fn attribute_as_f64(value: AttributeValue) -> Option<f64> {
    match value {
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Float(v) => Some(v as f64),
        AttributeValue::Int(v) => Some(v as f64),
        AttributeValue::Uint(v) => Some(v as f64),
        AttributeValue::Short(v) => Some(v as f64),
        AttributeValue::Ushort(v) => Some(v as f64),
        AttributeValue::Schar(v) => Some(v as f64),
        AttributeValue::Uchar(v) => Some(v as f64),
        AttributeValue::Doubles(v) => v.first().copied(),
        AttributeValue::Floats(v) => v.first().map(|&x| x as f64),
        AttributeValue::Ints(v) => v.first().map(|&x| x as f64),
        AttributeValue::Shorts(v) => v.first().map(|&x| x as f64),
        _ => None,
    }
}

/// Split fixed-width char data into trimmed strings, one per `width` bytes.
pub fn decode_char_cells(raw: &[u8], width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    raw.chunks(width)
        .map(|chunk| {
            String::from_utf8_lossy(chunk)
                .trim_matches(|c: char| c == '\0' || c.is_whitespace())
                .to_string()
        })
        .collect()
}

fn read_char_cells(var: &Variable) -> Result<Vec<String>> {
    let width = var
        .dimensions()
        .last()
        .map(|d| d.len())
        .ok_or_else(|| TrackTextError::malformed(format!("'{}' is a scalar", var.name())))?;
    let raw = var.get_raw_values(..)?;
    Ok(decode_char_cells(&raw, width))
}

/// Read a `(storm, observation)` numeric grid, unpacked, with NaN for missing.
fn read_numeric_grid(var: &Variable) -> Result<Array2<f64>> {
    let dims = var.dimensions();
    if dims.len() != 2 {
        return Err(TrackTextError::malformed(format!(
            "'{}' has {} dimensions, expected (storm, observation)",
            var.name(),
            dims.len()
        )));
    }
    let shape = (dims[0].len(), dims[1].len());

    let packing = Packing::from_variable(var);
    let raw = var.get_values::<f64, _>(..)?;
    let grid = Array2::from_shape_vec(shape, raw)?;

    Ok(grid.mapv(|v| packing.unpack(v).unwrap_or(f64::NAN)))
}

fn check_shape(name: &str, actual: (usize, usize), expected: (usize, usize)) -> Result<()> {
    if actual != expected {
        return Err(TrackTextError::malformed(format!(
            "'{}' is shaped {:?}, expected {:?}",
            name, actual, expected
        )));
    }
    Ok(())
}

fn present(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpack_masks_fill_values() {
        let packing = Packing {
            scale: 0.1,
            offset: 0.0,
            missing: vec![-32767.0],
        };
        assert_eq!(packing.unpack(-32767.0), None);
        assert_eq!(packing.unpack(f64::NAN), None);
        assert_eq!(packing.unpack(9.969209968386869e36), None);

        let value = packing.unpack(9650.0).unwrap();
        assert!((value - 965.0).abs() < 1e-9);
    }

    #[test]
    fn test_default_packing_is_identity() {
        let packing = Packing::default();
        assert_eq!(packing.unpack(975.0), Some(975.0));
        assert_eq!(packing.unpack(-9999.0), Some(-9999.0));
    }

    #[test]
    fn test_attribute_numbers() {
        assert_eq!(attribute_as_f64(AttributeValue::Short(-9999)), Some(-9999.0));
        assert_eq!(attribute_as_f64(AttributeValue::Float(0.5)), Some(0.5));
        assert_eq!(
            attribute_as_f64(AttributeValue::Doubles(vec![2.0, 3.0])),
            Some(2.0)
        );
        assert_eq!(attribute_as_f64(AttributeValue::Str("x".into())), None);
    }

    #[test]
    fn test_decode_char_cells() {
        let raw = b"1980001N10150WP\0\0N ";
        let ids = decode_char_cells(&raw[..13], 13);
        assert_eq!(ids, vec!["1980001N10150"]);

        let codes = decode_char_cells(&raw[13..], 2);
        assert_eq!(codes, vec!["WP", "", "N"]);
    }

    #[test]
    fn test_decode_char_cells_zero_width() {
        assert!(decode_char_cells(b"abc", 0).is_empty());
    }
}
