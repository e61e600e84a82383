//! Storm track data model shared by readers, the pressure filter and the
//! text writer.

use crate::basin::Basin;
use crate::errors::Result;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One observation of a storm. `None` marks a value missing in the dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackPoint {
    pub time: Option<NaiveDateTime>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub pressure: Option<f64>,
    pub basin: Option<Basin>,
}

impl TrackPoint {
    /// True when the slot carries no time, position or pressure.
    pub fn is_padding(&self) -> bool {
        self.time.is_none() && self.lat.is_none() && self.lon.is_none() && self.pressure.is_none()
    }
}

/// All observations of a single storm, in dataset order
#[derive(Debug, Clone, PartialEq)]
pub struct StormTrack {
    pub id: String,
    pub points: Vec<TrackPoint>,
}

impl StormTrack {
    pub fn new(id: impl Into<String>, points: Vec<TrackPoint>) -> Self {
        Self {
            id: id.into(),
            points,
        }
    }
}

/// Columns written per selected observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordLayout {
    /// id, time, lat, lon, pressure
    #[default]
    Pressure,
    /// id, time, lat, lon, pressure, basin
    PressureBasin,
}

impl RecordLayout {
    pub fn includes_basin(&self) -> bool {
        matches!(self, RecordLayout::PressureBasin)
    }
}

/// Anything that can produce storm tracks for a conversion
pub trait TrackSource {
    /// Read every storm. Basins are only required for
    /// [`RecordLayout::PressureBasin`].
    fn read_tracks(&self, layout: RecordLayout) -> Result<Vec<StormTrack>>;
}

impl TrackSource for Vec<StormTrack> {
    fn read_tracks(&self, _layout: RecordLayout) -> Result<Vec<StormTrack>> {
        Ok(self.clone())
    }
}
