//! Central-pressure selection
//!
//! An observation is kept when its pressure is present and at or below the
//! threshold, and it has a time and a position to write.

use crate::errors::{Result, TrackTextError};
use crate::track::{StormTrack, TrackPoint};
use rayon::prelude::*;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureFilter {
    threshold: f64,
}

impl PressureFilter {
    pub fn new(threshold: f64) -> Result<Self> {
        if !threshold.is_finite() {
            return Err(TrackTextError::invalid_config(format!(
                "pressure threshold must be finite, got {}",
                threshold
            )));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn accepts(&self, point: &TrackPoint) -> bool {
        let intense = point
            .pressure
            .is_some_and(|p| p.is_finite() && p <= self.threshold);
        intense && point.time.is_some() && point.lat.is_some() && point.lon.is_some()
    }
}

/// Observations of one storm that passed the filter
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedTrack<'a> {
    pub id: &'a str,
    pub points: Vec<&'a TrackPoint>,
}

/// Result of filtering a set of storms
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a> {
    pub tracks: Vec<SelectedTrack<'a>>,
    pub storms_scanned: usize,
    pub points_scanned: usize,
}

impl Selection<'_> {
    pub fn points_selected(&self) -> usize {
        self.tracks.iter().map(|t| t.points.len()).sum()
    }

    pub fn storms_selected(&self) -> usize {
        self.tracks.len()
    }
}

/// Filter every storm in parallel. Storms without any selected observation
/// are dropped; order of storms and observations is preserved.
pub fn select_tracks<'a>(tracks: &'a [StormTrack], filter: &PressureFilter) -> Selection<'a> {
    let selected: Vec<SelectedTrack<'a>> = tracks
        .par_iter()
        .filter_map(|track| {
            let points: Vec<&TrackPoint> =
                track.points.iter().filter(|p| filter.accepts(p)).collect();
            (!points.is_empty()).then(|| SelectedTrack {
                id: &track.id,
                points,
            })
        })
        .collect();

    let selection = Selection {
        tracks: selected,
        storms_scanned: tracks.len(),
        points_scanned: tracks.iter().map(|t| t.points.len()).sum(),
    };

    debug!(
        "Pressure <= {} hPa: {} of {} observations in {} of {} storms",
        filter.threshold,
        selection.points_selected(),
        selection.points_scanned,
        selection.storms_selected(),
        selection.storms_scanned
    );

    selection
}
