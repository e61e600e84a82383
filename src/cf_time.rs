//! CF-convention time coordinates ("<unit> since <reference>").

use crate::errors::{Result, TrackTextError};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

/// Unit of a CF time offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    fn parse(s: &str) -> Option<TimeUnit> {
        match s.to_ascii_lowercase().as_str() {
            "days" | "day" | "d" => Some(TimeUnit::Days),
            "hours" | "hour" | "hrs" | "hr" | "h" => Some(TimeUnit::Hours),
            "minutes" | "minute" | "mins" | "min" => Some(TimeUnit::Minutes),
            "seconds" | "second" | "secs" | "sec" | "s" => Some(TimeUnit::Seconds),
            _ => None,
        }
    }

    fn seconds(&self) -> f64 {
        match self {
            TimeUnit::Days => 86_400.0,
            TimeUnit::Hours => 3_600.0,
            TimeUnit::Minutes => 60.0,
            TimeUnit::Seconds => 1.0,
        }
    }
}

/// Parsed `units` attribute of a time variable
#[derive(Debug, Clone, PartialEq)]
pub struct TimeUnits {
    pub unit: TimeUnit,
    pub reference: NaiveDateTime,
}

impl TimeUnits {
    /// Parse a units string such as `days since 1858-11-17 00:00:00`.
    pub fn parse(units: &str) -> Result<Self> {
        let malformed = || TrackTextError::malformed(format!("unsupported time units '{}'", units));

        let (unit, reference) = units.trim().split_once(" since ").ok_or_else(malformed)?;
        let unit = TimeUnit::parse(unit.trim()).ok_or_else(malformed)?;
        let reference = parse_reference(reference.trim()).ok_or_else(malformed)?;

        Ok(Self { unit, reference })
    }

    /// Convert an offset to a timestamp, rounded to the nearest second.
    pub fn to_datetime(&self, offset: f64) -> Option<NaiveDateTime> {
        if !offset.is_finite() {
            return None;
        }
        let seconds = (offset * self.unit.seconds()).round();
        if seconds.abs() > i64::MAX as f64 {
            return None;
        }
        let delta = TimeDelta::try_seconds(seconds as i64)?;
        self.reference.checked_add_signed(delta)
    }
}

fn parse_reference(s: &str) -> Option<NaiveDateTime> {
    // Drop a trailing timezone marker; IBTrACS references are UTC.
    let s = s
        .trim_end_matches(" UTC")
        .trim_end_matches('Z')
        .trim_end_matches(" +00:00");

    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_ibtracs_epoch() {
        let units = TimeUnits::parse("days since 1858-11-17 00:00:00").unwrap();
        assert_eq!(units.unit, TimeUnit::Days);
        assert_eq!(units.reference, datetime(1858, 11, 17, 0, 0));

        // MJD 51544 is 2000-01-01
        assert_eq!(units.to_datetime(51544.0), Some(datetime(2000, 1, 1, 0, 0)));
        assert_eq!(units.to_datetime(51544.125), Some(datetime(2000, 1, 1, 3, 0)));
    }

    #[test]
    fn test_rounds_to_nearest_second() {
        let units = TimeUnits::parse("days since 2000-01-01").unwrap();
        let offset = 0.25 + 1e-7;
        assert_eq!(units.to_datetime(offset), Some(datetime(2000, 1, 1, 6, 0)));
    }

    #[test]
    fn test_other_units_and_formats() {
        let hours = TimeUnits::parse("hours since 1900-01-01T00:00").unwrap();
        assert_eq!(hours.unit, TimeUnit::Hours);
        assert_eq!(hours.to_datetime(36.0), Some(datetime(1900, 1, 2, 12, 0)));

        let seconds = TimeUnits::parse("seconds since 1970-01-01 00:00:00 UTC").unwrap();
        assert_eq!(seconds.to_datetime(60.0), Some(datetime(1970, 1, 1, 0, 1)));
    }

    #[test]
    fn test_rejects_unsupported_units() {
        assert!(matches!(
            TimeUnits::parse("fortnights since 2000-01-01"),
            Err(TrackTextError::MalformedDataset { .. })
        ));
        assert!(TimeUnits::parse("days").is_err());
        assert!(TimeUnits::parse("days since yesterday").is_err());
    }

    #[test]
    fn test_non_finite_offset() {
        let units = TimeUnits::parse("days since 1858-11-17 00:00:00").unwrap();
        assert_eq!(units.to_datetime(f64::NAN), None);
        assert_eq!(units.to_datetime(f64::INFINITY), None);
        assert_eq!(units.to_datetime(1e300), None);
    }
}
