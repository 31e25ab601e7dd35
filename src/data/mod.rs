//! Forecast data models and the hourly normalizer
//!
//! This module contains the raw per-hour series handed over by the forecast
//! client, the normalized `HourlyRecord` consumed by the scoring engine, and
//! the clients that fetch forecasts and resolve postal codes.

pub mod forecast;
pub mod postal;

pub use forecast::{Forecast, ForecastClient, ForecastError};
pub use postal::{Place, PostalClient, PostalError};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::advice::{advise, Advisory};
use crate::scoring::{score, Deductions};

/// Timestamp formats accepted for an hour, tried in order
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Parallel per-hour arrays as returned by the forecast API
///
/// Index `i` across every array describes one hour. Numeric arrays hold
/// `Option` elements because the API reports missing values as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHourlySeries {
    /// Local timestamps (`YYYY-MM-DDTHH:MM`)
    pub time: Vec<String>,
    /// Air temperature in Celsius
    pub temperature: Vec<Option<f64>>,
    /// Feels-like temperature in Celsius
    pub apparent_temperature: Vec<Option<f64>>,
    /// Precipitation probability percentage (0-100)
    pub precipitation_probability: Vec<Option<u8>>,
    /// Wind speed in km/h
    pub wind_speed: Vec<Option<f64>>,
    /// Relative humidity percentage (0-100)
    pub humidity: Vec<Option<u8>>,
}

impl RawHourlySeries {
    /// Number of hours announced by the timestamp array
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Returns true when the series has no timestamps at all
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// One hour of normalized weather
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyRecord {
    /// Local time of the hour
    pub time: NaiveDateTime,
    /// Air temperature in Celsius
    pub temperature: f64,
    /// Feels-like temperature in Celsius
    pub apparent_temperature: f64,
    /// Precipitation probability percentage (0-100)
    pub precipitation_probability: u8,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
}

impl HourlyRecord {
    /// Exercise suitability score (0-100) for this hour
    pub fn score(&self) -> f64 {
        score(
            self.temperature,
            self.apparent_temperature,
            self.precipitation_probability,
            self.wind_speed,
            self.humidity,
        )
    }

    /// Per-factor deductions behind `score`
    pub fn deductions(&self) -> Deductions {
        Deductions::assess(
            self.temperature,
            self.apparent_temperature,
            self.precipitation_probability,
            self.wind_speed,
            self.humidity,
        )
    }

    /// Advisory message category for this hour
    pub fn advisory(&self) -> Advisory {
        advise(
            self.temperature,
            self.precipitation_probability,
            self.apparent_temperature,
        )
    }
}

/// Converts raw parallel arrays into hourly records.
///
/// Hours whose timestamp does not parse, or for which any measurement is
/// missing (short array or `null`), are skipped. Input order is preserved.
pub fn normalize(raw: &RawHourlySeries) -> Vec<HourlyRecord> {
    raw.time
        .iter()
        .enumerate()
        .filter_map(|(i, timestamp)| {
            Some(HourlyRecord {
                time: parse_timestamp(timestamp)?,
                temperature: value_at(&raw.temperature, i)?,
                apparent_temperature: value_at(&raw.apparent_temperature, i)?,
                precipitation_probability: value_at(&raw.precipitation_probability, i)?,
                wind_speed: value_at(&raw.wind_speed, i)?,
                humidity: value_at(&raw.humidity, i)?,
            })
        })
        .collect()
}

/// Parses a local timestamp without offset (e.g., "2024-07-15T14:00")
pub fn parse_timestamp(timestamp: &str) -> Option<NaiveDateTime> {
    let timestamp = timestamp.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(timestamp, format).ok())
}

fn value_at<T: Copy>(values: &[Option<T>], index: usize) -> Option<T> {
    values.get(index).copied().flatten()
}
