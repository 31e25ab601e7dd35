//! Command-line interface parsing for exercast
//!
//! Parses CLI arguments with clap and validates them into a `StartupConfig`
//! before any terminal or network setup happens.

use clap::Parser;
use thiserror::Error;

use crate::advice::Language;
use crate::data::forecast::DEFAULT_TIMEZONE;
use crate::data::postal::normalize_postal_code;
use crate::ranking::{Window, DEFAULT_TOP_N};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified window is not recognized
    #[error("Invalid window: '{0}'. Valid windows: today, two-days")]
    InvalidWindow(String),

    /// The specified language is not recognized
    #[error("Invalid language: '{0}'. Valid languages: ja, en")]
    InvalidLanguage(String),

    /// Neither coordinates nor a postal code were given
    #[error("No location given. Use --lat and --lon, or --postal")]
    MissingLocation,

    /// The postal code is not seven digits
    #[error("Invalid postal code: '{0}' (expected 7 digits, e.g. 100-0001)")]
    InvalidPostalCode(String),

    /// Coordinates outside the valid range
    #[error("Invalid coordinates: {0}, {1} (latitude must be -90..90, longitude -180..180)")]
    InvalidCoordinates(f64, f64),
}

/// exercast - find the best hours today for outdoor exercise
#[derive(Parser, Debug)]
#[command(name = "exercast")]
#[command(about = "Hourly forecast ranked by suitability for outdoor exercise")]
#[command(version)]
pub struct Cli {
    /// Latitude of the location
    #[arg(long, allow_hyphen_values = true, requires = "lon", conflicts_with = "postal")]
    pub lat: Option<f64>,

    /// Longitude of the location
    #[arg(long, allow_hyphen_values = true, requires = "lat", conflicts_with = "postal")]
    pub lon: Option<f64>,

    /// Japanese postal code to look up instead of coordinates (e.g. 100-0001)
    #[arg(long, value_name = "CODE")]
    pub postal: Option<String>,

    /// Days to show and rank: today, two-days
    #[arg(long, default_value = "today")]
    pub window: String,

    /// Number of recommended hours
    #[arg(long, default_value_t = DEFAULT_TOP_N, value_parser = parse_top_n)]
    pub top: usize,

    /// Message language: ja, en
    #[arg(long, default_value = "ja")]
    pub lang: String,

    /// Timezone the forecast is reported in
    #[arg(long, default_value = DEFAULT_TIMEZONE)]
    pub timezone: String,

    /// Print a text report instead of opening the terminal UI
    #[arg(long)]
    pub plain: bool,

    /// Always fetch a fresh forecast and never write the cache
    #[arg(long)]
    pub no_cache: bool,
}

/// Where the forecast location comes from
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSource {
    Coordinates { latitude: f64, longitude: f64 },
    PostalCode(String),
}

/// Validated settings derived from CLI arguments
#[derive(Debug, Clone, PartialEq)]
pub struct StartupConfig {
    pub location: LocationSource,
    pub window: Window,
    pub top_n: usize,
    pub language: Language,
    pub timezone: String,
    pub plain: bool,
    pub use_cache: bool,
}

fn parse_top_n(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("'{}' is not a positive number", s)),
    }
}

/// Parses a window string argument into a Window.
pub fn parse_window_arg(s: &str) -> Result<Window, CliError> {
    Window::from_str(s).ok_or_else(|| CliError::InvalidWindow(s.to_string()))
}

/// Parses a language string argument into a Language.
pub fn parse_language_arg(s: &str) -> Result<Language, CliError> {
    Language::from_str(s).ok_or_else(|| CliError::InvalidLanguage(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with validated settings
    /// * `Err(CliError)` if the location is missing, out of range, or not a
    ///   valid postal code, or the window or language is not recognized
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let location = match (&cli.postal, cli.lat, cli.lon) {
            (Some(postal), _, _) => LocationSource::PostalCode(
                normalize_postal_code(postal)
                    .map_err(|_| CliError::InvalidPostalCode(postal.clone()))?,
            ),
            (None, Some(latitude), Some(longitude)) => {
                if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
                    return Err(CliError::InvalidCoordinates(latitude, longitude));
                }
                LocationSource::Coordinates {
                    latitude,
                    longitude,
                }
            }
            _ => return Err(CliError::MissingLocation),
        };

        Ok(StartupConfig {
            location,
            window: parse_window_arg(&cli.window)?,
            top_n: cli.top,
            language: parse_language_arg(&cli.lang)?,
            timezone: cli.timezone.clone(),
            plain: cli.plain,
            use_cache: !cli.no_cache,
        })
    }
}
