//! Postal code lookup via the HeartRails Geo API
//!
//! Resolves a Japanese postal code to the coordinates and name of the area.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

/// Base URL for the HeartRails Geo API
const HEARTRAILS_BASE_URL: &str = "https://geoapi.heartrails.com/api/json";

/// Errors that can occur when looking up a postal code
#[derive(Debug, Error)]
pub enum PostalError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The postal code is not seven digits
    #[error("Invalid postal code: '{0}' (expected 7 digits, e.g. 100-0001)")]
    InvalidPostalCode(String),

    /// No area matches the postal code
    #[error("No location found for postal code {0}")]
    NotFound(String),

    /// The API answered with a non-success status
    #[error("Postal lookup failed: {0}")]
    Api(String),
}

/// A named location with coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    /// Human-readable area name
    pub name: String,
    /// Latitude coordinate
    pub latitude: f64,
    /// Longitude coordinate
    pub longitude: f64,
}

impl Place {
    /// A place named after its coordinates
    pub fn from_coordinates(latitude: f64, longitude: f64) -> Self {
        Self {
            name: format!("{:.4}, {:.4}", latitude, longitude),
            latitude,
            longitude,
        }
    }
}

/// Response from the HeartRails API
#[derive(Debug, Deserialize)]
struct ApiResponse {
    response: ResponseBody,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    #[serde(default)]
    location: Vec<LocationRecord>,
    #[serde(default)]
    error: Option<String>,
}

/// One area matching the postal code
#[derive(Debug, Deserialize)]
struct LocationRecord {
    #[serde(default)]
    prefecture: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    town: String,
    /// Longitude, as a decimal string
    x: String,
    /// Latitude, as a decimal string
    y: String,
}

/// Client for looking up postal codes
#[derive(Debug, Clone)]
pub struct PostalClient {
    http_client: Client,
    base_url: String,
}

impl Default for PostalClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PostalClient {
    pub fn new() -> Self {
        Self {
            http_client: Client::new(),
            base_url: HEARTRAILS_BASE_URL.to_string(),
        }
    }

    /// Points the client at a different API endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Looks up the first area matching `postal_code`
    pub async fn lookup(&self, postal_code: &str) -> Result<Place, PostalError> {
        let postal = normalize_postal_code(postal_code)?;
        let url = format!("{}?method=searchByPostal&postal={}", self.base_url, postal);
        tracing::debug!(%url, "Looking up postal code");

        let response = self.http_client.get(&url).send().await?;
        let status = response.status();
        let text = response.text().await?;

        read_response(status, &text, &postal)
    }
}

/// Strips whitespace and hyphens and checks for exactly seven ASCII digits
pub fn normalize_postal_code(input: &str) -> Result<String, PostalError> {
    let digits: String = input
        .trim()
        .chars()
        .filter(|c| *c != '-' && *c != 'ー' && *c != '－')
        .collect();

    if digits.len() == 7 && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(digits)
    } else {
        Err(PostalError::InvalidPostalCode(input.to_string()))
    }
}

/// Rejects non-success responses before looking at the body
fn read_response(status: StatusCode, text: &str, postal: &str) -> Result<Place, PostalError> {
    if !status.is_success() {
        return Err(PostalError::Api(format!("HTTP {}", status)));
    }
    parse_response(text, postal)
}

fn parse_response(text: &str, postal: &str) -> Result<Place, PostalError> {
    let response: ApiResponse =
        serde_json::from_str(text).map_err(|e| PostalError::ParseError(e.to_string()))?;

    if let Some(error) = response.response.error {
        tracing::debug!(%error, postal, "Postal lookup returned an error");
        return Err(PostalError::NotFound(postal.to_string()));
    }

    let record = response
        .response
        .location
        .into_iter()
        .next()
        .ok_or_else(|| PostalError::NotFound(postal.to_string()))?;

    let latitude = parse_coordinate(&record.y)?;
    let longitude = parse_coordinate(&record.x)?;

    Ok(Place {
        name: format!("{}{}{}", record.prefecture, record.city, record.town),
        latitude,
        longitude,
    })
}

fn parse_coordinate(value: &str) -> Result<f64, PostalError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| PostalError::ParseError(format!("Invalid coordinate: {}", value)))
}
