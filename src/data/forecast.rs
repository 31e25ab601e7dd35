//! Open-Meteo hourly forecast client
//!
//! Fetches the hourly temperature, feels-like temperature, precipitation
//! probability, wind speed, and humidity for a location and hands them over
//! as a `RawHourlySeries`. Responses are cached on disk for an hour.

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Utc};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::RawHourlySeries;
use crate::cache::CacheManager;

/// Base URL for the Open-Meteo API
const OPEN_METEO_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Hourly variables requested from the API
const HOURLY_VARIABLES: &str =
    "temperature_2m,relativehumidity_2m,precipitation_probability,windspeed_10m,apparent_temperature";

/// Today and tomorrow
const FORECAST_DAYS: u8 = 2;

/// Timezone every timestamp is reported in unless overridden
pub const DEFAULT_TIMEZONE: &str = "Asia/Tokyo";

/// Time-to-live for cached forecasts in minutes
const CACHE_TTL_MINUTES: i64 = 60;

/// Errors that can occur when fetching a forecast
#[derive(Debug, Error)]
pub enum ForecastError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The API rejected the request
    #[error("Forecast API error: {0}")]
    Api(String),

    /// The configured endpoint is not a valid URL
    #[error("Invalid forecast URL: {0}")]
    InvalidUrl(String),
}

/// A fetched forecast for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Latitude the API resolved the request to
    pub latitude: f64,
    /// Longitude the API resolved the request to
    pub longitude: f64,
    /// Timezone of the hourly timestamps
    pub timezone: String,
    /// Offset of `timezone` from UTC, in seconds
    pub utc_offset_seconds: i32,
    /// Per-hour measurements
    pub hourly: RawHourlySeries,
    /// When this data was fetched
    pub fetched_at: DateTime<Utc>,
}

impl Forecast {
    /// Converts an instant into the forecast's local wall-clock time
    pub fn local_time(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match FixedOffset::east_opt(self.utc_offset_seconds) {
            Some(offset) => instant.with_timezone(&offset).naive_local(),
            None => instant.naive_utc(),
        }
    }
}

/// Client for fetching hourly forecasts from the Open-Meteo API
#[derive(Debug, Clone)]
pub struct ForecastClient {
    http_client: Client,
    cache_manager: Option<CacheManager>,
    base_url: String,
    timezone: String,
}

impl Default for ForecastClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastClient {
    /// Creates a client that caches in the platform cache directory
    pub fn new() -> Self {
        Self {
            http_client: Client::new(),
            cache_manager: CacheManager::new(),
            base_url: OPEN_METEO_BASE_URL.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }

    /// Uses the given cache manager, or disables caching with `None`
    pub fn with_cache(mut self, cache_manager: Option<CacheManager>) -> Self {
        self.cache_manager = cache_manager;
        self
    }

    /// Requests timestamps in a different timezone
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// Points the client at a different API endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Request URL with every query value percent-encoded
    fn forecast_url(&self, lat: f64, lon: f64) -> Result<Url, ForecastError> {
        Url::parse_with_params(
            &self.base_url,
            &[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("hourly", HOURLY_VARIABLES.to_string()),
                ("forecast_days", FORECAST_DAYS.to_string()),
                ("timezone", self.timezone.clone()),
            ],
        )
        .map_err(|e| ForecastError::InvalidUrl(format!("{}: {}", self.base_url, e)))
    }

    fn cache_key(&self, lat: f64, lon: f64) -> String {
        format!(
            "forecast_{:.2}_{:.2}_{}",
            lat,
            lon,
            self.timezone.replace('/', "_").to_lowercase()
        )
    }

    /// Fetches the hourly forecast for the given coordinates
    ///
    /// # Behavior
    /// - A fresh cache entry is returned without a request
    /// - Otherwise the API is queried and the result cached
    /// - On API failure, an expired cache entry is returned if one exists
    pub async fn fetch_forecast(&self, lat: f64, lon: f64) -> Result<Forecast, ForecastError> {
        let cache_key = self.cache_key(lat, lon);

        if let Some(ref cache_manager) = self.cache_manager {
            if let Some(cached) = cache_manager.read::<Forecast>(&cache_key) {
                if !cached.is_expired {
                    tracing::debug!(key = %cache_key, "Using cached forecast");
                    return Ok(cached.data);
                }
            }
        }

        match self.fetch_from_api(lat, lon).await {
            Ok(forecast) => {
                if let Some(ref cache_manager) = self.cache_manager {
                    if let Err(e) = cache_manager.write(
                        &cache_key,
                        &forecast,
                        Duration::minutes(CACHE_TTL_MINUTES),
                    ) {
                        tracing::warn!(error = %e, "Failed to cache forecast");
                    }
                }
                Ok(forecast)
            }
            Err(api_error) => {
                if let Some(ref cache_manager) = self.cache_manager {
                    if let Some(cached) = cache_manager.read::<Forecast>(&cache_key) {
                        tracing::warn!(
                            error = %api_error,
                            cached_at = %cached.cached_at,
                            "Forecast request failed, using stale cache"
                        );
                        return Ok(cached.data);
                    }
                }
                Err(api_error)
            }
        }
    }

    async fn fetch_from_api(&self, lat: f64, lon: f64) -> Result<Forecast, ForecastError> {
        let url = self.forecast_url(lat, lon)?;
        tracing::debug!(%url, "Requesting hourly forecast");

        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status, &text));
        }

        parse_response(&text, Utc::now())
    }
}

/// Parses an Open-Meteo response body into a Forecast
fn parse_response(text: &str, fetched_at: DateTime<Utc>) -> Result<Forecast, ForecastError> {
    let response: OpenMeteoResponse = serde_json::from_str(text)?;
    Ok(Forecast {
        latitude: response.latitude,
        longitude: response.longitude,
        timezone: response.timezone,
        utc_offset_seconds: response.utc_offset_seconds,
        hourly: response.hourly.into(),
        fetched_at,
    })
}

/// Builds an error from a non-success response, preferring the API's reason
fn api_error(status: StatusCode, body: &str) -> ForecastError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(error) => ForecastError::Api(error.reason),
        Err(_) => ForecastError::Api(format!("HTTP {}", status)),
    }
}

/// Open-Meteo API response structure
#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    timezone: String,
    #[serde(default)]
    utc_offset_seconds: i32,
    #[serde(default)]
    hourly: HourlyWeather,
}

/// Hourly weather arrays from Open-Meteo
#[derive(Debug, Default, Deserialize)]
struct HourlyWeather {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    apparent_temperature: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_probability: Vec<Option<u8>>,
    #[serde(default)]
    windspeed_10m: Vec<Option<f64>>,
    #[serde(default)]
    relativehumidity_2m: Vec<Option<u8>>,
}

impl From<HourlyWeather> for RawHourlySeries {
    fn from(hourly: HourlyWeather) -> Self {
        RawHourlySeries {
            time: hourly.time,
            temperature: hourly.temperature_2m,
            apparent_temperature: hourly.apparent_temperature,
            precipitation_probability: hourly.precipitation_probability,
            wind_speed: hourly.windspeed_10m,
            humidity: hourly.relativehumidity_2m,
        }
    }
}

/// Error body returned by Open-Meteo for rejected requests
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::normalize;
    use chrono::{NaiveDate, TimeZone};
    use tempfile::TempDir;

    /// Sample Open-Meteo response for Tokyo with six hours
    const VALID_RESPONSE: &str = r#"{
        "latitude": 35.7,
        "longitude": 139.75,
        "generationtime_ms": 0.05,
        "utc_offset_seconds": 32400,
        "timezone": "Asia/Tokyo",
        "timezone_abbreviation": "JST",
        "elevation": 40.0,
        "hourly_units": {
            "time": "iso8601",
            "temperature_2m": "°C",
            "relativehumidity_2m": "%",
            "precipitation_probability": "%",
            "windspeed_10m": "km/h",
            "apparent_temperature": "°C"
        },
        "hourly": {
            "time": [
                "2024-07-15T06:00", "2024-07-15T07:00", "2024-07-15T08:00",
                "2024-07-15T09:00", "2024-07-15T10:00", "2024-07-15T11:00"
            ],
            "temperature_2m": [24.1, 25.0, 26.3, 27.8, 29.0, 30.2],
            "relativehumidity_2m": [88, 84, 78, 70, 65, 60],
            "precipitation_probability": [10, 10, 20, 30, 40, null],
            "windspeed_10m": [4.2, 5.0, 6.1, 7.9, 9.0, 10.4],
            "apparent_temperature": [27.0, 28.3, 29.9, 31.4, 33.0, 34.6]
        }
    }"#;

    #[test]
    fn test_parse_valid_response() {
        let fetched_at = Utc::now();
        let forecast = parse_response(VALID_RESPONSE, fetched_at).expect("Failed to parse");

        assert!((forecast.latitude - 35.7).abs() < 0.001);
        assert!((forecast.longitude - 139.75).abs() < 0.001);
        assert_eq!(forecast.timezone, "Asia/Tokyo");
        assert_eq!(forecast.utc_offset_seconds, 32400);
        assert_eq!(forecast.fetched_at, fetched_at);
        assert_eq!(forecast.hourly.len(), 6);
        assert_eq!(forecast.hourly.temperature[0], Some(24.1));
        assert_eq!(forecast.hourly.humidity[0], Some(88));
        assert_eq!(forecast.hourly.precipitation_probability[5], None);
        assert_eq!(forecast.hourly.wind_speed[3], Some(7.9));
        assert_eq!(forecast.hourly.apparent_temperature[5], Some(34.6));
    }

    #[test]
    fn test_null_values_drop_the_hour_after_normalizing() {
        let forecast = parse_response(VALID_RESPONSE, Utc::now()).unwrap();

        let records = normalize(&forecast.hourly);

        assert_eq!(records.len(), 5);
        assert_eq!(
            records.last().map(|r| r.time),
            NaiveDate::from_ymd_opt(2024, 7, 15).unwrap().and_hms_opt(10, 0, 0)
        );
    }

    #[test]
    fn test_missing_hourly_block_yields_empty_series() {
        let body = r#"{ "latitude": 35.7, "longitude": 139.75 }"#;

        let forecast = parse_response(body, Utc::now()).expect("Failed to parse");

        assert!(forecast.hourly.is_empty());
        assert_eq!(forecast.utc_offset_seconds, 0);
    }

    #[test]
    fn test_parse_malformed_json() {
        let result = parse_response("{ invalid json }", Utc::now());
        assert!(matches!(result, Err(ForecastError::ParseError(_))));
    }

    #[test]
    fn test_api_error_uses_reason_from_body() {
        let body = r#"{"error": true, "reason": "Latitude must be in range of -90 to 90°."}"#;

        let error = api_error(StatusCode::BAD_REQUEST, body);

        match error {
            ForecastError::Api(reason) => assert!(reason.starts_with("Latitude must be")),
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_api_error_falls_back_to_status() {
        let error = api_error(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert!(error.to_string().contains("502"));
    }

    #[test]
    fn test_local_time_applies_utc_offset() {
        let forecast = parse_response(VALID_RESPONSE, Utc::now()).unwrap();
        let instant = Utc.with_ymd_and_hms(2024, 7, 14, 22, 30, 0).unwrap();

        let local = forecast.local_time(instant);

        assert_eq!(
            local,
            NaiveDate::from_ymd_opt(2024, 7, 15).unwrap().and_hms_opt(7, 30, 0).unwrap()
        );
    }

    /// Decoded query parameter `name` of the client's request URL
    fn query_param(client: &ForecastClient, name: &str) -> Option<String> {
        client
            .forecast_url(35.68, 139.77)
            .unwrap()
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    #[test]
    fn test_forecast_url_contains_requested_fields() {
        let client = ForecastClient::new().with_cache(None);
        let url = client.forecast_url(35.68, 139.77).unwrap();

        assert!(url.as_str().starts_with(OPEN_METEO_BASE_URL));
        assert_eq!(query_param(&client, "latitude").as_deref(), Some("35.68"));
        assert_eq!(query_param(&client, "longitude").as_deref(), Some("139.77"));
        assert_eq!(query_param(&client, "hourly").as_deref(), Some(HOURLY_VARIABLES));
        assert_eq!(query_param(&client, "forecast_days").as_deref(), Some("2"));
        assert_eq!(query_param(&client, "timezone").as_deref(), Some("Asia/Tokyo"));
    }

    #[test]
    fn test_with_timezone_changes_url_and_cache_key() {
        let client = ForecastClient::new()
            .with_cache(None)
            .with_timezone("Europe/London");

        assert_eq!(query_param(&client, "timezone").as_deref(), Some("Europe/London"));
        assert_eq!(client.cache_key(51.5, -0.12), "forecast_51.50_-0.12_europe_london");
    }

    #[test]
    fn test_timezone_with_plus_sign_survives_encoding() {
        let client = ForecastClient::new()
            .with_cache(None)
            .with_timezone("Etc/GMT+9");

        assert_eq!(query_param(&client, "timezone").as_deref(), Some("Etc/GMT+9"));
    }

    #[test]
    fn test_invalid_base_url_is_an_error() {
        let client = ForecastClient::new()
            .with_cache(None)
            .with_base_url("not a url");

        assert!(matches!(
            client.forecast_url(35.68, 139.77),
            Err(ForecastError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_fresh_cache_is_served_without_request() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CacheManager::with_dir(temp_dir.path().to_path_buf());
        let client = ForecastClient::new()
            .with_cache(Some(cache.clone()))
            .with_base_url("http://127.0.0.1:9/unreachable");

        let cached = parse_response(VALID_RESPONSE, Utc::now()).unwrap();
        cache
            .write(&client.cache_key(35.7, 139.75), &cached, Duration::minutes(60))
            .unwrap();

        let forecast = client.fetch_forecast(35.7, 139.75).await.expect("cache hit");
        assert_eq!(forecast.hourly.time, cached.hourly.time);
        assert_eq!(forecast.fetched_at, cached.fetched_at);
    }

    #[tokio::test]
    async fn test_stale_cache_is_used_when_request_fails() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CacheManager::with_dir(temp_dir.path().to_path_buf());
        let client = ForecastClient::new()
            .with_cache(Some(cache.clone()))
            .with_base_url("http://127.0.0.1:9/unreachable");

        let cached = parse_response(VALID_RESPONSE, Utc::now()).unwrap();
        cache
            .write(&client.cache_key(35.7, 139.75), &cached, Duration::zero())
            .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(10));

        let forecast = client.fetch_forecast(35.7, 139.75).await.expect("stale fallback");
        assert_eq!(forecast.hourly.time, cached.hourly.time);
        assert_eq!(forecast.timezone, "Asia/Tokyo");
    }

    #[tokio::test]
    async fn test_request_failure_without_cache_is_an_error() {
        let client = ForecastClient::new()
            .with_cache(None)
            .with_base_url("http://127.0.0.1:9/unreachable");

        let result = client.fetch_forecast(35.7, 139.75).await;
        assert!(matches!(result, Err(ForecastError::RequestFailed(_))));
    }
}
