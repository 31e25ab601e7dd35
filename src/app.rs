//! Application state management for exercast
//!
//! Holds the fetched forecast and its latest analysis, handles keyboard
//! input, and reloads data on request.

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use thiserror::Error;

use exercast::advice::Language;
use exercast::cache::CacheManager;
use exercast::cli::{LocationSource, StartupConfig};
use exercast::data::{Forecast, ForecastClient, ForecastError, Place, PostalClient, PostalError};
use exercast::ranking::{analyze, Analysis, Window};
use exercast::report::render_report;

/// Errors that can occur while loading a forecast
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Location lookup failed: {0}")]
    Postal(#[from] PostalError),

    #[error("Forecast unavailable: {0}")]
    Forecast(#[from] ForecastError),
}

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Fetching the location and forecast
    Loading,
    /// Showing the analyzed forecast
    Forecast,
    /// Loading failed with the given message
    Failed(String),
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag indicating a refresh has been requested
    pub refresh_requested: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// First visible row of the hourly table
    pub scroll_offset: usize,
    /// Days shown and ranked
    pub window: Window,
    /// Number of recommendations
    pub top_n: usize,
    /// Display language
    pub language: Language,
    /// Resolved location
    pub place: Option<Place>,
    /// Last fetched forecast
    pub forecast: Option<Forecast>,
    /// Result of the latest ranking run
    pub analysis: Analysis,
    /// Local time the latest analysis was computed for
    pub now: Option<NaiveDateTime>,
    /// Timestamp of last data refresh
    pub last_refresh: Option<DateTime<Local>>,
    location: LocationSource,
    forecast_client: ForecastClient,
    postal_client: PostalClient,
}

impl App {
    /// Creates an App from validated startup settings
    pub fn new(config: StartupConfig) -> Self {
        let cache = if config.use_cache {
            CacheManager::new()
        } else {
            None
        };

        Self {
            state: AppState::Loading,
            should_quit: false,
            refresh_requested: false,
            show_help: false,
            scroll_offset: 0,
            window: config.window,
            top_n: config.top_n,
            language: config.language,
            place: None,
            forecast: None,
            analysis: Analysis::default(),
            now: None,
            last_refresh: None,
            location: config.location,
            forecast_client: ForecastClient::new()
                .with_cache(cache)
                .with_timezone(config.timezone),
            postal_client: PostalClient::new(),
        }
    }

    /// Fetches the forecast and analyzes it
    ///
    /// Transitions to `Forecast` on success or `Failed` with the error message.
    pub async fn load(&mut self) {
        self.refresh_requested = false;

        match self.fetch().await {
            Ok(()) => {
                self.reanalyze(Utc::now());
                self.state = AppState::Forecast;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load forecast");
                self.state = AppState::Failed(e.to_string());
            }
        }

        self.last_refresh = Some(Local::now());
    }

    async fn fetch(&mut self) -> Result<(), LoadError> {
        let place = self.resolve_place().await?;
        let forecast = self
            .forecast_client
            .fetch_forecast(place.latitude, place.longitude)
            .await?;

        tracing::info!(place = %place.name, hours = forecast.hourly.len(), "Loaded forecast");
        self.place = Some(place);
        self.forecast = Some(forecast);
        Ok(())
    }

    async fn resolve_place(&self) -> Result<Place, LoadError> {
        if let Some(place) = &self.place {
            return Ok(place.clone());
        }

        match &self.location {
            LocationSource::Coordinates {
                latitude,
                longitude,
            } => Ok(Place::from_coordinates(*latitude, *longitude)),
            LocationSource::PostalCode(code) => Ok(self.postal_client.lookup(code).await?),
        }
    }

    /// Re-runs the ranking for the given instant
    pub fn reanalyze(&mut self, instant: DateTime<Utc>) {
        let Some(forecast) = &self.forecast else {
            return;
        };

        let now = forecast.local_time(instant);
        self.analysis = analyze(&forecast.hourly, now, self.window, self.top_n);
        self.now = Some(now);
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    /// Plain-text report of the current analysis
    pub fn report(&self) -> String {
        let place_name = self.place.as_ref().map(|p| p.name.as_str()).unwrap_or("-");
        let now = self.now.unwrap_or_else(|| Local::now().naive_local());
        render_report(place_name, self.window, now, &self.analysis, self.language)
    }

    fn max_scroll(&self) -> usize {
        self.analysis.all_in_window.len().saturating_sub(1)
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q` or `Esc`: Quit (or close the help overlay)
    /// - `Up`/`k`, `Down`/`j`: Scroll the hourly table
    /// - `g`/`G`: Jump to the first/last hour
    /// - `w`: Toggle between today and today + tomorrow
    /// - `l`: Toggle message language
    /// - `r`: Refresh data
    /// - `?`: Toggle help
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if self.show_help {
            match key_event.code {
                KeyCode::Char('?') | KeyCode::Esc => self.show_help = false,
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('r') => self.refresh_requested = true,
            KeyCode::Char('l') => self.language = self.language.toggled(),
            KeyCode::Char('w') => {
                self.window = self.window.toggled();
                self.reanalyze(Utc::now());
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll_offset = (self.scroll_offset + 1).min(self.max_scroll());
            }
            KeyCode::Char('g') => self.scroll_offset = 0,
            KeyCode::Char('G') => self.scroll_offset = self.max_scroll(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use crossterm::event::KeyModifiers;
    use exercast::data::RawHourlySeries;
    use exercast::ranking::Outcome;

    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn config() -> StartupConfig {
        StartupConfig {
            location: LocationSource::Coordinates {
                latitude: 35.68,
                longitude: 139.77,
            },
            window: Window::Today,
            top_n: 3,
            language: Language::Japanese,
            timezone: "Asia/Tokyo".to_string(),
            plain: false,
            use_cache: false,
        }
    }

    /// Forty-eight hours starting 2024-07-15 00:00 JST
    fn forecast() -> Forecast {
        let start = NaiveDate::from_ymd_opt(2024, 7, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let time = (0..48)
            .map(|h| (start + chrono::Duration::hours(h)).format("%Y-%m-%dT%H:%M").to_string())
            .collect();
        Forecast {
            latitude: 35.68,
            longitude: 139.77,
            timezone: "Asia/Tokyo".to_string(),
            utc_offset_seconds: 9 * 3600,
            hourly: RawHourlySeries {
                time,
                temperature: vec![Some(20.0); 48],
                apparent_temperature: vec![Some(20.0); 48],
                precipitation_probability: (0..48).map(|h| Some((h % 10) as u8 * 10)).collect(),
                wind_speed: vec![Some(5.0); 48],
                humidity: vec![Some(40); 48],
            },
            fetched_at: Utc::now(),
        }
    }

    fn loaded_app() -> App {
        let mut app = App::new(config());
        app.place = Some(Place::from_coordinates(35.68, 139.77));
        app.forecast = Some(forecast());
        app.state = AppState::Forecast;
        // 2024-07-15 10:30 JST
        app.reanalyze(Utc.with_ymd_and_hms(2024, 7, 15, 1, 30, 0).unwrap());
        app
    }

    #[test]
    fn test_initial_state_is_loading() {
        let app = App::new(config());
        assert_eq!(app.state, AppState::Loading);
        assert!(!app.should_quit);
        assert_eq!(app.analysis.outcome(), Outcome::NoData);
    }

    #[test]
    fn test_reanalyze_uses_forecast_local_time() {
        let app = loaded_app();

        assert_eq!(
            app.now,
            NaiveDate::from_ymd_opt(2024, 7, 15).unwrap().and_hms_opt(10, 30, 0)
        );
        assert_eq!(app.analysis.all_in_window.len(), 24);
        assert_eq!(app.analysis.top.len(), 3);
        assert!(app.analysis.top.iter().all(|e| Some(e.hour.time()) > app.now));
    }

    #[test]
    fn test_reanalyze_without_forecast_is_a_no_op() {
        let mut app = App::new(config());
        app.reanalyze(Utc::now());
        assert!(app.now.is_none());
    }

    #[test]
    fn test_q_and_esc_quit() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_help_overlay_intercepts_keys() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(app.show_help);

        app.handle_key(key_event(KeyCode::Char('w')));
        assert_eq!(app.window, Window::Today);

        app.handle_key(key_event(KeyCode::Esc));
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_r_requests_refresh() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Char('r')));
        assert!(app.refresh_requested);
    }

    #[test]
    fn test_l_toggles_language() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Char('l')));
        assert_eq!(app.language, Language::English);
        app.handle_key(key_event(KeyCode::Char('l')));
        assert_eq!(app.language, Language::Japanese);
    }

    #[test]
    fn test_w_toggles_window() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Char('w')));
        assert_eq!(app.window, Window::TodayAndTomorrow);
        app.handle_key(key_event(KeyCode::Char('w')));
        assert_eq!(app.window, Window::Today);
    }

    #[test]
    fn test_scrolling_is_clamped_to_table() {
        let mut app = loaded_app();

        app.handle_key(key_event(KeyCode::Up));
        assert_eq!(app.scroll_offset, 0);

        app.handle_key(key_event(KeyCode::Char('j')));
        app.handle_key(key_event(KeyCode::Down));
        assert_eq!(app.scroll_offset, 2);

        app.handle_key(key_event(KeyCode::Char('G')));
        assert_eq!(app.scroll_offset, 23);
        app.handle_key(key_event(KeyCode::Char('j')));
        assert_eq!(app.scroll_offset, 23);

        app.handle_key(key_event(KeyCode::Char('k')));
        assert_eq!(app.scroll_offset, 22);
        app.handle_key(key_event(KeyCode::Char('g')));
        assert_eq!(app.scroll_offset, 0);
    }

    #[test]
    fn test_report_uses_place_and_language() {
        let mut app = loaded_app();
        app.language = Language::English;

        let report = app.report();

        assert!(report.contains("35.6800, 139.7700"));
        assert!(report.contains("as of 2024-07-15 10:30"));
        assert!(report.contains("#1  07-15 11:00  Score 100"));
    }
}
