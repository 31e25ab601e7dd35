//! UI rendering module for exercast
//!
//! Terminal rendering of the analyzed forecast using ratatui.

pub mod forecast_view;
pub mod help_overlay;
pub mod widgets;

use ratatui::style::Color;

pub use forecast_view::{render as render_forecast, render_error};
pub use help_overlay::render as render_help_overlay;

/// Color scheme shared by the views
pub mod colors {
    use ratatui::style::Color;

    /// Section headers
    pub const HEADER: Color = Color::Cyan;
    /// Primary text
    pub const PRIMARY: Color = Color::White;
    /// Secondary/dimmed text
    pub const SECONDARY: Color = Color::Gray;
    /// Hours that are already over
    pub const PAST: Color = Color::DarkGray;
    /// Rank markers
    pub const RANK: Color = Color::Yellow;
    /// Warning advisories
    pub const WARNING: Color = Color::LightRed;
}

/// Color for a score band
pub fn score_color(score: f64) -> Color {
    match score.round() as u8 {
        80..=100 => Color::Green,
        60..=79 => Color::LightGreen,
        40..=59 => Color::Yellow,
        20..=39 => Color::LightRed,
        _ => Color::Red,
    }
}

/// Color for temperature (warmer = more red, cooler = more blue)
pub fn temperature_color(temp: f64) -> Color {
    if temp >= 30.0 {
        Color::Red
    } else if temp >= 25.0 {
        Color::LightRed
    } else if temp >= 20.0 {
        Color::Yellow
    } else if temp >= 15.0 {
        Color::Green
    } else if temp >= 10.0 {
        Color::Cyan
    } else {
        Color::Blue
    }
}
