//! Plain-text report of an analysis, printed by `--plain`.

use chrono::NaiveDateTime;

use crate::advice::{Label, Language};
use crate::ranking::{Analysis, Outcome, ScoredHour, Window};

/// Marker placed in front of hours that are already over
const PAST_MARKER: &str = "·";

/// Renders the recommendations and every in-window hour as text.
pub fn render_report(
    place_name: &str,
    window: Window,
    now: NaiveDateTime,
    analysis: &Analysis,
    language: Language,
) -> String {
    let mut lines = vec![
        format!(
            "exercast - {} ({}, {})",
            place_name,
            window.label(language),
            language.as_of(&now.format("%Y-%m-%d %H:%M").to_string())
        ),
        String::new(),
        language.label(Label::BestTimes).to_string(),
    ];

    match analysis.outcome() {
        Outcome::NoData => {
            lines.push(format!("  {}", language.no_data()));
            return lines.join("\n");
        }
        Outcome::NoSuitableTime => {
            lines.push(format!("  {}", language.no_suitable_time()));
        }
        Outcome::Ranked => {
            for entry in &analysis.top {
                let hour = &entry.hour;
                lines.push(format!(
                    "  #{}  {}  {} {:>3.0}  {:.1}°C  {} {}%",
                    entry.rank,
                    hour.time().format("%m-%d %H:%M"),
                    language.label(Label::Score),
                    hour.score,
                    hour.record.temperature,
                    language.label(Label::Rain),
                    hour.record.precipitation_probability
                ));
                lines.push(format!("      {}", language.advisory(hour.advisory())));
            }
        }
    }

    lines.push(String::new());
    lines.push(language.label(Label::AllHours).to_string());
    lines.push(format!(
        "    {:<11}  {:>5}  {:>7} {:>7} {:>5} {:>4}  {}",
        language.label(Label::Time),
        language.label(Label::Score),
        language.label(Label::Temperature),
        language.label(Label::FeelsLike),
        language.label(Label::Rain),
        language.label(Label::Humidity),
        language.label(Label::Wind)
    ));
    lines.extend(analysis.all_in_window.iter().map(|hour| hour_row(hour, now)));

    lines.join("\n")
}

fn hour_row(hour: &ScoredHour, now: NaiveDateTime) -> String {
    let marker = if hour.time() <= now { PAST_MARKER } else { " " };
    let record = &hour.record;
    format!(
        "  {} {}  {:>5.0}  {:>5.1}°C {:>5.1}°C {:>4}% {:>3}%  {:.1} km/h",
        marker,
        record.time.format("%m-%d %H:%M"),
        hour.score,
        record.temperature,
        record.apparent_temperature,
        record.precipitation_probability,
        record.humidity,
        record.wind_speed
    )
}
