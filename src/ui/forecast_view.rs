//! Forecast screen rendering
//!
//! Shows the best upcoming hours with an advisory, a score sparkline across
//! the window, and a scrollable table of every hour in the window.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use exercast::advice::{Label, Language};
use exercast::ranking::{Outcome, ScoredHour};
use exercast::scoring::Deductions;

use super::colors;
use super::widgets::ScoreSparkline;
use super::{score_color, temperature_color};
use crate::app::App;

/// Renders the forecast view
pub fn render(frame: &mut Frame, app: &App) {
    let best_height = match app.analysis.outcome() {
        Outcome::Ranked => app.analysis.top.len() as u16 + 4,
        _ => 3,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(best_height),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_best_times(frame, app, chunks[1]);
    render_sparkline(frame, app, chunks[2]);
    render_hour_table(frame, app, chunks[3]);
    render_footer(frame, app.language, chunks[4]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let place = app.place.as_ref().map(|p| p.name.as_str()).unwrap_or("-");
    let updated = app
        .last_refresh
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string());

    let line = Line::from(vec![
        Span::styled(
            "exercast",
            Style::default()
                .fg(colors::HEADER)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(place.to_string(), Style::default().fg(colors::PRIMARY)),
        Span::raw("  "),
        Span::styled(
            app.window.label(app.language),
            Style::default().fg(colors::SECONDARY),
        ),
        Span::styled(
            format!("  {} {}", app.language.label(Label::Updated), updated),
            Style::default().fg(colors::SECONDARY),
        ),
    ]);

    let header = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_best_times(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", app.language.label(Label::BestTimes)),
            Style::default().fg(colors::HEADER),
        ))
        .borders(Borders::ALL);

    let lines = match app.analysis.outcome() {
        Outcome::NoData => vec![Line::from(Span::styled(
            app.language.no_data(),
            Style::default().fg(colors::SECONDARY),
        ))],
        Outcome::NoSuitableTime => vec![Line::from(Span::styled(
            app.language.no_suitable_time(),
            Style::default().fg(colors::SECONDARY),
        ))],
        Outcome::Ranked => {
            let mut lines: Vec<Line> = app
                .analysis
                .top
                .iter()
                .map(|entry| {
                    let hour = &entry.hour;
                    Line::from(vec![
                        Span::styled(format!("#{} ", entry.rank), Style::default().fg(colors::RANK)),
                        Span::styled(
                            hour.time().format("%m/%d %H:%M").to_string(),
                            Style::default().fg(colors::PRIMARY),
                        ),
                        Span::raw("  "),
                        Span::styled(
                            format!("{} {:>3.0}", app.language.label(Label::Score), hour.score),
                            Style::default()
                                .fg(score_color(hour.score))
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            format!(
                                "  {:.1}°C  {} {}%  {} {:.1} km/h",
                                hour.record.temperature,
                                app.language.label(Label::Rain),
                                hour.record.precipitation_probability,
                                app.language.label(Label::Wind),
                                hour.record.wind_speed
                            ),
                            Style::default().fg(colors::SECONDARY),
                        ),
                    ])
                })
                .collect();

            if let Some(best) = app.analysis.best() {
                let advisory = best.hour.advisory();
                let color = if advisory.is_warning() {
                    colors::WARNING
                } else {
                    colors::PRIMARY
                };
                lines.push(Line::from(Span::styled(
                    app.language.advisory(advisory),
                    Style::default().fg(color),
                )));
                lines.push(Line::from(Span::styled(
                    deduction_summary(&best.hour.record.deductions(), app.language),
                    Style::default().fg(colors::SECONDARY),
                )));
            }
            lines
        }
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_sparkline(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", app.language.label(Label::ScoreByHour)),
            Style::default().fg(colors::HEADER),
        ))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let scores: Vec<f64> = app.analysis.all_in_window.iter().map(|h| h.score).collect();
    let current = app.now.and_then(|now| app.analysis.current_index(now));

    frame.render_widget(ScoreSparkline::new(&scores).current_position(current), inner);
}

fn render_hour_table(frame: &mut Frame, app: &App, area: Rect) {
    let language = app.language;
    let header = Row::new(vec![
        "",
        language.label(Label::Time),
        language.label(Label::Score),
        language.label(Label::Temperature),
        language.label(Label::FeelsLike),
        language.label(Label::Rain),
        language.label(Label::Humidity),
        language.label(Label::Wind),
    ])
    .style(
        Style::default()
            .fg(colors::HEADER)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = app
        .analysis
        .all_in_window
        .iter()
        .skip(app.scroll_offset)
        .map(|hour| hour_row(app, hour))
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Length(12),
        Constraint::Length(6),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(11),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(Span::styled(
                format!(" {} ", language.label(Label::AllHours)),
                Style::default().fg(colors::HEADER),
            ))
            .borders(Borders::ALL),
    );

    frame.render_widget(table, area);
}

fn hour_row<'a>(app: &App, hour: &ScoredHour) -> Row<'a> {
    let record = &hour.record;
    let is_past = app.now.is_some_and(|now| hour.time() <= now);
    let rank = app
        .analysis
        .top
        .iter()
        .find(|entry| entry.hour.time() == hour.time())
        .map(|entry| format!("#{}", entry.rank))
        .unwrap_or_default();

    let cells = vec![
        Cell::from(Span::styled(rank, Style::default().fg(colors::RANK))),
        Cell::from(record.time.format("%m/%d %H:%M").to_string()),
        Cell::from(Span::styled(
            format!("{:>3.0}", hour.score),
            Style::default().fg(score_color(hour.score)),
        )),
        Cell::from(Span::styled(
            format!("{:.1}°C", record.temperature),
            Style::default().fg(temperature_color(record.temperature)),
        )),
        Cell::from(format!("{:.1}°C", record.apparent_temperature)),
        Cell::from(format!("{}%", record.precipitation_probability)),
        Cell::from(format!("{}%", record.humidity)),
        Cell::from(format!("{:.1} km/h", record.wind_speed)),
    ];

    let row = Row::new(cells);
    if is_past {
        row.style(Style::default().fg(colors::PAST))
    } else {
        row
    }
}

fn render_footer(frame: &mut Frame, language: Language, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        language.label(Label::KeyHints),
        Style::default().fg(colors::SECONDARY),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

/// Renders the error screen after a failed load
pub fn render_error(frame: &mut Frame, message: &str, language: Language) {
    let lines = vec![
        Line::from(Span::styled(
            language.label(Label::LoadFailed),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            language.label(Label::RetryHints),
            Style::default().fg(colors::SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, frame.area());
}

/// Lists the non-zero deductions, e.g. "Rain -20  Wind -10"
fn deduction_summary(deductions: &Deductions, language: Language) -> String {
    let parts: Vec<String> = [
        (Label::Rain, deductions.precipitation),
        (Label::Heat, deductions.heat),
        (Label::Cold, deductions.cold),
        (Label::Humidity, deductions.humidity),
        (Label::Wind, deductions.wind),
    ]
    .iter()
    .filter(|(_, points)| *points > 0.0)
    .map(|(label, points)| format!("{} -{:.0}", language.label(*label), points))
    .collect();

    if parts.is_empty() {
        language.label(Label::NoDeductions).to_string()
    } else {
        parts.join("  ")
    }
}
