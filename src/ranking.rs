//! Windowing and ranking of scored hours.
//!
//! `rank` scores every record, keeps the hours that fall on a window date
//! for display, and recommends the best upcoming hours among them.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::advice::{Advisory, Label, Language};
use crate::data::{normalize, HourlyRecord, RawHourlySeries};

/// Number of recommendations returned when nothing else is configured
pub const DEFAULT_TOP_N: usize = 3;

/// Calendar days whose hours are shown and ranked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Window {
    /// Only the current day
    #[default]
    Today,
    /// The current day and the next
    TodayAndTomorrow,
}

impl Window {
    /// Parses user input into a Window.
    ///
    /// Matching is case-insensitive and supports aliases:
    /// - "today" | "1" -> Today
    /// - "two-days" | "tomorrow" | "2" -> TodayAndTomorrow
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Window> {
        match s.trim().to_lowercase().as_str() {
            "today" | "1" => Some(Window::Today),
            "two-days" | "tomorrow" | "2" => Some(Window::TodayAndTomorrow),
            _ => None,
        }
    }

    /// Human-readable label
    pub fn label(&self, language: Language) -> &'static str {
        language.label(match self {
            Window::Today => Label::Today,
            Window::TodayAndTomorrow => Label::TodayAndTomorrow,
        })
    }

    /// The other window
    pub fn toggled(&self) -> Window {
        match self {
            Window::Today => Window::TodayAndTomorrow,
            Window::TodayAndTomorrow => Window::Today,
        }
    }

    /// Dates covered by this window, starting at `today`
    pub fn days(&self, today: NaiveDate) -> BTreeSet<NaiveDate> {
        let span = match self {
            Window::Today => 1,
            Window::TodayAndTomorrow => 2,
        };
        (0..span)
            .filter_map(|offset| today.checked_add_days(Days::new(offset)))
            .collect()
    }
}

/// An hourly record together with its suitability score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredHour {
    pub record: HourlyRecord,
    /// Score from 0 to 100
    pub score: f64,
}

impl ScoredHour {
    /// Scores a record
    pub fn new(record: HourlyRecord) -> Self {
        let score = record.score();
        Self { record, score }
    }

    pub fn time(&self) -> NaiveDateTime {
        self.record.time
    }

    pub fn advisory(&self) -> Advisory {
        self.record.advisory()
    }
}

/// A recommended hour with its 1-based position
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub hour: ScoredHour,
    pub rank: usize,
}

/// What the caller should present for an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No hours at all in the window
    NoData,
    /// Hours exist, but none of them lies in the future
    NoSuitableTime,
    /// At least one recommendation is available
    Ranked,
}

/// Result of one ranking run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis {
    /// Every hour on a window date, chronological, past hours included
    pub all_in_window: Vec<ScoredHour>,
    /// Best upcoming hours, highest score first
    pub top: Vec<RankedEntry>,
}

impl Analysis {
    pub fn outcome(&self) -> Outcome {
        if self.all_in_window.is_empty() {
            Outcome::NoData
        } else if self.top.is_empty() {
            Outcome::NoSuitableTime
        } else {
            Outcome::Ranked
        }
    }

    /// The highest ranked hour, if any
    pub fn best(&self) -> Option<&RankedEntry> {
        self.top.first()
    }

    /// Index into `all_in_window` of the last hour at or before `now`
    pub fn current_index(&self, now: NaiveDateTime) -> Option<usize> {
        self.all_in_window.iter().rposition(|h| h.time() <= now)
    }
}

/// Scores, windows, and ranks hourly records.
///
/// Hours strictly after `now` are candidates. They are ordered by score,
/// highest first, with earlier hours winning ties, and the first `top_n`
/// become the recommendations.
pub fn rank(
    records: &[HourlyRecord],
    now: NaiveDateTime,
    window_days: &BTreeSet<NaiveDate>,
    top_n: usize,
) -> Analysis {
    let all_in_window: Vec<ScoredHour> = records
        .iter()
        .filter(|r| window_days.contains(&r.time.date()))
        .cloned()
        .map(ScoredHour::new)
        .collect();

    let mut candidates: Vec<&ScoredHour> = all_in_window
        .iter()
        .filter(|h| h.time() > now)
        .collect();

    // sort_by is stable, so equal score and time keep input order
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.time().cmp(&b.time()))
    });

    let top = candidates
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(i, hour)| RankedEntry {
            hour: hour.clone(),
            rank: i + 1,
        })
        .collect();

    Analysis { all_in_window, top }
}

/// Normalizes a raw series and ranks it for the window starting on `now`'s date.
pub fn analyze(
    raw: &RawHourlySeries,
    now: NaiveDateTime,
    window: Window,
    top_n: usize,
) -> Analysis {
    let records = normalize(raw);
    let dropped = raw.len() - records.len();
    let analysis = rank(&records, now, &window.days(now.date()), top_n);

    tracing::info!(
        hours = records.len(),
        dropped,
        in_window = analysis.all_in_window.len(),
        recommended = analysis.top.len(),
        window = ?window,
        "Analyzed hourly forecast"
    );

    analysis
}
