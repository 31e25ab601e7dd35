//! Custom widgets

pub mod score_sparkline;

pub use score_sparkline::ScoreSparkline;
