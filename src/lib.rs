//! exercast library
//!
//! Normalizes an hourly forecast, scores every hour for outdoor exercise, and
//! ranks the best upcoming hours. The binary adds the terminal UI on top.

pub mod advice;
pub mod cache;
pub mod cli;
pub mod data;
pub mod ranking;
pub mod report;
pub mod scoring;
