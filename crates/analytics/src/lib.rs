//! # Win/Loss Analytics
//!
//! This crate turns an ordered price series into day-type labels and derives the
//! win/loss statistics of that label sequence.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** This crate has no knowledge of files, configuration or output
//!   formats. It depends only on `core-types`.
//! - **Single Pass:** A price series is classified once and scanned for streaks once.
//!   Every metric is a reducer over those two results, so a batch report is always
//!   self-consistent.
//!
//! ## Public API
//!
//! - `classify`: labels a series and reports the win/loss/neutral percentages.
//! - `win_loss_ratio`, `win_rate`, `max_streak`, `avg_streak`: the individual metrics.
//! - `calculate_all_metrics` / `MetricsEngine`: every metric from one pass.
//! - `DayTypeSource`: the input seam. Close series, candles and label sequences all
//!   implement it.

// Declare the modules that constitute this crate.
pub mod classifier;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod report;
pub mod source;
pub mod streaks;

// Re-export the key components to create a clean, public-facing API.
pub use classifier::{
    Classification, DayTypeBreakdown, DayTypeCounts, LabeledSequence, candles_from_closes,
    classify, label_candles, label_closes,
};
pub use engine::MetricsEngine;
pub use error::AnalyticsError;
pub use metrics::{
    avg_loss_streak, avg_streak, avg_win_streak, calculate_all_metrics, loss_rate,
    max_loss_streak, max_streak, max_win_streak, neutral_rate, win_loss_ratio, win_rate,
};
pub use report::{MetricValue, WinLossRatio, WinLossReport};
pub use source::DayTypeSource;
pub use streaks::StreakRuns;
