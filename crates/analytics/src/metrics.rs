//! Single-metric entry points.
//!
//! Each function classifies its input (unless it is already labeled) and reduces
//! the labels to one number. To compute several metrics for the same series, call
//! `calculate_all_metrics` or classify once and pass the resulting
//! `LabeledSequence` around.

use crate::classifier::{DayTypeBreakdown, DayTypeCounts};
use crate::engine::MetricsEngine;
use crate::error::AnalyticsError;
use crate::report::{WinLossRatio, WinLossReport};
use crate::source::DayTypeSource;
use crate::streaks::StreakRuns;
use core_types::DayType;
use rust_decimal::Decimal;

/// Win days divided by loss days.
pub fn win_loss_ratio<S: DayTypeSource + ?Sized>(
    source: &S,
) -> Result<WinLossRatio, AnalyticsError> {
    let counts = DayTypeCounts::from_labels(&source.day_types()?);
    Ok(WinLossRatio::from_counts(counts.wins, counts.losses))
}

/// Percentage of periods that were wins, in `[0, 100]`.
pub fn win_rate<S: DayTypeSource + ?Sized>(source: &S) -> Result<Decimal, AnalyticsError> {
    rate(source, DayType::Win)
}

/// Percentage of periods that were losses, in `[0, 100]`.
pub fn loss_rate<S: DayTypeSource + ?Sized>(source: &S) -> Result<Decimal, AnalyticsError> {
    rate(source, DayType::Loss)
}

/// Percentage of periods with no change, in `[0, 100]`.
pub fn neutral_rate<S: DayTypeSource + ?Sized>(source: &S) -> Result<Decimal, AnalyticsError> {
    rate(source, DayType::Neutral)
}

fn rate<S: DayTypeSource + ?Sized>(source: &S, kind: DayType) -> Result<Decimal, AnalyticsError> {
    let counts = DayTypeCounts::from_labels(&source.day_types()?);
    Ok(DayTypeBreakdown::from_counts(counts)?.pct(kind))
}

/// Length of the longest run of `kind`. `kind` must be `Win` or `Loss`.
pub fn max_streak<S: DayTypeSource + ?Sized>(
    source: &S,
    kind: DayType,
) -> Result<usize, AnalyticsError> {
    ensure_directional(kind)?;
    StreakRuns::scan(&source.day_types()?).max(kind)
}

/// Mean length of the runs of `kind`, zero when there are none. `kind` must be
/// `Win` or `Loss`.
pub fn avg_streak<S: DayTypeSource + ?Sized>(
    source: &S,
    kind: DayType,
) -> Result<Decimal, AnalyticsError> {
    ensure_directional(kind)?;
    StreakRuns::scan(&source.day_types()?).average(kind)
}

/// Every metric from one classification pass.
pub fn calculate_all_metrics<S: DayTypeSource + ?Sized>(
    source: &S,
) -> Result<WinLossReport, AnalyticsError> {
    MetricsEngine::new().calculate(source)
}

// Reject a bad kind before paying for classification.
fn ensure_directional(kind: DayType) -> Result<(), AnalyticsError> {
    if kind.is_directional() {
        Ok(())
    } else {
        Err(AnalyticsError::InvalidKind(kind))
    }
}

// --- Per-kind shorthands over a close series ---

pub fn max_win_streak(prices: &[Decimal]) -> Result<usize, AnalyticsError> {
    max_streak(prices, DayType::Win)
}

pub fn max_loss_streak(prices: &[Decimal]) -> Result<usize, AnalyticsError> {
    max_streak(prices, DayType::Loss)
}

pub fn avg_win_streak(prices: &[Decimal]) -> Result<Decimal, AnalyticsError> {
    avg_streak(prices, DayType::Win)
}

pub fn avg_loss_streak(prices: &[Decimal]) -> Result<Decimal, AnalyticsError> {
    avg_streak(prices, DayType::Loss)
}
