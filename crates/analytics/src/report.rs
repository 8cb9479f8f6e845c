use crate::classifier::DayTypeBreakdown;
use crate::error::AnalyticsError;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wins divided by losses, with the two zero-denominator cases spelled out.
///
/// The ratio is never returned as a bare float. A consumer that needs a plain
/// number picks either `to_f64` (infinity / NaN) or `finite` (an error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinLossRatio {
    Finite(Decimal),
    /// At least one win and no losses.
    Infinite,
    /// No wins and no losses (0/0).
    Undefined,
}

impl WinLossRatio {
    pub fn from_counts(wins: usize, losses: usize) -> Self {
        match (wins, losses) {
            (0, 0) => WinLossRatio::Undefined,
            (_, 0) => WinLossRatio::Infinite,
            (w, l) => WinLossRatio::Finite(Decimal::from(w) / Decimal::from(l)),
        }
    }

    /// The ratio as a float: `+inf` when there are no losses, `NaN` for 0/0.
    pub fn to_f64(&self) -> f64 {
        match self {
            WinLossRatio::Finite(ratio) => ratio.to_f64().unwrap_or(f64::NAN),
            WinLossRatio::Infinite => f64::INFINITY,
            WinLossRatio::Undefined => f64::NAN,
        }
    }

    /// The finite ratio, or `DivisionUndefined` when the loss count was zero.
    pub fn finite(&self) -> Result<Decimal, AnalyticsError> {
        match self {
            WinLossRatio::Finite(ratio) => Ok(*ratio),
            WinLossRatio::Infinite | WinLossRatio::Undefined => {
                Err(AnalyticsError::DivisionUndefined("win_loss_ratio".to_string()))
            }
        }
    }
}

impl fmt::Display for WinLossRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WinLossRatio::Finite(ratio) => match f.precision() {
                Some(dp) => write!(f, "{}", ratio.round_dp(dp as u32)),
                None => write!(f, "{ratio}"),
            },
            WinLossRatio::Infinite => f.write_str("inf"),
            WinLossRatio::Undefined => f.write_str("undefined"),
        }
    }
}

/// One entry of the metrics mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Ratio(WinLossRatio),
    Percent(Decimal),
    Count(usize),
    Average(Decimal),
}

impl MetricValue {
    /// Renders the value with `dp` decimal places where that applies.
    pub fn display(&self, dp: u32) -> String {
        match self {
            MetricValue::Ratio(ratio) => format!("{:.*}", dp as usize, ratio),
            MetricValue::Percent(pct) => format!("{}%", pct.round_dp(dp)),
            MetricValue::Count(count) => count.to_string(),
            MetricValue::Average(avg) => avg.round_dp(dp).to_string(),
        }
    }
}

/// Every win/loss metric for one series, computed from a single classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinLossReport {
    pub win_loss_ratio: WinLossRatio,
    pub win_rate: Decimal,
    pub max_win_streak: usize,
    pub max_loss_streak: usize,
    pub avg_win_streak: Decimal,
    pub avg_loss_streak: Decimal,

    /// The full win/loss/neutral distribution the rates were read from.
    pub breakdown: DayTypeBreakdown,
}

impl WinLossReport {
    /// The six headline metrics as `(name, value)` pairs, in reporting order.
    pub fn metrics(&self) -> [(&'static str, MetricValue); 6] {
        [
            ("win_loss_ratio", MetricValue::Ratio(self.win_loss_ratio)),
            ("win_rate", MetricValue::Percent(self.win_rate)),
            ("max_win_streak", MetricValue::Count(self.max_win_streak)),
            ("max_loss_streak", MetricValue::Count(self.max_loss_streak)),
            ("avg_win_streak", MetricValue::Average(self.avg_win_streak)),
            ("avg_loss_streak", MetricValue::Average(self.avg_loss_streak)),
        ]
    }

    pub fn get(&self, name: &str) -> Option<MetricValue> {
        self.metrics()
            .into_iter()
            .find(|(metric, _)| *metric == name)
            .map(|(_, value)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn ratio_sentinels() {
        assert_eq!(WinLossRatio::from_counts(3, 2), WinLossRatio::Finite(dec!(1.5)));
        assert_eq!(WinLossRatio::from_counts(1, 0), WinLossRatio::Infinite);
        assert_eq!(WinLossRatio::from_counts(0, 0), WinLossRatio::Undefined);
        assert_eq!(WinLossRatio::from_counts(0, 4), WinLossRatio::Finite(Decimal::ZERO));
    }

    #[test]
    fn ratio_as_float() {
        assert_eq!(WinLossRatio::from_counts(2, 1).to_f64(), 2.0);
        assert_eq!(WinLossRatio::Infinite.to_f64(), f64::INFINITY);
        assert!(WinLossRatio::Undefined.to_f64().is_nan());
    }

    #[test]
    fn finite_rejects_zero_denominator() {
        assert_eq!(WinLossRatio::from_counts(4, 2).finite().unwrap(), dec!(2));
        assert_eq!(
            WinLossRatio::Infinite.finite().unwrap_err(),
            AnalyticsError::DivisionUndefined("win_loss_ratio".to_string())
        );
        assert!(WinLossRatio::Undefined.finite().is_err());
    }

    #[test]
    fn ratio_display() {
        assert_eq!(format!("{:.2}", WinLossRatio::from_counts(2, 3)), "0.67");
        assert_eq!(WinLossRatio::Infinite.to_string(), "inf");
        assert_eq!(WinLossRatio::Undefined.to_string(), "undefined");
    }

    #[test]
    fn metric_display_rounds() {
        assert_eq!(MetricValue::Percent(dec!(33.3333)).display(2), "33.33%");
        assert_eq!(MetricValue::Count(7).display(2), "7");
        assert_eq!(MetricValue::Average(dec!(2.3333)).display(1), "2.3");
    }
}
