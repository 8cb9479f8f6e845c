use crate::classifier::classify;
use crate::error::AnalyticsError;
use crate::report::{WinLossRatio, WinLossReport};
use crate::source::DayTypeSource;
use crate::streaks::StreakRuns;
use core_types::DayType;

/// A stateless calculator for deriving win/loss metrics from a price series.
#[derive(Debug, Default)]
pub struct MetricsEngine {}

impl MetricsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating every metric at once.
    ///
    /// The series is classified once and scanned for streaks once; each metric is
    /// then read off those two results. Any classification failure is returned
    /// before a report exists, so there is no partially filled report.
    pub fn calculate<S: DayTypeSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<WinLossReport, AnalyticsError> {
        let classification = classify(source)?;
        let runs = StreakRuns::scan(classification.labels.as_slice());
        let breakdown = classification.breakdown;

        let report = WinLossReport {
            win_loss_ratio: WinLossRatio::from_counts(
                breakdown.counts.wins,
                breakdown.counts.losses,
            ),
            win_rate: breakdown.win_pct,
            max_win_streak: runs.max(DayType::Win)?,
            max_loss_streak: runs.max(DayType::Loss)?,
            avg_win_streak: runs.average(DayType::Win)?,
            avg_loss_streak: runs.average(DayType::Loss)?,
            breakdown,
        };

        tracing::debug!(
            win_runs = runs.runs(DayType::Win)?.len(),
            loss_runs = runs.runs(DayType::Loss)?.len(),
            win_loss_ratio = %report.win_loss_ratio,
            win_rate = %report.win_rate,
            "Calculated win/loss metrics"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Candle;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn report_from_candles() {
        let candles = vec![
            Candle::new(dec!(100), dec!(102)),
            Candle::new(dec!(102), dec!(98)),
            Candle::new(dec!(98), dec!(105)),
            Candle::new(dec!(105), dec!(103)),
            Candle::new(dec!(103), dec!(107)),
        ];
        let report = MetricsEngine::new().calculate(&candles).unwrap();

        assert_eq!(report.win_loss_ratio, WinLossRatio::Finite(dec!(1.5)));
        assert_eq!(report.win_rate, dec!(60));
        assert_eq!(report.max_win_streak, 1);
        assert_eq!(report.max_loss_streak, 1);
        assert_eq!(report.avg_win_streak, dec!(1));
        assert_eq!(report.avg_loss_streak, dec!(1));
    }

    #[test]
    fn failed_classification_yields_no_report() {
        let closes = vec![dec!(100)];
        assert_eq!(
            MetricsEngine::new().calculate(&closes).unwrap_err(),
            AnalyticsError::InsufficientData { required: 2, actual: 1 }
        );
    }

    #[test]
    fn all_neutral_series() {
        let report = MetricsEngine::new()
            .calculate(&[dec!(100), dec!(100), dec!(100)])
            .unwrap();
        assert_eq!(report.win_loss_ratio, WinLossRatio::Undefined);
        assert_eq!(report.win_rate, Decimal::ZERO);
        assert_eq!(report.breakdown.neutral_pct, dec!(100));
        assert_eq!(report.max_win_streak, 0);
        assert_eq!(report.avg_loss_streak, Decimal::ZERO);
    }
}
