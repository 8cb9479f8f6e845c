use crate::error::AnalyticsError;
use core_types::DayType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The lengths of every maximal win run and loss run, in the order they occurred.
///
/// Neutral days end a run without being counted in either collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRuns {
    wins: Vec<usize>,
    losses: Vec<usize>,
}

impl StreakRuns {
    /// Walks the labels once, left to right.
    pub fn scan(labels: &[DayType]) -> Self {
        let mut runs = Self::default();
        let mut current: Option<DayType> = None;
        let mut len = 0usize;

        for &label in labels {
            if current == Some(label) {
                len += 1;
                continue;
            }
            if let Some(kind) = current {
                runs.record(kind, len);
            }
            current = Some(label);
            len = 1;
        }

        // The last run is still open when the labels run out.
        if let Some(kind) = current {
            runs.record(kind, len);
        }

        runs
    }

    fn record(&mut self, kind: DayType, len: usize) {
        match kind {
            DayType::Win => self.wins.push(len),
            DayType::Loss => self.losses.push(len),
            DayType::Neutral => {}
        }
    }

    /// The run lengths for `kind`. Only `Win` and `Loss` have runs.
    pub fn runs(&self, kind: DayType) -> Result<&[usize], AnalyticsError> {
        match kind {
            DayType::Win => Ok(&self.wins),
            DayType::Loss => Ok(&self.losses),
            DayType::Neutral => Err(AnalyticsError::InvalidKind(kind)),
        }
    }

    /// The longest run of `kind`, or 0 if it never occurs.
    pub fn max(&self, kind: DayType) -> Result<usize, AnalyticsError> {
        Ok(self.runs(kind)?.iter().copied().max().unwrap_or(0))
    }

    /// The mean run length of `kind`, or zero if it never occurs.
    pub fn average(&self, kind: DayType) -> Result<Decimal, AnalyticsError> {
        let runs = self.runs(kind)?;
        if runs.is_empty() {
            return Ok(Decimal::ZERO);
        }
        let total: usize = runs.iter().sum();
        Ok(Decimal::from(total) / Decimal::from(runs.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::DayType::{Loss as L, Neutral as N, Win as W};
    use rust_decimal_macros::dec;

    #[test]
    fn collects_runs_in_order() {
        let runs = StreakRuns::scan(&[W, W, L, W, W, W, L, L, W, W]);
        assert_eq!(runs.runs(W).unwrap(), &[2, 3, 2]);
        assert_eq!(runs.runs(L).unwrap(), &[1, 2]);
    }

    #[test]
    fn final_open_run_is_flushed() {
        let runs = StreakRuns::scan(&[L, W, W, W, W]);
        assert_eq!(runs.runs(W).unwrap(), &[4]);
        assert_eq!(runs.max(W).unwrap(), 4);
    }

    #[test]
    fn neutral_splits_a_run_without_extending_it() {
        let runs = StreakRuns::scan(&[W, W, N, W, N, N, W, W, W]);
        assert_eq!(runs.runs(W).unwrap(), &[2, 1, 3]);
        assert!(runs.runs(L).unwrap().is_empty());
    }

    #[test]
    fn single_label_sequence() {
        let runs = StreakRuns::scan(&[L]);
        assert_eq!(runs.runs(L).unwrap(), &[1]);
        assert_eq!(runs.max(W).unwrap(), 0);
    }

    #[test]
    fn empty_and_all_neutral_have_no_runs() {
        for labels in [&[][..], &[N, N, N][..]] {
            let runs = StreakRuns::scan(labels);
            assert_eq!(runs.max(W).unwrap(), 0);
            assert_eq!(runs.max(L).unwrap(), 0);
            assert_eq!(runs.average(W).unwrap(), Decimal::ZERO);
            assert_eq!(runs.average(L).unwrap(), Decimal::ZERO);
        }
    }

    #[test]
    fn average_is_the_mean_run_length() {
        let runs = StreakRuns::scan(&[W, W, L, W, W, W, L, W, W]);
        assert_eq!(runs.average(W).unwrap().round_dp(2), dec!(2.33));
        assert_eq!(runs.average(L).unwrap(), dec!(1));
    }

    #[test]
    fn neutral_kind_is_rejected() {
        let runs = StreakRuns::scan(&[W, N]);
        assert_eq!(runs.max(N).unwrap_err(), AnalyticsError::InvalidKind(N));
        assert_eq!(runs.average(N).unwrap_err(), AnalyticsError::InvalidKind(N));
    }
}
