use crate::error::AnalyticsError;
use crate::source::DayTypeSource;
use core_types::{Candle, DayType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The shortest close series that yields a label: one move needs two prices.
pub const MIN_CLOSES: usize = 2;
/// The shortest candle series that yields a label.
pub const MIN_CANDLES: usize = 1;

/// An ordered sequence of day types, one per period. Order encodes time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabeledSequence {
    labels: Vec<DayType>,
}

impl LabeledSequence {
    pub fn new(labels: Vec<DayType>) -> Self {
        Self { labels }
    }

    pub fn as_slice(&self) -> &[DayType] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DayType> {
        self.labels.iter()
    }

    pub fn counts(&self) -> DayTypeCounts {
        DayTypeCounts::from_labels(&self.labels)
    }
}

impl From<Vec<DayType>> for LabeledSequence {
    fn from(labels: Vec<DayType>) -> Self {
        Self::new(labels)
    }
}

impl AsRef<[DayType]> for LabeledSequence {
    fn as_ref(&self) -> &[DayType] {
        &self.labels
    }
}

/// Raw tallies of each day type in a sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTypeCounts {
    pub wins: usize,
    pub losses: usize,
    pub neutrals: usize,
}

impl DayTypeCounts {
    pub fn from_labels(labels: &[DayType]) -> Self {
        labels.iter().fold(Self::default(), |mut counts, label| {
            match label {
                DayType::Win => counts.wins += 1,
                DayType::Loss => counts.losses += 1,
                DayType::Neutral => counts.neutrals += 1,
            }
            counts
        })
    }

    pub fn get(&self, kind: DayType) -> usize {
        match kind {
            DayType::Win => self.wins,
            DayType::Loss => self.losses,
            DayType::Neutral => self.neutrals,
        }
    }

    /// Always equal to the length of the sequence the counts came from.
    pub fn total(&self) -> usize {
        self.wins + self.losses + self.neutrals
    }
}

/// The share of each day type, as percentages of all labeled periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTypeBreakdown {
    pub counts: DayTypeCounts,
    pub win_pct: Decimal,
    pub loss_pct: Decimal,
    pub neutral_pct: Decimal,
}

impl DayTypeBreakdown {
    /// Fails on an empty tally, since a percentage of nothing is undefined.
    pub fn from_counts(counts: DayTypeCounts) -> Result<Self, AnalyticsError> {
        let total = counts.total();
        if total == 0 {
            return Err(AnalyticsError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }

        let pct = |count: usize| {
            (Decimal::from(count) / Decimal::from(total)) * Decimal::from(100)
        };

        Ok(Self {
            counts,
            win_pct: pct(counts.wins),
            loss_pct: pct(counts.losses),
            neutral_pct: pct(counts.neutrals),
        })
    }

    pub fn pct(&self, kind: DayType) -> Decimal {
        match kind {
            DayType::Win => self.win_pct,
            DayType::Loss => self.loss_pct,
            DayType::Neutral => self.neutral_pct,
        }
    }
}

/// The output of the classifier: the labels themselves plus their distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub labels: LabeledSequence,
    pub breakdown: DayTypeBreakdown,
}

/// Labels a series and computes its win/loss/neutral breakdown.
pub fn classify<S: DayTypeSource + ?Sized>(source: &S) -> Result<Classification, AnalyticsError> {
    let labels = LabeledSequence::new(source.day_types()?.into_owned());
    let breakdown = DayTypeBreakdown::from_counts(labels.counts())?;

    tracing::debug!(
        periods = labels.len(),
        wins = breakdown.counts.wins,
        losses = breakdown.counts.losses,
        neutrals = breakdown.counts.neutrals,
        "Classified price series"
    );

    Ok(Classification { labels, breakdown })
}

/// Close-to-close labeling: each price is compared with the one before it,
/// so N prices yield N-1 labels. A price that cannot be ordered (a float NaN)
/// fails the whole series.
pub fn label_closes<T: PartialOrd>(prices: &[T]) -> Result<Vec<DayType>, AnalyticsError> {
    if prices.len() < MIN_CLOSES {
        return Err(AnalyticsError::InsufficientData {
            required: MIN_CLOSES,
            actual: prices.len(),
        });
    }

    prices
        .windows(2)
        .enumerate()
        .map(|(i, w)| {
            DayType::try_compare(&w[0], &w[1]).ok_or_else(|| AnalyticsError::InvalidPrice {
                // Blame the operand that is not equal to itself.
                index: if w[0].partial_cmp(&w[0]).is_none() { i } else { i + 1 },
            })
        })
        .collect()
}

/// Open/close labeling: one label per candle.
pub fn label_candles(candles: &[Candle]) -> Result<Vec<DayType>, AnalyticsError> {
    if candles.len() < MIN_CANDLES {
        return Err(AnalyticsError::InsufficientData {
            required: MIN_CANDLES,
            actual: candles.len(),
        });
    }

    Ok(candles.iter().map(Candle::day_type).collect())
}

/// Builds open/close rows out of a close series, with each period opening at the
/// previous close. Classifying the result is the same as close-to-close mode.
pub fn candles_from_closes(prices: &[Decimal]) -> Vec<Candle> {
    prices
        .windows(2)
        .map(|w| Candle::new(w[0], w[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn close_series_yields_one_label_per_move() {
        let labels = label_closes(&[dec!(100), dec!(102), dec!(98), dec!(105)]).unwrap();
        assert_eq!(labels, vec![DayType::Win, DayType::Loss, DayType::Win]);
    }

    #[test]
    fn candles_yield_one_label_per_row() {
        let candles = vec![
            Candle::new(dec!(100), dec!(102)),
            Candle::new(dec!(102), dec!(98)),
            Candle::new(dec!(98), dec!(98)),
        ];
        let labels = label_candles(&candles).unwrap();
        assert_eq!(labels, vec![DayType::Win, DayType::Loss, DayType::Neutral]);
    }

    #[test]
    fn minimum_lengths_are_enforced() {
        assert_eq!(
            label_closes::<Decimal>(&[]).unwrap_err(),
            AnalyticsError::InsufficientData { required: 2, actual: 0 }
        );
        assert_eq!(
            label_candles(&[]).unwrap_err(),
            AnalyticsError::InsufficientData { required: 1, actual: 0 }
        );
        // A single complete candle is enough.
        assert_eq!(
            label_candles(&[Candle::new(dec!(1), dec!(2))]).unwrap(),
            vec![DayType::Win]
        );
    }

    #[test]
    fn nan_close_is_rejected_not_neutral() {
        assert_eq!(
            label_closes(&[1.0_f64, f64::NAN, 2.0]).unwrap_err(),
            AnalyticsError::InvalidPrice { index: 1 }
        );
        assert_eq!(
            label_closes(&[f64::NAN, 1.0]).unwrap_err(),
            AnalyticsError::InvalidPrice { index: 0 }
        );
    }

    #[test]
    fn breakdown_matches_counts() {
        let classification = classify(&[dec!(100), dec!(102), dec!(98), dec!(105), dec!(103), dec!(107)]).unwrap();
        let breakdown = classification.breakdown;

        assert_eq!(breakdown.counts, DayTypeCounts { wins: 3, losses: 2, neutrals: 0 });
        assert_eq!(breakdown.win_pct, dec!(60));
        assert_eq!(breakdown.loss_pct, dec!(40));
        assert_eq!(breakdown.neutral_pct, Decimal::ZERO);
        assert_eq!(breakdown.counts.total(), classification.labels.len());
    }

    #[test]
    fn thirds_sum_to_one_hundred_within_rounding() {
        let labels = vec![DayType::Win, DayType::Loss, DayType::Neutral];
        let breakdown = classify(&labels).unwrap().breakdown;
        let sum = breakdown.win_pct + breakdown.loss_pct + breakdown.neutral_pct;
        assert!((sum - dec!(100)).abs() < dec!(0.000001), "sum was {sum}");
    }

    #[test]
    fn empty_labels_have_no_breakdown() {
        let labels: Vec<DayType> = Vec::new();
        assert!(matches!(
            classify(&labels),
            Err(AnalyticsError::InsufficientData { .. })
        ));
    }

    #[test]
    fn candles_from_closes_chains_previous_close() {
        let candles = candles_from_closes(&[dec!(10), dec!(11), dec!(9)]);
        assert_eq!(
            candles,
            vec![Candle::new(dec!(10), dec!(11)), Candle::new(dec!(11), dec!(9))]
        );
        assert!(candles_from_closes(&[dec!(10)]).is_empty());
    }
}
