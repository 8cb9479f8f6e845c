use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// The outcome of a single period, derived by comparing a later price against an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    /// The price closed higher (a "green" day).
    Win,
    /// The price closed lower (a "red" day).
    Loss,
    /// The price did not move.
    Neutral,
}

impl DayType {
    /// Classifies the move from `from` to `to`.
    ///
    /// Equality is exact on the numeric type. There is no tolerance band, so callers
    /// that want one must round both prices first.
    pub fn compare<T: Ord>(from: &T, to: &T) -> Self {
        match to.cmp(from) {
            Ordering::Greater => DayType::Win,
            Ordering::Less => DayType::Loss,
            Ordering::Equal => DayType::Neutral,
        }
    }

    /// Like [`DayType::compare`] for partially ordered prices such as `f64`.
    /// Returns `None` when the two cannot be ordered (a NaN on either side).
    pub fn try_compare<T: PartialOrd>(from: &T, to: &T) -> Option<Self> {
        match to.partial_cmp(from)? {
            Ordering::Greater => Some(DayType::Win),
            Ordering::Less => Some(DayType::Loss),
            Ordering::Equal => Some(DayType::Neutral),
        }
    }

    /// Returns `true` for the two kinds that form streaks.
    pub fn is_directional(&self) -> bool {
        matches!(self, DayType::Win | DayType::Loss)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayType::Win => "win",
            DayType::Loss => "loss",
            DayType::Neutral => "neutral",
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayType {
    type Err = CoreError;

    /// Accepts both the win/loss vocabulary and the green/red candle vocabulary.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "win" | "green" | "up" => Ok(DayType::Win),
            "loss" | "red" | "down" => Ok(DayType::Loss),
            "neutral" | "flat" | "unchanged" => Ok(DayType::Neutral),
            other => Err(CoreError::InvalidInput(
                "day type".to_string(),
                format!("'{other}' is not one of win, loss, neutral"),
            )),
        }
    }
}
