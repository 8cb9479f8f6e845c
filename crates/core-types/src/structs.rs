use crate::enums::DayType;
use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single OHLC observation for one period.
///
/// Only `open` and `close` take part in day-type classification. `high` and `low`
/// are carried through when the source has them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    pub date: Option<NaiveDate>,
    pub open: Decimal,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub close: Decimal,
}

impl Candle {
    /// Creates an undated candle from just the open and close.
    pub fn new(open: Decimal, close: Decimal) -> Self {
        Self {
            date: None,
            open,
            high: None,
            low: None,
            close,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Attaches the high and low, rejecting a range that cannot contain the open and close.
    pub fn with_range(mut self, high: Decimal, low: Decimal) -> Result<Self, CoreError> {
        let body_high = self.open.max(self.close);
        let body_low = self.open.min(self.close);
        if high < body_high || low > body_low {
            return Err(CoreError::InvalidInput(
                "candle range".to_string(),
                format!(
                    "high {high} / low {low} does not contain open {} and close {}",
                    self.open, self.close
                ),
            ));
        }
        self.high = Some(high);
        self.low = Some(low);
        Ok(self)
    }

    /// The day type of this period: close compared against open.
    pub fn day_type(&self) -> DayType {
        DayType::compare(&self.open, &self.close)
    }
}
