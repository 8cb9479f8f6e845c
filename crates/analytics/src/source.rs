use crate::classifier::{LabeledSequence, label_candles, label_closes};
use crate::error::AnalyticsError;
use core_types::{Candle, DayType};
use rust_decimal::Decimal;
use std::borrow::Cow;

/// Anything that can be turned into an ordered sequence of day types.
///
/// Raw inputs (close series, candles) are classified on demand. Inputs that are
/// already labeled are borrowed as-is, so passing a `LabeledSequence` to several
/// metric functions never re-classifies.
pub trait DayTypeSource {
    fn day_types(&self) -> Result<Cow<'_, [DayType]>, AnalyticsError>;
}

/// Close-to-close mode.
macro_rules! impl_close_series {
    ($($price:ty),*) => {
        $(
            impl DayTypeSource for [$price] {
                fn day_types(&self) -> Result<Cow<'_, [DayType]>, AnalyticsError> {
                    label_closes(self).map(Cow::Owned)
                }
            }
        )*
    };
}

impl_close_series!(Decimal, f64);

/// Open/close mode.
impl DayTypeSource for [Candle] {
    fn day_types(&self) -> Result<Cow<'_, [DayType]>, AnalyticsError> {
        label_candles(self).map(Cow::Owned)
    }
}

impl DayTypeSource for [DayType] {
    fn day_types(&self) -> Result<Cow<'_, [DayType]>, AnalyticsError> {
        Ok(Cow::Borrowed(self))
    }
}

impl DayTypeSource for LabeledSequence {
    fn day_types(&self) -> Result<Cow<'_, [DayType]>, AnalyticsError> {
        Ok(Cow::Borrowed(self.as_slice()))
    }
}

impl<T> DayTypeSource for Vec<T>
where
    [T]: DayTypeSource,
{
    fn day_types(&self) -> Result<Cow<'_, [DayType]>, AnalyticsError> {
        self.as_slice().day_types()
    }
}

impl<T, const N: usize> DayTypeSource for [T; N]
where
    [T]: DayTypeSource,
{
    fn day_types(&self) -> Result<Cow<'_, [DayType]>, AnalyticsError> {
        self.as_slice().day_types()
    }
}
