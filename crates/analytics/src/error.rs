use core_types::DayType;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: need at least {required} observations, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Calculation error: Division by zero encountered in metric '{0}'")]
    DivisionUndefined(String),

    #[error("Streaks are only tracked for win or loss days, not '{0}'")]
    InvalidKind(DayType),

    #[error("Price at position {index} cannot be compared with its neighbour")]
    InvalidPrice { index: usize },
}
