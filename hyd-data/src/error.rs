use chrono::NaiveDate;
use hyd_series::SeriesError;
use thiserror::Error;

/// Errors raised while accumulating a hydroperiod.
#[derive(Debug, Error)]
pub enum AccumulateError {
    #[error("dimension mismatch: {what} is {}, accumulator is {}", dims(.found), dims(.expected))]
    DimensionMismatch {
        what: String,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("non-chronological interval: {start} is not before {end}")]
    NotChronological { start: NaiveDate, end: NaiveDate },

    #[error("insufficient data: {found} observation(s), at least 2 are required")]
    InsufficientData { found: usize },

    #[error("output no-data value {value} could be a real hydroperiod; use a negative value or NaN")]
    AmbiguousNoData { value: f64 },

    #[error(transparent)]
    Series(#[from] SeriesError),
}

fn dims(shape: &(usize, usize)) -> String {
    format!("{}x{}", shape.0, shape.1)
}
