use chrono::NaiveDate;
use hyd_raster::RasterError;
use hyd_utils::error::DateError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while discovering, loading or validating an observation series.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("cannot list input directory {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no .tif/.tiff files found in {}", .path.display())]
    NoRasterFiles { path: PathBuf },

    #[error("date extraction failure for {}: {source}", .path.display())]
    DateExtraction {
        path: PathBuf,
        #[source]
        source: DateError,
    },

    #[error("duplicate date {date}: {} and {}", .first.display(), .second.display())]
    DuplicateDate {
        date: NaiveDate,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("insufficient data: {found} valid observation(s), at least 2 are required")]
    InsufficientData { found: usize },

    #[error(
        "dimension mismatch in {}: expected {}, found {}",
        .path.display(), dims(.expected), dims(.found)
    )]
    DimensionMismatch {
        path: PathBuf,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error(
        "invalid mask value {value} at row {row}, col {col} in {} (expected 0, 1 or no-data)",
        .path.display()
    )]
    InvalidMaskValue {
        path: PathBuf,
        row: usize,
        col: usize,
        value: f64,
    },

    #[error("no-data value {value} is a mask class (0 = dry, 1 = wet); choose another sentinel")]
    NoDataIsMaskClass { value: f64 },

    #[error("observations are not in strictly ascending date order: {previous} then {next}")]
    NotChronological { previous: NaiveDate, next: NaiveDate },

    #[error(transparent)]
    Raster(#[from] RasterError),
}

fn dims(shape: &(usize, usize)) -> String {
    format!("{}x{}", shape.0, shape.1)
}
