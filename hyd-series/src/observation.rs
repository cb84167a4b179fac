use crate::error::SeriesError;
use chrono::NaiveDate;
use hyd_raster::GeoMetadata;
use ndarray::Array2;
use serde::Serialize;
use std::{cmp::Ordering, path::Path, path::PathBuf};

/// Pixel value for dry cells in an inundation mask.
pub const DRY_VALUE: f64 = 0.0;

/// Pixel value for inundated cells in an inundation mask.
pub const WET_VALUE: f64 = 1.0;

/// The state of one mask cell on one date.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
pub enum Inundation {
    Dry,
    Wet,
    NoData,
}

impl Inundation {
    /// Classify a raw pixel value.
    ///
    /// 0 and 1 always map to `Dry` and `Wet`, even if a sentinel collides
    /// with them. Any other value is `NoData` when it equals one of the
    /// `no_data` sentinels (NaN matches a NaN sentinel), otherwise it is
    /// not a valid mask value and `None` is returned.
    pub fn classify(value: f64, no_data: &[f64]) -> Option<Inundation> {
        if value == DRY_VALUE {
            Some(Inundation::Dry)
        } else if value == WET_VALUE {
            Some(Inundation::Wet)
        } else if no_data
            .iter()
            .any(|&nd| nd == value || (nd.is_nan() && value.is_nan()))
        {
            Some(Inundation::NoData)
        } else {
            None
        }
    }

    pub fn is_wet(self) -> bool {
        self == Inundation::Wet
    }
}

/// A validated binary inundation mask.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    cells: Array2<Inundation>,
}

impl Mask {
    /// Validate raw raster values from `path` into a mask.
    ///
    /// Fails on the first cell (in row-major order) that is neither 0, 1
    /// nor a no-data sentinel.
    pub fn from_raster(
        path: &Path,
        data: &Array2<f64>,
        no_data: &[f64],
    ) -> Result<Mask, SeriesError> {
        if let Some(((row, col), &value)) = data
            .indexed_iter()
            .find(|&(_, &v)| Inundation::classify(v, no_data).is_none())
        {
            return Err(SeriesError::InvalidMaskValue {
                path: path.to_path_buf(),
                row,
                col,
                value,
            });
        }
        let cells = data.mapv(|v| Inundation::classify(v, no_data).unwrap_or(Inundation::NoData));
        Ok(Mask { cells })
    }

    pub fn from_cells(cells: Array2<Inundation>) -> Mask {
        Mask { cells }
    }

    pub fn cells(&self) -> &Array2<Inundation> {
        &self.cells
    }

    /// `(rows, cols)`
    pub fn dim(&self) -> (usize, usize) {
        self.cells.dim()
    }

    /// Number of cells in the given state.
    pub fn count(&self, state: Inundation) -> usize {
        self.cells.iter().filter(|&&c| c == state).count()
    }
}

/// A single dated inundation snapshot.
#[derive(Debug, Clone)]
pub struct Observation {
    pub date: NaiveDate,
    pub mask: Mask,
    /// File the mask was read from, if any.
    pub source: Option<PathBuf>,
    pub metadata: GeoMetadata,
}

impl Observation {
    /// An in-memory observation with no source file or georeferencing.
    pub fn new(date: NaiveDate, mask: Mask) -> Observation {
        Observation {
            date,
            mask,
            source: None,
            metadata: GeoMetadata::default(),
        }
    }

    /// Human-readable origin, used in error messages.
    pub fn describe(&self) -> String {
        match &self.source {
            Some(path) => path.display().to_string(),
            None => self.date.to_string(),
        }
    }
}

impl Ord for Observation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date.cmp(&other.date)
    }
}

impl Eq for Observation {}

impl PartialEq for Observation {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
    }
}

impl PartialOrd for Observation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
