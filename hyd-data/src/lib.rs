//! Hydroperiod estimation from a series of binary inundation masks.
//!
//! Every gap between two consecutive observations is filled with an
//! estimate of how many of its days each pixel spent inundated; the
//! estimates are summed per pixel into a [`Hydroperiod`] raster covering
//! the first to the last observation date.

pub mod accumulator;
pub mod error;
pub mod statistics;

pub use accumulator::{
    accumulate_series, accumulate_stream, is_unambiguous_no_data, Accumulator, Hydroperiod,
    IntervalSummary,
};
pub use error::AccumulateError;
pub use statistics::HydroperiodStatistics;

/// The per-pixel interpolation rule for one interval.
pub mod interpolation {
    use hyd_series::Inundation;

    /// Estimated inundated days for a pixel over an interval of `days`
    /// whole days, given its state at the start and end observations.
    ///
    /// - wet at both ends: the whole interval, `days`
    /// - any other pair of classes (wet→dry, dry→wet, dry→dry): `days / 2`
    /// - no-data at either end: `None`, the interval says nothing about
    ///   this pixel
    ///
    /// Dry→dry earns the same half credit as a boundary disagreement.
    pub fn contribution(start: Inundation, end: Inundation, days: i64) -> Option<f64> {
        match (start, end) {
            (Inundation::NoData, _) | (_, Inundation::NoData) => None,
            (Inundation::Wet, Inundation::Wet) => Some(days as f64),
            _ => Some(days as f64 / 2.0),
        }
    }

}
