use crate::error::SeriesError;
use crate::observation::Observation;
use chrono::NaiveDate;
use hyd_utils::dates::days_between;
use std::path::PathBuf;

/// A chronologically ordered, dimensionally consistent run of observations.
///
/// Invariants (checked by [`ObservationSeries::new`]):
/// - at least two observations
/// - strictly increasing dates (no duplicates)
/// - every mask has the same `(rows, cols)`
#[derive(Debug, Clone)]
pub struct ObservationSeries(Vec<Observation>);

impl ObservationSeries {
    /// Sort `observations` by date and validate the series invariants.
    pub fn new(mut observations: Vec<Observation>) -> Result<Self, SeriesError> {
        if observations.len() < 2 {
            return Err(SeriesError::InsufficientData {
                found: observations.len(),
            });
        }
        observations.sort();

        for pair in observations.windows(2) {
            if pair[0].date == pair[1].date {
                return Err(SeriesError::DuplicateDate {
                    date: pair[0].date,
                    first: source_path(&pair[0]),
                    second: source_path(&pair[1]),
                });
            }
        }

        let expected = observations[0].mask.dim();
        if let Some(odd) = observations.iter().find(|o| o.mask.dim() != expected) {
            return Err(SeriesError::DimensionMismatch {
                path: source_path(odd),
                expected,
                found: odd.mask.dim(),
            });
        }

        Ok(ObservationSeries(observations))
    }

    pub fn observations(&self) -> &[Observation] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; a valid series holds at least two observations.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `(rows, cols)` shared by every mask.
    pub fn dim(&self) -> (usize, usize) {
        self.0[0].mask.dim()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.0[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.0[self.0.len() - 1].date
    }

    /// Adjacent pairs in date order.
    pub fn intervals(&self) -> impl Iterator<Item = Interval<'_>> {
        self.0.windows(2).map(|pair| Interval {
            start: &pair[0],
            end: &pair[1],
        })
    }

    pub fn into_observations(self) -> Vec<Observation> {
        self.0
    }
}

/// The gap between two consecutive observations.
#[derive(Debug, Clone, Copy)]
pub struct Interval<'a> {
    pub start: &'a Observation,
    pub end: &'a Observation,
}

impl Interval<'_> {
    /// Length of the gap in whole days, later date minus earlier.
    pub fn days(&self) -> i64 {
        days_between(&self.start.date, &self.end.date)
    }
}

fn source_path(observation: &Observation) -> PathBuf {
    observation
        .source
        .clone()
        .unwrap_or_else(|| PathBuf::from(observation.describe()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::{Inundation, Mask};
    use ndarray::Array2;

    fn observation(y: i32, m: u32, d: u32, dim: (usize, usize)) -> Observation {
        Observation::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            Mask::from_cells(Array2::from_elem(dim, Inundation::Wet)),
        )
    }

    #[test]
    fn test_series_sorts_and_pairs_intervals() {
        let series = ObservationSeries::new(vec![
            observation(2021, 1, 13, (2, 2)),
            observation(2021, 1, 1, (2, 2)),
            observation(2021, 1, 6, (2, 2)),
        ])
        .unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
        assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2021, 1, 13).unwrap());
        let days: Vec<i64> = series.intervals().map(|i| i.days()).collect();
        assert_eq!(days, vec![5, 7]);
    }

    #[test]
    fn test_series_requires_two_observations() {
        let err = ObservationSeries::new(vec![observation(2021, 1, 1, (2, 2))]).unwrap_err();
        assert!(matches!(err, SeriesError::InsufficientData { found: 1 }));

        let err = ObservationSeries::new(Vec::new()).unwrap_err();
        assert!(matches!(err, SeriesError::InsufficientData { found: 0 }));
    }

    #[test]
    fn test_series_rejects_duplicate_dates() {
        let err = ObservationSeries::new(vec![
            observation(2021, 1, 1, (2, 2)),
            observation(2021, 1, 1, (2, 2)),
        ])
        .unwrap_err();
        assert!(matches!(err, SeriesError::DuplicateDate { .. }));
    }

    #[test]
    fn test_series_rejects_dimension_mismatch() {
        let err = ObservationSeries::new(vec![
            observation(2021, 1, 1, (2, 2)),
            observation(2021, 1, 8, (2, 3)),
        ])
        .unwrap_err();
        match err {
            SeriesError::DimensionMismatch {
                expected, found, ..
            } => {
                assert_eq!(expected, (2, 2));
                assert_eq!(found, (2, 3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
