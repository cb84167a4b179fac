//! Interval-by-interval accumulation of inundated days.

use crate::error::AccumulateError;
use crate::interpolation::contribution;
use crate::statistics::HydroperiodStatistics;
use chrono::NaiveDate;
use hyd_series::{Inundation, Observation, ObservationSeries};
use hyd_utils::dates::days_between;
use log::{debug, info};
use ndarray::{Array2, Zip};
use serde::Serialize;

/// Pixel counts for one interval, by boundary states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntervalSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: i64,
    /// Wet at both boundaries, credited `days`.
    pub wet_both: usize,
    /// Wet at exactly one boundary, credited `days / 2`.
    pub wet_one: usize,
    /// Dry at both boundaries, credited `days / 2`.
    pub dry_both: usize,
    /// No-data at either boundary, not credited.
    pub no_data: usize,
}

impl IntervalSummary {
    fn new(start: NaiveDate, end: NaiveDate, days: i64) -> Self {
        IntervalSummary {
            start,
            end,
            days,
            wet_both: 0,
            wet_one: 0,
            dry_both: 0,
            no_data: 0,
        }
    }

    fn record(&mut self, start: Inundation, end: Inundation) {
        match (start, end) {
            (Inundation::NoData, _) | (_, Inundation::NoData) => self.no_data += 1,
            (Inundation::Wet, Inundation::Wet) => self.wet_both += 1,
            (Inundation::Dry, Inundation::Dry) => self.dry_both += 1,
            _ => self.wet_one += 1,
        }
    }
}

/// Running per-pixel totals.
///
/// A pixel that has not yet received a valid contribution is tracked as
/// uncovered and ends up as no-data in the finished raster.
#[derive(Debug, Clone)]
pub struct Accumulator {
    totals: Array2<f64>,
    covered: Array2<bool>,
    first_date: Option<NaiveDate>,
    last_date: Option<NaiveDate>,
    intervals: Vec<IntervalSummary>,
}

impl Accumulator {
    /// Zero-initialised totals for masks of `(rows, cols)`.
    pub fn new(dim: (usize, usize)) -> Self {
        Accumulator {
            totals: Array2::zeros(dim),
            covered: Array2::from_elem(dim, false),
            first_date: None,
            last_date: None,
            intervals: Vec::new(),
        }
    }

    pub fn dim(&self) -> (usize, usize) {
        self.totals.dim()
    }

    pub fn interval_count(&self) -> usize {
        self.intervals.len()
    }

    /// Add the contribution of the interval from `start` to `end`.
    ///
    /// Intervals may be added in any order; each one's length comes from
    /// its own pair of dates, which must be strictly increasing.
    pub fn add_interval(
        &mut self,
        start: &Observation,
        end: &Observation,
    ) -> Result<&IntervalSummary, AccumulateError> {
        for observation in [start, end] {
            if observation.mask.dim() != self.dim() {
                return Err(AccumulateError::DimensionMismatch {
                    what: observation.describe(),
                    expected: self.dim(),
                    found: observation.mask.dim(),
                });
            }
        }
        let days = days_between(&start.date, &end.date);
        if days < 1 {
            return Err(AccumulateError::NotChronological {
                start: start.date,
                end: end.date,
            });
        }

        let mut summary = IntervalSummary::new(start.date, end.date, days);
        Zip::from(&mut self.totals)
            .and(&mut self.covered)
            .and(start.mask.cells())
            .and(end.mask.cells())
            .for_each(|total, covered, &a, &b| {
                if let Some(credit) = contribution(a, b, days) {
                    *total += credit;
                    *covered = true;
                }
                summary.record(a, b);
            });

        debug!(
            "Interval {} -> {} ({} days): {} wet/wet, {} mixed, {} dry/dry, {} no-data",
            summary.start,
            summary.end,
            days,
            summary.wet_both,
            summary.wet_one,
            summary.dry_both,
            summary.no_data
        );

        self.first_date = Some(self.first_date.map_or(start.date, |d| d.min(start.date)));
        self.last_date = Some(self.last_date.map_or(end.date, |d| d.max(end.date)));
        self.intervals.push(summary);
        Ok(&self.intervals[self.intervals.len() - 1])
    }

    /// Freeze the totals, writing `no_data` into pixels no interval covered.
    ///
    /// `no_data` must be negative or NaN; any other value could also be a
    /// real total.
    pub fn finish(self, no_data: f64) -> Result<Hydroperiod, AccumulateError> {
        if !is_unambiguous_no_data(no_data) {
            return Err(AccumulateError::AmbiguousNoData { value: no_data });
        }
        let (first_date, last_date) = match (self.first_date, self.last_date) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(AccumulateError::InsufficientData { found: 0 }),
        };

        let mut values = self.totals;
        Zip::from(&mut values)
            .and(&self.covered)
            .for_each(|value, &covered| {
                if !covered {
                    *value = no_data;
                }
            });

        Ok(Hydroperiod {
            values,
            covered: self.covered,
            no_data,
            first_date,
            last_date,
            intervals: self.intervals,
        })
    }
}

/// True when `value` can never be a hydroperiod total.
pub fn is_unambiguous_no_data(value: f64) -> bool {
    value.is_nan() || value < 0.0
}

/// Accumulate every interval of an eagerly loaded series.
pub fn accumulate_series(
    series: &ObservationSeries,
    no_data: f64,
) -> Result<Hydroperiod, AccumulateError> {
    let mut accumulator = Accumulator::new(series.dim());
    for interval in series.intervals() {
        accumulator.add_interval(interval.start, interval.end)?;
    }
    let hydroperiod = accumulator.finish(no_data)?;
    log_completion(&hydroperiod);
    Ok(hydroperiod)
}

/// Accumulate observations as they arrive, holding at most two masks.
///
/// The stream must already be in ascending date order. The first error,
/// from the stream or from an interval, aborts the run.
pub fn accumulate_stream<I, E>(observations: I, no_data: f64) -> Result<Hydroperiod, AccumulateError>
where
    I: IntoIterator<Item = Result<Observation, E>>,
    AccumulateError: From<E>,
{
    let mut observations = observations.into_iter();
    let mut previous = match observations.next() {
        Some(first) => first?,
        None => return Err(AccumulateError::InsufficientData { found: 0 }),
    };

    let mut accumulator = Accumulator::new(previous.mask.dim());
    for next in observations {
        let next = next?;
        accumulator.add_interval(&previous, &next)?;
        // `previous` has now served as both start and end; release it
        previous = next;
    }
    if accumulator.interval_count() == 0 {
        return Err(AccumulateError::InsufficientData { found: 1 });
    }

    let hydroperiod = accumulator.finish(no_data)?;
    log_completion(&hydroperiod);
    Ok(hydroperiod)
}

fn log_completion(hydroperiod: &Hydroperiod) {
    info!(
        "Accumulated {} interval(s) spanning {} -> {} ({} days)",
        hydroperiod.intervals.len(),
        hydroperiod.first_date,
        hydroperiod.last_date,
        hydroperiod.span_days()
    );
}

/// Cumulative estimated inundated days per pixel.
#[derive(Debug, Clone)]
pub struct Hydroperiod {
    values: Array2<f64>,
    covered: Array2<bool>,
    no_data: f64,
    first_date: NaiveDate,
    last_date: NaiveDate,
    intervals: Vec<IntervalSummary>,
}

impl Hydroperiod {
    /// Totals with uncovered pixels set to [`Hydroperiod::no_data`].
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn into_values(self) -> Array2<f64> {
        self.values
    }

    /// Total for one pixel, `None` when no interval covered it.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        match self.covered.get((row, col)) {
            Some(true) => Some(self.values[[row, col]]),
            _ => None,
        }
    }

    pub fn no_data(&self) -> f64 {
        self.no_data
    }

    pub fn dim(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.first_date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.last_date
    }

    /// Days from the first to the last observation.
    pub fn span_days(&self) -> i64 {
        days_between(&self.first_date, &self.last_date)
    }

    pub fn intervals(&self) -> &[IntervalSummary] {
        &self.intervals
    }

    pub fn statistics(&self) -> HydroperiodStatistics {
        HydroperiodStatistics::from_values(
            self.values
                .iter()
                .zip(self.covered.iter())
                .filter(|&(_, &covered)| covered)
                .map(|(&v, _)| v),
            self.values.len(),
            self.span_days(),
        )
    }
}
