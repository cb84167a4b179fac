use serde::Serialize;

/// Summary of a finished hydroperiod raster over its valid pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HydroperiodStatistics {
    pub valid_pixels: usize,
    pub no_data_pixels: usize,
    /// Days from the first to the last observation.
    pub span_days: i64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

impl HydroperiodStatistics {
    /// Compute statistics from the valid pixel values of a raster holding
    /// `total_pixels` cells.
    pub fn from_values<I>(valid_values: I, total_pixels: usize, span_days: i64) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min: Option<f64> = None;
        let mut max: Option<f64> = None;
        for v in valid_values {
            count += 1;
            sum += v;
            min = Some(min.map_or(v, |m| m.min(v)));
            max = Some(max.map_or(v, |m| m.max(v)));
        }

        HydroperiodStatistics {
            valid_pixels: count,
            no_data_pixels: total_pixels.saturating_sub(count),
            span_days,
            min,
            max,
            mean: (count > 0).then(|| sum / count as f64),
        }
    }

    /// Share of the span a pixel with the mean hydroperiod was inundated.
    pub fn mean_fraction_of_span(&self) -> Option<f64> {
        match (self.mean, self.span_days) {
            (Some(mean), span) if span > 0 => Some(mean / span as f64),
            _ => None,
        }
    }
}
