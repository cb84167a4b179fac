//! Observation series for hydroperiod estimation.
//!
//! An [`Observation`] is a date plus a validated binary [`Mask`]. The
//! [`SeriesLoader`] turns a directory of dated GeoTIFFs into a
//! [`SeriesManifest`] (dates, paths, shared dimensions) that can be loaded
//! eagerly into an [`ObservationSeries`] or streamed one mask at a time.

pub mod error;
pub mod loader;
pub mod observation;
pub mod series;

pub use error::SeriesError;
pub use loader::{DatePolicy, ManifestEntry, SeriesLoader, SeriesManifest};
pub use observation::{Inundation, Mask, Observation};
pub use series::{Interval, ObservationSeries};
