//! Directory discovery and mask loading.
//!
//! Loading happens in two passes. [`SeriesLoader::discover`] lists the
//! directory, parses a date from each file name, sorts by date and reads
//! only the raster headers, so duplicate dates, dimension mismatches and
//! too-short series are rejected before any pixel is decoded. The
//! resulting [`SeriesManifest`] then loads masks either all at once or as
//! a lazy stream.

use crate::error::SeriesError;
use crate::observation::{Mask, Observation, DRY_VALUE, WET_VALUE};
use crate::series::ObservationSeries;
use chrono::NaiveDate;
use hyd_raster::{read_geotiff, read_header, GeoMetadata, RasterHeader};
use hyd_utils::dates::{date_from_file_name, DEFAULT_DATE_FORMAT};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default no-data sentinel for inputs and output.
pub const DEFAULT_NO_DATA: f64 = -1.0;

/// Recognised raster extensions, compared case-insensitively.
pub const RASTER_EXTENSIONS: [&str; 2] = ["tif", "tiff"];

/// What to do with a raster whose file name carries no parseable date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePolicy {
    /// Skip the file with a warning.
    #[default]
    Lenient,
    /// Abort discovery.
    Strict,
}

/// Finds and loads the dated masks of one input directory.
#[derive(Debug, Clone)]
pub struct SeriesLoader {
    input_directory: PathBuf,
    date_format: String,
    date_policy: DatePolicy,
    no_data: f64,
}

impl SeriesLoader {
    pub fn new(input_directory: impl Into<PathBuf>) -> Self {
        SeriesLoader {
            input_directory: input_directory.into(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            date_policy: DatePolicy::default(),
            no_data: DEFAULT_NO_DATA,
        }
    }

    /// chrono format applied to the file name before its first `.`.
    pub fn date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    pub fn date_policy(mut self, date_policy: DatePolicy) -> Self {
        self.date_policy = date_policy;
        self
    }

    /// Sentinel treated as no-data in every mask, in addition to the
    /// file's own GDAL_NODATA tag.
    pub fn no_data(mut self, no_data: f64) -> Self {
        self.no_data = no_data;
        self
    }

    pub fn input_directory(&self) -> &Path {
        &self.input_directory
    }

    /// Discover, date and validate the rasters without decoding pixels.
    pub fn discover(&self) -> Result<SeriesManifest, SeriesError> {
        if self.no_data == DRY_VALUE || self.no_data == WET_VALUE {
            return Err(SeriesError::NoDataIsMaskClass {
                value: self.no_data,
            });
        }

        let candidates = self.list_rasters()?;
        if candidates.is_empty() {
            return Err(SeriesError::NoRasterFiles {
                path: self.input_directory.clone(),
            });
        }
        info!(
            "Found {} raster file(s) in {}",
            candidates.len(),
            self.input_directory.display()
        );

        let mut entries = Vec::with_capacity(candidates.len());
        let mut skipped = Vec::new();
        for path in candidates {
            match date_from_file_name(&path, &self.date_format) {
                Ok(date) => entries.push(ManifestEntry { date, path }),
                Err(source) => match self.date_policy {
                    DatePolicy::Strict => {
                        return Err(SeriesError::DateExtraction { path, source });
                    }
                    DatePolicy::Lenient => {
                        warn!("Ignored file {} due to invalid date: {}", path.display(), source);
                        skipped.push(path);
                    }
                },
            }
        }

        entries.sort_by(|a, b| a.date.cmp(&b.date));
        for pair in entries.windows(2) {
            if pair[0].date == pair[1].date {
                return Err(SeriesError::DuplicateDate {
                    date: pair[0].date,
                    first: pair[0].path.clone(),
                    second: pair[1].path.clone(),
                });
            }
        }
        if entries.len() < 2 {
            return Err(SeriesError::InsufficientData {
                found: entries.len(),
            });
        }

        let first = read_header(&entries[0].path)?;
        let dim = first.dim();
        warn_on_class_no_data(&entries[0], &first);
        for entry in entries.iter().skip(1) {
            let header = read_header(&entry.path)?;
            if header.dim() != dim {
                return Err(SeriesError::DimensionMismatch {
                    path: entry.path.clone(),
                    expected: dim,
                    found: header.dim(),
                });
            }
            warn_on_class_no_data(entry, &header);
        }

        Ok(SeriesManifest {
            entries,
            dim,
            metadata: first.metadata,
            no_data: self.no_data,
            skipped,
        })
    }

    /// Discover and eagerly load every mask.
    pub fn load(&self) -> Result<ObservationSeries, SeriesError> {
        self.discover()?.load_all()
    }

    /// Regular files with a raster extension, sorted by path.
    fn list_rasters(&self) -> Result<Vec<PathBuf>, SeriesError> {
        let io_err = |source| SeriesError::Io {
            path: self.input_directory.clone(),
            source,
        };
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.input_directory).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.is_file() && is_raster_file(&path) {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

/// A GDAL_NODATA tag of 0 or 1 is ignored in favour of the mask class.
fn warn_on_class_no_data(entry: &ManifestEntry, header: &RasterHeader) {
    if let Some(nd) = header.metadata.no_data {
        if nd == DRY_VALUE || nd == WET_VALUE {
            warn!(
                "{} declares no-data {} which collides with a mask class; treating {} as a class value",
                entry.path.display(),
                nd,
                nd
            );
        }
    }
    let (rows, cols) = header.dim();
    debug!("{} -> {} ({} x {})", entry.path.display(), entry.date, rows, cols);
}

/// True for `.tif` / `.tiff` in any letter case.
pub fn is_raster_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            RASTER_EXTENSIONS
                .iter()
                .any(|known| e.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// One dated raster of a manifest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestEntry {
    pub date: NaiveDate,
    pub path: PathBuf,
}

/// Date-sorted, dimension-checked rasters ready to be loaded.
#[derive(Debug, Clone)]
pub struct SeriesManifest {
    entries: Vec<ManifestEntry>,
    dim: (usize, usize),
    metadata: GeoMetadata,
    no_data: f64,
    skipped: Vec<PathBuf>,
}

impl SeriesManifest {
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(rows, cols)` shared by every raster.
    pub fn dim(&self) -> (usize, usize) {
        self.dim
    }

    /// Georeferencing of the earliest raster.
    pub fn metadata(&self) -> &GeoMetadata {
        &self.metadata
    }

    pub fn no_data(&self) -> f64 {
        self.no_data
    }

    /// Files dropped under the lenient date policy.
    pub fn skipped(&self) -> &[PathBuf] {
        &self.skipped
    }

    pub fn first_date(&self) -> NaiveDate {
        self.entries[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.entries[self.entries.len() - 1].date
    }

    /// Decode and validate a single entry.
    pub fn load_entry(&self, entry: &ManifestEntry) -> Result<Observation, SeriesError> {
        let band = read_geotiff(&entry.path)?;
        if band.dim() != self.dim {
            return Err(SeriesError::DimensionMismatch {
                path: entry.path.clone(),
                expected: self.dim,
                found: band.dim(),
            });
        }

        let mut sentinels = vec![self.no_data];
        sentinels.extend(band.metadata.no_data);
        let mask = Mask::from_raster(&entry.path, &band.data, &sentinels)?;

        Ok(Observation {
            date: entry.date,
            mask,
            source: Some(entry.path.clone()),
            metadata: band.metadata,
        })
    }

    /// Lazily load observations in date order, one file at a time.
    pub fn stream(&self) -> impl Iterator<Item = Result<Observation, SeriesError>> + '_ {
        self.entries.iter().map(move |entry| self.load_entry(entry))
    }

    /// Load every observation into a validated series.
    pub fn load_all(&self) -> Result<ObservationSeries, SeriesError> {
        let observations = self.stream().collect::<Result<Vec<_>, _>>()?;
        ObservationSeries::new(observations)
    }
}
