//! Raster I/O layer for inundation masks and hydroperiod outputs.
//!
//! Reads and writes single-band GeoTIFFs with the pure-Rust `tiff` crate.
//! Pixel data is always exposed as an `ndarray::Array2<f64>` in row-major
//! (rows × cols) order, whatever the on-disk sample type; georeferencing
//! tags travel alongside in [`GeoMetadata`] so an output can be written
//! with exactly the georeferencing of its inputs.
//!
//! # Usage
//!
//! ```rust,no_run
//! use hyd_raster::{read_geotiff, write_geotiff};
//! use std::path::Path;
//!
//! let band = read_geotiff(Path::new("masks/2021_03_15.tif")).unwrap();
//! let doubled = band.data.mapv(|v| v * 2.0);
//! write_geotiff(Path::new("out.tif"), &doubled, &band.metadata, -1.0).unwrap();
//! ```
//!
//! # Supported layouts
//!
//! - One sample per pixel (grayscale), stripped or tiled
//! - u8/u16/u32, i8/i16/i32, f32/f64 samples
//!
//! Multi-band or palette images are rejected with
//! [`RasterError::UnsupportedLayout`].

pub mod error;
pub mod metadata;
pub mod preview;
mod reader;
mod writer;

pub use error::RasterError;
pub use metadata::GeoMetadata;
pub use reader::{read_geotiff, read_header};
pub use writer::write_geotiff;

use ndarray::Array2;

/// Shape and georeferencing of a raster, read without decoding pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterHeader {
    pub rows: usize,
    pub cols: usize,
    pub metadata: GeoMetadata,
}

impl RasterHeader {
    /// `(rows, cols)`, the same order as `Array2::dim()`.
    pub fn dim(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

/// A decoded single-band raster.
#[derive(Debug, Clone)]
pub struct RasterBand {
    pub data: Array2<f64>,
    pub metadata: GeoMetadata,
}

impl RasterBand {
    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }
}
