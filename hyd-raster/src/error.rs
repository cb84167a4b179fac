use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing rasters.
///
/// Every variant carries the offending path so the message alone tells
/// the user which file to look at.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TIFF error in {}: {source}", .path.display())]
    Tiff {
        path: PathBuf,
        #[source]
        source: tiff::TiffError,
    },

    #[error("unsupported raster layout in {}: {detail}", .path.display())]
    UnsupportedLayout { path: PathBuf, detail: String },

    #[error("cannot render preview {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl RasterError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        RasterError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn tiff(path: &std::path::Path, source: tiff::TiffError) -> Self {
        RasterError::Tiff {
            path: path.to_path_buf(),
            source,
        }
    }
}
