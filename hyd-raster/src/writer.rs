//! GeoTIFF encoding for real-valued outputs.

use crate::error::RasterError;
use crate::metadata::{
    format_gdal_no_data, GeoMetadata, TAG_GDAL_NODATA, TAG_GEO_ASCII_PARAMS,
    TAG_GEO_DOUBLE_PARAMS, TAG_GEO_KEY_DIRECTORY, TAG_MODEL_PIXEL_SCALE, TAG_MODEL_TIEPOINT,
    TAG_MODEL_TRANSFORMATION,
};
use ndarray::Array2;
use std::fs::{self, File};
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};
use tiff::encoder::{colortype, DirectoryEncoder, TiffEncoder, TiffKind};
use tiff::tags::Tag;
use tiff::TiffResult;

/// Write `data` as a single-band 64-bit float GeoTIFF.
///
/// The georeferencing tags of `metadata` are copied verbatim and
/// GDAL_NODATA is set to `no_data`. The image is encoded into a sibling
/// `.partial` file first and renamed over `path` only once complete, so a
/// failure never leaves a truncated raster at `path`.
pub fn write_geotiff(
    path: &Path,
    data: &Array2<f64>,
    metadata: &GeoMetadata,
    no_data: f64,
) -> Result<(), RasterError> {
    let (rows, cols) = data.dim();
    let partial = partial_path(path);

    let result = encode(&partial, data, metadata, no_data)
        .and_then(|()| fs::rename(&partial, path).map_err(|e| RasterError::io(path, e)));
    if result.is_err() {
        // Best effort cleanup
        let _ = fs::remove_file(&partial);
    }
    result?;

    log::debug!("Wrote {} ({} x {})", path.display(), rows, cols);
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}

fn encode(
    path: &Path,
    data: &Array2<f64>,
    metadata: &GeoMetadata,
    no_data: f64,
) -> Result<(), RasterError> {
    let (rows, cols) = data.dim();
    let (width, height) = match (u32::try_from(cols), u32::try_from(rows)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(RasterError::UnsupportedLayout {
                path: path.to_path_buf(),
                detail: format!("{rows} x {cols} exceeds the TIFF size limit"),
            })
        }
    };

    let file = File::create(path).map_err(|e| RasterError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    {
        let mut encoder = TiffEncoder::new(&mut writer).map_err(|e| RasterError::tiff(path, e))?;
        let mut image = encoder
            .new_image::<colortype::Gray64Float>(width, height)
            .map_err(|e| RasterError::tiff(path, e))?;
        write_geo_tags(image.encoder(), metadata, no_data)
            .map_err(|e| RasterError::tiff(path, e))?;

        // Logical iteration order is row-major regardless of memory layout
        let pixels: Vec<f64> = data.iter().copied().collect();
        image
            .write_data(&pixels)
            .map_err(|e| RasterError::tiff(path, e))?;
    }
    writer.flush().map_err(|e| RasterError::io(path, e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| RasterError::io(path, e))
}

fn write_geo_tags<W: Write + Seek, K: TiffKind>(
    dir: &mut DirectoryEncoder<'_, W, K>,
    metadata: &GeoMetadata,
    no_data: f64,
) -> TiffResult<()> {
    let doubles = [
        (TAG_MODEL_PIXEL_SCALE, &metadata.pixel_scale),
        (TAG_MODEL_TIEPOINT, &metadata.tiepoints),
        (TAG_MODEL_TRANSFORMATION, &metadata.transformation),
        (TAG_GEO_DOUBLE_PARAMS, &metadata.geo_double_params),
    ];
    for (code, values) in doubles {
        if let Some(values) = values.as_deref().filter(|v| !v.is_empty()) {
            dir.write_tag(Tag::from_u16_exhaustive(code), values)?;
        }
    }
    if let Some(keys) = metadata.geo_key_directory.as_deref().filter(|k| !k.is_empty()) {
        dir.write_tag(Tag::from_u16_exhaustive(TAG_GEO_KEY_DIRECTORY), keys)?;
    }
    if let Some(ascii) = metadata.geo_ascii_params.as_deref() {
        dir.write_tag(Tag::from_u16_exhaustive(TAG_GEO_ASCII_PARAMS), ascii)?;
    }
    dir.write_tag(
        Tag::from_u16_exhaustive(TAG_GDAL_NODATA),
        format_gdal_no_data(no_data).as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_path_is_a_sibling() {
        let partial = partial_path(Path::new("/data/output/hydroperiod_map.tif"));
        assert_eq!(
            partial,
            PathBuf::from("/data/output/hydroperiod_map.tif.partial")
        );
    }

    #[test]
    fn write_into_missing_directory_fails_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.tif");
        let err = write_geotiff(
            &path,
            &Array2::zeros((2, 2)),
            &GeoMetadata::default(),
            -1.0,
        )
        .unwrap_err();
        assert!(matches!(err, RasterError::Io { .. }));
        assert!(!path.exists());
    }
}
