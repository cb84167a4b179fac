//! GeoTIFF decoding.
//!
//! Only the first image of a file is read. Samples of every supported
//! integer and float type are widened to `f64`.

use crate::error::RasterError;
use crate::metadata::{
    parse_gdal_no_data, GeoMetadata, TAG_GDAL_NODATA, TAG_GEO_ASCII_PARAMS,
    TAG_GEO_DOUBLE_PARAMS, TAG_GEO_KEY_DIRECTORY, TAG_MODEL_PIXEL_SCALE, TAG_MODEL_TIEPOINT,
    TAG_MODEL_TRANSFORMATION,
};
use crate::{RasterBand, RasterHeader};
use ndarray::Array2;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tiff::decoder::ifd::Value;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;
use tiff::{ColorType, TiffResult};

type TiffDecoder = Decoder<BufReader<File>>;

/// Read dimensions and georeferencing without decoding any pixels.
pub fn read_header(path: &Path) -> Result<RasterHeader, RasterError> {
    let mut decoder = open(path)?;
    header(path, &mut decoder)
}

/// Read the full first band of a GeoTIFF.
pub fn read_geotiff(path: &Path) -> Result<RasterBand, RasterError> {
    let mut decoder = open(path)?;
    let RasterHeader {
        rows,
        cols,
        metadata,
    } = header(path, &mut decoder)?;

    let image = decoder
        .read_image()
        .map_err(|e| RasterError::tiff(path, e))?;
    let pixels = widen(path, image)?;

    if pixels.len() != rows * cols {
        return Err(RasterError::UnsupportedLayout {
            path: path.to_path_buf(),
            detail: format!(
                "decoded {} samples, expected {} ({rows} x {cols})",
                pixels.len(),
                rows * cols
            ),
        });
    }

    let data = Array2::from_shape_vec((rows, cols), pixels).map_err(|e| {
        RasterError::UnsupportedLayout {
            path: path.to_path_buf(),
            detail: e.to_string(),
        }
    })?;
    log::debug!("Read {} ({} x {})", path.display(), rows, cols);

    Ok(RasterBand { data, metadata })
}

fn open(path: &Path) -> Result<TiffDecoder, RasterError> {
    let file = File::open(path).map_err(|e| RasterError::io(path, e))?;
    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| RasterError::tiff(path, e))?;
    // Large scenes exceed the default decoding buffer limit
    Ok(decoder.with_limits(Limits::unlimited()))
}

fn header<R: Read + Seek>(
    path: &Path,
    decoder: &mut Decoder<R>,
) -> Result<RasterHeader, RasterError> {
    match decoder.colortype().map_err(|e| RasterError::tiff(path, e))? {
        ColorType::Gray(_) => {}
        other => {
            return Err(RasterError::UnsupportedLayout {
                path: path.to_path_buf(),
                detail: format!("expected a single-band raster, found {other:?}"),
            })
        }
    }

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| RasterError::tiff(path, e))?;
    let metadata = read_metadata(path, decoder)?;

    Ok(RasterHeader {
        rows: height as usize,
        cols: width as usize,
        metadata,
    })
}

fn read_metadata<R: Read + Seek>(
    path: &Path,
    decoder: &mut Decoder<R>,
) -> Result<GeoMetadata, RasterError> {
    let no_data = match tag(path, decoder, TAG_GDAL_NODATA, Value::into_string)? {
        Some(text) => {
            let parsed = parse_gdal_no_data(&text);
            if parsed.is_none() {
                log::warn!(
                    "Ignoring unparseable GDAL_NODATA '{}' in {}",
                    text,
                    path.display()
                );
            }
            parsed
        }
        None => None,
    };

    Ok(GeoMetadata {
        pixel_scale: tag(path, decoder, TAG_MODEL_PIXEL_SCALE, Value::into_f64_vec)?,
        tiepoints: tag(path, decoder, TAG_MODEL_TIEPOINT, Value::into_f64_vec)?,
        transformation: tag(path, decoder, TAG_MODEL_TRANSFORMATION, Value::into_f64_vec)?,
        geo_key_directory: tag(path, decoder, TAG_GEO_KEY_DIRECTORY, Value::into_u16_vec)?,
        geo_double_params: tag(path, decoder, TAG_GEO_DOUBLE_PARAMS, Value::into_f64_vec)?,
        geo_ascii_params: tag(path, decoder, TAG_GEO_ASCII_PARAMS, Value::into_string)?,
        no_data,
    })
}

/// Look up an optional tag by numeric code and convert its value.
fn tag<R, T, F>(
    path: &Path,
    decoder: &mut Decoder<R>,
    code: u16,
    convert: F,
) -> Result<Option<T>, RasterError>
where
    R: Read + Seek,
    F: FnOnce(Value) -> TiffResult<T>,
{
    decoder
        .find_tag(Tag::from_u16_exhaustive(code))
        .and_then(|value| value.map(convert).transpose())
        .map_err(|e| RasterError::tiff(path, e))
}

fn widen(path: &Path, image: DecodingResult) -> Result<Vec<f64>, RasterError> {
    let pixels = match image {
        DecodingResult::U8(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I8(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::F32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::F64(v) => v,
        _ => {
            return Err(RasterError::UnsupportedLayout {
                path: path.to_path_buf(),
                detail: "64-bit integer samples are not supported".to_string(),
            })
        }
    };
    Ok(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiff::encoder::{colortype, TiffEncoder};

    fn write_tiff<C: colortype::ColorType>(path: &Path, width: u32, height: u32, data: &[C::Inner])
    where
        [C::Inner]: tiff::encoder::TiffValue,
    {
        let file = File::create(path).unwrap();
        let mut encoder = TiffEncoder::new(file).unwrap();
        encoder.write_image::<C>(width, height, data).unwrap();
    }

    #[test]
    fn read_header_rejects_multi_band_raster() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2021_01_01_rgb.tif");
        write_tiff::<colortype::RGB8>(&path, 2, 1, &[0, 0, 0, 255, 255, 255]);

        let err = read_header(&path).unwrap_err();
        assert!(matches!(err, RasterError::UnsupportedLayout { .. }));
        assert!(err.to_string().contains("2021_01_01_rgb.tif"));
        assert!(read_geotiff(&path).is_err());
    }

    #[test]
    fn read_geotiff_rejects_64_bit_integer_samples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2021_01_01_u64.tif");
        write_tiff::<colortype::Gray64>(&path, 2, 1, &[0, 1]);

        let err = read_geotiff(&path).unwrap_err();
        assert!(matches!(err, RasterError::UnsupportedLayout { .. }));
        assert!(err.to_string().contains("2021_01_01_u64.tif"));
    }

    #[test]
    fn integer_samples_are_widened() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2021_01_01.tif");
        write_tiff::<colortype::Gray8>(&path, 3, 1, &[0, 1, 255]);

        let band = read_geotiff(&path).unwrap();
        assert_eq!(band.dim(), (1, 3));
        assert_eq!(band.data.row(0).to_vec(), vec![0.0, 1.0, 255.0]);
        assert_eq!(band.metadata, GeoMetadata::default());
    }
}
