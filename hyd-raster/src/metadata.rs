//! GeoTIFF georeferencing carried from input masks to the output raster.
//!
//! The tags are kept verbatim rather than interpreted into a CRS model:
//! an output written with the metadata of an input is georeferenced
//! exactly like that input.

use serde::Serialize;

/// ModelPixelScaleTag
pub const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
/// ModelTiepointTag
pub const TAG_MODEL_TIEPOINT: u16 = 33922;
/// ModelTransformationTag
pub const TAG_MODEL_TRANSFORMATION: u16 = 34264;
/// GeoKeyDirectoryTag
pub const TAG_GEO_KEY_DIRECTORY: u16 = 34735;
/// GeoDoubleParamsTag
pub const TAG_GEO_DOUBLE_PARAMS: u16 = 34736;
/// GeoAsciiParamsTag
pub const TAG_GEO_ASCII_PARAMS: u16 = 34737;
/// GDAL_NODATA, stored as ASCII text
pub const TAG_GDAL_NODATA: u16 = 42113;

/// Georeferencing and no-data tags of a single-band GeoTIFF.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeoMetadata {
    /// (ScaleX, ScaleY, ScaleZ)
    pub pixel_scale: Option<Vec<f64>>,
    /// Sequences of (I, J, K, X, Y, Z)
    pub tiepoints: Option<Vec<f64>>,
    /// Row-major 4×4 affine matrix
    pub transformation: Option<Vec<f64>>,
    pub geo_key_directory: Option<Vec<u16>>,
    pub geo_double_params: Option<Vec<f64>>,
    pub geo_ascii_params: Option<String>,
    /// Parsed GDAL_NODATA value
    pub no_data: Option<f64>,
}

impl GeoMetadata {
    /// True when the raster carries enough tags to be placed on a map.
    pub fn is_georeferenced(&self) -> bool {
        self.transformation.is_some() || (self.pixel_scale.is_some() && self.tiepoints.is_some())
    }

    /// GDAL-style affine transform
    /// `[x_origin, x_res, x_rot, y_origin, y_rot, y_res]`.
    pub fn geo_transform(&self) -> Option<[f64; 6]> {
        if let Some(m) = self.transformation.as_deref().filter(|m| m.len() >= 8) {
            return Some([m[3], m[0], m[1], m[7], m[4], m[5]]);
        }
        let scale = self.pixel_scale.as_deref().filter(|s| s.len() >= 2)?;
        let tie = self.tiepoints.as_deref().filter(|t| t.len() >= 6)?;
        Some([
            tie[3] - tie[0] * scale[0],
            scale[0],
            0.0,
            tie[4] + tie[1] * scale[1],
            0.0,
            -scale[1],
        ])
    }

    /// Pixel size `(x_res, y_res)`, both positive.
    pub fn resolution(&self) -> Option<(f64, f64)> {
        self.geo_transform().map(|gt| (gt[1].abs(), gt[5].abs()))
    }

    /// Same metadata with the no-data tag replaced.
    pub fn with_no_data(&self, no_data: f64) -> Self {
        GeoMetadata {
            no_data: Some(no_data),
            ..self.clone()
        }
    }
}

/// Parse GDAL_NODATA text such as `"-9999"`, `"nan"` or `"-1\0"`.
pub fn parse_gdal_no_data(text: &str) -> Option<f64> {
    let trimmed = text.trim_matches(char::from(0)).trim();
    if trimmed.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    trimmed.parse::<f64>().ok()
}

/// Text written to GDAL_NODATA for a sentinel.
pub fn format_gdal_no_data(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geo_transform_from_scale_and_tiepoint() {
        let metadata = GeoMetadata {
            pixel_scale: Some(vec![10.0, 10.0, 0.0]),
            tiepoints: Some(vec![0.0, 0.0, 0.0, 300_000.0, 5_000_000.0, 0.0]),
            ..GeoMetadata::default()
        };
        assert!(metadata.is_georeferenced());
        assert_eq!(
            metadata.geo_transform(),
            Some([300_000.0, 10.0, 0.0, 5_000_000.0, 0.0, -10.0])
        );
        assert_eq!(metadata.resolution(), Some((10.0, 10.0)));
    }

    #[test]
    fn geo_transform_from_transformation_matrix() {
        let metadata = GeoMetadata {
            transformation: Some(vec![
                20.0, 0.0, 0.0, 100.0, //
                0.0, -20.0, 0.0, 200.0, //
                0.0, 0.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ]),
            ..GeoMetadata::default()
        };
        assert_eq!(
            metadata.geo_transform(),
            Some([100.0, 20.0, 0.0, 200.0, 0.0, -20.0])
        );
    }

    #[test]
    fn ungeoreferenced_metadata() {
        let metadata = GeoMetadata::default();
        assert!(!metadata.is_georeferenced());
        assert_eq!(metadata.geo_transform(), None);
    }

    #[test]
    fn gdal_no_data_text() {
        assert_eq!(parse_gdal_no_data("-9999"), Some(-9999.0));
        assert_eq!(parse_gdal_no_data(" 255\0"), Some(255.0));
        assert!(parse_gdal_no_data("nan").unwrap().is_nan());
        assert_eq!(parse_gdal_no_data("none"), None);
        assert_eq!(format_gdal_no_data(-1.0), "-1");
        assert_eq!(format_gdal_no_data(-3.5), "-3.5");
    }
}
