//! Colour preview of a hydroperiod raster.
//!
//! Valid pixels are shaded along a light-green → deep-blue ramp by their
//! share of the largest value in the raster; no-data pixels are white.

use crate::error::RasterError;
use image::{Rgba, RgbaImage};
use ndarray::Array2;
use palette::{IntoColor, LinSrgb, Mix, Srgb};
use std::path::Path;

const NO_DATA_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Two-stop colour ramp, interpolated in linear RGB.
#[derive(Debug, Clone, Copy)]
pub struct ColorRamp {
    low: LinSrgb,
    high: LinSrgb,
}

impl Default for ColorRamp {
    /// Pale green for short hydroperiods, deep blue for long ones.
    fn default() -> Self {
        ColorRamp::new(Srgb::new(0.65, 0.84, 0.57), Srgb::new(0.17, 0.19, 0.45))
    }
}

impl ColorRamp {
    pub fn new(low: Srgb, high: Srgb) -> Self {
        ColorRamp {
            low: low.into_linear(),
            high: high.into_linear(),
        }
    }

    /// Colour at `t` in `[0, 1]`; out-of-range values are clamped.
    pub fn color_at(&self, t: f64) -> Rgba<u8> {
        let t = t.clamp(0.0, 1.0) as f32;
        let rgb: Srgb = self.low.mix(self.high, t).into_color();
        Rgba([
            (rgb.red * 255.0).round() as u8,
            (rgb.green * 255.0).round() as u8,
            (rgb.blue * 255.0).round() as u8,
            255,
        ])
    }
}

/// Rasterise `values` to an RGBA image. Pixels equal to `no_data` (or NaN)
/// are painted white.
pub fn render(values: &Array2<f64>, no_data: f64, ramp: &ColorRamp) -> RgbaImage {
    let is_valid = |v: f64| !v.is_nan() && v != no_data;
    let max = values
        .iter()
        .copied()
        .filter(|&v| is_valid(v))
        .fold(0.0_f64, f64::max);

    let (rows, cols) = values.dim();
    RgbaImage::from_fn(cols as u32, rows as u32, |x, y| {
        let v = values[[y as usize, x as usize]];
        if !is_valid(v) {
            NO_DATA_COLOR
        } else if max > 0.0 {
            ramp.color_at(v / max)
        } else {
            ramp.color_at(0.0)
        }
    })
}

/// Render `values` and save the result as a PNG at `path`.
pub fn write_preview(path: &Path, values: &Array2<f64>, no_data: f64) -> Result<(), RasterError> {
    render(values, no_data, &ColorRamp::default())
        .save(path)
        .map_err(|source| RasterError::Image {
            path: path.to_path_buf(),
            source,
        })?;
    log::debug!("Wrote preview {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn ramp_endpoints() {
        let ramp = ColorRamp::new(Srgb::new(1.0, 0.0, 0.0), Srgb::new(0.0, 0.0, 1.0));
        assert_eq!(ramp.color_at(0.0), Rgba([255, 0, 0, 255]));
        assert_eq!(ramp.color_at(1.0), Rgba([0, 0, 255, 255]));
        assert_eq!(ramp.color_at(7.0), ramp.color_at(1.0));
    }

    #[test]
    fn no_data_pixels_are_white() {
        let values = array![[-1.0, 0.0], [5.0, 10.0]];
        let ramp = ColorRamp::default();
        let img = render(&values, -1.0, &ramp);
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(*img.get_pixel(0, 0), NO_DATA_COLOR);
        assert_eq!(*img.get_pixel(1, 0), ramp.color_at(0.0));
        assert_eq!(*img.get_pixel(1, 1), ramp.color_at(1.0));
        assert_eq!(*img.get_pixel(0, 1), ramp.color_at(0.5));
    }

    #[test]
    fn write_preview_creates_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hydroperiod_visualization.png");
        write_preview(&path, &array![[1.0, 2.0], [3.0, -1.0]], -1.0).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
