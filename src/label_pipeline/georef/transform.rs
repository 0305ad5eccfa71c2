//! Affine pixel <-> geographic transform.
//!
//! Coefficients follow the GDAL convention `(a, b, c, d, e, f)`:
//!
//! ```text
//! x = a + b * px + c * py
//! y = d + e * px + f * py
//! ```
//!
//! Only the axis-aligned case (`c == 0`, `e == 0`) is accepted.

use geo::Coord;

use crate::label_pipeline::common::error::{PipelineError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl GeoTransform {
    /// Builds a transform, rejecting any row or column rotation.
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<Self> {
        if c != 0.0 || e != 0.0 {
            return Err(PipelineError::InvalidTransform { c, e });
        }
        Ok(Self { a, b, c, d, e, f })
    }

    /// Builds a transform from a GDAL-ordered coefficient array.
    pub fn from_gdal(coefficients: [f64; 6]) -> Result<Self> {
        let [a, b, c, d, e, f] = coefficients;
        Self::new(a, b, c, d, e, f)
    }

    /// Builds a north-up transform from GeoTIFF `ModelPixelScale` and
    /// `ModelTiepoint` tag values.
    pub fn from_geotiff_tags(pixel_scale: &[f64], tiepoint: &[f64]) -> Result<Self> {
        if pixel_scale.len() < 2 || tiepoint.len() < 6 {
            return Err(PipelineError::DecodeError(format!(
                "GeoTIFF tags too short: pixel scale has {} values, tiepoint has {}",
                pixel_scale.len(),
                tiepoint.len()
            )));
        }
        let (scale_x, scale_y) = (pixel_scale[0], pixel_scale[1]);
        let (i, j) = (tiepoint[0], tiepoint[1]);
        let (x, y) = (tiepoint[3], tiepoint[4]);
        Self::new(x - i * scale_x, scale_x, 0.0, y + j * scale_y, 0.0, -scale_y)
    }

    /// Returns `(pixel_scale, tiepoint)` tag values anchoring pixel `(0, 0)`.
    pub fn geotiff_tags(&self) -> ([f64; 3], [f64; 6]) {
        (
            [self.b, -self.f, 0.0],
            [0.0, 0.0, 0.0, self.a, self.d, 0.0],
        )
    }

    pub fn coefficients(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// Transform of a sub-window whose top-left corner sits at pixel `(px, py)`.
    pub fn translated(&self, px: f64, py: f64) -> Self {
        let origin = self.pixel_to_geo(px, py);
        Self {
            a: origin.x,
            d: origin.y,
            ..*self
        }
    }

    pub fn pixel_to_geo(&self, px: f64, py: f64) -> Coord<f64> {
        Coord {
            x: self.a + self.b * px + self.c * py,
            y: self.d + self.e * px + self.f * py,
        }
    }

    /// Inverse mapping, truncating toward zero to integer pixel coordinates.
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> Result<(i64, i64)> {
        let (px, py) = self.geo_to_pixel_f64(x, y)?;
        Ok((px as i64, py as i64))
    }

    /// Inverse mapping to fractional pixel coordinates.
    pub fn geo_to_pixel_f64(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let determinant = self.b * self.f - self.c * self.e;
        if determinant == 0.0 {
            return Err(PipelineError::SingularTransform);
        }
        let inv = 1.0 / determinant;
        let px = inv * (self.f * (x - self.a) - self.c * (y - self.d));
        let py = inv * (-self.e * (x - self.a) + self.b * (y - self.d));
        Ok((px, py))
    }
}
