//! Raster codec types

use image::RgbImage;

use crate::label_pipeline::georef::GeoTransform;

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression
    Lzw,
    /// Deflate compression - fast level
    DeflateFast,
    /// Deflate compression - balanced
    DeflateBalanced,
    /// Deflate compression - best compression (slower)
    DeflateBest,
}

/// Decoded RGB raster with its georeferencing, when the source carried any.
#[derive(Debug, Clone)]
pub struct GeoRaster {
    pub image: RgbImage,
    pub transform: Option<GeoTransform>,
}
