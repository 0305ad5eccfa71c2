use image::GrayImage;

use crate::label_pipeline::common::error::Result;
use crate::label_pipeline::georef::GeoTransform;
use crate::label_pipeline::raster::types::GeoRaster;

pub trait RasterReader {
    fn read_rgb(&self, data: &[u8]) -> Result<GeoRaster>;
    fn read_mask(&self, data: &[u8]) -> Result<GrayImage>;

    /// Georeferencing only. Readers that can skip pixel decoding should.
    fn read_transform(&self, data: &[u8]) -> Result<Option<GeoTransform>> {
        Ok(self.read_rgb(data)?.transform)
    }
}
