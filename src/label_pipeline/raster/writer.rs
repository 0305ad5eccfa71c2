use std::io::Write;

use image::{GrayImage, RgbImage};

use crate::label_pipeline::common::error::Result;
use crate::label_pipeline::georef::GeoTransform;
use crate::label_pipeline::raster::types::TiffCompression;

pub trait RasterWriter {
    fn write_rgb(
        &self,
        image: &RgbImage,
        transform: Option<&GeoTransform>,
        output: &mut dyn Write,
        compression: TiffCompression,
    ) -> Result<()>;

    fn write_mask(
        &self,
        mask: &GrayImage,
        transform: Option<&GeoTransform>,
        output: &mut dyn Write,
        compression: TiffCompression,
    ) -> Result<()>;
}
