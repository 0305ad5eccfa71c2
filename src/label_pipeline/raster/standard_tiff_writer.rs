use std::io::{Cursor, Write};

use image::{GrayImage, RgbImage};
use tiff::encoder::colortype::{self, ColorType};
use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder};
use tiff::tags::Tag;
use tracing::debug;

use crate::label_pipeline::common::error::{PipelineError, Result};
use crate::label_pipeline::georef::GeoTransform;
use crate::label_pipeline::raster::types::TiffCompression;
use crate::label_pipeline::raster::writer::RasterWriter;

pub struct StandardTiffWriter;

fn encode_error(e: tiff::TiffError) -> PipelineError {
    PipelineError::EncodeError(e.to_string())
}

fn encode<C: ColorType<Inner = u8>>(
    width: u32,
    height: u32,
    data: &[u8],
    transform: Option<&GeoTransform>,
    output: &mut dyn Write,
    compression: TiffCompression,
) -> Result<()> {
    debug!(width, height, ?compression, "Encoding TIFF image");

    let compression = match compression {
        TiffCompression::None => Compression::Uncompressed,
        TiffCompression::Lzw => Compression::Lzw,
        TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
        TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
        TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
    };

    let mut buffer = Vec::new();
    {
        let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
            .map_err(encode_error)?
            .with_compression(compression);
        let mut image = encoder.new_image::<C>(width, height).map_err(encode_error)?;

        if let Some(transform) = transform {
            let (scale, tiepoint) = transform.geotiff_tags();
            image
                .encoder()
                .write_tag(Tag::ModelPixelScaleTag, &scale[..])
                .map_err(encode_error)?;
            image
                .encoder()
                .write_tag(Tag::ModelTiepointTag, &tiepoint[..])
                .map_err(encode_error)?;
        }

        image.write_data(data).map_err(encode_error)?;
    }

    output.write_all(&buffer)?;
    Ok(())
}

impl RasterWriter for StandardTiffWriter {
    fn write_rgb(
        &self,
        image: &RgbImage,
        transform: Option<&GeoTransform>,
        output: &mut dyn Write,
        compression: TiffCompression,
    ) -> Result<()> {
        encode::<colortype::RGB8>(
            image.width(),
            image.height(),
            image.as_raw(),
            transform,
            output,
            compression,
        )
    }

    fn write_mask(
        &self,
        mask: &GrayImage,
        transform: Option<&GeoTransform>,
        output: &mut dyn Write,
        compression: TiffCompression,
    ) -> Result<()> {
        encode::<colortype::Gray8>(
            mask.width(),
            mask.height(),
            mask.as_raw(),
            transform,
            output,
            compression,
        )
    }
}
