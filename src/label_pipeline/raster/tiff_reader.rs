//! TIFF raster reader.
//!
//! Accepts 8-bit gray, RGB and RGBA images. GeoTIFF `ModelPixelScale` and
//! `ModelTiepoint` tags, when both are present, become a [`GeoTransform`].

use std::io::{Cursor, Read, Seek};

use image::{GrayImage, RgbImage};
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;
use tiff::ColorType;
use tracing::debug;

use crate::label_pipeline::common::error::{PipelineError, Result};
use crate::label_pipeline::georef::GeoTransform;
use crate::label_pipeline::raster::reader::RasterReader;
use crate::label_pipeline::raster::types::GeoRaster;

pub struct TiffRasterReader;

fn decode_error(e: tiff::TiffError) -> PipelineError {
    PipelineError::DecodeError(e.to_string())
}

fn geotiff_transform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<Option<GeoTransform>> {
    let scale = decoder.find_tag(Tag::ModelPixelScaleTag).map_err(decode_error)?;
    let tiepoint = decoder.find_tag(Tag::ModelTiepointTag).map_err(decode_error)?;
    match (scale, tiepoint) {
        (Some(scale), Some(tiepoint)) => Ok(Some(GeoTransform::from_geotiff_tags(
            &scale.into_f64_vec().map_err(decode_error)?,
            &tiepoint.into_f64_vec().map_err(decode_error)?,
        )?)),
        _ => Ok(None),
    }
}

fn decode_u8(data: &[u8]) -> Result<(u32, u32, ColorType, Vec<u8>, Option<GeoTransform>)> {
    let mut decoder = Decoder::new(Cursor::new(data)).map_err(decode_error)?;
    let (width, height) = decoder.dimensions().map_err(decode_error)?;
    let color_type = decoder.colortype().map_err(decode_error)?;
    let transform = geotiff_transform(&mut decoder)?;

    let pixels = match decoder.read_image().map_err(decode_error)? {
        DecodingResult::U8(pixels) => pixels,
        _ => {
            return Err(PipelineError::UnsupportedFormat(format!(
                "{:?} samples are not 8-bit",
                color_type
            )));
        }
    };

    debug!(width, height, ?color_type, georeferenced = transform.is_some(), "Decoded TIFF");
    Ok((width, height, color_type, pixels, transform))
}

impl RasterReader for TiffRasterReader {
    fn read_rgb(&self, data: &[u8]) -> Result<GeoRaster> {
        let (width, height, color_type, pixels, transform) = decode_u8(data)?;

        let rgb: Vec<u8> = match color_type {
            ColorType::RGB(8) => pixels,
            ColorType::RGBA(8) => pixels
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect(),
            ColorType::Gray(8) => pixels.iter().flat_map(|&v| [v, v, v]).collect(),
            other => {
                return Err(PipelineError::UnsupportedFormat(format!("{:?}", other)));
            }
        };

        let image = RgbImage::from_raw(width, height, rgb)
            .ok_or(PipelineError::InvalidDimensions(width as usize, height as usize))?;
        Ok(GeoRaster { image, transform })
    }

    fn read_mask(&self, data: &[u8]) -> Result<GrayImage> {
        let (width, height, color_type, pixels, _) = decode_u8(data)?;
        if color_type != ColorType::Gray(8) {
            return Err(PipelineError::UnsupportedFormat(format!(
                "category mask must be Gray(8), found {:?}",
                color_type
            )));
        }
        GrayImage::from_raw(width, height, pixels)
            .ok_or(PipelineError::InvalidDimensions(width as usize, height as usize))
    }

    fn read_transform(&self, data: &[u8]) -> Result<Option<GeoTransform>> {
        let mut decoder = Decoder::new(Cursor::new(data)).map_err(decode_error)?;
        geotiff_transform(&mut decoder)
    }
}
