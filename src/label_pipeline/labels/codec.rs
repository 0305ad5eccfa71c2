use std::collections::{BTreeMap, HashMap};

use image::{GrayImage, Luma, Rgb, RgbImage};
use tracing::debug;

use crate::label_pipeline::common::error::{PipelineError, Result};
use crate::label_pipeline::labels::table::{Color, LabelScheme};

/// Pixel count per label name. Background is never counted.
pub type CategoryCounts = BTreeMap<String, u64>;

#[derive(Debug, Clone)]
pub enum CodecOutcome {
    Encoded {
        counts: CategoryCounts,
        mask: GrayImage,
    },
    /// The tile contains the ignore color and must not be used.
    Skipped,
}

/// Converts a color label image into a single-channel category mask.
///
/// Colors absent from both the table and the background fail with
/// [`PipelineError::UnknownColor`]; nothing is defaulted.
pub fn color_to_category(image: &RgbImage, scheme: &LabelScheme) -> Result<CodecOutcome> {
    let mut color_pixels: HashMap<Color, u64> = HashMap::new();
    for Rgb(color) in image.pixels() {
        *color_pixels.entry(*color).or_insert(0) += 1;
    }

    if let Some(ignore) = scheme.ignore {
        if color_pixels.contains_key(&ignore) {
            debug!(
                pixels = color_pixels[&ignore],
                "Tile contains ignore color, skipping"
            );
            return Ok(CodecOutcome::Skipped);
        }
    }

    let mut lookup: HashMap<Color, u8> = HashMap::with_capacity(color_pixels.len());
    let mut counts = CategoryCounts::new();
    for (color, pixels) in &color_pixels {
        if *color == scheme.background {
            lookup.insert(*color, 0);
            continue;
        }
        let category = scheme
            .table
            .category_for_color(color)
            .ok_or(PipelineError::UnknownColor { color: *color })?;
        lookup.insert(*color, category);
        if let Some(entry) = scheme.table.entry(category) {
            counts.insert(entry.name.clone(), *pixels);
        }
    }

    let mask = GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([lookup[&image.get_pixel(x, y).0]])
    });

    Ok(CodecOutcome::Encoded { counts, mask })
}

/// Inverse of [`color_to_category`]: category 0 becomes the background color.
pub fn category_to_color(mask: &GrayImage, scheme: &LabelScheme) -> Result<RgbImage> {
    let mut palette: Vec<Color> = Vec::with_capacity(scheme.table.len() + 1);
    palette.push(scheme.background);
    palette.extend(scheme.table.iter().map(|(_, entry)| entry.color));

    let mut image = RgbImage::new(mask.width(), mask.height());
    for (x, y, Luma([category])) in mask.enumerate_pixels() {
        let color = palette
            .get(*category as usize)
            .ok_or(PipelineError::UnknownCategory(*category))?;
        image.put_pixel(x, y, Rgb(*color));
    }
    Ok(image)
}
