use image::imageops::crop_imm;
use image::{GrayImage, RgbImage};
use tracing::debug;

use crate::label_pipeline::common::error::{PipelineError, Result};
use crate::label_pipeline::labels::{color_to_category, CategoryCounts, CodecOutcome, LabelScheme};
use crate::label_pipeline::tiling::types::TilingConfig;
use crate::label_pipeline::tiling::windows::{ChipWindow, ChipWindows};

/// Key of the `index`-th kept chip of a source.
pub fn chip_key(prefix: &str, index: usize) -> String {
    format!("{}-{:06}", prefix, index)
}

/// Identifier of a chip that was not kept. It names the window origin, so it
/// never collides with a kept chip's key.
pub fn window_id(prefix: &str, window: &ChipWindow) -> String {
    format!("{}@{},{}", prefix, window.x, window.y)
}

/// One kept chip: image window plus its encoded category mask.
#[derive(Debug, Clone)]
pub struct Chip {
    pub key: String,
    pub index: usize,
    pub window: ChipWindow,
    pub image: RgbImage,
    pub mask: GrayImage,
    pub counts: CategoryCounts,
}

/// Cuts aligned image/mask pairs into chips.
#[derive(Debug, Clone, Copy)]
pub struct ChipTiler<'a> {
    config: &'a TilingConfig,
    scheme: &'a LabelScheme,
}

impl<'a> ChipTiler<'a> {
    pub fn new(config: &'a TilingConfig, scheme: &'a LabelScheme) -> Self {
        Self { config, scheme }
    }

    pub fn windows(&self, image: &RgbImage, mask: &RgbImage) -> Result<ChipWindows> {
        self.config.validate()?;
        if image.dimensions() != mask.dimensions() {
            return Err(PipelineError::DimensionMismatch {
                image: image.dimensions(),
                mask: mask.dimensions(),
            });
        }
        let (width, height) = image.dimensions();
        Ok(ChipWindows::new(width, height, self.config.size, self.config.stride))
    }

    /// Raw `(image, mask)` windows, without mask encoding.
    pub fn tile_pairs(
        &self,
        image: &'a RgbImage,
        mask: &'a RgbImage,
    ) -> Result<impl Iterator<Item = (RgbImage, RgbImage)> + 'a> {
        let windows = self.windows(image, mask)?;
        Ok(windows.map(move |w| {
            (
                crop_imm(image, w.x, w.y, w.width, w.height).to_image(),
                crop_imm(mask, w.x, w.y, w.width, w.height).to_image(),
            )
        }))
    }

    /// Lazily encoded chips keyed `{prefix}-{index:06}`.
    ///
    /// Indices count kept chips only, so skipped windows leave no gap.
    pub fn chips(&self, prefix: &str, image: &'a RgbImage, mask: &'a RgbImage) -> Result<Chips<'a>> {
        Ok(Chips {
            windows: self.windows(image, mask)?,
            image,
            mask,
            scheme: self.scheme,
            prefix: prefix.to_string(),
            kept: 0,
            skipped: 0,
            failed: 0,
        })
    }
}

/// Pull-based chip sequence; each chip is cut and encoded on demand.
pub struct Chips<'a> {
    windows: ChipWindows,
    image: &'a RgbImage,
    mask: &'a RgbImage,
    scheme: &'a LabelScheme,
    prefix: String,
    kept: usize,
    skipped: usize,
    failed: usize,
}

impl Chips<'_> {
    pub fn kept(&self) -> usize {
        self.kept
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn failed(&self) -> usize {
        self.failed
    }
}

impl Iterator for Chips<'_> {
    type Item = Result<Chip>;

    fn next(&mut self) -> Option<Result<Chip>> {
        loop {
            let window = self.windows.next()?;
            let color_mask =
                crop_imm(self.mask, window.x, window.y, window.width, window.height).to_image();

            match color_to_category(&color_mask, self.scheme) {
                Ok(CodecOutcome::Skipped) => {
                    self.skipped += 1;
                    debug!(x = window.x, y = window.y, "Skipped chip");
                }
                Ok(CodecOutcome::Encoded { counts, mask }) => {
                    let image =
                        crop_imm(self.image, window.x, window.y, window.width, window.height)
                            .to_image();
                    let index = self.kept;
                    self.kept += 1;
                    return Some(Ok(Chip {
                        key: chip_key(&self.prefix, index),
                        index,
                        window,
                        image,
                        mask,
                        counts,
                    }));
                }
                Err(e) => {
                    self.failed += 1;
                    return Some(Err(e.for_tile(window_id(&self.prefix, &window))));
                }
            }
        }
    }
}
