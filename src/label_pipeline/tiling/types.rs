//! Chip tiling configuration types

use crate::label_pipeline::common::error::{PipelineError, Result};
use crate::label_pipeline::raster::TiffCompression;

pub const DEFAULT_CHIP_SIZE: u32 = 300;
pub const DEFAULT_CHIP_STRIDE: u32 = 300;

/// Configuration for chip tiling
#[derive(Debug, Clone)]
pub struct TilingConfig {
    /// Window width and height in pixels
    pub size: (u32, u32),
    /// Horizontal and vertical window step in pixels
    pub stride: (u32, u32),
    /// Prepended to every source name, joined with `-`
    pub prefix: Option<String>,
    /// Compression of written chips
    pub compression: TiffCompression,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            size: (DEFAULT_CHIP_SIZE, DEFAULT_CHIP_SIZE),
            stride: (DEFAULT_CHIP_STRIDE, DEFAULT_CHIP_STRIDE),
            prefix: None,
            compression: TiffCompression::DeflateFast,
        }
    }
}

impl TilingConfig {
    pub fn builder() -> TilingConfigBuilder {
        TilingConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        let (w, h) = self.size;
        let (sx, sy) = self.stride;
        if w == 0 || h == 0 {
            return Err(PipelineError::InvalidTiling(format!("size {}x{}", w, h)));
        }
        if sx == 0 || sy == 0 {
            return Err(PipelineError::InvalidTiling(format!("stride {}x{}", sx, sy)));
        }
        Ok(())
    }

    /// Key prefix for chips cut from the source named `source`.
    pub fn key_prefix(&self, source: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}-{}", prefix, source),
            None => source.to_string(),
        }
    }
}

/// Builder for TilingConfig
#[derive(Default)]
pub struct TilingConfigBuilder {
    size: Option<(u32, u32)>,
    stride: Option<(u32, u32)>,
    prefix: Option<Option<String>>,
    compression: Option<TiffCompression>,
}

impl TilingConfigBuilder {
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = Some((width, height));
        self
    }

    pub fn stride(mut self, x: u32, y: u32) -> Self {
        self.stride = Some((x, y));
        self
    }

    pub fn prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = Some(prefix);
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn build(self) -> TilingConfig {
        let default = TilingConfig::default();
        TilingConfig {
            size: self.size.unwrap_or(default.size),
            stride: self.stride.unwrap_or(default.stride),
            prefix: self.prefix.unwrap_or(default.prefix),
            compression: self.compression.unwrap_or(default.compression),
        }
    }
}
