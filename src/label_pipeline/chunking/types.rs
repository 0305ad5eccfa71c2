//! Orthophoto chunking configuration types

use std::collections::HashMap;

use geo::Polygon;

use crate::label_pipeline::raster::TiffCompression;

/// Chunks along x and y.
pub const DEFAULT_CHUNK_GRID: (u32, u32) = (12, 8);

/// Geographic label polygons keyed by label name.
pub type LabelPolygons = HashMap<String, Vec<Polygon<f64>>>;

/// Configuration for orthophoto chunking
#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    /// Number of chunks along x and y
    pub grid: (u32, u32),
    /// Chunk names are `{prefix}-{cx:03}-{cy:03}`
    pub prefix: String,
    /// Compression of written chunks
    pub compression: TiffCompression,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            grid: DEFAULT_CHUNK_GRID,
            prefix: "chunk".to_string(),
            compression: TiffCompression::DeflateFast,
        }
    }
}

impl ChunkingConfig {
    pub fn builder() -> ChunkingConfigBuilder {
        ChunkingConfigBuilder::default()
    }
}

/// Builder for ChunkingConfig
#[derive(Default)]
pub struct ChunkingConfigBuilder {
    grid: Option<(u32, u32)>,
    prefix: Option<String>,
    compression: Option<TiffCompression>,
}

impl ChunkingConfigBuilder {
    pub fn grid(mut self, nx: u32, ny: u32) -> Self {
        self.grid = Some((nx, ny));
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn build(self) -> ChunkingConfig {
        let default = ChunkingConfig::default();
        ChunkingConfig {
            grid: self.grid.unwrap_or(default.grid),
            prefix: self.prefix.unwrap_or(default.prefix),
            compression: self.compression.unwrap_or(default.compression),
        }
    }
}
