//! Orthophoto chunking module
//!
//! Splits a georeferenced orthophoto into a grid of chunks and rasterizes the
//! label polygons falling inside each chunk into a color mask.

pub mod types;
mod grid;
mod rasterize;
mod chunker;
mod pipeline;


pub use types::{ChunkingConfig, ChunkingConfigBuilder, LabelPolygons, DEFAULT_CHUNK_GRID};
pub use grid::{ChunkCell, ChunkGrid};
pub use rasterize::fill_rings;
pub use chunker::{Chunk, Chunks, OrthoChunker};
pub use pipeline::{ChunkPipeline, ChunkReport, MASK_DIR, ORTHO_DIR};
