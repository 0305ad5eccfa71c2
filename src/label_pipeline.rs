//! Label pipeline module
//!
//! Turns georeferenced orthophotos and vector labels into training chips, and
//! predicted category masks back into georeferenced polygons.

pub mod common;
pub mod georef;
pub mod labels;
pub mod raster;
pub mod contours;
pub mod chunking;
pub mod tiling;
pub mod metadata;
pub mod vector;

pub use common::{
    PipelineError,
    Result,
};

pub use georef::{
    GeoTransform,
    polygon_from_rings,
};

pub use labels::{
    LabelScheme,
    LabelTable,
    CodecOutcome,
};

pub use raster::{
    TiffCompression,
    RasterReader,
    RasterWriter,
    TiffRasterReader,
    StandardTiffWriter,
};

pub use contours::{
    CategoryPolygons,
    ContourPolygonExtractor,
};

pub use chunking::{
    ChunkingConfig,
    ChunkPipeline,
    LabelPolygons,
    OrthoChunker,
};

pub use tiling::{
    TilingConfig,
    ChipPipeline,
    ChipTiler,
};

pub use metadata::{
    TileMetadata,
    aggregate_dirs,
};

pub use vector::{
    MaskVectorizer,
};
