//! Raster codec module
//!
//! Decoding and encoding of image tiles, masks and their georeferencing. The
//! pipelines only see the [`RasterReader`] and [`RasterWriter`] traits.

mod reader;
mod writer;
mod tiff_reader;
mod standard_tiff_writer;
pub mod types;

pub use reader::RasterReader;
pub use writer::RasterWriter;
pub use tiff_reader::TiffRasterReader;
pub use standard_tiff_writer::StandardTiffWriter;
pub use types::{GeoRaster, TiffCompression};
