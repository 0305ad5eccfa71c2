//! Georeferencing module
//!
//! Pixel/geographic coordinate mapping for axis-aligned rasters, and the
//! neutral ring-list polygon representation exchanged with vector codecs.

pub mod transform;
pub mod polygon;

#[cfg(test)]
mod tests;

pub use transform::GeoTransform;
pub use polygon::{polygon_from_rings, polygon_to_rings, ring_self_intersects, Ring};
