//! Mask to polygon extraction
//!
//! Traces region borders with their nesting hierarchy and rebuilds polygons
//! with holes from them.

mod extractor;


pub use extractor::{CategoryPolygons, ContourPolygonExtractor, DEFAULT_SIMPLIFY_TOLERANCE};
