//! Mask vectorization and GeoJSON exchange
//!
//! Turns predicted category masks back into georeferenced polygons and moves
//! label polygons in and out of GeoJSON feature collections.

mod vectorizer;
mod geojson_io;

#[cfg(test)]
mod tests;

pub use vectorizer::MaskVectorizer;
pub use geojson_io::{
    read_label_polygons, to_feature_collection, write_feature_collection, LABEL_PROPERTY,
};
