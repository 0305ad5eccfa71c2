//! Tile metadata module
//!
//! Per-tile label presence, persisted once per output directory as
//! `metadata.json`, and merging of several such directories.

pub mod types;
mod aggregate;


pub use types::{TileMetadata, METADATA_FILE_NAME};
pub use aggregate::{aggregate_dirs, has_all_labels, has_any_label, merge};
