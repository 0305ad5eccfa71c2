//! Chip tiling module
//!
//! Slides a fixed-size window over aligned image/mask pairs and encodes each
//! mask window into a category mask.

pub mod types;
mod windows;
mod tiler;
mod pipeline;


pub use types::{TilingConfig, TilingConfigBuilder, DEFAULT_CHIP_SIZE, DEFAULT_CHIP_STRIDE};
pub use windows::{ChipWindow, ChipWindows};
pub use tiler::{chip_key, window_id, Chip, ChipTiler, Chips};
pub use pipeline::{ChipPipeline, ChipReport, IMAGES_DIR, LABELS_DIR};
