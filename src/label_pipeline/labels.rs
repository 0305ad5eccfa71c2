//! Label color tables and the color <-> category mask codec

pub mod table;
pub mod codec;

#[cfg(test)]
mod tests;

pub use table::{Color, LabelScheme, LabelTable};
pub use codec::{category_to_color, color_to_category, CategoryCounts, CodecOutcome};
