//! Label table types
//!
//! Category `0` is reserved for background. Table entry `i` (0-based) is
//! category `i + 1`.

use std::collections::HashMap;

use crate::label_pipeline::common::error::{PipelineError, Result};

/// Channel tuple in the same order as the decoded raster (RGB for TIFF input).
pub type Color = [u8; 3];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEntry {
    pub name: String,
    pub color: Color,
}

/// Invertible mapping between categories and colors.
#[derive(Debug, Clone)]
pub struct LabelTable {
    entries: Vec<LabelEntry>,
    by_color: HashMap<Color, u8>,
}

impl LabelTable {
    pub fn new<S: Into<String>>(entries: impl IntoIterator<Item = (S, Color)>) -> Result<Self> {
        let entries: Vec<LabelEntry> = entries
            .into_iter()
            .map(|(name, color)| LabelEntry {
                name: name.into(),
                color,
            })
            .collect();

        if entries.len() > u8::MAX as usize {
            return Err(PipelineError::TooManyLabels(entries.len()));
        }

        let mut by_color = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if let Some(previous) = by_color.insert(entry.color, (i + 1) as u8) {
                return Err(PipelineError::DuplicateColor {
                    first: entries[previous as usize - 1].name.clone(),
                    second: entry.name.clone(),
                    color: entry.color,
                });
            }
        }

        Ok(Self { entries, by_color })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn category_for_color(&self, color: &Color) -> Option<u8> {
        self.by_color.get(color).copied()
    }

    pub fn category_for_label(&self, name: &str) -> Option<u8> {
        self.entries
            .iter()
            .position(|entry| entry.name == name)
            .map(|i| (i + 1) as u8)
    }

    pub fn entry(&self, category: u8) -> Option<&LabelEntry> {
        (category as usize)
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
    }

    /// Iterates `(category, entry)` in table order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &LabelEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| ((i + 1) as u8, entry))
    }
}

/// Label table plus the colors that carry no category.
#[derive(Debug, Clone)]
pub struct LabelScheme {
    pub table: LabelTable,
    pub background: Color,
    /// Tiles containing this color anywhere are excluded entirely.
    pub ignore: Option<Color>,
}

impl LabelScheme {
    pub fn new(table: LabelTable, background: Color, ignore: Option<Color>) -> Self {
        Self {
            table,
            background,
            ignore,
        }
    }

    /// DroneDeploy segmentation benchmark colors, RGB order. Ground is background.
    pub fn dronedeploy() -> Result<Self> {
        let table = LabelTable::new([
            ("building", [230, 25, 75]),
            ("clutter", [145, 30, 180]),
            ("vegetation", [60, 180, 75]),
            ("water", [245, 130, 48]),
            ("car", [0, 130, 200]),
        ])?;
        Ok(Self::new(table, [255, 255, 255], Some([255, 0, 255])))
    }

    /// Flemish mid-scale orthophoto colors, RGB order. Ground is background.
    pub fn iv_ortho_mid() -> Result<Self> {
        let table = LabelTable::new([("building", [227, 26, 28]), ("water", [30, 95, 170])])?;
        Ok(Self::new(table, [0, 0, 0], None))
    }
}
