//! Tile metadata types

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::label_pipeline::common::error::{PipelineError, Result};
use crate::label_pipeline::labels::CategoryCounts;

pub const METADATA_FILE_NAME: &str = "metadata.json";

/// Label pixel counts per tile key, for tiles sharing one size and stride.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileMetadata {
    pub size: [u32; 2],
    pub stride: [u32; 2],
    pub label_pixel_counts: BTreeMap<String, CategoryCounts>,
}

impl TileMetadata {
    pub fn new(size: [u32; 2], stride: [u32; 2]) -> Self {
        Self {
            size,
            stride,
            label_pixel_counts: BTreeMap::new(),
        }
    }

    /// Records a tile. An existing key is never overwritten.
    pub fn insert(&mut self, key: impl Into<String>, counts: CategoryCounts) -> Result<()> {
        let key = key.into();
        if self.label_pixel_counts.contains_key(&key) {
            return Err(PipelineError::DuplicateKey(key));
        }
        self.label_pixel_counts.insert(key, counts);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&CategoryCounts> {
        self.label_pixel_counts.get(key)
    }

    pub fn len(&self) -> usize {
        self.label_pixel_counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.label_pixel_counts.is_empty()
    }

    pub fn same_parameters(&self, other: &TileMetadata) -> bool {
        self.size == other.size && self.stride == other.stride
    }

    pub fn read_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(METADATA_FILE_NAME);
        let file = File::open(&path).map_err(|e| {
            PipelineError::InputReadError(format!("{}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn write_to_dir(&self, dir: &Path) -> Result<()> {
        let path = dir.join(METADATA_FILE_NAME);
        let file = File::create(&path).map_err(|e| {
            PipelineError::OutputWriteError(format!("{}: {}", path.display(), e))
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}
