use crate::label_pipeline::common::error::{PipelineError, Result};

/// Pixel rectangle of one chunk, with its grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkCell {
    pub cx: u32,
    pub cy: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Equal-sized chunk grid. Remainder pixels past the last full chunk are
/// excluded, not distributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkGrid {
    pub nx: u32,
    pub ny: u32,
    pub chunk_width: u32,
    pub chunk_height: u32,
}

impl ChunkGrid {
    pub fn new(width: u32, height: u32, nx: u32, ny: u32) -> Result<Self> {
        let invalid = PipelineError::InvalidGrid {
            nx,
            ny,
            width,
            height,
        };
        if nx == 0 || ny == 0 {
            return Err(invalid);
        }
        let (chunk_width, chunk_height) = (width / nx, height / ny);
        if chunk_width == 0 || chunk_height == 0 {
            return Err(invalid);
        }
        Ok(Self {
            nx,
            ny,
            chunk_width,
            chunk_height,
        })
    }

    pub fn len(&self) -> usize {
        (self.nx * self.ny) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cell(&self, cx: u32, cy: u32) -> ChunkCell {
        ChunkCell {
            cx,
            cy,
            x: cx * self.chunk_width,
            y: cy * self.chunk_height,
            width: self.chunk_width,
            height: self.chunk_height,
        }
    }

    /// Cells row by row, left to right.
    pub fn cells(&self) -> impl Iterator<Item = ChunkCell> + '_ {
        (0..self.ny).flat_map(move |cy| (0..self.nx).map(move |cx| self.cell(cx, cy)))
    }
}
