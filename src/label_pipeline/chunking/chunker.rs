use geo::{BooleanOps, BoundingRect, Coord, Intersects, Polygon, Rect};
use image::imageops::crop_imm;
use image::{Rgb, RgbImage};
use tracing::debug;

use crate::label_pipeline::chunking::grid::{ChunkCell, ChunkGrid};
use crate::label_pipeline::chunking::rasterize::fill_rings;
use crate::label_pipeline::chunking::types::{ChunkingConfig, LabelPolygons};
use crate::label_pipeline::common::error::{PipelineError, Result};
use crate::label_pipeline::georef::{polygon_to_rings, GeoTransform};
use crate::label_pipeline::labels::{Color, LabelScheme};

/// One orthophoto chunk with its rasterized color mask.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub name: String,
    pub cell: ChunkCell,
    /// Geographic extent of the chunk
    pub bounds: Rect<f64>,
    /// Transform of the chunk's own pixel grid
    pub transform: GeoTransform,
    pub image: RgbImage,
    pub mask: RgbImage,
}

/// Polygons of one label, with precomputed bounding boxes.
struct LabelLayer {
    color: Color,
    polygons: Vec<(Rect<f64>, Polygon<f64>)>,
}

pub struct OrthoChunker<'a> {
    config: &'a ChunkingConfig,
    scheme: &'a LabelScheme,
}

impl<'a> OrthoChunker<'a> {
    pub fn new(config: &'a ChunkingConfig, scheme: &'a LabelScheme) -> Self {
        Self { config, scheme }
    }

    /// Lazily yields the chunks of `ortho`, row by row.
    ///
    /// Every label in `labels` must be in the scheme's table. Labels are
    /// rasterized in table order, so later categories overwrite earlier ones
    /// where polygons overlap.
    pub fn chunks(
        &self,
        ortho: &'a RgbImage,
        transform: &GeoTransform,
        labels: &LabelPolygons,
    ) -> Result<Chunks<'a>> {
        let (nx, ny) = self.config.grid;
        let grid = ChunkGrid::new(ortho.width(), ortho.height(), nx, ny)?;

        if let Some(unknown) = labels
            .keys()
            .find(|label| self.scheme.table.category_for_label(label).is_none())
        {
            return Err(PipelineError::UnknownLabel(unknown.clone()));
        }

        let layers = self
            .scheme
            .table
            .iter()
            .filter_map(|(_, entry)| {
                let polygons = labels.get(&entry.name)?;
                Some(LabelLayer {
                    color: entry.color,
                    polygons: polygons
                        .iter()
                        .filter_map(|p| Some((p.bounding_rect()?, p.clone())))
                        .collect(),
                })
            })
            .collect();

        Ok(Chunks {
            ortho,
            transform: *transform,
            prefix: self.config.prefix.clone(),
            background: self.scheme.background,
            layers,
            grid,
            next: 0,
        })
    }
}

fn contains_rect(outer: &Rect<f64>, inner: &Rect<f64>) -> bool {
    outer.min().x <= inner.min().x
        && outer.min().y <= inner.min().y
        && inner.max().x <= outer.max().x
        && inner.max().y <= outer.max().y
}

/// Iterator over the chunks of one orthophoto.
pub struct Chunks<'a> {
    ortho: &'a RgbImage,
    transform: GeoTransform,
    prefix: String,
    background: Color,
    layers: Vec<LabelLayer>,
    grid: ChunkGrid,
    next: usize,
}

impl Chunks<'_> {
    pub fn grid(&self) -> &ChunkGrid {
        &self.grid
    }

    fn name(&self, cell: &ChunkCell) -> String {
        format!("{}-{:03}-{:03}", self.prefix, cell.cx, cell.cy)
    }

    fn bounds(&self, cell: &ChunkCell) -> Rect<f64> {
        let min = self.transform.pixel_to_geo(cell.x as f64, cell.y as f64);
        let max = self
            .transform
            .pixel_to_geo((cell.x + cell.width) as f64, (cell.y + cell.height) as f64);
        Rect::new(min, max)
    }

    fn build(&self, cell: ChunkCell) -> Result<Chunk> {
        let bounds = self.bounds(&cell);
        let clip = bounds.to_polygon();
        let transform = self.transform.translated(cell.x as f64, cell.y as f64);

        let mut mask = RgbImage::from_pixel(cell.width, cell.height, Rgb(self.background));
        for layer in &self.layers {
            let mut filled = 0usize;
            for (rect, polygon) in layer.polygons.iter().filter(|(r, _)| r.intersects(&bounds)) {
                let parts = if contains_rect(&bounds, rect) {
                    vec![polygon.clone()]
                } else {
                    polygon.intersection(&clip).0
                };
                for part in &parts {
                    let rings = polygon_to_rings(part, |c: Coord<f64>| {
                        transform.geo_to_pixel_f64(c.x, c.y)
                    })?;
                    fill_rings(&mut mask, &rings, Rgb(layer.color));
                    filled += 1;
                }
            }
            if filled > 0 {
                debug!(color = ?layer.color, polygons = filled, "Rasterized label");
            }
        }

        let image = crop_imm(self.ortho, cell.x, cell.y, cell.width, cell.height).to_image();

        Ok(Chunk {
            name: self.name(&cell),
            cell,
            bounds,
            transform,
            image,
            mask,
        })
    }
}

impl Iterator for Chunks<'_> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.grid.len() {
            return None;
        }
        let index = self.next as u32;
        self.next += 1;
        let cell = self.grid.cell(index % self.grid.nx, index / self.grid.nx);
        let name = self.name(&cell);
        Some(self.build(cell).map_err(|e| e.for_tile(name)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Chunks<'_> {}
