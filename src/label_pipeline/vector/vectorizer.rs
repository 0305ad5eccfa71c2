use geo::Coord;
use image::GrayImage;
use tracing::{info, instrument};

use crate::label_pipeline::common::error::Result;
use crate::label_pipeline::contours::{CategoryPolygons, ContourPolygonExtractor};
use crate::label_pipeline::georef::GeoTransform;
use crate::label_pipeline::labels::LabelTable;

/// Converts predicted category masks into per-category polygons.
#[derive(Debug, Clone, Default)]
pub struct MaskVectorizer {
    extractor: ContourPolygonExtractor,
}

impl MaskVectorizer {
    pub fn new(extractor: ContourPolygonExtractor) -> Self {
        Self { extractor }
    }

    /// Vectorizes a mask predicted for the chip whose top-left corner sits at
    /// pixel `offset` of the georeferenced source.
    ///
    /// Without a transform the polygons stay in source pixel coordinates.
    #[instrument(skip(self, mask, table, transform), fields(width = mask.width(), height = mask.height()))]
    pub fn vectorize(
        &self,
        mask: &GrayImage,
        table: &LabelTable,
        transform: Option<&GeoTransform>,
        offset: (u32, u32),
    ) -> Result<Vec<CategoryPolygons>> {
        let (ox, oy) = (offset.0 as f64, offset.1 as f64);
        let mapper = |c: Coord<f64>| match transform {
            Some(transform) => transform.pixel_to_geo(c.x + ox, c.y + oy),
            None => Coord {
                x: c.x + ox,
                y: c.y + oy,
            },
        };

        let categories = self.extractor.extract_categories(mask, table, mapper)?;
        info!(
            categories = categories.len(),
            polygons = categories.iter().map(|c| c.polygons.len()).sum::<usize>(),
            "Vectorized mask"
        );
        Ok(categories)
    }

    pub fn extractor(&self) -> &ContourPolygonExtractor {
        &self.extractor
    }
}
