use geo::{Area, Coord, LineString, Polygon, Simplify};
use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType, Contour};
use tracing::{debug, warn};

use crate::label_pipeline::common::error::{PipelineError, Result};
use crate::label_pipeline::georef::ring_self_intersects;
use crate::label_pipeline::labels::LabelTable;

/// Douglas-Peucker tolerance, in output coordinate units.
pub const DEFAULT_SIMPLIFY_TOLERANCE: f64 = 1.0;

/// Polygons extracted for one category of a categorical mask.
#[derive(Debug, Clone)]
pub struct CategoryPolygons {
    pub category: u8,
    pub label: String,
    pub polygons: Vec<Polygon<f64>>,
}

/// Outer ring and its holes, indexed by outer contour position.
pub(super) struct RingRecord {
    outer: Vec<Coord<f64>>,
    holes: Vec<Vec<Coord<f64>>>,
}

#[derive(Debug, Clone)]
pub struct ContourPolygonExtractor {
    tolerance: f64,
}

impl Default for ContourPolygonExtractor {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_SIMPLIFY_TOLERANCE,
        }
    }
}

impl ContourPolygonExtractor {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Extracts polygons for every nonzero region of `mask`.
    ///
    /// `mapper` receives unpadded pixel coordinates and returns coordinates in
    /// the caller's space. Simplification runs after mapping and does not
    /// preserve topology; self-intersections it creates are logged, not repaired.
    pub fn extract<F>(&self, mask: &GrayImage, mapper: F) -> Result<Vec<Polygon<f64>>>
    where
        F: Fn(Coord<f64>) -> Coord<f64>,
    {
        let padded = pad(mask, |value| value);
        let contours = find_contours::<i32>(&padded);
        let records = assemble_rings(&contours, &mapper)?;
        Ok(self.finish(records))
    }

    /// Extracts polygons for the pixels equal to `category`.
    pub fn extract_category<F>(
        &self,
        mask: &GrayImage,
        category: u8,
        mapper: F,
    ) -> Result<Vec<Polygon<f64>>>
    where
        F: Fn(Coord<f64>) -> Coord<f64>,
    {
        let padded = pad(mask, |value| if value == category { u8::MAX } else { 0 });
        let contours = find_contours::<i32>(&padded);
        let records = assemble_rings(&contours, &mapper)?;
        Ok(self.finish(records))
    }

    /// Extracts polygons for each table category present in `mask`, in table order.
    pub fn extract_categories<F>(
        &self,
        mask: &GrayImage,
        table: &LabelTable,
        mapper: F,
    ) -> Result<Vec<CategoryPolygons>>
    where
        F: Fn(Coord<f64>) -> Coord<f64>,
    {
        let mut present = [false; 256];
        for Luma([value]) in mask.pixels() {
            present[*value as usize] = true;
        }

        let mut result = Vec::new();
        for (category, entry) in table.iter() {
            if !present[category as usize] {
                continue;
            }
            let polygons = self.extract_category(mask, category, &mapper)?;
            debug!(label = %entry.name, polygons = polygons.len(), "Extracted category");
            result.push(CategoryPolygons {
                category,
                label: entry.name.clone(),
                polygons,
            });
        }
        Ok(result)
    }

    fn finish(&self, records: Vec<RingRecord>) -> Vec<Polygon<f64>> {
        let mut polygons = Vec::with_capacity(records.len());
        let mut flagged = 0usize;

        for record in records {
            let polygon = Polygon::new(
                LineString::from(record.outer),
                record.holes.into_iter().map(LineString::from).collect(),
            );
            let simplified = polygon.simplify(&self.tolerance);
            let Some(polygon) = drop_collapsed_rings(simplified) else {
                continue;
            };

            if std::iter::once(polygon.exterior())
                .chain(polygon.interiors())
                .any(ring_self_intersects)
            {
                flagged += 1;
            }
            polygons.push(polygon);
        }

        if flagged > 0 {
            warn!(
                flagged,
                total = polygons.len(),
                "Simplification produced self-intersecting polygons"
            );
        }
        polygons
    }
}

/// Copies `mask` into a buffer with one pixel of background on every side.
fn pad(mask: &GrayImage, binarize: impl Fn(u8) -> u8) -> GrayImage {
    let mut padded = GrayImage::new(mask.width() + 2, mask.height() + 2);
    for (x, y, Luma([value])) in mask.enumerate_pixels() {
        padded.put_pixel(x + 1, y + 1, Luma([binarize(*value)]));
    }
    padded
}

/// Groups traced borders into outer rings with their holes.
///
/// Every outer border starts a record, including islands nested inside a hole.
/// A hole must reference an outer border that produced a record.
pub(super) fn assemble_rings<F>(contours: &[Contour<i32>], mapper: &F) -> Result<Vec<RingRecord>>
where
    F: Fn(Coord<f64>) -> Coord<f64>,
{
    let map_ring = |contour: &Contour<i32>| -> Vec<Coord<f64>> {
        contour
            .points
            .iter()
            .map(|p| {
                mapper(Coord {
                    x: (p.x - 1) as f64,
                    y: (p.y - 1) as f64,
                })
            })
            .collect()
    };

    let mut record_of: Vec<Option<usize>> = vec![None; contours.len()];
    let mut records = Vec::new();
    for (i, contour) in contours.iter().enumerate() {
        if !matches!(contour.border_type, BorderType::Outer) {
            continue;
        }
        if contour.points.len() < 3 {
            debug!(contour = i, points = contour.points.len(), "Dropping degenerate ring");
            continue;
        }
        record_of[i] = Some(records.len());
        records.push(RingRecord {
            outer: map_ring(contour),
            holes: Vec::new(),
        });
    }

    for (i, contour) in contours.iter().enumerate() {
        if !matches!(contour.border_type, BorderType::Hole) {
            continue;
        }
        if contour.points.len() < 3 {
            debug!(contour = i, points = contour.points.len(), "Dropping degenerate ring");
            continue;
        }
        let record = contour
            .parent
            .and_then(|parent| record_of.get(parent).copied().flatten())
            .ok_or(PipelineError::MalformedHierarchy {
                contour: i,
                parent: contour.parent,
            })?;
        records[record].holes.push(map_ring(contour));
    }

    Ok(records)
}

/// Removes rings that simplification collapsed. `None` when the exterior collapsed.
fn drop_collapsed_rings(polygon: Polygon<f64>) -> Option<Polygon<f64>> {
    let collapsed = |ring: &LineString<f64>| {
        ring.0.len() < 4 || Polygon::new(ring.clone(), vec![]).unsigned_area() == 0.0
    };

    if collapsed(polygon.exterior()) {
        return None;
    }
    let (exterior, interiors) = polygon.into_inner();
    let interiors = interiors.into_iter().filter(|ring| !collapsed(ring)).collect();
    Some(Polygon::new(exterior, interiors))
}
