use geo::{Coord, Intersects, Line, LineString, Polygon};
use tracing::debug;

use crate::label_pipeline::common::error::Result;

/// Ring coordinates as exchanged with vector codecs. Closing point optional.
pub type Ring = Vec<[f64; 2]>;

fn ring_to_line_string(ring: &[[f64; 2]]) -> LineString<f64> {
    LineString::from(ring.iter().map(|&[x, y]| Coord { x, y }).collect::<Vec<_>>())
}

/// Builds a polygon from an outer ring and its holes.
///
/// Returns `None` when the outer ring has fewer than 3 points. Degenerate holes
/// are dropped.
pub fn polygon_from_rings(outer: &[[f64; 2]], inners: &[Ring]) -> Option<Polygon<f64>> {
    if outer.len() < 3 {
        debug!("Dropping polygon with {}-point outer ring", outer.len());
        return None;
    }
    let interiors = inners
        .iter()
        .filter(|ring| ring.len() >= 3)
        .map(|ring| ring_to_line_string(ring))
        .collect();
    Some(Polygon::new(ring_to_line_string(outer), interiors))
}

/// Flattens a polygon to its rings, exterior first, mapping every coordinate.
pub fn polygon_to_rings<T, F>(polygon: &Polygon<f64>, mut map: F) -> Result<Vec<Vec<T>>>
where
    F: FnMut(Coord<f64>) -> Result<T>,
{
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(|ring| ring.coords().map(|&c| map(c)).collect())
        .collect()
}

/// True when two non-adjacent edges of a closed ring touch or cross.
pub fn ring_self_intersects(ring: &LineString<f64>) -> bool {
    let lines: Vec<Line<f64>> = ring.lines().filter(|l| l.start != l.end).collect();
    let n = lines.len();
    if n < 4 {
        return false;
    }
    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            if lines[i].intersects(&lines[j]) {
                return true;
            }
        }
    }
    false
}
