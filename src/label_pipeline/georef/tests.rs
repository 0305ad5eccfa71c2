use geo::{Coord, LineString};

use crate::label_pipeline::common::error::PipelineError;
use crate::label_pipeline::georef::{
    polygon_from_rings, polygon_to_rings, ring_self_intersects, GeoTransform,
};

fn north_up() -> GeoTransform {
    GeoTransform::new(150_000.0, 0.25, 0.0, 200_000.0, 0.0, -0.25).unwrap()
}

#[test]
fn test_rotated_transform_rejected() {
    let result = GeoTransform::new(0.0, 1.0, 0.5, 0.0, 0.0, -1.0);
    assert!(matches!(result, Err(PipelineError::InvalidTransform { .. })));

    let result = GeoTransform::from_gdal([0.0, 1.0, 0.0, 0.0, 0.1, -1.0]);
    assert!(matches!(result, Err(PipelineError::InvalidTransform { .. })));
}

#[test]
fn test_singular_transform() {
    let transform = GeoTransform::new(0.0, 0.0, 0.0, 0.0, 0.0, -1.0).unwrap();
    assert!(matches!(
        transform.geo_to_pixel(1.0, 1.0),
        Err(PipelineError::SingularTransform)
    ));
}

#[test]
fn test_pixel_to_geo() {
    let geo = north_up().pixel_to_geo(4.0, 8.0);
    assert_eq!(geo, Coord { x: 150_001.0, y: 199_998.0 });
}

#[test]
fn test_geo_to_pixel_recovers_pixel() {
    let transform = GeoTransform::new(104_000.3, 0.4, 0.0, 190_000.7, 0.0, -0.4).unwrap();
    for py in (0..2000).step_by(37) {
        for px in (0..3000).step_by(53) {
            let geo = transform.pixel_to_geo(px as f64, py as f64);
            let (rx, ry) = transform.geo_to_pixel(geo.x, geo.y).unwrap();
            assert!((rx - px).abs() <= 1, "x {} -> {}", px, rx);
            assert!((ry - py).abs() <= 1, "y {} -> {}", py, ry);
        }
    }
}

#[test]
fn test_geo_to_pixel_truncates_toward_zero() {
    let transform = north_up();
    assert_eq!(transform.geo_to_pixel(150_000.6, 199_999.9).unwrap(), (2, 0));
    assert_eq!(transform.geo_to_pixel(149_999.9, 200_000.1).unwrap(), (0, 0));
}

#[test]
fn test_translated_transform() {
    let transform = north_up();
    let chunk = transform.translated(400.0, 200.0);
    assert_eq!(chunk.pixel_to_geo(0.0, 0.0), transform.pixel_to_geo(400.0, 200.0));
    assert_eq!(chunk.pixel_to_geo(3.0, 5.0), transform.pixel_to_geo(403.0, 205.0));
}

#[test]
fn test_geotiff_tags_round_trip() {
    let transform = north_up();
    let (scale, tiepoint) = transform.geotiff_tags();
    let decoded = GeoTransform::from_geotiff_tags(&scale, &tiepoint).unwrap();
    assert_eq!(decoded, transform);
}

#[test]
fn test_geotiff_tiepoint_not_at_origin() {
    let decoded =
        GeoTransform::from_geotiff_tags(&[2.0, 2.0, 0.0], &[10.0, 5.0, 0.0, 100.0, 50.0, 0.0])
            .unwrap();
    assert_eq!(decoded.coefficients(), [80.0, 2.0, 0.0, 60.0, 0.0, -2.0]);
}

#[test]
fn test_polygon_from_rings_drops_degenerate() {
    assert!(polygon_from_rings(&[[0.0, 0.0], [1.0, 1.0]], &[]).is_none());

    let polygon = polygon_from_rings(
        &[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]],
        &[
            vec![[2.0, 2.0], [4.0, 2.0], [4.0, 4.0]],
            vec![[5.0, 5.0], [6.0, 6.0]],
        ],
    )
    .unwrap();
    assert_eq!(polygon.interiors().len(), 1);
    assert!(polygon.exterior().is_closed());
}

#[test]
fn test_polygon_to_rings_maps_every_ring() {
    let polygon = polygon_from_rings(
        &[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]],
        &[vec![[2.0, 2.0], [4.0, 2.0], [4.0, 4.0]]],
    )
    .unwrap();
    let rings = polygon_to_rings(&polygon, |c| Ok((c.x as i64, c.y as i64))).unwrap();
    assert_eq!(rings.len(), 2);
    assert_eq!(rings[0].len(), 5);
    assert_eq!(rings[1][1], (4, 2));
}

#[test]
fn test_ring_self_intersection() {
    let square = LineString::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]);
    assert!(!ring_self_intersects(&square));

    let bowtie = LineString::from(vec![(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (0.0, 4.0), (0.0, 0.0)]);
    assert!(ring_self_intersects(&bowtie));
}

#[test]
fn test_geo_to_pixel_f64_keeps_fraction() {
    let transform = GeoTransform::from_gdal([150_000.3, 0.1, 0.0, 200_000.7, 0.0, -0.1]).unwrap();
    let corner = transform.translated(428.0, 0.0).pixel_to_geo(0.0, 0.0);
    let (px, py) = transform.geo_to_pixel_f64(corner.x, corner.y).unwrap();
    assert!((px - 428.0).abs() < 1e-6);
    assert!(py.abs() < 1e-6);

    let (px, _) = transform.geo_to_pixel_f64(150_000.3 + 0.25, 200_000.7).unwrap();
    assert!((px - 2.5).abs() < 1e-6);
    assert_eq!(transform.geo_to_pixel(150_000.3 + 0.25, 200_000.7).unwrap().0, 2);
}
