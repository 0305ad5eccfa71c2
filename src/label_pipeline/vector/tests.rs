use geo::{polygon, BoundingRect};
use image::{GrayImage, Luma};

use crate::label_pipeline::common::error::PipelineError;
use crate::label_pipeline::contours::CategoryPolygons;
use crate::label_pipeline::georef::GeoTransform;
use crate::label_pipeline::labels::LabelTable;
use crate::label_pipeline::vector::{
    read_label_polygons, to_feature_collection, write_feature_collection, MaskVectorizer,
    LABEL_PROPERTY,
};

fn table() -> LabelTable {
    LabelTable::new([("building", [227, 26, 28]), ("water", [30, 95, 170])]).unwrap()
}

fn water_square() -> GrayImage {
    let mut mask = GrayImage::new(20, 20);
    for y in 2..18 {
        for x in 2..18 {
            mask.put_pixel(x, y, Luma([2]));
        }
    }
    mask
}

#[test]
fn test_vectorize_georeferenced_chip() {
    let transform = GeoTransform::from_gdal([1000.0, 0.5, 0.0, 1000.0, 0.0, -0.5]).unwrap();
    let categories = MaskVectorizer::default()
        .vectorize(&water_square(), &table(), Some(&transform), (100, 20))
        .unwrap();

    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].category, 2);
    assert_eq!(categories[0].label, "water");
    assert_eq!(categories[0].polygons.len(), 1);

    let rect = categories[0].polygons[0].bounding_rect().unwrap();
    assert_eq!(rect.min().x, 1051.0);
    assert_eq!(rect.max().x, 1058.5);
    assert_eq!(rect.min().y, 981.5);
    assert_eq!(rect.max().y, 989.0);
}

#[test]
fn test_vectorize_without_transform_keeps_pixels() {
    let categories = MaskVectorizer::default()
        .vectorize(&water_square(), &table(), None, (300, 0))
        .unwrap();

    let rect = categories[0].polygons[0].bounding_rect().unwrap();
    assert_eq!((rect.min().x, rect.min().y), (302.0, 2.0));
    assert_eq!((rect.max().x, rect.max().y), (317.0, 17.0));
}

#[test]
fn test_background_mask_yields_nothing() {
    let categories = MaskVectorizer::default()
        .vectorize(&GrayImage::new(16, 16), &table(), None, (0, 0))
        .unwrap();
    assert!(categories.is_empty());
}

fn categories() -> Vec<CategoryPolygons> {
    vec![
        CategoryPolygons {
            category: 1,
            label: "building".to_string(),
            polygons: vec![
                polygon![(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 0.0)],
                polygon![(x: 10.0, y: 0.0), (x: 14.0, y: 0.0), (x: 14.0, y: 4.0), (x: 10.0, y: 0.0)],
            ],
        },
        CategoryPolygons {
            category: 2,
            label: "water".to_string(),
            polygons: vec![polygon![
                (x: 20.0, y: 0.0),
                (x: 24.0, y: 0.0),
                (x: 24.0, y: 4.0),
                (x: 20.0, y: 0.0),
            ]],
        },
    ]
}

#[test]
fn test_feature_per_polygon_with_label() {
    let collection = to_feature_collection(&categories());

    assert_eq!(collection.features.len(), 3);
    let labels: Vec<&str> = collection
        .features
        .iter()
        .filter_map(|f| f.property(LABEL_PROPERTY).and_then(|v| v.as_str()))
        .collect();
    assert_eq!(labels, vec!["building", "building", "water"]);
}

#[test]
fn test_written_collection_reads_back_grouped() {
    let mut buffer = Vec::new();
    write_feature_collection(&categories(), &mut buffer).unwrap();

    let labels = read_label_polygons(buffer.as_slice(), LABEL_PROPERTY).unwrap();
    assert_eq!(labels.len(), 2);
    assert_eq!(labels["building"].len(), 2);
    assert_eq!(labels["water"].len(), 1);
}

#[test]
fn test_read_flattens_multipolygons_and_skips_rest() {
    let text = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "class": "building" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[0, 0], [1, 0], [1, 1], [0, 0]]],
                        [[[5, 5], [6, 5], [6, 6], [5, 5]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": { "class": "water" },
                "geometry": { "type": "Point", "coordinates": [3, 3] }
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]
                }
            }
        ]
    }"#;

    let labels = read_label_polygons(text.as_bytes(), "class").unwrap();
    assert_eq!(labels.len(), 1);
    assert_eq!(labels["building"].len(), 2);
}

#[test]
fn test_read_rejects_bare_geometry() {
    let text = r#"{ "type": "Point", "coordinates": [3, 3] }"#;
    let result = read_label_polygons(text.as_bytes(), "class");
    assert!(matches!(result, Err(PipelineError::Vector(_))));
}
