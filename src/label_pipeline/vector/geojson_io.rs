use std::io::{Read, Write};

use geojson::{Feature, FeatureCollection, GeoJson};
use tracing::{debug, warn};

use crate::label_pipeline::chunking::LabelPolygons;
use crate::label_pipeline::common::error::{PipelineError, Result};
use crate::label_pipeline::contours::CategoryPolygons;

/// Feature property holding the label name on export.
pub const LABEL_PROPERTY: &str = "type";

/// One feature per polygon, labelled through [`LABEL_PROPERTY`].
pub fn to_feature_collection(categories: &[CategoryPolygons]) -> FeatureCollection {
    let features = categories
        .iter()
        .flat_map(|category| {
            category.polygons.iter().map(|polygon| {
                let geometry = geojson::Geometry::new(geojson::Value::from(polygon));
                let mut feature = Feature::from(geometry);
                feature.set_property(LABEL_PROPERTY, category.label.clone());
                feature
            })
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

pub fn write_feature_collection(categories: &[CategoryPolygons], output: &mut dyn Write) -> Result<()> {
    let collection = GeoJson::from(to_feature_collection(categories));
    serde_json::to_writer(&mut *output, &collection)?;
    output.flush()?;
    Ok(())
}

/// Reads polygon features grouped by the string value of `property`.
///
/// Multipolygons are flattened. Features without the property or with a
/// non-areal geometry are skipped.
pub fn read_label_polygons(input: impl Read, property: &str) -> Result<LabelPolygons> {
    let geojson = GeoJson::from_reader(input).map_err(|e| PipelineError::Vector(e.to_string()))?;
    let features = match geojson {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(_) => {
            return Err(PipelineError::Vector(
                "expected a feature or feature collection".to_string(),
            ));
        }
    };

    let mut labels = LabelPolygons::new();
    let mut skipped = 0usize;
    for feature in features {
        let Some(label) = feature.property(property).and_then(|v| v.as_str()).map(str::to_string)
        else {
            skipped += 1;
            continue;
        };
        let Some(geometry) = feature.geometry else {
            skipped += 1;
            continue;
        };

        let geometry = geo::Geometry::<f64>::try_from(geometry)
            .map_err(|e| PipelineError::Vector(e.to_string()))?;
        match geometry {
            geo::Geometry::Polygon(polygon) => labels.entry(label).or_default().push(polygon),
            geo::Geometry::MultiPolygon(multi) => labels.entry(label).or_default().extend(multi),
            _ => {
                debug!(label = %label, "Skipping non-areal feature");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, property, "Skipped features without a labelled polygon");
    }
    Ok(labels)
}
