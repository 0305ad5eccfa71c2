use image::{GrayImage, Luma, Rgb, RgbImage};

use crate::label_pipeline::common::error::PipelineError;
use crate::label_pipeline::labels::{
    category_to_color, color_to_category, CodecOutcome, LabelScheme, LabelTable,
};

const BUILDING: [u8; 3] = [227, 26, 28];
const WATER: [u8; 3] = [30, 95, 170];
const MAGENTA: [u8; 3] = [255, 0, 255];

fn scheme(ignore: Option<[u8; 3]>) -> LabelScheme {
    let table = LabelTable::new([("building", BUILDING), ("water", WATER)]).unwrap();
    LabelScheme::new(table, [0, 0, 0], ignore)
}

fn striped_image() -> RgbImage {
    RgbImage::from_fn(6, 4, |x, _y| match x {
        0 | 1 => Rgb([0, 0, 0]),
        2 => Rgb(BUILDING),
        _ => Rgb(WATER),
    })
}

#[test]
fn test_duplicate_color_rejected() {
    let result = LabelTable::new([("building", BUILDING), ("roof", BUILDING)]);
    match result {
        Err(PipelineError::DuplicateColor { first, second, .. }) => {
            assert_eq!(first, "building");
            assert_eq!(second, "roof");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_categories_are_one_based() {
    let table = scheme(None).table;
    assert_eq!(table.category_for_color(&BUILDING), Some(1));
    assert_eq!(table.category_for_label("water"), Some(2));
    assert!(table.entry(0).is_none());
    assert_eq!(table.entry(2).unwrap().color, WATER);
    assert!(table.entry(3).is_none());
}

#[test]
fn test_color_to_category_counts() {
    let outcome = color_to_category(&striped_image(), &scheme(None)).unwrap();
    let CodecOutcome::Encoded { counts, mask } = outcome else {
        panic!("tile unexpectedly skipped");
    };

    assert_eq!(counts.len(), 2);
    assert_eq!(counts["building"], 4);
    assert_eq!(counts["water"], 12);
    assert_eq!(mask.get_pixel(0, 0)[0], 0);
    assert_eq!(mask.get_pixel(2, 3)[0], 1);
    assert_eq!(mask.get_pixel(5, 1)[0], 2);
}

#[test]
fn test_background_only_tile_has_no_counts() {
    let image = RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]));
    let CodecOutcome::Encoded { counts, mask } = color_to_category(&image, &scheme(None)).unwrap()
    else {
        panic!("tile unexpectedly skipped");
    };
    assert!(counts.is_empty());
    assert!(mask.pixels().all(|p| p[0] == 0));
}

#[test]
fn test_unknown_color_is_an_error() {
    let mut image = striped_image();
    image.put_pixel(1, 1, Rgb([1, 2, 3]));
    let result = color_to_category(&image, &scheme(None));
    assert!(matches!(
        result,
        Err(PipelineError::UnknownColor { color: [1, 2, 3] })
    ));
}

#[test]
fn test_ignore_color_skips_tile() {
    let mut image = striped_image();
    image.put_pixel(5, 3, Rgb(MAGENTA));
    let outcome = color_to_category(&image, &scheme(Some(MAGENTA))).unwrap();
    assert!(matches!(outcome, CodecOutcome::Skipped));
}

#[test]
fn test_ignore_color_absent_keeps_tile() {
    let outcome = color_to_category(&striped_image(), &scheme(Some(MAGENTA))).unwrap();
    assert!(matches!(outcome, CodecOutcome::Encoded { .. }));
}

#[test]
fn test_category_round_trip() {
    let scheme = scheme(None);
    let mask = GrayImage::from_fn(7, 5, |x, y| Luma([((x + 2 * y) % 3) as u8]));
    let color = category_to_color(&mask, &scheme).unwrap();
    let CodecOutcome::Encoded { mask: decoded, .. } = color_to_category(&color, &scheme).unwrap()
    else {
        panic!("tile unexpectedly skipped");
    };
    assert_eq!(decoded, mask);
}

#[test]
fn test_category_to_color_unknown_category() {
    let mask = GrayImage::from_pixel(2, 2, Luma([3]));
    let result = category_to_color(&mask, &scheme(None));
    assert!(matches!(result, Err(PipelineError::UnknownCategory(3))));
}

#[test]
fn test_presets_are_invertible() {
    let dronedeploy = LabelScheme::dronedeploy().unwrap();
    assert_eq!(dronedeploy.table.len(), 5);
    assert_eq!(dronedeploy.ignore, Some(MAGENTA));
    assert_eq!(LabelScheme::iv_ortho_mid().unwrap().table.len(), 2);
}
