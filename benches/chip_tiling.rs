use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use geo::polygon;
use geoseg_rs::label_pipeline::chunking::{ChunkingConfig, LabelPolygons, OrthoChunker};
use geoseg_rs::label_pipeline::georef::GeoTransform;
use geoseg_rs::label_pipeline::labels::{LabelScheme, LabelTable};
use geoseg_rs::label_pipeline::raster::{RasterWriter, StandardTiffWriter, TiffCompression};
use geoseg_rs::label_pipeline::tiling::{ChipTiler, TilingConfig};
use image::{Rgb, RgbImage};
use std::io::Cursor;

const BUILDING: [u8; 3] = [227, 26, 28];
const WATER: [u8; 3] = [30, 95, 170];

fn scheme() -> LabelScheme {
    let table = LabelTable::new([("building", BUILDING), ("water", WATER)])
        .expect("distinct colors");
    LabelScheme::new(table, [0, 0, 0], None)
}

fn generate_mock_pair(width: u32, height: u32) -> (RgbImage, RgbImage) {
    let image = RgbImage::from_fn(width, height, |x, y| {
        let value = ((x + y) % 256) as u8;
        Rgb([value, value, value])
    });
    let mask = RgbImage::from_fn(width, height, |x, y| match (x / 50 + y / 50) % 3 {
        0 => Rgb(BUILDING),
        1 => Rgb(WATER),
        _ => Rgb([0, 0, 0]),
    });
    (image, mask)
}

fn benchmark_tiling_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("tiling_by_size");
    let scheme = scheme();
    let config = TilingConfig::default();

    let sizes = vec![
        (600, 600, "600x600"),
        (1500, 1500, "1500x1500"),
        (3000, 3000, "3000x3000"),
    ];

    for (width, height, label) in sizes {
        let pair = generate_mock_pair(width, height);

        group.bench_with_input(BenchmarkId::from_parameter(label), &pair, |b, (image, mask)| {
            let tiler = ChipTiler::new(&config, &scheme);
            b.iter(|| {
                let chips = tiler.chips("bench", black_box(image), black_box(mask));
                chips.map(|chips| chips.filter(|c| c.is_ok()).count())
            });
        });
    }

    group.finish();
}

fn benchmark_chip_compression(c: &mut Criterion) {
    let mut group = c.benchmark_group("chip_compression");
    let (image, _) = generate_mock_pair(300, 300);
    let transform = GeoTransform::from_gdal([1000.0, 0.5, 0.0, 1000.0, 0.0, -0.5])
        .expect("axis-aligned");

    let compressions = vec![
        (TiffCompression::None, "none"),
        (TiffCompression::Lzw, "lzw"),
        (TiffCompression::DeflateFast, "deflate_fast"),
        (TiffCompression::DeflateBest, "deflate_best"),
    ];

    for (compression, label) in compressions {
        group.bench_with_input(BenchmarkId::from_parameter(label), &image, |b, image| {
            let writer = StandardTiffWriter;
            b.iter(|| {
                let mut output = Cursor::new(Vec::new());
                let _ = writer.write_rgb(black_box(image), Some(&transform), &mut output, compression);
            });
        });
    }

    group.finish();
}

fn benchmark_chunk_rasterization(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunk_rasterization");
    let scheme = scheme();
    let config = ChunkingConfig::builder().grid(4, 4).build();
    let ortho = RgbImage::new(2000, 2000);
    let transform = GeoTransform::from_gdal([0.0, 1.0, 0.0, 2000.0, 0.0, -1.0])
        .expect("axis-aligned");

    let buildings = (0..100)
        .map(|i| {
            let x = (i % 10) as f64 * 200.0 + 20.0;
            let y = (i / 10) as f64 * 200.0 + 20.0;
            polygon![
                (x: x, y: y),
                (x: x + 150.0, y: y),
                (x: x + 150.0, y: y + 150.0),
                (x: x, y: y + 150.0),
            ]
        })
        .collect();
    let labels = LabelPolygons::from([("building".to_string(), buildings)]);

    group.bench_function("100_polygons_16_chunks", |b| {
        let chunker = OrthoChunker::new(&config, &scheme);
        b.iter(|| {
            let chunks = chunker.chunks(black_box(&ortho), &transform, &labels);
            chunks.map(|chunks| chunks.filter(|c| c.is_ok()).count())
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_tiling_sizes,
    benchmark_chip_compression,
    benchmark_chunk_rasterization
);
criterion_main!(benches);
