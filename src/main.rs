use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use geoseg_rs::label_pipeline::raster::{RasterReader, TiffRasterReader};
use geoseg_rs::label_pipeline::vector::{read_label_polygons, write_feature_collection};
use geoseg_rs::label_pipeline::{
    aggregate_dirs, ChipPipeline, ChunkPipeline, ChunkingConfig, LabelScheme, MaskVectorizer,
    TilingConfig,
};
use geoseg_rs::logger;

const USAGE: &str = "usage:
  geoseg_rs chunk <ortho.tif> <labels.geojson> <property> <scheme> <out_dir> [prefix]
  geoseg_rs chip <scheme> <images_dir> <masks_dir> <out_dir> [prefix]
  geoseg_rs aggregate <out_dir> <dir>... [--require=label,label]
  geoseg_rs vectorize <mask.tif> <scheme> <out.geojson> [<georef.tif> <x> <y>]
schemes: dronedeploy, iv-ortho-mid";

fn scheme(name: &str) -> Result<LabelScheme> {
    let scheme = match name {
        "dronedeploy" => LabelScheme::dronedeploy()?,
        "iv-ortho-mid" => LabelScheme::iv_ortho_mid()?,
        other => bail!("unknown label scheme '{}'", other),
    };
    Ok(scheme)
}

fn tif_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "tif" || ext == "tiff") {
            files.push(path);
        }
    }
    Ok(files)
}

fn chunk(args: &[String]) -> Result<()> {
    let [ortho, labels, property, scheme_name, out_dir, rest @ ..] = args else {
        bail!(USAGE);
    };
    let scheme = scheme(scheme_name)?;
    let file = File::open(labels).with_context(|| format!("opening {}", labels))?;
    let polygons = read_label_polygons(file, property)?;

    let mut builder = ChunkingConfig::builder();
    if let Some(prefix) = rest.first() {
        builder = builder.prefix(prefix.as_str());
    }
    let pipeline = ChunkPipeline::new(builder.build());
    let report = pipeline.chunk_file(Path::new(ortho), &polygons, &scheme, Path::new(out_dir))?;
    if !report.failures.is_empty() {
        warn!(failed = report.failures.len(), "Some chunks failed");
    }
    info!(written = report.written, "Chunking done");
    Ok(())
}

fn chip(args: &[String]) -> Result<()> {
    let [scheme_name, images_dir, masks_dir, out_dir, rest @ ..] = args else {
        bail!(USAGE);
    };
    let scheme = scheme(scheme_name)?;
    let config = TilingConfig::builder().prefix(rest.first().cloned()).build();
    let pipeline = ChipPipeline::new(config);

    let images = tif_files(Path::new(images_dir))?;
    let masks = tif_files(Path::new(masks_dir))?;
    let (metadata, reports) = pipeline.chip_directory(images, masks, &scheme, Path::new(out_dir))?;
    let failed: usize = reports.iter().map(|r| r.failures.len()).sum();
    info!(chips = metadata.len(), sources = reports.len(), failed, "Chipping done");
    Ok(())
}

fn aggregate(args: &[String]) -> Result<()> {
    let [out_dir, rest @ ..] = args else {
        bail!(USAGE);
    };
    let mut required: Option<Vec<String>> = None;
    let mut dirs = Vec::new();
    for arg in rest {
        match arg.strip_prefix("--require=") {
            Some(labels) => required = Some(labels.split(',').map(str::to_string).collect()),
            None => dirs.push(PathBuf::from(arg)),
        }
    }

    let merged = aggregate_dirs(&dirs, Path::new(out_dir), required.as_deref())?;
    info!(tiles = merged.len(), "Aggregation done");
    Ok(())
}

fn vectorize(args: &[String]) -> Result<()> {
    let [mask_path, scheme_name, out_path, rest @ ..] = args else {
        bail!(USAGE);
    };
    let scheme = scheme(scheme_name)?;
    let reader = TiffRasterReader;
    let data = fs::read(mask_path).with_context(|| format!("reading {}", mask_path))?;
    let mask = reader.read_mask(&data)?;

    let (transform, offset) = match rest {
        [] => (None, (0, 0)),
        [georef, x, y] => {
            let data = fs::read(georef).with_context(|| format!("reading {}", georef))?;
            let transform = reader
                .read_transform(&data)?
                .with_context(|| format!("{} carries no georeferencing", georef))?;
            (Some(transform), (x.parse()?, y.parse()?))
        }
        _ => bail!(USAGE),
    };

    let categories =
        MaskVectorizer::default().vectorize(&mask, &scheme.table, transform.as_ref(), offset)?;
    let mut output = BufWriter::new(
        File::create(out_path).with_context(|| format!("creating {}", out_path))?,
    );
    write_feature_collection(&categories, &mut output)?;
    info!(categories = categories.len(), "Vectorization done");
    Ok(())
}

fn main() -> Result<()> {
    logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        bail!(USAGE);
    };

    info!(command = %command, "Starting geoseg_rs");
    match command.as_str() {
        "chunk" => chunk(rest),
        "chip" => chip(rest),
        "aggregate" => aggregate(rest),
        "vectorize" => vectorize(rest),
        _ => bail!(USAGE),
    }
}
