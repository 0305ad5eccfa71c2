use std::fs::{self, File};
use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::{error, info, instrument};

use crate::label_pipeline::common::error::{PipelineError, Result};
use crate::label_pipeline::georef::GeoTransform;
use crate::label_pipeline::labels::LabelScheme;
use crate::label_pipeline::metadata::TileMetadata;
use crate::label_pipeline::raster::{
    RasterReader, RasterWriter, StandardTiffWriter, TiffRasterReader,
};
use crate::label_pipeline::tiling::tiler::{Chip, ChipTiler};
use crate::label_pipeline::tiling::types::TilingConfig;

pub const IMAGES_DIR: &str = "images";
pub const LABELS_DIR: &str = "labels";

/// Outcome of chipping one source pair.
#[derive(Debug)]
pub struct ChipReport {
    pub source: String,
    pub kept: usize,
    pub skipped: usize,
    /// Chips that failed to encode, each tagged with its key.
    pub failures: Vec<PipelineError>,
}

pub struct ChipPipeline<R: RasterReader, W: RasterWriter> {
    reader: R,
    writer: W,
    config: TilingConfig,
}

impl ChipPipeline<TiffRasterReader, StandardTiffWriter> {
    pub fn new(config: TilingConfig) -> Self {
        Self {
            reader: TiffRasterReader,
            writer: StandardTiffWriter,
            config,
        }
    }
}

impl<R: RasterReader, W: RasterWriter> ChipPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: TilingConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    /// Empty metadata carrying this pipeline's size and stride.
    pub fn new_metadata(&self) -> TileMetadata {
        let (w, h) = self.config.size;
        let (sx, sy) = self.config.stride;
        TileMetadata::new([w, h], [sx, sy])
    }

    fn write_chip(&self, chip: &Chip, transform: Option<&GeoTransform>, out_dir: &Path) -> Result<()> {
        let file_name = format!("{}.tif", chip.key);
        let transform =
            transform.map(|t| t.translated(chip.window.x as f64, chip.window.y as f64));

        let image_path = out_dir.join(IMAGES_DIR).join(&file_name);
        let mut image_file = File::create(&image_path).map_err(|e| {
            PipelineError::OutputWriteError(format!("{}: {}", image_path.display(), e))
        })?;
        self.writer
            .write_rgb(&chip.image, transform.as_ref(), &mut image_file, self.config.compression)?;

        let mask_path = out_dir.join(LABELS_DIR).join(&file_name);
        let mut mask_file = File::create(&mask_path).map_err(|e| {
            PipelineError::OutputWriteError(format!("{}: {}", mask_path.display(), e))
        })?;
        self.writer
            .write_mask(&chip.mask, transform.as_ref(), &mut mask_file, self.config.compression)?;
        Ok(())
    }

    /// Chips one decoded image/mask pair into `out_dir`, recording kept chips.
    ///
    /// A chip that fails to encode is reported and does not stop the source.
    #[instrument(skip(self, image, mask, transform, scheme, metadata), fields(width = image.width(), height = image.height()))]
    pub fn chip_rasters(
        &self,
        source: &str,
        image: &RgbImage,
        mask: &RgbImage,
        transform: Option<&GeoTransform>,
        scheme: &LabelScheme,
        out_dir: &Path,
        metadata: &mut TileMetadata,
    ) -> Result<ChipReport> {
        fs::create_dir_all(out_dir.join(IMAGES_DIR))?;
        fs::create_dir_all(out_dir.join(LABELS_DIR))?;

        let prefix = self.config.key_prefix(source);
        let tiler = ChipTiler::new(&self.config, scheme);
        let mut chips = tiler.chips(&prefix, image, mask)?;
        let mut failures = Vec::new();

        for chip in chips.by_ref() {
            match chip {
                Ok(chip) => {
                    let _span = tracing::debug_span!("write_chip", key = %chip.key).entered();
                    self.write_chip(&chip, transform, out_dir)?;
                    metadata.insert(chip.key, chip.counts)?;
                }
                Err(e) => {
                    error!("{}", e);
                    failures.push(e);
                }
            }
        }

        let report = ChipReport {
            source: source.to_string(),
            kept: chips.kept(),
            skipped: chips.skipped(),
            failures,
        };
        info!(
            kept = report.kept,
            skipped = report.skipped,
            failed = report.failures.len(),
            "Chipped source"
        );
        Ok(report)
    }

    /// Reads, decodes and chips one image/mask file pair.
    #[instrument(skip(self, scheme, metadata))]
    pub fn chip_files(
        &self,
        image_path: &Path,
        mask_path: &Path,
        scheme: &LabelScheme,
        out_dir: &Path,
        metadata: &mut TileMetadata,
    ) -> Result<ChipReport> {
        let source = image_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| PipelineError::InputReadError(image_path.display().to_string()))?;

        let ortho = {
            let _span = tracing::info_span!("decode_image").entered();
            let data = fs::read(image_path).map_err(|e| {
                PipelineError::InputReadError(format!("{}: {}", image_path.display(), e))
            })?;
            self.reader.read_rgb(&data)?
        };
        let mask = {
            let _span = tracing::info_span!("decode_mask").entered();
            let data = fs::read(mask_path).map_err(|e| {
                PipelineError::InputReadError(format!("{}: {}", mask_path.display(), e))
            })?;
            self.reader.read_rgb(&data)?
        };

        self.chip_rasters(
            source,
            &ortho.image,
            &mask.image,
            ortho.transform.as_ref(),
            scheme,
            out_dir,
            metadata,
        )
    }

    /// Chips every image/mask pair, matched by sorted file stem, and writes
    /// `metadata.json` once at the end.
    #[instrument(skip_all, fields(sources = image_paths.len()))]
    pub fn chip_directory(
        &self,
        mut image_paths: Vec<PathBuf>,
        mut mask_paths: Vec<PathBuf>,
        scheme: &LabelScheme,
        out_dir: &Path,
    ) -> Result<(TileMetadata, Vec<ChipReport>)> {
        if image_paths.len() != mask_paths.len() {
            return Err(PipelineError::InvalidTiling(format!(
                "{} images but {} masks",
                image_paths.len(),
                mask_paths.len()
            )));
        }
        image_paths.sort_by(|a, b| a.file_stem().cmp(&b.file_stem()));
        mask_paths.sort_by(|a, b| a.file_stem().cmp(&b.file_stem()));

        let mut metadata = self.new_metadata();
        let mut reports = Vec::with_capacity(image_paths.len());
        for (image_path, mask_path) in image_paths.iter().zip(&mask_paths) {
            reports.push(self.chip_files(image_path, mask_path, scheme, out_dir, &mut metadata)?);
        }

        fs::create_dir_all(out_dir)?;
        metadata.write_to_dir(out_dir)?;
        info!(chips = metadata.len(), "Wrote chip metadata");
        Ok((metadata, reports))
    }

    pub fn config(&self) -> &TilingConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: TilingConfig) {
        self.config = config;
    }
}
