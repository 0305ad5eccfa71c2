use std::fs::{self, File};
use std::path::Path;

use image::RgbImage;
use tracing::{error, info, instrument};

use crate::label_pipeline::chunking::chunker::{Chunk, OrthoChunker};
use crate::label_pipeline::chunking::types::{ChunkingConfig, LabelPolygons};
use crate::label_pipeline::common::error::{PipelineError, Result};
use crate::label_pipeline::georef::GeoTransform;
use crate::label_pipeline::labels::LabelScheme;
use crate::label_pipeline::raster::{
    RasterReader, RasterWriter, StandardTiffWriter, TiffRasterReader,
};

pub const ORTHO_DIR: &str = "ortho";
pub const MASK_DIR: &str = "mask";

/// Outcome of chunking one orthophoto.
#[derive(Debug)]
pub struct ChunkReport {
    pub written: usize,
    pub failures: Vec<PipelineError>,
}

/// Writes orthophoto chunks and their color masks as GeoTIFFs.
pub struct ChunkPipeline<R: RasterReader, W: RasterWriter> {
    reader: R,
    writer: W,
    config: ChunkingConfig,
}

impl ChunkPipeline<TiffRasterReader, StandardTiffWriter> {
    pub fn new(config: ChunkingConfig) -> Self {
        Self {
            reader: TiffRasterReader,
            writer: StandardTiffWriter,
            config,
        }
    }
}

impl<R: RasterReader, W: RasterWriter> ChunkPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: ChunkingConfig) -> Self {
        Self {
            reader,
            writer,
            config,
        }
    }

    fn write_chunk(&self, chunk: &Chunk, out_dir: &Path) -> Result<()> {
        let file_name = format!("{}.tif", chunk.name);
        let targets = [
            (out_dir.join(ORTHO_DIR).join(&file_name), &chunk.image),
            (out_dir.join(MASK_DIR).join(&file_name), &chunk.mask),
        ];
        for (path, raster) in targets {
            let mut file = File::create(&path).map_err(|e| {
                PipelineError::OutputWriteError(format!("{}: {}", path.display(), e))
            })?;
            self.writer
                .write_rgb(raster, Some(&chunk.transform), &mut file, self.config.compression)?;
        }
        Ok(())
    }

    /// Chunks a decoded orthophoto into `out_dir/ortho` and `out_dir/mask`.
    #[instrument(skip_all, fields(width = ortho.width(), height = ortho.height(), labels = labels.len()))]
    pub fn chunk_raster(
        &self,
        ortho: &RgbImage,
        transform: &GeoTransform,
        labels: &LabelPolygons,
        scheme: &LabelScheme,
        out_dir: &Path,
    ) -> Result<ChunkReport> {
        fs::create_dir_all(out_dir.join(ORTHO_DIR))?;
        fs::create_dir_all(out_dir.join(MASK_DIR))?;

        let chunker = OrthoChunker::new(&self.config, scheme);
        let mut written = 0;
        let mut failures = Vec::new();
        for chunk in chunker.chunks(ortho, transform, labels)? {
            match chunk {
                Ok(chunk) => {
                    let _span = tracing::debug_span!("write_chunk", name = %chunk.name).entered();
                    self.write_chunk(&chunk, out_dir)?;
                    written += 1;
                }
                Err(e) => {
                    error!("{}", e);
                    failures.push(e);
                }
            }
        }

        info!(written, failed = failures.len(), "Chunked orthophoto");
        Ok(ChunkReport { written, failures })
    }

    /// Reads a georeferenced orthophoto and chunks it.
    #[instrument(skip(self, labels, scheme))]
    pub fn chunk_file(
        &self,
        ortho_path: &Path,
        labels: &LabelPolygons,
        scheme: &LabelScheme,
        out_dir: &Path,
    ) -> Result<ChunkReport> {
        let raster = {
            let _span = tracing::info_span!("decode_ortho").entered();
            let data = fs::read(ortho_path).map_err(|e| {
                PipelineError::InputReadError(format!("{}: {}", ortho_path.display(), e))
            })?;
            self.reader.read_rgb(&data)?
        };
        let transform = raster.transform.ok_or_else(|| {
            PipelineError::UnsupportedFormat(format!(
                "{} carries no georeferencing",
                ortho_path.display()
            ))
        })?;

        self.chunk_raster(&raster.image, &transform, labels, scheme, out_dir)
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }
}
