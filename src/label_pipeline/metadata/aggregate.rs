use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::label_pipeline::common::error::{PipelineError, Result};
use crate::label_pipeline::labels::CategoryCounts;
use crate::label_pipeline::metadata::types::TileMetadata;
use crate::label_pipeline::tiling::{IMAGES_DIR, LABELS_DIR};

/// Subdirectories holding one file per tile key.
const TILE_SUBDIRS: [&str; 2] = [IMAGES_DIR, LABELS_DIR];

pub fn has_all_labels(counts: &CategoryCounts, labels: &[String]) -> bool {
    labels
        .iter()
        .all(|label| counts.get(label).is_some_and(|&n| n > 0))
}

pub fn has_any_label(counts: &CategoryCounts, labels: &[String]) -> bool {
    labels
        .iter()
        .any(|label| counts.get(label).is_some_and(|&n| n > 0))
}

/// Merges metadata of independently processed directories.
///
/// All sources must share size and stride. A key defined by two sources is an
/// error even when the required-label filter would drop it.
pub fn merge(sources: &[TileMetadata], required: Option<&[String]>) -> Result<TileMetadata> {
    let first = sources.first().ok_or(PipelineError::NothingToMerge)?;
    let mut merged = TileMetadata::new(first.size, first.stride);
    let mut seen: HashSet<&str> = HashSet::new();

    for source in sources {
        if !merged.same_parameters(source) {
            return Err(PipelineError::InconsistentParameters {
                expected_size: merged.size,
                expected_stride: merged.stride,
                size: source.size,
                stride: source.stride,
            });
        }

        for (key, counts) in &source.label_pixel_counts {
            if !seen.insert(key.as_str()) {
                return Err(PipelineError::DuplicateKey(key.clone()));
            }
            if let Some(required) = required {
                if !has_all_labels(counts, required) {
                    debug!(key = %key, "Tile lacks required labels, dropping");
                    continue;
                }
            }
            merged.insert(key.clone(), counts.clone())?;
        }
    }

    Ok(merged)
}

/// Merges tile directories into `out_dir`.
///
/// Every directory holds `metadata.json` plus `images/` and `labels/`. The merge
/// is validated before any file is copied.
#[instrument(skip(dirs, required), fields(sources = dirs.len()))]
pub fn aggregate_dirs(
    dirs: &[PathBuf],
    out_dir: &Path,
    required: Option<&[String]>,
) -> Result<TileMetadata> {
    let sources = dirs
        .iter()
        .map(|dir| TileMetadata::read_from_dir(dir))
        .collect::<Result<Vec<_>>>()?;
    let merged = merge(&sources, required)?;

    for subdir in TILE_SUBDIRS {
        fs::create_dir_all(out_dir.join(subdir))?;
    }

    let mut copied = 0usize;
    for (dir, source) in dirs.iter().zip(&sources) {
        for subdir in TILE_SUBDIRS {
            let in_dir = dir.join(subdir);
            if !in_dir.is_dir() {
                continue;
            }
            for entry in fs::read_dir(&in_dir)? {
                let path = entry?.path();
                let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                if source.get(stem).is_none() || merged.get(stem).is_none() {
                    continue;
                }
                if let Some(file_name) = path.file_name() {
                    fs::copy(&path, out_dir.join(subdir).join(file_name))?;
                    copied += 1;
                }
            }
        }
    }

    merged.write_to_dir(out_dir)?;
    info!(tiles = merged.len(), files = copied, "Aggregated tile directories");
    Ok(merged)
}
