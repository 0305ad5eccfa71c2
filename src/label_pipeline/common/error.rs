use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Rotated geotransform is not supported: row rotation={c}, column rotation={e}")]
    InvalidTransform { c: f64, e: f64 },

    #[error("Geotransform is singular (determinant is zero)")]
    SingularTransform,

    #[error("Color {color:?} has no entry in the label table")]
    UnknownColor { color: [u8; 3] },

    #[error("Label '{0}' has no entry in the label table")]
    UnknownLabel(String),

    #[error("Category {0} has no entry in the label table")]
    UnknownCategory(u8),

    #[error("Labels '{first}' and '{second}' share color {color:?}")]
    DuplicateColor {
        first: String,
        second: String,
        color: [u8; 3],
    },

    #[error("Label table holds {0} labels, at most 255 fit in a byte mask")]
    TooManyLabels(usize),

    #[error("Inconsistent tile parameters: expected size={expected_size:?} stride={expected_stride:?}, found size={size:?} stride={stride:?}")]
    InconsistentParameters {
        expected_size: [u32; 2],
        expected_stride: [u32; 2],
        size: [u32; 2],
        stride: [u32; 2],
    },

    #[error("Duplicate tile key: {0}")]
    DuplicateKey(String),

    #[error("No metadata sources to merge")]
    NothingToMerge,

    #[error("Hole contour {contour} references missing outer contour {parent:?}")]
    MalformedHierarchy {
        contour: usize,
        parent: Option<usize>,
    },

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Image is {image:?} but mask is {mask:?}")]
    DimensionMismatch { image: (u32, u32), mask: (u32, u32) },

    #[error("Invalid tiling parameters: {0}")]
    InvalidTiling(String),

    #[error("Invalid chunk grid {nx}x{ny} for {width}x{height} image")]
    InvalidGrid {
        nx: u32,
        ny: u32,
        width: u32,
        height: u32,
    },

    #[error("Tile {key} failed: {source}")]
    TileFailed {
        key: String,
        #[source]
        source: Box<PipelineError>,
    },

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode raster: {0}")]
    DecodeError(String),

    #[error("Failed to encode raster: {0}")]
    EncodeError(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Vector data error: {0}")]
    Vector(String),

    #[error("Metadata error: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PipelineError {
    pub fn for_tile(self, key: impl Into<String>) -> Self {
        PipelineError::TileFailed {
            key: key.into(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
