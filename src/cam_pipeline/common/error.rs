use thiserror::Error;

#[derive(Error, Debug)]
pub enum CamError {
    #[error("Invalid classifier configuration: {0}")]
    ConfigurationError(String),

    #[error("No activation snapshot was captured during the forward pass")]
    EmptyBatchError,

    #[error("Shape mismatch: {0}")]
    ShapeMismatchError(String),

    #[error("Expected a single-image batch, got batch size {0}")]
    BatchSizeError(usize),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode input image: {0}")]
    DecodeError(String),

    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CamError>;
