use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to read input: {0}")]
    InputReadError(String),

    #[error("Failed to write output: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode raw frame: {0}")]
    DecodeError(String),

    #[error("Failed to encode output frame: {0}")]
    EncodeError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid frame metadata: {0}")]
    MetadataError(String),

    #[error("Video encoder failed: {0}")]
    EncoderError(String),

    #[error("Failed to load font: {0}")]
    FontError(String),

    #[error("Frame {index} emitted out of order (last emitted: {last})")]
    OutOfOrder { index: usize, last: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
