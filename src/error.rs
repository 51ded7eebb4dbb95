use thiserror::Error;

/// Everything that can go wrong between raw bytes and a finished report.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("quality must be > 0 (got {0})")]
    InvalidQuality(i64),
    #[error("pixel buffer length {0} is not a multiple of 4 (RGBA expected)")]
    InvalidBufferLength(usize),
    #[error("image has no pixels to sample")]
    EmptyImage,
    #[error(transparent)]
    Decode(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;
