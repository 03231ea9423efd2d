use std::path::PathBuf;

use thiserror::Error;

/// The error type shared by every crate in the mining-disturbance toolkit.
///
/// Variant names mirror the error kinds named by the detection pipeline's
/// design: I/O failures surface verbatim, while compute-kind failures are
/// distinguished so callers can tell a user mistake (missing file, raster
/// with no CRS) from a pipeline bug (non-finite DTW cost).
#[derive(Debug, Error)]
pub enum Error {
    #[error("input not found: {0}")]
    InputNotFound(PathBuf),

    #[error("invalid raster: {0}")]
    InvalidRaster(String),

    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("compute error: {0}")]
    ComputeError(String),

    #[error("cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
