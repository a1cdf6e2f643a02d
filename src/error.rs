//! Error type shared by every engine operation.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Width, height, stride or byte length do not describe a valid buffer.
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Pixel ({x}, {y}) is outside a {width}x{height} image")]
    OutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// Kernel is empty, not square, even-sized, or paired with a kernel of another size.
    #[error("Invalid kernel: {0}")]
    InvalidKernel(String),

    #[error("Size mismatch: {0}")]
    SizeMismatch(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Bitmap is already locked")]
    BitmapLocked,
}

pub type Result<T> = std::result::Result<T, EngineError>;
