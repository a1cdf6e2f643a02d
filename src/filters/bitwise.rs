//! Byte-wise AND / OR / XOR of two images.
//!
//! Operates on the raw byte sequences, alpha included.

use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::buffer::PixelBuffer;
use crate::error::{EngineError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BitwiseOp {
    And,
    Or,
    Xor,
}

impl BitwiseOp {
    pub const ALL: [BitwiseOp; 3] = [Self::And, Self::Or, Self::Xor];

    #[inline]
    pub fn apply(self, a: u8, b: u8) -> u8 {
        match self {
            Self::And => a & b,
            Self::Or => a | b,
            Self::Xor => a ^ b,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
        }
    }
}

impl fmt::Display for BitwiseOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BitwiseOp {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "and" => Ok(Self::And),
            "or" => Ok(Self::Or),
            "xor" => Ok(Self::Xor),
            other => Err(EngineError::InvalidParameter(format!(
                "unknown bitwise operation '{other}'"
            ))),
        }
    }
}

/// Combine `a` and `b` byte by byte.
///
/// # Arguments
/// * `a`, `b` - Images with identical width, height and pixel format
/// * `op` - And, Or or Xor, applied to every byte including alpha
///
/// # Returns
/// New image of the same shape, or [`EngineError::SizeMismatch`] when the
/// shapes differ.
pub fn combine(a: &PixelBuffer, b: &PixelBuffer, op: BitwiseOp) -> Result<PixelBuffer> {
    if !a.same_shape(b) {
        return Err(EngineError::SizeMismatch(format!(
            "{}x{} {:?} vs {}x{} {:?}",
            a.width(),
            a.height(),
            a.format(),
            b.width(),
            b.height(),
            b.format()
        )));
    }
    debug!("combine: {}x{} {}", a.width(), a.height(), op);

    let bytes = a
        .bytes()
        .iter()
        .zip(b.bytes())
        .map(|(&x, &y)| op.apply(x, y))
        .collect();

    PixelBuffer::from_vec(bytes, a.width(), a.height(), a.format())
}
