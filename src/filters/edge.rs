//! Edge detection: Sobel, Prewitt and Roberts gradient magnitude.
//!
//! All three are the same algorithm ([`apply_gradient`]) with different
//! kernel pairs. Unlike luminance-based edge filters, every color channel
//! gets its own magnitude, so colored edges keep their hue.

use std::fmt;
use std::str::FromStr;

use crate::buffer::PixelBuffer;
use crate::error::{EngineError, Result};
use crate::filters::convolution::apply_gradient;
use crate::filters::kernel::{self, Kernel};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeDetector {
    Sobel,
    Prewitt,
    Roberts,
}

impl EdgeDetector {
    pub const ALL: [EdgeDetector; 3] = [Self::Sobel, Self::Prewitt, Self::Roberts];

    /// `(kernel_x, kernel_y)` preset pair.
    pub fn kernels(self) -> (Kernel, Kernel) {
        match self {
            Self::Sobel => kernel::sobel(),
            Self::Prewitt => kernel::prewitt(),
            Self::Roberts => kernel::roberts(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Sobel => "sobel",
            Self::Prewitt => "prewitt",
            Self::Roberts => "roberts",
        }
    }
}

impl fmt::Display for EdgeDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EdgeDetector {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sobel" => Ok(Self::Sobel),
            "prewitt" => Ok(Self::Prewitt),
            "roberts" | "robert" => Ok(Self::Roberts),
            other => Err(EngineError::InvalidParameter(format!(
                "unknown edge detector '{other}'"
            ))),
        }
    }
}

/// Gradient magnitude using the detector's kernel pair.
pub fn detect_edges(input: &PixelBuffer, detector: EdgeDetector) -> Result<PixelBuffer> {
    let (kx, ky) = detector.kernels();
    apply_gradient(input, &kx, &ky)
}
