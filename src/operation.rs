//! Named single-image operations for the command layer.
//!
//! Every variant takes a buffer and returns a new one, so a command binding
//! is just `op.apply(&current)?`. Two-image operations live in
//! [`bitwise`](crate::filters::bitwise).

use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::buffer::PixelBuffer;
use crate::error::{EngineError, Result};
use crate::filters::convolution::apply_kernel;
use crate::filters::edge::{detect_edges, EdgeDetector};
use crate::filters::grayscale::grayscale;
use crate::filters::kernel;
use crate::filters::median::{median, MedianWindow};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Grayscale,
    LowPass,
    HighPass,
    Laplacian,
    Sobel,
    Prewitt,
    Roberts,
    Median(MedianWindow),
}

impl Operation {
    pub const ALL: [Operation; 10] = [
        Self::Grayscale,
        Self::LowPass,
        Self::HighPass,
        Self::Laplacian,
        Self::Sobel,
        Self::Prewitt,
        Self::Roberts,
        Self::Median(MedianWindow::Three),
        Self::Median(MedianWindow::Five),
        Self::Median(MedianWindow::Seven),
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::LowPass => "low_pass",
            Self::HighPass => "high_pass",
            Self::Laplacian => "laplacian",
            Self::Sobel => "sobel",
            Self::Prewitt => "prewitt",
            Self::Roberts => "roberts",
            Self::Median(MedianWindow::Three) => "median3",
            Self::Median(MedianWindow::Five) => "median5",
            Self::Median(MedianWindow::Seven) => "median7",
        }
    }

    pub fn apply(self, input: &PixelBuffer) -> Result<PixelBuffer> {
        debug!("operation {} on {}x{}", self, input.width(), input.height());
        match self {
            Self::Grayscale => grayscale(input),
            Self::LowPass => apply_kernel(input, &kernel::low_pass()),
            Self::HighPass => apply_kernel(input, &kernel::high_pass()),
            Self::Laplacian => apply_kernel(input, &kernel::laplacian()),
            Self::Sobel => detect_edges(input, EdgeDetector::Sobel),
            Self::Prewitt => detect_edges(input, EdgeDetector::Prewitt),
            Self::Roberts => detect_edges(input, EdgeDetector::Roberts),
            Self::Median(window) => median(input, window),
        }
    }
}

impl From<EdgeDetector> for Operation {
    fn from(detector: EdgeDetector) -> Self {
        match detector {
            EdgeDetector::Sobel => Self::Sobel,
            EdgeDetector::Prewitt => Self::Prewitt,
            EdgeDetector::Roberts => Self::Roberts,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.to_ascii_lowercase().replace(|c: char| c == '-' || c == ' ', "_");
        if let Ok(detector) = key.parse::<EdgeDetector>() {
            return Ok(detector.into());
        }
        Self::ALL
            .into_iter()
            .find(|op| op.name() == key)
            .or(match key.as_str() {
                "gray" | "greyscale" => Some(Self::Grayscale),
                "median" => Some(Self::Median(MedianWindow::default())),
                _ => None,
            })
            .ok_or_else(|| EngineError::InvalidParameter(format!("unknown operation '{s}'")))
    }
}
