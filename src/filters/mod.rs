//! Stateless image operations.
//!
//! ## Supported Formats
//!
//! Every filter accepts a [`PixelBuffer`](crate::PixelBuffer) in any
//! [`PixelFormat`](crate::PixelFormat): 3 channels (RGB or BGR) or 4
//! channels (RGBA or BGRA), 8 bits per channel.
//!
//! ## Architecture
//!
//! All filters follow these principles:
//! - **Pure** - input is borrowed, a new buffer is returned
//! - **Border copy-through** - neighborhood filters leave pixels without a full window unchanged
//! - **Clamped** - sums are accumulated as `f64` and clamped to 0-255
//! - **Parallel rows** - neighborhood filters use rayon; output is identical to a sequential run
//!
//! ## Filter Categories
//!
//! - **Point**: grayscale
//! - **Convolution**: apply_kernel (low-pass, high-pass, laplacian presets)
//! - **Gradient**: apply_gradient, edge detectors (sobel, prewitt, roberts)
//! - **Order statistic**: median (3x3, 5x5, 7x7)
//! - **Statistics**: histogram, equalization map
//! - **Two-image**: bitwise and / or / xor

pub mod bitwise;
pub mod convolution;
pub mod edge;
pub mod grayscale;
pub mod histogram;
pub mod kernel;
pub mod median;
