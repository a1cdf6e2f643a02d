//! Kernel convolution: single-kernel filters and gradient magnitude.
//!
//! "Convolution" here is correlation: the kernel is not flipped, so the
//! weight at `[0, 0]` multiplies the top-left neighbor.
//!
//! ## Border Policy
//!
//! Only pixels whose whole `size x size` window lies inside the image are
//! computed. The remaining band, `radius` pixels wide, is copied unchanged
//! from the input (alpha included).
//!
//! ## Channels
//!
//! R, G and B are convolved independently. Alpha, when present, is forced to
//! 255 on every computed pixel.
//!
//! Output rows are computed in parallel with Rayon; each output pixel reads
//! only the input, so results do not depend on scheduling.

use log::{debug, trace};
use rayon::prelude::*;

use crate::buffer::PixelBuffer;
use crate::error::{EngineError, Result};
use crate::filters::kernel::Kernel;
use crate::pixel::{Pixel, PixelFormat};

/// Read-only input plus the layout needed to address it.
struct Source<'a> {
    bytes: &'a [u8],
    row_len: usize,
    bpp: usize,
    offsets: [usize; 3],
}

impl<'a> Source<'a> {
    fn new(buffer: &'a PixelBuffer) -> Self {
        Source {
            bytes: buffer.bytes(),
            row_len: buffer.row_len(),
            bpp: buffer.bytes_per_pixel(),
            offsets: buffer.format().color_offsets(),
        }
    }

    /// Weighted R, G, B sums of the window centered on `(x, y)`.
    #[inline]
    fn window_sum(&self, kernel: &Kernel, x: usize, y: usize) -> [f64; 3] {
        let size = kernel.size();
        let radius = kernel.radius();
        let [ri, gi, bi] = self.offsets;
        let mut sum = [0.0f64; 3];

        for ky in 0..size {
            let line = &self.bytes[(y + ky - radius) * self.row_len..];
            for kx in 0..size {
                let w = kernel.weight(ky, kx);
                let i = (x + kx - radius) * self.bpp;
                sum[0] += line[i + ri] as f64 * w;
                sum[1] += line[i + gi] as f64 * w;
                sum[2] += line[i + bi] as f64 * w;
            }
        }

        sum
    }
}

#[inline]
fn has_interior(buffer: &PixelBuffer, radius: usize) -> bool {
    buffer.width() > 2 * radius && buffer.height() > 2 * radius
}

/// Write computed channels into `row` at column `x`, making alpha opaque.
#[inline]
fn store(row: &mut [u8], x: usize, bpp: usize, format: PixelFormat, rgb: [f64; 3]) {
    let [ri, gi, bi] = format.color_offsets();
    let o = x * bpp;
    row[o + ri] = Pixel::channel_to_u8(rgb[0]);
    row[o + gi] = Pixel::channel_to_u8(rgb[1]);
    row[o + bi] = Pixel::channel_to_u8(rgb[2]);
    if let Some(ai) = format.alpha_offset() {
        row[o + ai] = 255;
    }
}

/// Apply `per_pixel` to every interior pixel of a copy of `input`.
fn map_interior<F>(input: &PixelBuffer, radius: usize, per_pixel: F) -> Result<PixelBuffer>
where
    F: Fn(usize, usize) -> [f64; 3] + Sync,
{
    let (width, height) = (input.width(), input.height());
    let format = input.format();
    let bpp = input.bytes_per_pixel();
    let mut output = input.to_raw_bytes();

    if has_interior(input, radius) {
        output
            .par_chunks_mut(input.row_len())
            .enumerate()
            .skip(radius)
            .take(height - 2 * radius)
            .for_each(|(y, row)| {
                for x in radius..width - radius {
                    store(row, x, bpp, format, per_pixel(x, y));
                }
            });
    }

    PixelBuffer::from_vec(output, width, height, format)
}

/// Correlate `input` with `kernel`.
///
/// # Arguments
/// * `input` - Image with 3 or 4 channels in any [`PixelFormat`]
/// * `kernel` - Square, odd-sized weights, applied without normalization
///
/// # Returns
/// New image of the same shape. Each channel sum is clamped to 0-255 and
/// alpha is set to 255; pixels closer than `kernel.radius()` to an edge are
/// copied unchanged.
pub fn apply_kernel(input: &PixelBuffer, kernel: &Kernel) -> Result<PixelBuffer> {
    debug!(
        "apply_kernel: {}x{} {:?}, kernel {}x{}",
        input.width(),
        input.height(),
        input.format(),
        kernel.size(),
        kernel.size()
    );
    trace!("apply_kernel weights: {:?}", kernel.weights());

    let src = Source::new(input);
    map_interior(input, kernel.radius(), |x, y| src.window_sum(kernel, x, y))
}

/// Gradient magnitude `sqrt(gx² + gy²)` per channel.
///
/// # Arguments
/// * `input` - Image with 3 or 4 channels
/// * `kernel_x` - Horizontal derivative kernel
/// * `kernel_y` - Vertical derivative kernel, same size as `kernel_x`
///
/// # Returns
/// New image with magnitudes clamped to 0-255 and opaque alpha; border
/// pixels copied unchanged. [`EngineError::InvalidKernel`] if the kernel
/// sizes differ.
pub fn apply_gradient(input: &PixelBuffer, kernel_x: &Kernel, kernel_y: &Kernel) -> Result<PixelBuffer> {
    if kernel_x.size() != kernel_y.size() {
        return Err(EngineError::InvalidKernel(format!(
            "gradient kernels differ in size: {} vs {}",
            kernel_x.size(),
            kernel_y.size()
        )));
    }
    debug!(
        "apply_gradient: {}x{} {:?}, kernels {}x{}",
        input.width(),
        input.height(),
        input.format(),
        kernel_x.size(),
        kernel_x.size()
    );

    let src = Source::new(input);
    map_interior(input, kernel_x.radius(), |x, y| {
        let gx = src.window_sum(kernel_x, x, y);
        let gy = src.window_sum(kernel_y, x, y);
        [
            (gx[0] * gx[0] + gy[0] * gy[0]).sqrt(),
            (gx[1] * gx[1] + gy[1] * gy[1]).sqrt(),
            (gx[2] * gx[2] + gy[2] * gy[2]).sqrt(),
        ]
    })
}
