//! Grayscale conversion by channel average.
//!
//! `gray = (R + G + B) / 3` with integer truncation, written to all three
//! color channels. Alpha is preserved. The operation is idempotent.

use log::debug;

use crate::buffer::PixelBuffer;
use crate::error::Result;

/// Truncating average of the color channels of one pixel.
#[inline]
pub fn average_gray(r: u8, g: u8, b: u8) -> u8 {
    ((r as u16 + g as u16 + b as u16) / 3) as u8
}

/// Convert to grayscale.
///
/// # Arguments
/// * `input` - Image with 3 or 4 channels
///
/// # Returns
/// New image with R, G and B each set to [`average_gray`]; alpha preserved
pub fn grayscale(input: &PixelBuffer) -> Result<PixelBuffer> {
    debug!(
        "grayscale: {}x{} {:?}",
        input.width(),
        input.height(),
        input.format()
    );

    let [ri, gi, bi] = input.format().color_offsets();
    let mut output = input.to_raw_bytes();

    for px in output.chunks_exact_mut(input.bytes_per_pixel()) {
        let gray = average_gray(px[ri], px[gi], px[bi]);
        px[ri] = gray;
        px[gi] = gray;
        px[bi] = gray;
    }

    PixelBuffer::from_vec(output, input.width(), input.height(), input.format())
}
