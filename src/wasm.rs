//! WebAssembly exports for the pixel engine.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images are
//! flat, unpadded byte arrays (`ImageData.data` layout); `channels` is 3 or 4.
//! Errors are raised as JavaScript exceptions carrying the error message.

use wasm_bindgen::prelude::*;

use crate::buffer::PixelBuffer;
use crate::error::EngineError;
use crate::filters::bitwise::{combine, BitwiseOp};
use crate::filters::histogram::generate;
use crate::filters::median::MedianWindow;
use crate::operation::Operation;
use crate::pixel::PixelFormat;

fn to_js(err: EngineError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_buffer(data: &[u8], width: usize, height: usize, channels: usize) -> Result<PixelBuffer, JsValue> {
    let format = PixelFormat::from_channels(channels).map_err(to_js)?;
    PixelBuffer::from_vec(data.to_vec(), width, height, format).map_err(to_js)
}

// ============================================================================
// Single-image Operations
// ============================================================================

/// Apply a named operation.
///
/// # Arguments
/// * `data` - Flat array of pixel bytes (length = width * height * channels)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `channels` - 3 (RGB) or 4 (RGBA)
/// * `operation` - "grayscale", "low_pass", "high_pass", "laplacian", "sobel",
///   "prewitt", "roberts", "median3", "median5" or "median7"
///
/// # Returns
/// Flat array of pixel bytes with the same layout
#[wasm_bindgen]
pub fn apply_operation_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    operation: &str,
) -> Result<Vec<u8>, JsValue> {
    let op: Operation = operation.parse().map_err(to_js)?;
    let input = to_buffer(data, width, height, channels)?;
    let result = op.apply(&input).map_err(to_js)?;
    Ok(result.into_bytes())
}

/// Median filter with a 3, 5 or 7 pixel window.
#[wasm_bindgen]
pub fn median_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    window: usize,
) -> Result<Vec<u8>, JsValue> {
    let window = MedianWindow::try_from(window).map_err(to_js)?;
    let input = to_buffer(data, width, height, channels)?;
    let result = Operation::Median(window).apply(&input).map_err(to_js)?;
    Ok(result.into_bytes())
}

// ============================================================================
// Histogram
// ============================================================================

/// Gray-level counts (256 entries).
#[wasm_bindgen]
pub fn histogram_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
) -> Result<Vec<u32>, JsValue> {
    let input = to_buffer(data, width, height, channels)?;
    let histogram = generate(&input);
    Ok(histogram.counts().iter().map(|&c| c.min(u32::MAX as u64) as u32).collect())
}

/// Equalization map (256 entries, each in `0..levels`).
#[wasm_bindgen]
pub fn equalization_map_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    levels: usize,
) -> Result<Vec<u8>, JsValue> {
    let input = to_buffer(data, width, height, channels)?;
    let map = generate(&input).equalize(levels).map_err(to_js)?;
    Ok(map.mapping().to_vec())
}

// ============================================================================
// Bitwise Combination
// ============================================================================

/// Byte-wise "and", "or" or "xor" of two equally sized images.
#[wasm_bindgen]
pub fn bitwise_wasm(
    a: &[u8],
    b: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    operation: &str,
) -> Result<Vec<u8>, JsValue> {
    let op: BitwiseOp = operation.parse().map_err(to_js)?;
    let a = to_buffer(a, width, height, channels)?;
    let b = to_buffer(b, width, height, channels)?;
    let result = combine(&a, &b, op).map_err(to_js)?;
    Ok(result.into_bytes())
}
