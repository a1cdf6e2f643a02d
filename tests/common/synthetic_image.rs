use pixel_engine::{PixelBuffer, PixelFormat};

/// Every channel of every pixel set to `value`; alpha (if any) opaque.
pub fn flat(width: usize, height: usize, format: PixelFormat, value: u8) -> PixelBuffer {
    let bpp = format.bytes_per_pixel();
    let mut bytes = vec![value; width * height * bpp];
    if let Some(ai) = format.alpha_offset() {
        for px in bytes.chunks_mut(bpp) {
            px[ai] = 255;
        }
    }
    PixelBuffer::from_vec(bytes, width, height, format).expect("flat image dimensions")
}

/// Deterministic pseudo-random pixels (LCG), alpha included.
pub fn noise(width: usize, height: usize, format: PixelFormat, seed: u32) -> PixelBuffer {
    let mut state = seed.wrapping_add(1);
    let bytes = (0..width * height * format.bytes_per_pixel())
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (state >> 16) as u8
        })
        .collect();
    PixelBuffer::from_vec(bytes, width, height, format).expect("noise image dimensions")
}

/// Checkerboard alternating between 32 and 220 in all color channels.
pub fn checkerboard(width: usize, height: usize, cell: usize, format: PixelFormat) -> PixelBuffer {
    assert!(cell > 0, "cell size must be positive");
    let bpp = format.bytes_per_pixel();
    let mut bytes = vec![255u8; width * height * bpp];
    for y in 0..height {
        for x in 0..width {
            let val = if ((x / cell) + (y / cell)) % 2 == 0 { 32 } else { 220 };
            let i = (y * width + x) * bpp;
            for c in format.color_offsets() {
                bytes[i + c] = val;
            }
        }
    }
    PixelBuffer::from_vec(bytes, width, height, format).expect("checkerboard dimensions")
}

/// `bytes` with every row padded out to `stride` using `fill`.
pub fn pad_rows(bytes: &[u8], row_len: usize, stride: usize, fill: u8) -> Vec<u8> {
    bytes
        .chunks(row_len)
        .flat_map(|row| {
            let mut padded = row.to_vec();
            padded.resize(stride, fill);
            padded
        })
        .collect()
}
