//! Owned, unpadded pixel storage.
//!
//! A [`PixelBuffer`] always satisfies
//! `bytes.len() == width * height * format.bytes_per_pixel()`. Native bitmaps
//! usually pad every row to a 4-byte boundary ("stride"); that padding is
//! stripped on construction and only re-added by [`PixelBuffer::to_strided`].

use ndarray::{Array2, Array3, ArrayView3};

use crate::error::{EngineError, Result};
use crate::pixel::{Pixel, PixelFormat};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    format: PixelFormat,
    bytes: Vec<u8>,
}

fn checked_len(width: usize, height: usize, format: PixelFormat) -> Result<usize> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(format.bytes_per_pixel()))
        .ok_or_else(|| {
            EngineError::InvalidDimensions(format!("{width}x{height} overflows usize"))
        })
}

impl PixelBuffer {
    /// Zero-filled buffer.
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Result<Self> {
        let len = checked_len(width, height, format)?;
        Ok(PixelBuffer {
            width,
            height,
            format,
            bytes: vec![0u8; len],
        })
    }

    /// Wrap already unpadded bytes.
    pub fn from_vec(bytes: Vec<u8>, width: usize, height: usize, format: PixelFormat) -> Result<Self> {
        let len = checked_len(width, height, format)?;
        if bytes.len() != len {
            return Err(EngineError::InvalidDimensions(format!(
                "{width}x{height} {format:?} needs {len} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(PixelBuffer {
            width,
            height,
            format,
            bytes,
        })
    }

    /// Copy decoded pixel rows out of a possibly padded native buffer.
    ///
    /// Row `y` starts at `y * stride`; the trailing `stride - width * bpp`
    /// bytes of every row are discarded.
    pub fn from_raw_decoded(
        bytes: &[u8],
        width: usize,
        height: usize,
        stride: usize,
        format: PixelFormat,
    ) -> Result<Self> {
        let len = checked_len(width, height, format)?;
        let row_len = width * format.bytes_per_pixel();
        if stride < row_len {
            return Err(EngineError::InvalidDimensions(format!(
                "stride {stride} is smaller than width * bytes_per_pixel ({row_len})"
            )));
        }
        if height > 0 {
            let required = (height - 1)
                .checked_mul(stride)
                .and_then(|n| n.checked_add(row_len))
                .ok_or_else(|| EngineError::InvalidDimensions("stride overflows usize".into()))?;
            if bytes.len() < required {
                return Err(EngineError::InvalidDimensions(format!(
                    "{height} rows at stride {stride} need {required} bytes, got {}",
                    bytes.len()
                )));
            }
        }

        let mut pixels = Vec::with_capacity(len);
        for y in 0..height {
            let start = y * stride;
            pixels.extend_from_slice(&bytes[start..start + row_len]);
        }

        Ok(PixelBuffer {
            width,
            height,
            format,
            bytes: pixels,
        })
    }

    /// Build from a `(height, width, channels)` array; `format` must match the channel count.
    pub fn from_array(array: Array3<u8>, format: PixelFormat) -> Result<Self> {
        let (height, width, channels) = array.dim();
        if channels != format.bytes_per_pixel() {
            return Err(EngineError::InvalidDimensions(format!(
                "{format:?} needs {} channels, array has {channels}",
                format.bytes_per_pixel()
            )));
        }
        let bytes = if array.is_standard_layout() {
            array.into_raw_vec_and_offset().0
        } else {
            array.iter().copied().collect()
        };
        Self::from_vec(bytes, width, height, format)
    }

    /// View as a `(height, width, channels)` array.
    pub fn view(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(
            (self.height, self.width, self.format.bytes_per_pixel()),
            &self.bytes,
        )
        .expect("buffer length always matches its dimensions")
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    /// Bytes per unpadded row.
    #[inline]
    pub fn row_len(&self) -> usize {
        self.width * self.format.bytes_per_pixel()
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Same width, height and format.
    pub fn same_shape(&self, other: &PixelBuffer) -> bool {
        self.width == other.width && self.height == other.height && self.format == other.format
    }

    /// Unpadded copy of the pixel bytes.
    pub fn to_raw_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// Copy of the pixel bytes with every row padded to `stride` bytes (padding is zero).
    pub fn to_strided(&self, stride: usize) -> Result<Vec<u8>> {
        let row_len = self.row_len();
        if stride < row_len {
            return Err(EngineError::InvalidDimensions(format!(
                "stride {stride} is smaller than row length {row_len}"
            )));
        }
        let len = stride.checked_mul(self.height).ok_or_else(|| {
            EngineError::InvalidDimensions(format!(
                "{} rows at stride {stride} overflow usize",
                self.height
            ))
        })?;
        let mut out = vec![0u8; len];
        if row_len > 0 {
            for (dst, src) in out.chunks_mut(stride).zip(self.bytes.chunks(row_len)) {
                dst[..row_len].copy_from_slice(src);
            }
        }
        Ok(out)
    }

    fn offset(&self, x: usize, y: usize) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(EngineError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((y * self.width + x) * self.format.bytes_per_pixel())
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Result<Pixel> {
        let i = self.offset(x, y)?;
        Ok(Pixel::read(&self.bytes[i..], self.format))
    }

    /// Channels are clamped to 0-255 and rounded.
    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: Pixel) -> Result<()> {
        let i = self.offset(x, y)?;
        let bpp = self.format.bytes_per_pixel();
        pixel.write(&mut self.bytes[i..i + bpp], self.format);
        Ok(())
    }

    /// Every pixel as a `[row, col]` matrix.
    pub fn pixel_matrix(&self) -> Array2<Pixel> {
        let bpp = self.format.bytes_per_pixel();
        Array2::from_shape_fn((self.height, self.width), |(y, x)| {
            let i = (y * self.width + x) * bpp;
            Pixel::read(&self.bytes[i..i + bpp], self.format)
        })
    }

    /// Inverse of [`pixel_matrix`](Self::pixel_matrix). Pixels without alpha
    /// are stored opaque in formats that carry one.
    pub fn from_pixel_matrix(matrix: &Array2<Pixel>, format: PixelFormat) -> Result<Self> {
        let (height, width) = matrix.dim();
        let mut buffer = Self::new(width, height, format)?;
        let bpp = format.bytes_per_pixel();
        for ((y, x), pixel) in matrix.indexed_iter() {
            let i = (y * width + x) * bpp;
            let dst = &mut buffer.bytes[i..i + bpp];
            if let Some(ai) = format.alpha_offset() {
                dst[ai] = 255;
            }
            pixel.write(dst, format);
        }
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_bytes() -> Vec<u8> {
        (1..=9u8).flat_map(|v| [v, v, v]).collect()
    }

    #[test]
    fn test_from_raw_decoded_strips_padding() {
        // 2x2 RGB, stride 8 (2 bytes of padding per row)
        let raw = [1, 2, 3, 4, 5, 6, 0xEE, 0xEE, 7, 8, 9, 10, 11, 12, 0xEE, 0xEE];
        let buf = PixelBuffer::from_raw_decoded(&raw, 2, 2, 8, PixelFormat::Rgb8).unwrap();
        assert_eq!(buf.to_raw_bytes(), vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_from_raw_decoded_short_last_row() {
        // Last row does not need its padding to be present
        let raw = [1, 2, 3, 0, 4, 5, 6];
        let buf = PixelBuffer::from_raw_decoded(&raw, 1, 2, 4, PixelFormat::Rgb8).unwrap();
        assert_eq!(buf.bytes(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_from_raw_decoded_rejects_small_stride() {
        let raw = [0u8; 12];
        let err = PixelBuffer::from_raw_decoded(&raw, 2, 2, 5, PixelFormat::Rgb8).unwrap_err();
        assert!(matches!(err, EngineError::InvalidDimensions(_)));
    }

    #[test]
    fn test_from_raw_decoded_rejects_short_input() {
        let raw = [0u8; 10];
        let err = PixelBuffer::from_raw_decoded(&raw, 2, 2, 6, PixelFormat::Rgb8).unwrap_err();
        assert!(matches!(err, EngineError::InvalidDimensions(_)));
    }

    #[test]
    fn test_scenario_center_pixel() {
        let buf = PixelBuffer::from_vec(scenario_bytes(), 3, 3, PixelFormat::Rgb8).unwrap();
        assert_eq!(buf.get_pixel(1, 1).unwrap(), Pixel::rgb(5.0, 5.0, 5.0));
        assert_eq!(buf.get_pixel(2, 0).unwrap(), Pixel::rgb(3.0, 3.0, 3.0));
        assert_eq!(buf.get_pixel(0, 2).unwrap(), Pixel::rgb(7.0, 7.0, 7.0));
    }

    #[test]
    fn test_get_pixel_out_of_range() {
        let buf = PixelBuffer::new(3, 2, PixelFormat::Rgba8).unwrap();
        assert!(matches!(
            buf.get_pixel(3, 0),
            Err(EngineError::OutOfRange { x: 3, y: 0, .. })
        ));
        assert!(buf.get_pixel(0, 2).is_err());
    }

    #[test]
    fn test_set_pixel_bgra() {
        let mut buf = PixelBuffer::new(2, 1, PixelFormat::Bgra8).unwrap();
        buf.set_pixel(1, 0, Pixel::rgba(10.0, 20.0, 30.0, 40.0)).unwrap();
        assert_eq!(buf.bytes(), &[0, 0, 0, 0, 30, 20, 10, 40]);
        assert!(buf.set_pixel(2, 0, Pixel::rgb(0.0, 0.0, 0.0)).is_err());
    }

    #[test]
    fn test_to_strided_roundtrip() {
        let buf = PixelBuffer::from_vec(scenario_bytes(), 3, 3, PixelFormat::Rgb8).unwrap();
        let padded = buf.to_strided(12).unwrap();
        assert_eq!(padded.len(), 36);
        assert_eq!(&padded[9..12], &[0, 0, 0]);
        let back = PixelBuffer::from_raw_decoded(&padded, 3, 3, 12, PixelFormat::Rgb8).unwrap();
        assert_eq!(back, buf);
    }

    #[test]
    fn test_to_strided_overflow() {
        let buf = PixelBuffer::new(1, 3, PixelFormat::Rgb8).unwrap();
        assert!(matches!(
            buf.to_strided(usize::MAX / 2 + 1),
            Err(EngineError::InvalidDimensions(_))
        ));
        assert!(buf.to_strided(2).is_err());
    }

    #[test]
    fn test_pixel_matrix_layout() {
        let buf = PixelBuffer::from_vec(scenario_bytes(), 3, 3, PixelFormat::Rgb8).unwrap();
        let matrix = buf.pixel_matrix();
        assert_eq!(matrix[[0, 1]].r, 2.0);
        assert_eq!(matrix[[1, 0]].g, 4.0);
        assert_eq!(matrix[[2, 2]].b, 9.0);

        let back = PixelBuffer::from_pixel_matrix(&matrix, PixelFormat::Rgb8).unwrap();
        assert_eq!(back.to_raw_bytes(), scenario_bytes());
    }

    #[test]
    fn test_array_view_shape() {
        let buf = PixelBuffer::new(4, 2, PixelFormat::Rgba8).unwrap();
        assert_eq!(buf.view().dim(), (2, 4, 4));

        let arr = Array3::<u8>::from_elem((2, 4, 3), 7);
        let buf = PixelBuffer::from_array(arr, PixelFormat::Bgr8).unwrap();
        assert_eq!(buf.width(), 4);
        assert!(buf.bytes().iter().all(|&v| v == 7));
    }

    #[test]
    fn test_from_vec_length_mismatch() {
        assert!(PixelBuffer::from_vec(vec![0; 5], 1, 2, PixelFormat::Rgb8).is_err());
    }
}
