//! Pixel formats and the transient per-pixel view.
//!
//! ## Supported Formats
//!
//! | Format | Bytes | Layout | Notes |
//! |--------|-------|--------|-------|
//! | Rgb8 | 3 | R, G, B | |
//! | Rgba8 | 4 | R, G, B, A | |
//! | Bgr8 | 3 | B, G, R | Windows/GDI bitmap order |
//! | Bgra8 | 4 | B, G, R, A | Windows/GDI bitmap order |
//!
//! Every format stores 8 bits per channel.

use std::fmt;

use crate::error::{EngineError, Result};

/// Byte layout of one pixel inside a [`PixelBuffer`](crate::PixelBuffer).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    Rgb8,
    #[default]
    Rgba8,
    Bgr8,
    Bgra8,
}

impl PixelFormat {
    /// Number of bytes (= channels) per pixel: 3 or 4.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb8 | Self::Bgr8 => 3,
            Self::Rgba8 | Self::Bgra8 => 4,
        }
    }

    #[inline]
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::Rgba8 | Self::Bgra8)
    }

    /// Byte offsets of the red, green and blue channels within a pixel.
    #[inline]
    pub const fn color_offsets(self) -> [usize; 3] {
        match self {
            Self::Rgb8 | Self::Rgba8 => [0, 1, 2],
            Self::Bgr8 | Self::Bgra8 => [2, 1, 0],
        }
    }

    #[inline]
    pub const fn alpha_offset(self) -> Option<usize> {
        if self.has_alpha() {
            Some(3)
        } else {
            None
        }
    }

    /// RGB-ordered format for a channel count, as used by `(H, W, C)` arrays.
    pub fn from_channels(channels: usize) -> Result<Self> {
        match channels {
            3 => Ok(Self::Rgb8),
            4 => Ok(Self::Rgba8),
            n => Err(EngineError::InvalidDimensions(format!(
                "expected 3 or 4 channels, got {n}"
            ))),
        }
    }
}

/// Real-valued channels of one pixel.
///
/// Values are accumulated as `f64` so that weighted sums never overflow,
/// then clamped to 0-255 when written back with [`Pixel::channel_to_u8`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pixel {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    /// Present only for formats with an alpha channel.
    pub a: Option<f64>,
}

impl Pixel {
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Pixel { r, g, b, a: None }
    }

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Pixel { r, g, b, a: Some(a) }
    }

    /// Read a pixel out of `bytes`, which must hold at least one pixel of `format`.
    #[inline]
    pub(crate) fn read(bytes: &[u8], format: PixelFormat) -> Self {
        let [ri, gi, bi] = format.color_offsets();
        Pixel {
            r: bytes[ri] as f64,
            g: bytes[gi] as f64,
            b: bytes[bi] as f64,
            a: format.alpha_offset().map(|ai| bytes[ai] as f64),
        }
    }

    /// Write this pixel into `bytes`. A missing alpha leaves the stored alpha untouched.
    #[inline]
    pub(crate) fn write(&self, bytes: &mut [u8], format: PixelFormat) {
        let [ri, gi, bi] = format.color_offsets();
        bytes[ri] = Self::channel_to_u8(self.r);
        bytes[gi] = Self::channel_to_u8(self.g);
        bytes[bi] = Self::channel_to_u8(self.b);
        if let (Some(ai), Some(a)) = (format.alpha_offset(), self.a) {
            bytes[ai] = Self::channel_to_u8(a);
        }
    }

    /// Clamp to 0-255 and round to the nearest integer.
    #[inline]
    pub fn channel_to_u8(value: f64) -> u8 {
        value.clamp(0.0, 255.0).round() as u8
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.a {
            Some(a) => write!(f, "R:{} G:{} B:{} A:{}", self.r, self.g, self.b, a),
            None => write!(f, "R:{} G:{} B:{}", self.r, self.g, self.b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bgra_offsets() {
        assert_eq!(PixelFormat::Bgra8.color_offsets(), [2, 1, 0]);
        assert_eq!(PixelFormat::Bgra8.alpha_offset(), Some(3));
        assert_eq!(PixelFormat::Bgr8.alpha_offset(), None);
    }

    #[test]
    fn test_read_write_bgr() {
        let bytes = [10u8, 20, 30];
        let px = Pixel::read(&bytes, PixelFormat::Bgr8);
        assert_eq!(px, Pixel::rgb(30.0, 20.0, 10.0));

        let mut out = [0u8; 3];
        px.write(&mut out, PixelFormat::Bgr8);
        assert_eq!(out, bytes);
    }

    #[test]
    fn test_channel_to_u8_clamps() {
        assert_eq!(Pixel::channel_to_u8(-12.0), 0);
        assert_eq!(Pixel::channel_to_u8(300.0), 255);
        assert_eq!(Pixel::channel_to_u8(44.999_999), 45);
    }

    #[test]
    fn test_from_channels_rejects_gray() {
        assert!(PixelFormat::from_channels(1).is_err());
        assert_eq!(PixelFormat::from_channels(4), Ok(PixelFormat::Rgba8));
    }
}
