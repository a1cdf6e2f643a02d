//! Grayscale histogram and cumulative-distribution equalization.
//!
//! Intensities use the same truncating channel average as
//! [`grayscale`](crate::filters::grayscale): `(R + G + B) / 3`.

use log::debug;

use crate::buffer::PixelBuffer;
use crate::error::{EngineError, Result};

/// Default number of output levels for [`equalize`].
///
/// Cumulative probabilities are scaled by `levels - 1`, so the default maps
/// onto `0..=7` (a scale factor of 7).
pub const DEFAULT_EQUALIZATION_LEVELS: usize = 8;

/// Frequency of each gray intensity; counts sum to the pixel count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    counts: [u64; 256],
}

impl Default for Histogram {
    fn default() -> Self {
        Histogram { counts: [0; 256] }
    }
}

impl Histogram {
    #[inline]
    pub fn counts(&self) -> &[u64; 256] {
        &self.counts
    }

    #[inline]
    pub fn count(&self, level: u8) -> u64 {
        self.counts[level as usize]
    }

    /// Number of pixels counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Probability of each intensity; all zeros for an empty histogram.
    pub fn normalized(&self) -> [f64; 256] {
        let total = self.total();
        let mut p = [0.0f64; 256];
        if total > 0 {
            for (dst, &count) in p.iter_mut().zip(self.counts.iter()) {
                *dst = count as f64 / total as f64;
            }
        }
        p
    }

    /// Equalize against this histogram's own pixel count.
    pub fn equalize(&self, levels: usize) -> Result<EqualizationMap> {
        equalize(self, self.total(), levels)
    }
}

/// Count gray intensities of every pixel.
pub fn generate(input: &PixelBuffer) -> Histogram {
    let [ri, gi, bi] = input.format().color_offsets();
    let mut histogram = Histogram::default();

    for px in input.bytes().chunks_exact(input.bytes_per_pixel()) {
        let gray = (px[ri] as u32 + px[gi] as u32 + px[bi] as u32) / 3;
        histogram.counts[gray as usize] += 1;
    }

    debug!(
        "histogram: {}x{} -> {} samples",
        input.width(),
        input.height(),
        histogram.total()
    );
    histogram
}

/// Intensity remapping produced by [`equalize`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EqualizationMap {
    mapping: [u8; 256],
    levels: usize,
}

impl EqualizationMap {
    #[inline]
    pub fn mapping(&self) -> &[u8; 256] {
        &self.mapping
    }

    /// Output level for an input intensity, in `0..levels`.
    #[inline]
    pub fn map(&self, intensity: u8) -> u8 {
        self.mapping[intensity as usize]
    }

    #[inline]
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Probability mass of `histogram` that lands on each output level.
    ///
    /// Length is `levels`; sums to 1.0 for a non-empty histogram.
    pub fn equalized_histogram(&self, histogram: &Histogram) -> Vec<f64> {
        let mut out = vec![0.0f64; self.levels];
        for (level, p) in self.mapping.iter().zip(histogram.normalized()) {
            out[*level as usize] += p;
        }
        out
    }
}

/// Build the equalization map `floor(cdf[i] * (levels - 1))`.
///
/// `cdf[i]` is the running sum of `p[i] = counts[i] / total_pixels`.
/// A zero `total_pixels` yields an all-zero map. `levels` must be in `2..=256`.
pub fn equalize(histogram: &Histogram, total_pixels: u64, levels: usize) -> Result<EqualizationMap> {
    if !(2..=256).contains(&levels) {
        return Err(EngineError::InvalidParameter(format!(
            "equalization levels must be in 2..=256, got {levels}"
        )));
    }

    let mut mapping = [0u8; 256];
    if total_pixels > 0 {
        let max_level = (levels - 1) as f64;
        // Running count keeps cdf exact at the top end
        let mut cumulative = 0u64;
        for (dst, &count) in mapping.iter_mut().zip(histogram.counts.iter()) {
            cumulative += count;
            let cdf = cumulative as f64 / total_pixels as f64;
            *dst = (cdf * max_level).floor().clamp(0.0, max_level) as u8;
        }
    }

    Ok(EqualizationMap { mapping, levels })
}
