//! Square, odd-sized weight matrices and the named preset tables.
//!
//! Weights are applied as-is; nothing is normalized implicitly. A box blur
//! therefore needs its `1/9` weights spelled out, which [`low_pass`] does.

use ndarray::{arr2, Array2};

use crate::error::{EngineError, Result};

/// Immutable convolution kernel anchored at its center cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    weights: Array2<f64>,
}

impl Kernel {
    /// Validate and wrap a weight matrix.
    ///
    /// Fails with [`EngineError::InvalidKernel`] unless the matrix is
    /// non-empty, square and odd-sized.
    pub fn new(weights: Array2<f64>) -> Result<Self> {
        let (rows, cols) = weights.dim();
        if rows == 0 || rows != cols || rows % 2 == 0 {
            return Err(EngineError::InvalidKernel(format!(
                "expected a square odd-sized matrix, got {rows}x{cols}"
            )));
        }
        Ok(Kernel { weights })
    }

    /// Build from row-major weights; `weights.len()` must be a square of an odd number.
    pub fn from_slice(weights: &[f64]) -> Result<Self> {
        let size = (weights.len() as f64).sqrt() as usize;
        if size * size != weights.len() {
            return Err(EngineError::InvalidKernel(format!(
                "{} weights do not form a square matrix",
                weights.len()
            )));
        }
        let matrix = Array2::from_shape_vec((size, size), weights.to_vec())
            .map_err(|e| EngineError::InvalidKernel(e.to_string()))?;
        Self::new(matrix)
    }

    /// Every cell set to `weight`.
    pub fn uniform(size: usize, weight: f64) -> Result<Self> {
        Self::new(Array2::from_elem((size, size), weight))
    }

    /// Side length.
    #[inline]
    pub fn size(&self) -> usize {
        self.weights.nrows()
    }

    /// Distance from the anchor to the edge: `(size - 1) / 2`.
    #[inline]
    pub fn radius(&self) -> usize {
        (self.size() - 1) / 2
    }

    #[inline]
    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    #[inline]
    pub fn weight(&self, row: usize, col: usize) -> f64 {
        self.weights[[row, col]]
    }

    pub fn sum(&self) -> f64 {
        self.weights.sum()
    }
}

// ============================================================================
// Presets
// ============================================================================

/// 3x3 box blur, `1/9` per cell.
pub fn low_pass() -> Kernel {
    Kernel {
        weights: Array2::from_elem((3, 3), 1.0 / 9.0),
    }
}

/// The two high-pass tables that circulate for this tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HighPassVariant {
    /// Center 8, neighbors -1.
    #[default]
    Standard,
    /// Center 2, neighbors -1/4.
    Mild,
}

/// Canonical 3x3 high-pass: center 8, neighbors -1.
pub fn high_pass() -> Kernel {
    high_pass_variant(HighPassVariant::Standard)
}

pub fn high_pass_variant(variant: HighPassVariant) -> Kernel {
    let (center, neighbor) = match variant {
        HighPassVariant::Standard => (8.0, -1.0),
        HighPassVariant::Mild => (2.0, -0.25),
    };
    let mut weights = Array2::from_elem((3, 3), neighbor);
    weights[[1, 1]] = center;
    Kernel { weights }
}

pub fn laplacian() -> Kernel {
    Kernel {
        weights: arr2(&[[0.0, -1.0, 0.0], [-1.0, 4.0, -1.0], [0.0, -1.0, 0.0]]),
    }
}

/// Sobel pair `(x, y)`: the x kernel responds to vertical edges.
pub fn sobel() -> (Kernel, Kernel) {
    (
        Kernel {
            weights: arr2(&[[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]]),
        },
        Kernel {
            weights: arr2(&[[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]]),
        },
    )
}

/// Prewitt pair `(x, y)`.
pub fn prewitt() -> (Kernel, Kernel) {
    (
        Kernel {
            weights: arr2(&[[-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0]]),
        },
        Kernel {
            weights: arr2(&[[-1.0, -1.0, -1.0], [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]),
        },
    )
}

/// Roberts cross pair `(x, y)`, the 2x2 cross embedded at the center of a 3x3 kernel.
pub fn roberts() -> (Kernel, Kernel) {
    (
        Kernel {
            weights: arr2(&[[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]]),
        },
        Kernel {
            weights: arr2(&[[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, -1.0, 0.0]]),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_even_and_non_square() {
        assert!(matches!(
            Kernel::new(Array2::zeros((2, 2))),
            Err(EngineError::InvalidKernel(_))
        ));
        assert!(Kernel::new(Array2::zeros((3, 5))).is_err());
        assert!(Kernel::new(Array2::zeros((0, 0))).is_err());
        assert!(Kernel::from_slice(&[1.0; 8]).is_err());
    }

    #[test]
    fn test_radius() {
        assert_eq!(Kernel::uniform(1, 1.0).unwrap().radius(), 0);
        assert_eq!(Kernel::uniform(5, 1.0).unwrap().radius(), 2);
        assert_eq!(Kernel::from_slice(&[0.0; 49]).unwrap().radius(), 3);
    }

    #[test]
    fn test_preset_sums() {
        assert!((low_pass().sum() - 1.0).abs() < 1e-12);
        assert_eq!(high_pass().sum(), 0.0);
        assert_eq!(high_pass_variant(HighPassVariant::Mild).sum(), 0.0);
        assert_eq!(laplacian().sum(), 0.0);
        for (kx, ky) in [sobel(), prewitt(), roberts()] {
            assert_eq!(kx.sum(), 0.0);
            assert_eq!(ky.sum(), 0.0);
            assert_eq!(kx.size(), 3);
        }
    }

    #[test]
    fn test_high_pass_tables() {
        assert_eq!(
            high_pass().weights(),
            &arr2(&[[-1.0, -1.0, -1.0], [-1.0, 8.0, -1.0], [-1.0, -1.0, -1.0]])
        );
        assert_eq!(
            high_pass_variant(HighPassVariant::Mild).weights(),
            &arr2(&[[-0.25, -0.25, -0.25], [-0.25, 2.0, -0.25], [-0.25, -0.25, -0.25]])
        );
    }

    #[test]
    fn test_low_pass_and_laplacian_tables() {
        assert!(low_pass().weights().iter().all(|&w| w == 1.0 / 9.0));
        assert_eq!(low_pass().size(), 3);
        assert_eq!(
            laplacian().weights(),
            &arr2(&[[0.0, -1.0, 0.0], [-1.0, 4.0, -1.0], [0.0, -1.0, 0.0]])
        );
    }

    #[test]
    fn test_gradient_pair_tables() {
        let (sx, sy) = sobel();
        assert_eq!(sx.weights(), &arr2(&[[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]]));
        assert_eq!(sy.weights(), &arr2(&[[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]]));

        let (px, py) = prewitt();
        assert_eq!(px.weights(), &arr2(&[[-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0]]));
        assert_eq!(py.weights(), &arr2(&[[-1.0, -1.0, -1.0], [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]));

        let (rx, ry) = roberts();
        assert_eq!(rx.weights(), &arr2(&[[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]]));
        assert_eq!(ry.weights(), &arr2(&[[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, -1.0, 0.0]]));
    }
}
