//! Pixel Engine
//!
//! Pixel-buffer manipulation for an image editor: grayscale conversion,
//! kernel convolution, gradient edge detection, median filtering, histogram
//! equalization and bitwise combination of two images.
//!
//! ## Image Format
//! Buffers are flat, unpadded, row-major bytes with 3 or 4 channels:
//! - **RGB / BGR**: 3 bytes per pixel
//! - **RGBA / BGRA**: 4 bytes per pixel
//!
//! Row padding from native bitmaps is removed on the way in
//! ([`PixelBuffer::from_raw_decoded`], [`adapter::read_buffer`]) and restored
//! on the way out ([`adapter::write_buffer`]).
//!
//! ## Operations
//! Every operation borrows its input and returns a new buffer. Named
//! single-image operations are listed in [`Operation`]; two-image operations
//! are in [`filters::bitwise`].
//!
//! ## Bindings
//! - `python` feature: PyO3 module over numpy `(H, W, C)` u8 arrays
//! - `wasm` feature: wasm-bindgen exports over flat byte slices

pub mod adapter;
pub mod buffer;
pub mod error;
pub mod filters;
pub mod operation;
pub mod pixel;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use buffer::PixelBuffer;
pub use error::{EngineError, Result};
pub use filters::bitwise::{combine, BitwiseOp};
pub use filters::histogram::{EqualizationMap, Histogram, DEFAULT_EQUALIZATION_LEVELS};
pub use filters::kernel::Kernel;
pub use filters::median::MedianWindow;
pub use operation::Operation;
pub use pixel::{Pixel, PixelFormat};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray1, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::buffer::PixelBuffer;
    use crate::error::EngineError;
    use crate::filters::bitwise::{combine, BitwiseOp};
    use crate::filters::convolution;
    use crate::filters::histogram::{generate, DEFAULT_EQUALIZATION_LEVELS};
    use crate::filters::kernel::Kernel;
    use crate::filters::median::MedianWindow;
    use crate::operation::Operation;
    use crate::pixel::PixelFormat;

    impl From<EngineError> for PyErr {
        fn from(err: EngineError) -> PyErr {
            PyValueError::new_err(err.to_string())
        }
    }

    fn to_buffer(image: PyReadonlyArray3<'_, u8>) -> PyResult<PixelBuffer> {
        let array = image.as_array().to_owned();
        let format = PixelFormat::from_channels(array.dim().2)?;
        Ok(PixelBuffer::from_array(array, format)?)
    }

    fn to_pyarray<'py>(py: Python<'py>, buffer: PixelBuffer) -> Bound<'py, PyArray3<u8>> {
        buffer.view().to_owned().into_pyarray(py)
    }

    fn run<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        op: Operation,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = to_buffer(image)?;
        let result = py.allow_threads(|| op.apply(&input))?;
        Ok(to_pyarray(py, result))
    }

    // ========================================================================
    // Point and Convolution Filters
    // ========================================================================

    /// Average R, G and B into all three channels. Alpha preserved.
    #[pyfunction]
    pub fn grayscale<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, Operation::Grayscale)
    }

    #[pyfunction]
    pub fn low_pass<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, Operation::LowPass)
    }

    #[pyfunction]
    pub fn high_pass<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, Operation::HighPass)
    }

    #[pyfunction]
    pub fn laplacian<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, Operation::Laplacian)
    }

    /// Correlate with a caller-supplied square, odd-sized kernel.
    ///
    /// # Arguments
    /// * `image` - Input image (3 or 4 channels)
    /// * `weights` - Row-major kernel weights (9, 25, 49, ... values)
    #[pyfunction]
    pub fn apply_kernel<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        weights: Vec<f64>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = to_buffer(image)?;
        let kernel = Kernel::from_slice(&weights)?;
        let result = py.allow_threads(|| convolution::apply_kernel(&input, &kernel))?;
        Ok(to_pyarray(py, result))
    }

    // ========================================================================
    // Edge Detection
    // ========================================================================

    #[pyfunction]
    pub fn sobel<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, Operation::Sobel)
    }

    #[pyfunction]
    pub fn prewitt<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, Operation::Prewitt)
    }

    #[pyfunction]
    pub fn roberts<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, Operation::Roberts)
    }

    // ========================================================================
    // Median, Histogram, Bitwise
    // ========================================================================

    /// Median filter; `window` is 3, 5 or 7.
    #[pyfunction]
    #[pyo3(signature = (image, window=3))]
    pub fn median<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        window: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let window = MedianWindow::try_from(window)?;
        run(py, image, Operation::Median(window))
    }

    /// Gray-level counts (256 entries).
    #[pyfunction]
    pub fn histogram<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray1<u64>>> {
        let input = to_buffer(image)?;
        let counts = generate(&input).counts().to_vec();
        Ok(counts.into_pyarray(py))
    }

    /// Equalization map (256 entries, each in `0..levels`).
    #[pyfunction]
    #[pyo3(signature = (image, levels=DEFAULT_EQUALIZATION_LEVELS))]
    pub fn equalization_map<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        levels: usize,
    ) -> PyResult<Bound<'py, PyArray1<u8>>> {
        let input = to_buffer(image)?;
        let map = generate(&input).equalize(levels)?;
        Ok(map.mapping().to_vec().into_pyarray(py))
    }

    /// Byte-wise combination; `op` is "and", "or" or "xor".
    #[pyfunction]
    pub fn bitwise<'py>(
        py: Python<'py>,
        a: PyReadonlyArray3<'py, u8>,
        b: PyReadonlyArray3<'py, u8>,
        op: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let op: BitwiseOp = op.parse()?;
        let a = to_buffer(a)?;
        let b = to_buffer(b)?;
        let result = combine(&a, &b, op)?;
        Ok(to_pyarray(py, result))
    }

    /// Pixel Engine extension module
    #[pymodule]
    pub fn pixel_engine(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Point and convolution filters
        m.add_function(wrap_pyfunction!(grayscale, m)?)?;
        m.add_function(wrap_pyfunction!(low_pass, m)?)?;
        m.add_function(wrap_pyfunction!(high_pass, m)?)?;
        m.add_function(wrap_pyfunction!(laplacian, m)?)?;
        m.add_function(wrap_pyfunction!(apply_kernel, m)?)?;

        // Edge detection
        m.add_function(wrap_pyfunction!(sobel, m)?)?;
        m.add_function(wrap_pyfunction!(prewitt, m)?)?;
        m.add_function(wrap_pyfunction!(roberts, m)?)?;

        // Median, histogram, bitwise
        m.add_function(wrap_pyfunction!(median, m)?)?;
        m.add_function(wrap_pyfunction!(histogram, m)?)?;
        m.add_function(wrap_pyfunction!(equalization_map, m)?)?;
        m.add_function(wrap_pyfunction!(bitwise, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::pixel_engine;
