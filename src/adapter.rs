//! Boundary to the bitmap codec / display layer.
//!
//! A decoded native bitmap exposes its pixels only while locked. Engine code
//! never holds a lock across an operation: [`read_buffer`] locks, copies the
//! rows out into an owned [`PixelBuffer`] and unlocks; [`write_buffer`] does
//! the reverse. The lock is held by a [`BitmapLock`] guard, so it is released
//! on every exit path, including errors.

use log::{debug, trace};

use crate::buffer::PixelBuffer;
use crate::error::{EngineError, Result};
use crate::pixel::PixelFormat;

/// Geometry of a native, possibly row-padded bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitmapLayout {
    pub width: usize,
    pub height: usize,
    /// Bytes between row starts; at least `width * bytes_per_pixel`.
    pub stride: usize,
    pub format: PixelFormat,
}

fn overflow(what: &str) -> EngineError {
    EngineError::InvalidDimensions(format!("{what} overflows usize"))
}

impl BitmapLayout {
    /// Layout with rows padded to a 4-byte boundary, as GDI bitmaps use.
    pub fn aligned(width: usize, height: usize, format: PixelFormat) -> Result<Self> {
        let stride = width
            .checked_mul(format.bytes_per_pixel())
            .and_then(|row_len| row_len.checked_next_multiple_of(4))
            .ok_or_else(|| overflow("row length"))?;
        Ok(BitmapLayout {
            width,
            height,
            stride,
            format,
        })
    }

    #[inline]
    pub fn row_len(&self) -> Result<usize> {
        self.width
            .checked_mul(self.format.bytes_per_pixel())
            .ok_or_else(|| overflow("row length"))
    }

    /// Minimum scan length: full stride for every row but the last.
    pub fn required_len(&self) -> Result<usize> {
        match self.height {
            0 => Ok(0),
            h => (h - 1)
                .checked_mul(self.stride)
                .and_then(|n| n.checked_add(self.row_len().ok()?))
                .ok_or_else(|| overflow("scan length")),
        }
    }

    fn validate(&self, available: usize) -> Result<()> {
        let row_len = self.row_len()?;
        if self.stride < row_len {
            return Err(EngineError::InvalidDimensions(format!(
                "stride {} is smaller than row length {row_len}",
                self.stride
            )));
        }
        let required = self.required_len()?;
        if available < required {
            return Err(EngineError::InvalidDimensions(format!(
                "scan holds {available} bytes, layout needs {required}"
            )));
        }
        Ok(())
    }
}

/// A decoded image owned by the codec layer.
pub trait NativeBitmap {
    fn layout(&self) -> BitmapLayout;

    /// Make the scan buffer accessible. Fails if already locked.
    fn lock(&mut self) -> Result<()>;

    fn unlock(&mut self);

    /// Row-major pixel bytes, `layout().stride` bytes per row.
    fn scan(&self) -> &[u8];

    fn scan_mut(&mut self) -> &mut [u8];
}

/// Holds a bitmap locked for its lifetime.
pub struct BitmapLock<'a, B: NativeBitmap + ?Sized> {
    bitmap: &'a mut B,
}

impl<'a, B: NativeBitmap + ?Sized> BitmapLock<'a, B> {
    pub fn acquire(bitmap: &'a mut B) -> Result<Self> {
        bitmap.lock()?;
        trace!("bitmap locked");
        Ok(BitmapLock { bitmap })
    }

    pub fn layout(&self) -> BitmapLayout {
        self.bitmap.layout()
    }

    pub fn scan(&self) -> &[u8] {
        self.bitmap.scan()
    }

    pub fn scan_mut(&mut self) -> &mut [u8] {
        self.bitmap.scan_mut()
    }
}

impl<B: NativeBitmap + ?Sized> Drop for BitmapLock<'_, B> {
    fn drop(&mut self) {
        self.bitmap.unlock();
        trace!("bitmap unlocked");
    }
}

/// Copy a native bitmap into an owned, unpadded buffer.
pub fn read_buffer<B: NativeBitmap + ?Sized>(bitmap: &mut B) -> Result<PixelBuffer> {
    let guard = BitmapLock::acquire(bitmap)?;
    let layout = guard.layout();
    let buffer = PixelBuffer::from_raw_decoded(
        guard.scan(),
        layout.width,
        layout.height,
        layout.stride,
        layout.format,
    )?;

    debug!(
        "read_buffer: {}x{} {:?}, stride {}",
        layout.width, layout.height, layout.format, layout.stride
    );
    Ok(buffer)
}

/// Commit `buffer` into a native bitmap of identical size and format.
///
/// Row padding in the bitmap is left as it was.
pub fn write_buffer<B: NativeBitmap + ?Sized>(bitmap: &mut B, buffer: &PixelBuffer) -> Result<()> {
    let layout = bitmap.layout();
    if layout.width != buffer.width()
        || layout.height != buffer.height()
        || layout.format != buffer.format()
    {
        return Err(EngineError::SizeMismatch(format!(
            "bitmap is {}x{} {:?}, buffer is {}x{} {:?}",
            layout.width,
            layout.height,
            layout.format,
            buffer.width(),
            buffer.height(),
            buffer.format()
        )));
    }

    let mut guard = BitmapLock::acquire(bitmap)?;
    let scan = guard.scan_mut();
    layout.validate(scan.len())?;

    let row_len = layout.row_len()?;
    if row_len > 0 {
        for (y, src) in buffer.bytes().chunks_exact(row_len).enumerate() {
            let start = y * layout.stride;
            scan[start..start + row_len].copy_from_slice(src);
        }
    }

    debug!(
        "write_buffer: {}x{} {:?}, stride {}",
        layout.width, layout.height, layout.format, layout.stride
    );
    Ok(())
}

/// In-memory [`NativeBitmap`] with explicit row padding.
#[derive(Clone, Debug)]
pub struct StridedBitmap {
    layout: BitmapLayout,
    data: Vec<u8>,
    locked: bool,
    lock_count: usize,
}

impl StridedBitmap {
    /// Zero-filled bitmap with 4-byte aligned rows.
    pub fn new(width: usize, height: usize, format: PixelFormat) -> Result<Self> {
        let layout = BitmapLayout::aligned(width, height, format)?;
        let len = layout
            .stride
            .checked_mul(height)
            .ok_or_else(|| overflow("bitmap size"))?;
        Self::from_data(vec![0u8; len], layout)
    }

    pub fn from_data(data: Vec<u8>, layout: BitmapLayout) -> Result<Self> {
        layout.validate(data.len())?;
        Ok(StridedBitmap {
            layout,
            data,
            locked: false,
            lock_count: 0,
        })
    }

    /// Padded copy of `buffer` with 4-byte aligned rows.
    pub fn from_buffer(buffer: &PixelBuffer) -> Result<Self> {
        let layout = BitmapLayout::aligned(buffer.width(), buffer.height(), buffer.format())?;
        Self::from_data(buffer.to_strided(layout.stride)?, layout)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// How many times the bitmap has been locked.
    pub fn lock_count(&self) -> usize {
        self.lock_count
    }
}

impl NativeBitmap for StridedBitmap {
    fn layout(&self) -> BitmapLayout {
        self.layout
    }

    fn lock(&mut self) -> Result<()> {
        if self.locked {
            return Err(EngineError::BitmapLocked);
        }
        self.locked = true;
        self.lock_count += 1;
        Ok(())
    }

    fn unlock(&mut self) {
        self.locked = false;
    }

    fn scan(&self) -> &[u8] {
        &self.data
    }

    fn scan_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
