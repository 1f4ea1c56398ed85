//! Direct pixel access to a locked bitmap.

use parking_lot::MutexGuard;

use crate::{
    error::Error,
    image::{Bitmap, Color, PixelFormat},
};

/// Number of bytes per pixel in the only supported format.
pub const DEPTH: usize = 4;

/// A locked view over a BGRA bitmap's raw bytes.
///
/// The bitmap stays locked for as long as the buffer is alive. Dropping it (or calling
/// [`PixelBuffer::release`]) unlocks the bitmap again, on every exit path.
pub struct PixelBuffer<'a> {
    data: MutexGuard<'a, Vec<u8>>,
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> PixelBuffer<'a> {
    /// Locks `bitmap` for direct access.
    ///
    /// The format is checked before the lock is attempted. Locking never blocks: if the bitmap is
    /// already locked, this fails with [`Error::LockFailure`].
    pub fn lock(bitmap: &'a Bitmap) -> Result<Self, Error> {
        if bitmap.format() != PixelFormat::Bgra32 {
            return Err(Error::UnsupportedFormat(bitmap.format()));
        }
        let data = bitmap.data().try_lock().ok_or(Error::LockFailure)?;
        Ok(Self {
            data,
            width: bitmap.width(),
            height: bitmap.height(),
            stride: bitmap.stride(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn depth(&self) -> usize {
        DEPTH
    }

    fn pixel_index(&self, x: usize, y: usize) -> Result<usize, Error> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y * self.stride + x * DEPTH)
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Result<Color, Error> {
        let index = self.pixel_index(x, y)?;
        let [b, g, r, a] = [
            self.data[index],
            self.data[index + 1],
            self.data[index + 2],
            self.data[index + 3],
        ];
        Ok(Color { r, g, b, a })
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) -> Result<(), Error> {
        let index = self.pixel_index(x, y)?;
        self.data[index..index + DEPTH].copy_from_slice(&[color.b, color.g, color.r, color.a]);
        Ok(())
    }

    /// Returns the pixel bytes of row `y`, without the stride padding.
    pub fn row(&self, y: usize) -> Result<&[u8], Error> {
        let start = self.pixel_index(0, y)?;
        Ok(&self.data[start..start + self.width * DEPTH])
    }

    /// Unlocks the bitmap. Equivalent to dropping the buffer.
    pub fn release(self) {
        drop(self);
    }
}
