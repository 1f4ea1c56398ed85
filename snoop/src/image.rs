//! Image utilities.

use std::fmt;

use image::{DynamicImage, RgbaImage};
use parking_lot::Mutex;

use crate::{error::Error, snoop::PixelBuffer};

/// In-memory pixel encodings a [`Bitmap`] can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 4 bytes per pixel in blue, green, red, alpha order.
    Bgra32,
    Rgba32,
    Rgb24,
    Gray8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Bgra32 | PixelFormat::Rgba32 => 4,
            PixelFormat::Rgb24 => 3,
            PixelFormat::Gray8 => 1,
        }
    }
}

/// An 8-bit per channel color. Two colors are equal only if every channel matches exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Unpacks a color from a `0xAARRGGBB` value.
    pub fn from_argb(argb: u32) -> Self {
        let [a, r, g, b] = argb.to_be_bytes();
        Self { r, g, b, a }
    }

    /// Packs the color into a `0xAARRGGBB` value.
    pub fn to_argb(self) -> u32 {
        u32::from_be_bytes([self.a, self.r, self.g, self.b])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08x}", self.to_argb())
    }
}

/// A decoded image whose raw bytes can be locked for direct access.
///
/// Rows are `stride` bytes apart; any bytes past `width * bytes_per_pixel` in a row are
/// alignment padding and are never touched by pixel access.
pub struct Bitmap {
    width: usize,
    height: usize,
    format: PixelFormat,
    stride: usize,
    data: Mutex<Vec<u8>>,
}

impl Bitmap {
    pub fn new(
        width: usize,
        height: usize,
        format: PixelFormat,
        stride: usize,
        data: Vec<u8>,
    ) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyImage);
        }
        let row_len = width
            .checked_mul(format.bytes_per_pixel())
            .ok_or(Error::InvalidLayout {
                width,
                height,
                format,
                stride,
                len: data.len(),
            })?;
        let required = stride.checked_mul(height);
        if stride < row_len || required.map_or(true, |required| data.len() < required) {
            return Err(Error::InvalidLayout {
                width,
                height,
                format,
                stride,
                len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            stride,
            data: Mutex::new(data),
        })
    }

    /// Creates a tightly packed BGRA bitmap filled with a single color.
    pub fn filled(width: usize, height: usize, color: Color) -> Result<Self, Error> {
        let too_large = || Error::TooLarge { width, height };
        let stride = width.checked_mul(4).ok_or_else(too_large)?;
        let pixel_count = width.checked_mul(height).ok_or_else(too_large)?;
        stride.checked_mul(height).ok_or_else(too_large)?;
        let pixel = [color.b, color.g, color.r, color.a];
        Self::new(width, height, PixelFormat::Bgra32, stride, pixel.repeat(pixel_count))
    }

    /// Converts an RGBA image into a tightly packed BGRA bitmap.
    pub fn from_rgba(image: &RgbaImage) -> Result<Self, Error> {
        let (width, height) = (image.width() as usize, image.height() as usize);
        let data = image
            .as_raw()
            .chunks_exact(4)
            .flat_map(|rgba| [rgba[2], rgba[1], rgba[0], rgba[3]])
            .collect();
        Self::new(width, height, PixelFormat::Bgra32, width * 4, data)
    }

    pub fn from_dynamic(image: &DynamicImage) -> Result<Self, Error> {
        Self::from_rgba(&image.to_rgba8())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Locks the bitmap for direct pixel access. See [`PixelBuffer::lock`].
    pub fn lock(&self) -> Result<PixelBuffer<'_>, Error> {
        PixelBuffer::lock(self)
    }

    pub(crate) fn data(&self) -> &Mutex<Vec<u8>> {
        &self.data
    }

    /// Gives back the raw bytes, stride padding included.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data.into_inner()
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("stride", &self.stride)
            .field("locked", &self.data.is_locked())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argb_packing() {
        let color = Color::rgba(0x11, 0x22, 0x33, 0x44);
        assert_eq!(color.to_argb(), 0x44112233);
        assert_eq!(Color::from_argb(0x44112233), color);
        assert_eq!(color.to_string(), "#44112233");
    }

    #[test]
    fn rejects_empty_bitmaps() {
        let result = Bitmap::new(0, 4, PixelFormat::Bgra32, 0, vec![]);
        assert_eq!(result.unwrap_err(), Error::EmptyImage);
    }

    #[test]
    fn rejects_narrow_stride() {
        let result = Bitmap::new(4, 2, PixelFormat::Bgra32, 12, vec![0; 24]);
        assert!(matches!(result, Err(Error::InvalidLayout { stride: 12, .. })));
    }

    #[test]
    fn rejects_short_buffers() {
        let result = Bitmap::new(4, 2, PixelFormat::Bgra32, 16, vec![0; 31]);
        assert!(matches!(result, Err(Error::InvalidLayout { len: 31, .. })));
    }

    #[test]
    fn filled_rejects_overflowing_sizes() {
        let result = Bitmap::filled(usize::MAX / 2, 3, Color::WHITE);
        assert_eq!(
            result.unwrap_err(),
            Error::TooLarge {
                width: usize::MAX / 2,
                height: 3
            }
        );
        assert!(Bitmap::filled(3, usize::MAX / 4, Color::WHITE).is_err());
    }

    #[test]
    fn accepts_padded_stride() {
        let bitmap = Bitmap::new(3, 2, PixelFormat::Bgra32, 16, vec![0; 32]).unwrap();
        assert_eq!(bitmap.stride(), 16);
        assert_eq!(bitmap.into_bytes().len(), 32);
    }

    #[test]
    fn rgba_is_swizzled_to_bgra() {
        let image = RgbaImage::from_raw(1, 1, vec![1, 2, 3, 4]).unwrap();
        let bitmap = Bitmap::from_rgba(&image).unwrap();
        assert_eq!(bitmap.format(), PixelFormat::Bgra32);
        assert_eq!(bitmap.into_bytes(), vec![3, 2, 1, 4]);
    }
}
