//! Border cropping. Finds the region of a bitmap that differs from its background color.

use std::fmt;

use image::RgbaImage;

use crate::{error::Error, image::Color, snoop::PixelBuffer};

/// An axis-aligned rectangle. `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: usize,
    pub top: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    /// The degenerate result of cropping an image that is entirely background.
    pub const EMPTY: Rect = Rect {
        left: 0,
        top: 0,
        width: 0,
        height: 0,
    };

    pub fn right(&self) -> usize {
        self.left.saturating_add(self.width)
    }

    pub fn bottom(&self) -> usize {
        self.top.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Grows the rectangle by `padding` on every side, clamped to the image's bounds.
    /// An empty rectangle stays empty.
    pub fn pad(self, padding: usize, image_width: usize, image_height: usize) -> Rect {
        if self.is_empty() {
            return Rect::EMPTY;
        }
        let left = self.left.saturating_sub(padding);
        let top = self.top.saturating_sub(padding);
        let right = self.right().saturating_add(padding).min(image_width);
        let bottom = self.bottom().saturating_add(padding).min(image_height);
        Rect {
            left,
            top,
            width: right.saturating_sub(left),
            height: bottom.saturating_sub(top),
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}+{}+{}",
            self.width, self.height, self.left, self.top
        )
    }
}

/// Detects uniform borders around an image, using the top-left pixel as the background color.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoCropper {
    pub padding: usize,
}

impl AutoCropper {
    pub fn new(padding: usize) -> Self {
        Self { padding }
    }

    /// Finds the smallest rectangle containing every pixel that differs from the background.
    /// Returns [`Rect::EMPTY`] if the whole image is background.
    pub fn find_bounds(&self, buffer: &PixelBuffer) -> Result<Rect, Error> {
        let (width, height) = (buffer.width(), buffer.height());
        let background = buffer.get_pixel(0, 0)?;

        let row_is_background = |y: usize| -> Result<bool, Error> {
            all_background(buffer, background, (0..width).map(|x| (x, y)))
        };

        let mut top = 0;
        while top < height && row_is_background(top)? {
            top += 1;
        }
        if top == height {
            tracing::trace!(%background, "image is entirely background");
            return Ok(Rect::EMPTY);
        }

        // Row `top` holds content, so none of the remaining sweeps can pass it.
        let mut bottom = height - 1;
        while bottom > top && row_is_background(bottom)? {
            bottom -= 1;
        }

        let column_is_background = |x: usize| -> Result<bool, Error> {
            all_background(buffer, background, (top..=bottom).map(|y| (x, y)))
        };

        let mut left = 0;
        while left < width && column_is_background(left)? {
            left += 1;
        }

        let mut right = width - 1;
        while right > left && column_is_background(right)? {
            right -= 1;
        }

        let bounds = Rect {
            left,
            top,
            width: right - left + 1,
            height: bottom - top + 1,
        };
        tracing::trace!(%background, %bounds, "found content bounds");
        Ok(bounds)
    }

    /// Finds the content bounds and applies this cropper's padding.
    pub fn crop_bounds(&self, buffer: &PixelBuffer) -> Result<Rect, Error> {
        Ok(self
            .find_bounds(buffer)?
            .pad(self.padding, buffer.width(), buffer.height()))
    }
}

fn all_background(
    buffer: &PixelBuffer,
    background: Color,
    pixels: impl Iterator<Item = (usize, usize)>,
) -> Result<bool, Error> {
    for (x, y) in pixels {
        if buffer.get_pixel(x, y)? != background {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Copies `rect` out of the buffer into a new RGBA image.
pub fn extract(buffer: &PixelBuffer, rect: Rect) -> Result<RgbaImage, Error> {
    if rect.is_empty() {
        return Err(Error::EmptyImage);
    }
    if rect.right() > buffer.width() || rect.bottom() > buffer.height() {
        return Err(Error::OutOfRange {
            x: rect.right() - 1,
            y: rect.bottom() - 1,
            width: buffer.width(),
            height: buffer.height(),
        });
    }

    let depth = buffer.depth();
    let mut pixels = Vec::with_capacity(rect.width * rect.height * depth);
    for y in rect.top..rect.bottom() {
        let row = buffer.row(y)?;
        let scanline = &row[rect.left * depth..rect.right() * depth];
        pixels.extend(
            scanline
                .chunks_exact(depth)
                .flat_map(|bgra| [bgra[2], bgra[1], bgra[0], bgra[3]]),
        );
    }

    let too_large = || Error::TooLarge {
        width: rect.width,
        height: rect.height,
    };
    let width = u32::try_from(rect.width).map_err(|_| too_large())?;
    let height = u32::try_from(rect.height).map_err(|_| too_large())?;
    RgbaImage::from_raw(width, height, pixels).ok_or_else(too_large)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Bitmap;

    fn rect(left: usize, top: usize, width: usize, height: usize) -> Rect {
        Rect {
            left,
            top,
            width,
            height,
        }
    }

    fn bitmap_with(width: usize, height: usize, content: &[(usize, usize)]) -> Bitmap {
        let bitmap = Bitmap::filled(width, height, Color::WHITE).unwrap();
        {
            let mut buffer = bitmap.lock().unwrap();
            for &(x, y) in content {
                buffer.set_pixel(x, y, Color::BLACK).unwrap();
            }
        }
        bitmap
    }

    #[test]
    fn uniform_image_is_empty() {
        let bitmap = bitmap_with(3, 7, &[]);
        let buffer = bitmap.lock().unwrap();
        assert_eq!(AutoCropper::new(2).crop_bounds(&buffer).unwrap(), Rect::EMPTY);
    }

    #[test]
    fn single_pixel_image() {
        let bitmap = bitmap_with(1, 1, &[]);
        let buffer = bitmap.lock().unwrap();
        assert_eq!(AutoCropper::default().find_bounds(&buffer).unwrap(), Rect::EMPTY);
    }

    #[test]
    fn content_in_far_corner() {
        let bitmap = bitmap_with(6, 4, &[(5, 3)]);
        let buffer = bitmap.lock().unwrap();
        assert_eq!(
            AutoCropper::default().find_bounds(&buffer).unwrap(),
            rect(5, 3, 1, 1)
        );
    }

    #[test]
    fn scattered_content() {
        let bitmap = bitmap_with(8, 8, &[(2, 1), (6, 3), (4, 5)]);
        let buffer = bitmap.lock().unwrap();
        assert_eq!(
            AutoCropper::default().find_bounds(&buffer).unwrap(),
            rect(2, 1, 5, 5)
        );
    }

    #[test]
    fn background_is_taken_from_top_left() {
        // The top-left pixel differs from everything else, so the rest of the image is content.
        let bitmap = bitmap_with(4, 3, &[(0, 0)]);
        let buffer = bitmap.lock().unwrap();
        assert_eq!(
            AutoCropper::default().find_bounds(&buffer).unwrap(),
            rect(0, 0, 4, 3)
        );
    }

    #[test]
    fn alpha_alone_counts_as_content() {
        let bitmap = Bitmap::filled(3, 3, Color::TRANSPARENT).unwrap();
        {
            let mut buffer = bitmap.lock().unwrap();
            buffer.set_pixel(1, 1, Color::rgba(0, 0, 0, 1)).unwrap();
        }
        let buffer = bitmap.lock().unwrap();
        assert_eq!(
            AutoCropper::default().find_bounds(&buffer).unwrap(),
            rect(1, 1, 1, 1)
        );
    }

    #[test]
    fn padding_is_clamped() {
        assert_eq!(rect(1, 2, 3, 4).pad(1, 10, 10), rect(0, 1, 5, 6));
        assert_eq!(rect(1, 2, 3, 4).pad(100, 10, 10), rect(0, 0, 10, 10));
        assert_eq!(rect(1, 2, 3, 4).pad(usize::MAX, 10, 10), rect(0, 0, 10, 10));
        assert_eq!(rect(8, 8, 2, 2).pad(0, 10, 10), rect(8, 8, 2, 2));
        assert_eq!(Rect::EMPTY.pad(3, 10, 10), Rect::EMPTY);
    }

    #[test]
    fn display_uses_geometry_notation() {
        assert_eq!(rect(3, 4, 10, 20).to_string(), "10x20+3+4");
    }

    #[test]
    fn extract_swizzles_to_rgba() {
        let bitmap = bitmap_with(4, 4, &[(1, 2)]);
        let buffer = bitmap.lock().unwrap();
        let image = extract(&buffer, rect(1, 1, 2, 2)).unwrap();
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.get_pixel(0, 1).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(1, 1).0, [255, 255, 255, 255]);
    }

    #[test]
    fn extract_rejects_bad_regions() {
        let bitmap = bitmap_with(4, 4, &[]);
        let buffer = bitmap.lock().unwrap();
        assert_eq!(extract(&buffer, Rect::EMPTY).unwrap_err(), Error::EmptyImage);
        assert!(matches!(
            extract(&buffer, rect(2, 2, 3, 1)),
            Err(Error::OutOfRange { x: 4, y: 2, .. })
        ));
    }
}
