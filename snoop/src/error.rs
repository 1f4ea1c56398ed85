use thiserror::Error;

use crate::image::PixelFormat;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Only 32-bit BGRA bitmaps can be snooped (got {0:?})")]
    UnsupportedFormat(PixelFormat),
    #[error("Could not lock bitmap, is it already being snooped somewhere else?")]
    LockFailure,
    #[error("Pixel ({x}, {y}) is out of range for a {width}x{height} bitmap")]
    OutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("Bitmap layout is invalid: stride {stride} with {len} bytes for {width}x{height} {format:?}")]
    InvalidLayout {
        width: usize,
        height: usize,
        format: PixelFormat,
        stride: usize,
        len: usize,
    },
    #[error("Image has no pixels")]
    EmptyImage,
    #[error("Region of {width}x{height} pixels is too large to encode")]
    TooLarge { width: usize, height: usize },
}
