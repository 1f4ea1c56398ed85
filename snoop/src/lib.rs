//! Locked pixel access and automatic border cropping for 32-bit BGRA bitmaps.

pub mod crop;
pub mod error;
pub mod image;
pub mod snoop;

pub use crate::{
    crop::{extract, AutoCropper, Rect},
    error::Error,
    image::{Bitmap, Color, PixelFormat},
    snoop::PixelBuffer,
};
