//! Cropping of a single image file.

use std::{
    fs::{File, FileTimes},
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use image::{DynamicImage, ImageFormat};
use snoop::{AutoCropper, Bitmap, Rect};
use tracing::{debug, info_span, warn};

use crate::{common::Error, config::Config};

/// How far the output's modification and creation times is moved past the original's, so tools that sort by
/// date still list the cropped file after its source.
const TIMESTAMP_OFFSET: Duration = Duration::from_secs(1);

/// Result of cropping one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropOutcome {
    pub output: PathBuf,
    pub rect: Rect,
}

/// Returns where the cropped version of `input` is written.
pub fn output_path(input: &Path, overwrite: bool, suffix: &str) -> PathBuf {
    if overwrite {
        return input.to_owned();
    }
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let mut file_name = format!("{stem}{suffix}");
    if let Some(extension) = input.extension() {
        file_name.push('.');
        file_name.push_str(&extension.to_string_lossy().to_lowercase());
    }
    input.with_file_name(file_name)
}

/// Checks that `input` exists and has one of the accepted extensions.
pub fn check_input(input: &Path, config: &Config) -> Result<(), Error> {
    if !input.is_file() {
        return Err(Error::NotFound(input.to_owned()));
    }
    let extension = input
        .extension()
        .map(|extension| extension.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !config.accepts_extension(&extension) {
        return Err(Error::UnsupportedExtension(extension));
    }
    Ok(())
}

/// Computes the crop rectangle of a decoded image and copies that region out.
/// Returns `None` if the image is a single color.
pub fn crop_image(
    image: &DynamicImage,
    padding: usize,
) -> Result<Option<(Rect, DynamicImage)>, Error> {
    let bitmap = Bitmap::from_dynamic(image)?;
    let buffer = bitmap.lock()?;
    let rect = AutoCropper::new(padding).crop_bounds(&buffer)?;
    if rect.is_empty() {
        return Ok(None);
    }
    let cropped = snoop::extract(&buffer, rect)?;
    buffer.release();
    Ok(Some((rect, DynamicImage::ImageRgba8(cropped))))
}

/// Crops `input` and writes the result according to `config`.
pub fn crop_file(input: &Path, config: &Config) -> Result<CropOutcome, Error> {
    let _span = info_span!("crop_file", ?input).entered();
    check_input(input, config)?;

    let metadata = std::fs::metadata(input)?;
    let modified = metadata.modified()?;
    // Not every filesystem records creation time.
    let created = metadata.created().ok();

    debug!("decoding");
    let image = image::open(input)?;
    let (rect, cropped) =
        crop_image(&image, config.padding)?.ok_or_else(|| Error::NothingToCrop(input.to_owned()))?;
    drop(image);

    let output = output_path(input, config.overwrite, &config.suffix);
    let format = ImageFormat::from_path(&output)?;
    debug!(?output, ?format, %rect, "encoding");
    let cropped = match format {
        // JPEG has no alpha channel.
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(cropped.to_rgb8()),
        _ => cropped,
    };
    cropped.save_with_format(&output, format)?;

    if config.preserve_timestamps {
        // The crop itself succeeded, so a failure here is only worth a warning.
        let times = file_times(
            modified + TIMESTAMP_OFFSET,
            created.map(|created| created + TIMESTAMP_OFFSET),
        );
        if let Err(error) = set_times(&output, times) {
            warn!(?output, "cannot set file times: {error}");
        }
    }

    Ok(CropOutcome { output, rect })
}

/// Creation time can only be set on Windows and macOS; elsewhere it is ignored.
fn file_times(modified: SystemTime, created: Option<SystemTime>) -> FileTimes {
    let times = FileTimes::new().set_modified(modified);
    match created {
        #[cfg(windows)]
        Some(created) => std::os::windows::fs::FileTimesExt::set_created(times, created),
        #[cfg(target_os = "macos")]
        Some(created) => std::os::macos::fs::FileTimesExt::set_created(times, created),
        _ => times,
    }
}

fn set_times(path: &Path, times: FileTimes) -> Result<(), Error> {
    File::options().write(true).open(path)?.set_times(times)?;
    Ok(())
}
