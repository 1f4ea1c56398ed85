mod common;
mod config;
mod crop_job;

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;

use crate::config::Config;

/// Crops uniform borders off images. The color of the top-left pixel is taken as the border
/// color.
#[derive(Parser)]
#[clap(version, about)]
struct Args {
    /// Images to crop.
    #[clap(required = true)]
    images: Vec<PathBuf>,
    /// Write `<name>_Crop.<ext>` next to each image instead of overwriting it.
    #[clap(short = 'n', long)]
    no_overwrite: bool,
    /// Margin in pixels to keep around the content.
    #[clap(short, long)]
    padding: Option<usize>,
    /// Path to the config file.
    #[clap(short, long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(|| config::PATH.into());
    let mut config = match Config::load(&config_path, args.config.is_some()) {
        Ok(config) => config,
        Err(error) => {
            tracing::error!("{error}");
            return ExitCode::FAILURE;
        }
    };
    config.apply_overrides(args.no_overwrite, args.padding);
    tracing::debug!(?config, "resolved config");

    let mut failed = 0;
    for image in &args.images {
        match crop_job::crop_file(image, &config) {
            Ok(outcome) => {
                let name = outcome.output.file_name().unwrap_or_default();
                tracing::info!("Saved {name:?} - Crop to {}", outcome.rect);
            }
            Err(error) => {
                tracing::error!("{}: {error}", image.display());
                failed += 1;
            }
        }
    }

    if failed > 0 {
        tracing::error!("{failed} of {} images could not be cropped", args.images.len());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
