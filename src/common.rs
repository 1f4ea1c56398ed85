use std::path::PathBuf;

use image::ImageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Snoop(#[from] snoop::Error),
    #[error("Error while processing image: {0}")]
    Image(#[from] ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot read config file {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Config TOML deserialization error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("{0:?} does not exist")]
    NotFound(PathBuf),
    #[error(".{0} files are not supported")]
    UnsupportedExtension(String),
    #[error("Nothing to crop in {0:?}, the image is a single color")]
    NothingToCrop(PathBuf),
}
