use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::common::Error;

pub const PATH: &str = "croppng.toml";

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Margin in pixels kept around the detected content. Clamped to the image's bounds.
    pub padding: usize,
    /// When `false`, cropped images are written next to the original with `suffix` appended to
    /// the file name instead of replacing it.
    pub overwrite: bool,
    pub suffix: String,
    /// File extensions (without the dot, case-insensitive) that are accepted as input.
    pub extensions: Vec<String>,
    /// Set the output's modification time to one second past the original's.
    pub preserve_timestamps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            padding: 0,
            overwrite: true,
            suffix: "_Crop".into(),
            extensions: vec!["png".into()],
            preserve_timestamps: true,
        }
    }
}

impl Config {
    /// Loads the config from `path`. If the file does not exist and `required` is `false`, the
    /// defaults are used.
    pub fn load(path: &Path, required: bool) -> Result<Self, Error> {
        if !required && !path.exists() {
            debug!(?path, "no config file, using defaults");
            return Ok(Self::default());
        }
        debug!(?path, "loading config");
        let config = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_owned(),
            source,
        })?;
        Ok(toml::from_str(&config)?)
    }

    /// Applies command line flags on top of the loaded config.
    pub fn apply_overrides(&mut self, no_overwrite: bool, padding: Option<usize>) {
        if no_overwrite {
            self.overwrite = false;
        }
        if let Some(padding) = padding {
            self.padding = padding;
        }
    }

    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(extension))
    }
}
