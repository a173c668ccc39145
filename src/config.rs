//! Settings - defaults, optionally overridden by a JSON file.

use crate::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Image loaded at startup.
    pub image: PathBuf,
    /// Sub-image rows per render.
    pub resolution: u32,
    /// Initial working charset.
    pub charset: String,
    /// Destination of `output html`.
    pub html_path: PathBuf,
    pub html_font: String,
    /// TrueType font for glyph masks; the built-in bitmap font when unset.
    pub font: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            image: PathBuf::from("cat.jpeg"),
            resolution: 128,
            charset: "0123456789".to_string(),
            html_path: PathBuf::from("out.html"),
            html_font: "Courier New".to_string(),
            font: None,
        }
    }
}

impl Settings {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&text)?;
        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
