use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::PhotoResult;

/// Host-owned configuration for a [`crate::PhotoContext`].
///
/// Every field has a default, so an empty JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PhotoConfig {
    /// Directory generated output files are written to.
    pub cache_dir: PathBuf,
    /// Directory of bundled font files registered at startup.
    pub fonts_dir: Option<PathBuf>,
    /// Root that `asset://` image references are resolved against.
    pub assets_dir: PathBuf,
    /// Font used when a style names no registered family.
    pub default_font: Option<PathBuf>,
    /// Font used for right-to-left text when the style names no registered family.
    pub rtl_fallback_font: Option<PathBuf>,
    /// Connect and read timeout for remote image fetches.
    pub fetch_timeout_secs: u64,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            cache_dir: std::env::temp_dir().join("photo-manipulator"),
            fonts_dir: None,
            assets_dir: PathBuf::from("assets"),
            default_font: None,
            rtl_fallback_font: None,
            fetch_timeout_secs: 60,
        }
    }
}

impl PhotoConfig {
    /// Parse a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> PhotoResult<Self> {
        Ok(serde_json::from_reader(r).context("parse config JSON")?)
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> PhotoResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open config JSON '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Remote fetch timeout as a [`Duration`].
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
