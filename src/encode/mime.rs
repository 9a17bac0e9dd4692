use serde::{Deserialize, Serialize};

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MimeType {
    /// `image/png`, lossless with alpha.
    #[default]
    #[serde(rename = "image/png")]
    Png,
    /// `image/jpeg`, lossy, no alpha.
    #[serde(rename = "image/jpeg")]
    Jpeg,
}

impl MimeType {
    /// Map a mime string to a format.
    ///
    /// `None` or an empty string selects PNG; anything other than PNG or JPEG falls back to JPEG,
    /// matching the `jpg` extension such names receive.
    pub fn from_mime(s: Option<&str>) -> Self {
        match s.map(str::trim).map(str::to_ascii_lowercase).as_deref() {
            None | Some("") | Some("image/png") => Self::Png,
            Some("image/jpeg") | Some("image/jpg") => Self::Jpeg,
            Some(other) => {
                tracing::warn!(mime = other, "unsupported output mime type; encoding as JPEG");
                Self::Jpeg
            }
        }
    }

    /// Canonical mime string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

impl std::fmt::Display for MimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extension for an arbitrary mime string: `image/jpeg` → `jpg`, `image/png` → `png`, else `jpg`.
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/png" => "png",
        _ => "jpg",
    }
}

/// Format and quality of an encoded output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Output format.
    pub mime: MimeType,
    /// Encoder quality in `0..=100`; only JPEG uses it.
    pub quality: u8,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            mime: MimeType::Png,
            quality: 100,
        }
    }
}

impl OutputOptions {
    /// Options for `mime` at full quality.
    pub fn new(mime: MimeType) -> Self {
        Self {
            mime,
            ..Self::default()
        }
    }

    /// Set the quality, clamped to 100.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.min(100);
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/mime.rs"]
mod tests;
