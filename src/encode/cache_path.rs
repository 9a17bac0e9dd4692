use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context as _;

use crate::foundation::error::{PhotoError, PhotoResult};

/// Which operation produced an output file; decides its name prefix and suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// Text drawn onto a background: `printText_<uuid>.<ext>`.
    PrintText,
    /// Image overlay: `overlay_<uuid>_<millis>.<ext>`.
    Overlay,
}

impl OutputKind {
    /// File name prefix.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::PrintText => "printText",
            Self::Overlay => "overlay",
        }
    }

    fn with_timestamp(self) -> bool {
        matches!(self, Self::Overlay)
    }
}

/// File name for a new output with extension `ext` (no dot).
///
/// Use [`crate::extension_for_mime`] to derive `ext` from a requested mime string.
pub fn cache_file_name(kind: OutputKind, ext: &str) -> String {
    let id = uuid::Uuid::new_v4();
    if kind.with_timestamp() {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        format!("{}_{id}_{millis}.{ext}", kind.prefix())
    } else {
        format!("{}_{id}.{ext}", kind.prefix())
    }
}

/// Fresh path under `cache_dir` for an output of `kind`.
pub fn generate_cache_path(cache_dir: &Path, kind: OutputKind, ext: &str) -> PathBuf {
    cache_dir.join(cache_file_name(kind, ext))
}

/// Write `bytes` to `path`, creating parent directories. A partially written file is removed.
pub fn persist(path: &Path, bytes: &[u8]) -> PhotoResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create cache dir '{}'", parent.display()))?;
    }
    if let Err(e) = std::fs::write(path, bytes) {
        let _ = std::fs::remove_file(path);
        return Err(PhotoError::encode(format!(
            "write '{}': {e}",
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/cache_path.rs"]
mod tests;
