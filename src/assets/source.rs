use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::Engine as _;

use crate::assets::decode::{DecodedImage, decode_image};
use crate::foundation::error::{PhotoError, PhotoResult};

/// Where an image comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageRef {
    /// Local file, given as a plain path or a `file://` URI.
    Path(PathBuf),
    /// Bundled resource (`asset://<relative path>`), resolved against the assets directory.
    Asset(String),
    /// `http://` or `https://` URL.
    Remote(String),
    /// Inline `data:` URI.
    DataUri(String),
}

impl ImageRef {
    /// Classify a reference string.
    pub fn parse(s: &str) -> PhotoResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PhotoError::params_required("image reference is required"));
        }
        if s.starts_with("http://") || s.starts_with("https://") {
            return Ok(Self::Remote(s.to_owned()));
        }
        if s.starts_with("data:") {
            return Ok(Self::DataUri(s.to_owned()));
        }
        if let Some(rest) = s.strip_prefix("asset:") {
            return Ok(Self::Asset(rest.trim_start_matches('/').to_owned()));
        }
        if let Some(rest) = s.strip_prefix("file://") {
            return Ok(Self::Path(PathBuf::from(rest)));
        }
        Ok(Self::Path(PathBuf::from(s)))
    }
}

impl FromStr for ImageRef {
    type Err = PhotoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::Asset(a) => write!(f, "asset://{a}"),
            Self::Remote(u) => f.write_str(u),
            Self::DataUri(d) => write!(f, "data URI ({} bytes)", d.len()),
        }
    }
}

/// Normalize a bundled-asset path: `/` separators, no `.` segments, no absolute paths or `..`.
pub(crate) fn normalize_rel_path(source: &str) -> PhotoResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(PhotoError::image_load("asset paths must be relative"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(PhotoError::image_load("asset paths must not contain '..'"));
        }
        out.push(part);
    }
    if out.is_empty() {
        return Err(PhotoError::image_load("asset path must contain a file name"));
    }
    Ok(out.join("/"))
}

/// Split a `data:` URI into its mime type and decoded payload.
pub(crate) fn parse_data_uri(uri: &str) -> Option<(String, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header
        .split(';')
        .next()
        .filter(|v| !v.is_empty())
        .unwrap_or("application/octet-stream")
        .to_string();
    let data = if header.split(';').any(|p| p.eq_ignore_ascii_case("base64")) {
        let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        base64::engine::general_purpose::STANDARD.decode(compact).ok()?
    } else {
        payload.as_bytes().to_vec()
    };
    Some((mime, data))
}

/// Resolves [`ImageRef`]s to decoded images.
///
/// Remote responses are cached per URL for the lifetime of the loader.
pub struct ImageLoader {
    assets_dir: PathBuf,
    client: reqwest::blocking::Client,
    remote_cache: Mutex<HashMap<String, Arc<Vec<u8>>>>,
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader")
            .field("assets_dir", &self.assets_dir)
            .finish_non_exhaustive()
    }
}

impl ImageLoader {
    /// Build a loader reading bundled assets from `assets_dir` and fetching with `timeout`
    /// for both connect and read.
    pub fn new(assets_dir: impl Into<PathBuf>, timeout: Duration) -> PhotoResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| PhotoError::Other(anyhow::Error::new(e).context("build HTTP client")))?;
        Ok(Self {
            assets_dir: assets_dir.into(),
            client,
            remote_cache: Mutex::new(HashMap::new()),
        })
    }

    /// Fetch and decode `r`. Any failure is [`PhotoError::ImageLoadFailed`].
    pub fn load(&self, r: &ImageRef) -> PhotoResult<DecodedImage> {
        let bytes = self.read_bytes(r)?;
        let img = decode_image(&bytes).map_err(|e| match e {
            PhotoError::ImageLoadFailed(msg) => PhotoError::image_load(format!("{r}: {msg}")),
            other => other,
        })?;
        tracing::debug!(source = %r, width = img.width(), height = img.height(), "image loaded");
        Ok(img)
    }

    fn read_bytes(&self, r: &ImageRef) -> PhotoResult<Arc<Vec<u8>>> {
        match r {
            ImageRef::Path(p) => read_file(p).map(Arc::new),
            ImageRef::Asset(a) => {
                let rel = normalize_rel_path(a)?;
                read_file(&self.assets_dir.join(Path::new(&rel))).map(Arc::new)
            }
            ImageRef::DataUri(uri) => parse_data_uri(uri)
                .map(|(_, data)| Arc::new(data))
                .ok_or_else(|| PhotoError::image_load("malformed data URI")),
            ImageRef::Remote(url) => self.fetch(url),
        }
    }

    fn fetch(&self, url: &str) -> PhotoResult<Arc<Vec<u8>>> {
        if let Some(hit) = self.cached(url) {
            tracing::debug!(url, "remote image cache hit");
            return Ok(hit);
        }

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| PhotoError::image_load(format!("fetch '{url}': {e}")))?;
        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            tracing::warn!(url, %status, "remote image request failed");
            return Err(PhotoError::image_load(format!(
                "fetch '{url}': server answered {status}"
            )));
        }
        let bytes = resp
            .bytes()
            .map_err(|e| PhotoError::image_load(format!("read body of '{url}': {e}")))?;
        let bytes = Arc::new(bytes.to_vec());

        if let Ok(mut cache) = self.remote_cache.lock() {
            cache.insert(url.to_owned(), Arc::clone(&bytes));
        }
        Ok(bytes)
    }

    fn cached(&self, url: &str) -> Option<Arc<Vec<u8>>> {
        self.remote_cache
            .lock()
            .ok()
            .and_then(|cache| cache.get(url).cloned())
    }
}

fn read_file(path: &Path) -> PhotoResult<Vec<u8>> {
    std::fs::read(path)
        .map_err(|e| PhotoError::image_load(format!("read '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
