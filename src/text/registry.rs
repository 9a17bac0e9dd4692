use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::foundation::config::PhotoConfig;
use crate::foundation::error::{PhotoError, PhotoResult};
use crate::text::font::FontFace;

/// Well-known locations of a general-purpose sans face, tried when no default font is configured.
pub(crate) const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/system/fonts/HarmonyOS_Sans_SC.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Faces with Arabic/Hebrew coverage, tried when no RTL fallback font is configured.
pub(crate) const RTL_FALLBACK_CANDIDATES: &[&str] = &[
    "/system/fonts/HarmonyOS_Sans_Naskh_Arabic.ttf",
    "/usr/share/fonts/truetype/noto/NotoNaskhArabic-Regular.ttf",
    "/usr/share/fonts/noto/NotoNaskhArabic-Regular.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
];

const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc"];

/// Outcome of a family lookup.
#[derive(Debug, Clone, Copy)]
pub enum FontChoice<'a> {
    /// The requested family is registered.
    Entry(&'a FontFace),
    /// No match, but the text is right-to-left and an RTL face is available.
    RtlFallback(&'a FontFace),
    /// No override; draw with the default face.
    Default,
}

/// Family name → font face table, filled once when a context is created.
#[derive(Debug, Default)]
pub struct FontRegistry {
    entries: BTreeMap<String, FontFace>,
    default_face: Option<FontFace>,
    rtl_fallback: Option<FontFace>,
}

/// Family name derived from a font file name: everything before the first `.`.
///
/// Names starting with `.` or lacking one yield `None`.
pub fn family_from_file_name(name: &str) -> Option<&str> {
    match name.find('.') {
        Some(i) if i > 0 => Some(&name[..i]),
        _ => None,
    }
}

fn has_font_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| FONT_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

fn load_first(explicit: Option<&Path>, candidates: &[&str], role: &str) -> Option<FontFace> {
    let explicit = explicit.map(Path::to_path_buf);
    let paths = explicit
        .iter()
        .cloned()
        .chain(candidates.iter().map(PathBuf::from));
    for path in paths {
        if explicit.as_ref() != Some(&path) && !path.is_file() {
            continue;
        }
        let family = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(family_from_file_name)
            .unwrap_or(role)
            .to_owned();
        match FontFace::from_path(family, &path) {
            Ok(face) => {
                tracing::debug!(role, path = %path.display(), "loaded font");
                return Some(face);
            }
            Err(err) => {
                tracing::warn!(role, path = %path.display(), error = %err, "skipping font");
            }
        }
    }
    None
}

impl FontRegistry {
    /// A registry with no faces at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the registry described by `config`: bundled fonts, default face and RTL fallback.
    ///
    /// Never fails; unreadable fonts are logged and skipped.
    pub fn load(config: &PhotoConfig) -> Self {
        let mut reg = Self::empty();
        if let Some(dir) = &config.fonts_dir {
            reg.load_dir(dir);
        }
        reg.default_face = load_first(
            config.default_font.as_deref(),
            SYSTEM_FONT_CANDIDATES,
            "default",
        );
        reg.rtl_fallback = load_first(
            config.rtl_fallback_font.as_deref(),
            RTL_FALLBACK_CANDIDATES,
            "rtl-fallback",
        );
        tracing::info!(
            families = reg.entries.len(),
            has_default = reg.default_face.is_some(),
            has_rtl_fallback = reg.rtl_fallback.is_some(),
            "font registry ready"
        );
        reg
    }

    /// Register every font file directly inside `dir`. Returns how many faces were added.
    pub fn load_dir(&mut self, dir: &Path) -> usize {
        let rd = match std::fs::read_dir(dir) {
            Ok(rd) => rd,
            Err(err) => {
                tracing::warn!(dir = %dir.display(), error = %err, "font directory unavailable");
                return 0;
            }
        };

        let mut paths: Vec<PathBuf> = rd
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && has_font_extension(p))
            .collect();
        paths.sort();

        let mut added = 0;
        for path in paths {
            let Some(family) = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(family_from_file_name)
                .map(str::to_owned)
            else {
                continue;
            };
            match FontFace::from_path(family.clone(), &path) {
                Ok(face) => {
                    if self.entries.insert(family.clone(), face).is_some() {
                        tracing::warn!(%family, path = %path.display(), "font family registered twice; last one wins");
                    }
                    added += 1;
                }
                Err(err) => {
                    tracing::warn!(%family, path = %path.display(), error = %err, "skipping font");
                }
            }
        }
        added
    }

    /// Register one face under its family name.
    pub fn register(&mut self, face: FontFace) {
        self.entries.insert(face.family().to_owned(), face);
    }

    /// Replace the default face.
    pub fn set_default(&mut self, face: FontFace) {
        self.default_face = Some(face);
    }

    /// Replace the RTL fallback face.
    pub fn set_rtl_fallback(&mut self, face: FontFace) {
        self.rtl_fallback = Some(face);
    }

    /// Registered family names, sorted.
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of registered families.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no family is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up `family`; fall back to the RTL face for right-to-left text.
    pub fn resolve(&self, family: Option<&str>, is_rtl: bool) -> FontChoice<'_> {
        if let Some(face) = family.and_then(|f| self.entries.get(f)) {
            return FontChoice::Entry(face);
        }
        match (&self.rtl_fallback, is_rtl) {
            (Some(face), true) => FontChoice::RtlFallback(face),
            _ => FontChoice::Default,
        }
    }

    /// Face used when a lookup yields [`FontChoice::Default`]: the configured or system default,
    /// else the first registered family.
    pub fn default_face(&self) -> Option<&FontFace> {
        self.default_face
            .as_ref()
            .or_else(|| self.entries.values().next())
    }

    /// Resolve to a concrete face, failing when nothing at all is available.
    pub fn select(&self, family: Option<&str>, is_rtl: bool) -> PhotoResult<&FontFace> {
        match self.resolve(family, is_rtl) {
            FontChoice::Entry(face) | FontChoice::RtlFallback(face) => Ok(face),
            FontChoice::Default => self.default_face().ok_or_else(|| {
                PhotoError::render(
                    "select font",
                    anyhow::anyhow!("no font available; configure defaultFont or fontsDir"),
                )
            }),
        }
    }
}

/// First system font that loads, for font-dependent tests.
#[cfg(test)]
pub(crate) fn system_test_font() -> Option<FontFace> {
    load_first(None, SYSTEM_FONT_CANDIDATES, "test")
}

#[cfg(test)]
#[path = "../../tests/unit/text/registry.rs"]
mod tests;
