use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{PhotoError, PhotoResult};

/// Vertical metrics of a face at a given size, in pixels.
///
/// `ascent` is negative (above the baseline) and `descent` positive, so the line height is
/// `descent - ascent`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    /// Baseline to the top of the tallest glyph, negative.
    pub ascent: f32,
    /// Baseline to the bottom of the lowest glyph, positive.
    pub descent: f32,
}

impl LineMetrics {
    /// Distance between two consecutive baselines.
    pub fn line_height(&self) -> f32 {
        self.descent - self.ascent
    }
}

/// A glyph placed along a line, relative to the line origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionedGlyph {
    /// Glyph id in the face.
    pub id: u32,
    /// Horizontal pen position.
    pub x: f32,
}

/// One line converted to glyphs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapedLine {
    /// Glyphs in drawing order.
    pub glyphs: Vec<PositionedGlyph>,
    /// Total advance width.
    pub advance: f32,
}

#[derive(Debug, Clone, Copy)]
struct FaceHeader {
    units_per_em: u16,
    ascender: i16,
    descender: i16,
}

/// A loaded font face: raw bytes for the rasterizer plus header metrics for layout.
///
/// Cheap to clone; the font bytes are shared.
#[derive(Clone)]
pub struct FontFace {
    family: String,
    path: Option<PathBuf>,
    data: vello_cpu::peniko::FontData,
    header: FaceHeader,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("path", &self.path)
            .field("units_per_em", &self.header.units_per_em)
            .finish()
    }
}

impl FontFace {
    /// Parse `bytes` as a TrueType/OpenType face (collection index 0).
    pub fn from_bytes(family: impl Into<String>, bytes: Vec<u8>) -> PhotoResult<Self> {
        let family = family.into();
        let header = {
            let face = ttf_parser::Face::parse(&bytes, 0)
                .with_context(|| format!("parse font face '{family}'"))?;
            FaceHeader {
                units_per_em: face.units_per_em(),
                ascender: face.ascender(),
                descender: face.descender(),
            }
        };
        if header.units_per_em == 0 {
            return Err(anyhow::anyhow!("font face '{family}' has zero units per em").into());
        }
        let data =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);
        Ok(Self {
            family,
            path: None,
            data,
            header,
        })
    }

    /// Read and parse a font file.
    pub fn from_path(family: impl Into<String>, path: &Path) -> PhotoResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file '{}'", path.display()))?;
        let mut face = Self::from_bytes(family, bytes)?;
        face.path = Some(path.to_path_buf());
        Ok(face)
    }

    /// Family name this face was registered under.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Source file, when loaded from disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub(crate) fn font_data(&self) -> &vello_cpu::peniko::FontData {
        &self.data
    }

    fn scale(&self, size: f32) -> f32 {
        size / f32::from(self.header.units_per_em)
    }

    /// Ascent and descent at `size` pixels.
    pub fn metrics(&self, size: f32) -> LineMetrics {
        let scale = self.scale(size);
        LineMetrics {
            ascent: -f32::from(self.header.ascender) * scale,
            descent: -f32::from(self.header.descender) * scale,
        }
    }

    /// Map `text` to glyphs with horizontal advances. No joining, kerning or reordering;
    /// characters without a glyph use the face's `.notdef` glyph.
    pub fn shape(&self, text: &str, size: f32) -> PhotoResult<ShapedLine> {
        let face = ttf_parser::Face::parse(self.data.data.data(), self.data.index)
            .map_err(|e| PhotoError::render(format!("shape with '{}'", self.family), e))?;
        let scale = self.scale(size);

        let mut out = ShapedLine {
            glyphs: Vec::with_capacity(text.len()),
            advance: 0.0,
        };
        for ch in text.chars() {
            if ch.is_control() {
                continue;
            }
            let id = face.glyph_index(ch).unwrap_or(ttf_parser::GlyphId(0));
            let adv = f32::from(face.glyph_hor_advance(id).unwrap_or(0)) * scale;
            out.glyphs.push(PositionedGlyph {
                id: u32::from(id.0),
                x: out.advance,
            });
            out.advance += adv;
        }
        Ok(out)
    }

    /// Advance width of `text` at `size` pixels.
    pub fn measure(&self, text: &str, size: f32) -> PhotoResult<f32> {
        Ok(self.shape(text, size)?.advance)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/font.rs"]
mod tests;
