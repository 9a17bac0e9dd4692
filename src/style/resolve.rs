use crate::foundation::core::{Anchor, Argb8};
use crate::foundation::error::PhotoResult;
use crate::style::descriptor::StyleDescriptor;
use crate::style::shadow::ShadowSpec;

/// Text size used when a style names none, or a non-positive one.
pub const DEFAULT_TEXT_SIZE: f32 = 14.0;

/// Horizontal alignment of each line relative to the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// `start`
    Start,
    /// `center`
    Center,
    /// `end`
    End,
    /// Absent or any other string.
    Unrecognized,
}

impl TextAlign {
    /// Parse the descriptor string. Only the exact lowercase names match.
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some("start") => Self::Start,
            Some("center") => Self::Center,
            Some("end") => Self::End,
            _ => Self::Unrecognized,
        }
    }
}

/// Base writing direction of a text layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `ltr`
    Ltr,
    /// `rtl`
    Rtl,
    /// Absent or any other string.
    Unrecognized,
}

impl Direction {
    /// Parse the descriptor string. Only the exact lowercase names match.
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some("ltr") => Self::Ltr,
            Some("rtl") => Self::Rtl,
            _ => Self::Unrecognized,
        }
    }
}

/// A style with every optional field replaced by its default.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    /// Non-empty text, possibly containing `\n`.
    pub text: String,
    /// Requested font family, if any.
    pub font_name: Option<String>,
    /// Fill and stroke color.
    pub color: Argb8,
    /// Font size in pixels.
    pub size: f32,
    /// Line alignment.
    pub align: TextAlign,
    /// Writing direction.
    pub direction: Direction,
    /// Stroke width; zero disables the stroke pass.
    pub stroke_width: f32,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Drop shadow for both passes.
    pub shadow: ShadowSpec,
    /// Anchor position.
    pub anchor: Anchor,
}

impl ResolvedStyle {
    /// Whether a stroke pass is drawn under the fill.
    pub fn has_stroke(&self) -> bool {
        self.stroke_width > 0.0
    }
}

/// Resolve a validated descriptor into a [`ResolvedStyle`].
///
/// Fails with [`crate::PhotoError::StyleParse`] on malformed colors.
pub fn resolve(desc: &StyleDescriptor) -> PhotoResult<ResolvedStyle> {
    let def = desc.def();

    let color = match &def.color {
        Some(c) => c.resolve()?,
        None => Argb8::BLACK,
    };
    let size = match def.text_size {
        Some(s) if s.is_finite() && s > 0.0 => s,
        _ => DEFAULT_TEXT_SIZE,
    };
    let stroke_width = match def.thickness {
        Some(t) if t.is_finite() && t > 0.0 => t,
        _ => 0.0,
    };
    let rotation = def.rotation.filter(|r| r.is_finite()).unwrap_or(0.0);
    let shadow = ShadowSpec::resolve(
        def.shadow_radius,
        def.shadow_offset,
        def.shadow_color.as_ref(),
    )?;

    Ok(ResolvedStyle {
        text: desc.text().to_owned(),
        font_name: def
            .font_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned),
        color,
        size,
        align: TextAlign::parse(def.align.as_deref()),
        direction: Direction::parse(def.direction.as_deref()),
        stroke_width,
        rotation,
        shadow,
        anchor: desc.anchor(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/style/resolve.rs"]
mod tests;
