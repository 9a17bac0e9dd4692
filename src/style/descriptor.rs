use serde::{Deserialize, Serialize};

use crate::foundation::core::Anchor;
use crate::foundation::error::{PhotoError, PhotoResult};
use crate::style::color::ColorDef;

/// `{x, y}` or `[x, y]` pair used for positions and shadow offsets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OffsetDef {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl<'de> Deserialize<'de> for OffsetDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr([f64; 2]),
            Obj {
                #[serde(default)]
                x: f64,
                #[serde(default)]
                y: f64,
            },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Arr([x, y]) => Ok(Self { x, y }),
            Repr::Obj { x, y } => Ok(Self { x, y }),
        }
    }
}

/// Raw, JSON-facing text style as supplied by callers.
///
/// Field names follow the camelCase keys of the public API (`fontName`, `textSize`,
/// `shadowOffset`, ...). Every field is optional here; [`StyleDescriptor::new`] enforces the
/// mandatory ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDef {
    /// Text to draw; `\n` separates lines.
    #[serde(default)]
    pub text: Option<String>,
    /// Registered font family name.
    #[serde(default)]
    pub font_name: Option<String>,
    /// Fill and stroke color.
    #[serde(default)]
    pub color: Option<ColorDef>,
    /// Font size in pixels.
    #[serde(default)]
    pub text_size: Option<f32>,
    /// `start`, `center` or `end`.
    #[serde(default)]
    pub align: Option<String>,
    /// `ltr` or `rtl`.
    #[serde(default)]
    pub direction: Option<String>,
    /// Anchor in image pixels.
    #[serde(default)]
    pub position: Option<OffsetDef>,
    /// Stroke width in pixels.
    #[serde(default)]
    pub thickness: Option<f32>,
    /// Shadow blur radius.
    #[serde(default)]
    pub shadow_radius: Option<f32>,
    /// Shadow offset.
    #[serde(default)]
    pub shadow_offset: Option<OffsetDef>,
    /// Shadow color.
    #[serde(default)]
    pub shadow_color: Option<ColorDef>,
    /// Rotation in degrees, counter-clockwise on screen.
    #[serde(default)]
    pub rotation: Option<f64>,
}

/// Validated text style. Guaranteed to carry non-empty text.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDescriptor {
    def: StyleDef,
}

impl StyleDescriptor {
    /// Validate a raw style. Fails with [`PhotoError::ParamsRequired`] on missing or empty text.
    pub fn new(def: StyleDef) -> PhotoResult<Self> {
        match def.text.as_deref() {
            Some(t) if !t.is_empty() => Ok(Self { def }),
            _ => Err(PhotoError::params_required("mark text is required")),
        }
    }

    /// Build from an untyped JSON value.
    pub fn from_value(value: serde_json::Value) -> PhotoResult<Self> {
        let def: StyleDef = serde_json::from_value(value)
            .map_err(|e| PhotoError::style_parse(format!("text style: {e}")))?;
        Self::new(def)
    }

    /// The text to draw.
    pub fn text(&self) -> &str {
        self.def.text.as_deref().unwrap_or_default()
    }

    /// Anchor position, defaulting to the origin.
    pub fn anchor(&self) -> Anchor {
        self.def
            .position
            .map(|p| Anchor::new(p.x, p.y))
            .unwrap_or_default()
    }

    /// The raw fields.
    pub fn def(&self) -> &StyleDef {
        &self.def
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/descriptor.rs"]
mod tests;
