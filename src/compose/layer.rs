use crate::assets::source::ImageRef;
use crate::foundation::core::Anchor;
use crate::foundation::error::{PhotoError, PhotoResult};
use crate::style::descriptor::StyleDescriptor;
use crate::style::resolve::{ResolvedStyle, resolve};

/// An image drawn with its top-left corner at `anchor`.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayer {
    /// Image to draw.
    pub image: ImageRef,
    /// Top-left corner in background pixels.
    pub anchor: Anchor,
}

/// One styled text block, resolved when the layer is built.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayer {
    style: ResolvedStyle,
}

impl TextLayer {
    /// Resolve `desc`; malformed colors fail here, before any pixel is touched.
    pub fn new(desc: &StyleDescriptor) -> PhotoResult<Self> {
        Ok(Self {
            style: resolve(desc)?,
        })
    }

    /// The resolved style.
    pub fn style(&self) -> &ResolvedStyle {
        &self.style
    }
}

/// Something painted over the background, in list order.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    /// Foreground image.
    Overlay(OverlayLayer),
    /// Styled text.
    Text(TextLayer),
}

impl From<OverlayLayer> for Layer {
    fn from(l: OverlayLayer) -> Self {
        Self::Overlay(l)
    }
}

impl From<TextLayer> for Layer {
    fn from(l: TextLayer) -> Self {
        Self::Text(l)
    }
}

/// Parse a JSON array of text styles (a single object is accepted as a one-element list).
pub fn styles_from_json(value: serde_json::Value) -> PhotoResult<Vec<StyleDescriptor>> {
    match value {
        serde_json::Value::Array(items) => items.into_iter().map(StyleDescriptor::from_value).collect(),
        v @ serde_json::Value::Object(_) => Ok(vec![StyleDescriptor::from_value(v)?]),
        other => Err(PhotoError::style_parse(format!(
            "text styles must be an array of objects, got {other}"
        ))),
    }
}

/// Build text layers from descriptors, resolving every one up front.
pub fn text_layers(styles: &[StyleDescriptor]) -> PhotoResult<Vec<Layer>> {
    styles
        .iter()
        .map(|d| TextLayer::new(d).map(Layer::Text))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/compose/layer.rs"]
mod tests;
