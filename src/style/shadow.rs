use crate::foundation::core::Argb8;
use crate::foundation::error::PhotoResult;
use crate::style::color::ColorDef;
use crate::style::descriptor::OffsetDef;

/// Blur radius used when a shadow is requested without an explicit radius.
pub const DEFAULT_SHADOW_RADIUS: f32 = 3.0;

/// Resolved drop shadow attached to both the fill and the stroke paint of a text layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowSpec {
    /// Blur radius in pixels. Zero means "no shadow layer".
    pub radius: f32,
    /// Horizontal offset in pixels.
    pub dx: f32,
    /// Vertical offset in pixels.
    pub dy: f32,
    /// Shadow color.
    pub color: Argb8,
}

impl ShadowSpec {
    /// The absent shadow.
    pub const NONE: Self = Self {
        radius: 0.0,
        dx: 0.0,
        dy: 0.0,
        color: Argb8::BLACK,
    };

    /// Resolve from the three optional shadow fields of a style descriptor.
    ///
    /// When none of them is present the result is [`ShadowSpec::NONE`]. Otherwise missing
    /// fields default to radius 3, offset (0,0) and opaque black.
    pub fn resolve(
        radius: Option<f32>,
        offset: Option<OffsetDef>,
        color: Option<&ColorDef>,
    ) -> PhotoResult<Self> {
        if radius.is_none() && offset.is_none() && color.is_none() {
            return Ok(Self::NONE);
        }
        let color = match color {
            Some(c) => c.resolve()?,
            None => Argb8::BLACK,
        };
        let (dx, dy) = offset.map(|o| (o.x as f32, o.y as f32)).unwrap_or((0.0, 0.0));
        let radius = match radius {
            Some(r) if r.is_finite() && r > 0.0 => r,
            Some(_) => 0.0,
            None => DEFAULT_SHADOW_RADIUS,
        };
        Ok(Self {
            radius,
            dx,
            dy,
            color,
        })
    }

    /// Whether a shadow layer should be attached at all.
    pub fn is_visible(&self) -> bool {
        self.radius > 0.0
    }

    /// Gaussian sigma matching the radius-to-sigma convention of common 2D canvases.
    pub fn sigma(&self) -> f32 {
        if self.radius <= 0.0 {
            0.0
        } else {
            0.577_35 * self.radius + 0.5
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/shadow.rs"]
mod tests;
