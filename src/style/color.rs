use serde::{Deserialize, Serialize};

use crate::foundation::core::Argb8;
use crate::foundation::error::{PhotoError, PhotoResult};

/// Boundary representation of a color: either a hex string or an `{a,r,g,b}` object.
///
/// Parsing is deferred to [`ColorDef::resolve`] so that malformed values surface as
/// [`PhotoError::StyleParse`] instead of a generic deserialization failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorDef {
    /// `#AARRGGBB` or `#RRGGBB`.
    Hex(String),
    /// Structured channels in `0..=255`. Alpha defaults to opaque.
    Channels {
        /// Alpha channel.
        #[serde(default = "opaque")]
        a: f64,
        /// Red channel.
        r: f64,
        /// Green channel.
        g: f64,
        /// Blue channel.
        b: f64,
    },
}

fn opaque() -> f64 {
    255.0
}

impl ColorDef {
    /// Validate and convert to an [`Argb8`].
    pub fn resolve(&self) -> PhotoResult<Argb8> {
        match self {
            Self::Hex(s) => parse_hex_argb(s),
            Self::Channels { a, r, g, b } => Ok(Argb8::new(
                channel("a", *a)?,
                channel("r", *r)?,
                channel("g", *g)?,
                channel("b", *b)?,
            )),
        }
    }
}

fn channel(name: &str, v: f64) -> PhotoResult<u8> {
    if !v.is_finite() || !(0.0..=255.0).contains(&v) {
        return Err(PhotoError::style_parse(format!(
            "color channel '{name}' must be within 0..=255, got {v}"
        )));
    }
    Ok(v.round() as u8)
}

/// Parse `#AARRGGBB` / `#RRGGBB` (leading `#` optional, case-insensitive).
///
/// The six-digit form is opaque. Byte groups are read in alpha, red, green, blue order.
pub fn parse_hex_argb(s: &str) -> PhotoResult<Argb8> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> PhotoResult<u8> {
        u8::from_str_radix(pair, 16)
            .map_err(|_| PhotoError::style_parse(format!("invalid hex byte \"{pair}\"")))
    }

    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(PhotoError::style_parse(
            "hex color must contain only hex digits",
        ));
    }

    match s.len() {
        6 => Ok(Argb8::new(
            255,
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        8 => Ok(Argb8::new(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        )),
        _ => Err(PhotoError::style_parse(
            "hex color must be #AARRGGBB or #RRGGBB (case-insensitive)",
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/color.rs"]
mod tests;
