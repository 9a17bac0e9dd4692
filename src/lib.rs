//! Photo manipulator draws styled multi-line text and overlay images onto a background image,
//! encodes the result and writes it to a cache directory.
//!
//! The public API is context-oriented:
//!
//! - Build a [`PhotoConfig`] and a [`PhotoContext`] (fonts are loaded once, here)
//! - Call [`PhotoContext::render_text`] or [`PhotoContext::composite_overlay`], or compose a
//!   mixed [`Layer`] list with [`PhotoContext::composite`]
//! - Use the returned path; nothing is written when a call fails
//!
//! Rendering is CPU-only (`vello_cpu`) and deterministic for identical inputs and fonts.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod compose;
mod encode;
mod foundation;
mod render;
mod style;
mod text;

pub use crate::foundation::config::PhotoConfig;
pub use crate::foundation::core::{Affine, Anchor, Argb8, Canvas, Point};
pub use crate::foundation::error::{PhotoError, PhotoResult};

pub use crate::style::color::{ColorDef, parse_hex_argb};
pub use crate::style::descriptor::{OffsetDef, StyleDef, StyleDescriptor};
pub use crate::style::resolve::{DEFAULT_TEXT_SIZE, Direction, ResolvedStyle, TextAlign, resolve};
pub use crate::style::shadow::{DEFAULT_SHADOW_RADIUS, ShadowSpec};

pub use crate::text::bidi::{is_rtl, visual_line};
pub use crate::text::font::{FontFace, LineMetrics, PositionedGlyph, ShapedLine};
pub use crate::text::layout::{LineLayout, TextLayoutEngine, anchor_x, line_offset, split_lines};
pub use crate::text::registry::{FontChoice, FontRegistry, family_from_file_name};

pub use crate::render::surface::{FillPaint, PaintState, StrokePaint, Surface, SurfaceGuard};

pub use crate::assets::decode::{DecodedImage, decode_image};
pub use crate::assets::source::{ImageLoader, ImageRef};

pub use crate::encode::cache_path::{OutputKind, cache_file_name, generate_cache_path};
pub use crate::encode::mime::{MimeType, OutputOptions, extension_for_mime};
pub use crate::encode::packer::encode_surface;

pub use crate::compose::compositor::PhotoContext;
pub use crate::compose::layer::{Layer, OverlayLayer, TextLayer, styles_from_json, text_layers};
