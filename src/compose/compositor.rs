use std::path::PathBuf;

use crate::assets::decode::DecodedImage;
use crate::assets::source::{ImageLoader, ImageRef};
use crate::compose::layer::{Layer, OverlayLayer, text_layers};
use crate::encode::cache_path::{OutputKind, generate_cache_path, persist};
use crate::encode::mime::{MimeType, OutputOptions, extension_for_mime};
use crate::encode::packer::encode_surface;
use crate::foundation::config::PhotoConfig;
use crate::foundation::core::Anchor;
use crate::foundation::error::PhotoResult;
use crate::render::surface::Surface;
use crate::style::descriptor::StyleDescriptor;
use crate::style::resolve::ResolvedStyle;
use crate::text::bidi::is_rtl;
use crate::text::font::FontFace;
use crate::text::layout::TextLayoutEngine;
use crate::text::registry::FontRegistry;

/// Everything a compositing call needs that outlives it: configuration, the font table and the
/// image loader with its remote-fetch cache.
///
/// `Send + Sync`; independent calls may run on different threads.
#[derive(Debug)]
pub struct PhotoContext {
    config: PhotoConfig,
    fonts: FontRegistry,
    loader: ImageLoader,
    engine: TextLayoutEngine,
}

/// A layer with its inputs resolved, ready to draw.
enum Prepared<'a> {
    Image(DecodedImage, Anchor),
    Text(&'a ResolvedStyle, &'a FontFace),
}

impl PhotoContext {
    /// Create a context, loading fonts as `config` describes.
    pub fn new(config: PhotoConfig) -> PhotoResult<Self> {
        let fonts = FontRegistry::load(&config);
        Self::with_fonts(config, fonts)
    }

    /// Create a context around an already-built font registry.
    pub fn with_fonts(config: PhotoConfig, fonts: FontRegistry) -> PhotoResult<Self> {
        let loader = ImageLoader::new(config.assets_dir.clone(), config.fetch_timeout())?;
        Ok(Self {
            config,
            fonts,
            loader,
            engine: TextLayoutEngine,
        })
    }

    /// The configuration this context was built from.
    pub fn config(&self) -> &PhotoConfig {
        &self.config
    }

    /// The loaded fonts.
    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    /// Draw `styles` over `background` and write the result as `printText_<uuid>.<ext>`.
    ///
    /// The image is encoded as PNG unless `mime` asks for JPEG; quality is 100. `ext` comes
    /// from the requested mime string itself, so an absent mime yields `jpg`.
    pub fn render_text(
        &self,
        background: &str,
        styles: &[StyleDescriptor],
        mime: Option<&str>,
    ) -> PhotoResult<PathBuf> {
        let background = ImageRef::parse(background)?;
        let layers = text_layers(styles)?;
        let output = OutputOptions::new(MimeType::from_mime(mime));
        let ext = extension_for_mime(mime.unwrap_or_default());
        self.composite_as(&background, &layers, &output, OutputKind::PrintText, ext)
    }

    /// Draw `overlay` over `background` with its top-left corner at `anchor` and write the
    /// result as `overlay_<uuid>_<millis>.<ext>`. Encoding and naming follow
    /// [`PhotoContext::render_text`].
    pub fn composite_overlay(
        &self,
        background: &str,
        overlay: &str,
        anchor: Anchor,
        mime: Option<&str>,
    ) -> PhotoResult<PathBuf> {
        let background = ImageRef::parse(background)?;
        let layer = Layer::Overlay(OverlayLayer {
            image: ImageRef::parse(overlay)?,
            anchor,
        });
        let output = OutputOptions::new(MimeType::from_mime(mime));
        let ext = extension_for_mime(mime.unwrap_or_default());
        self.composite_as(&background, &[layer], &output, OutputKind::Overlay, ext)
    }

    /// Draw `layers` over `background` in order and write the encoded result to a fresh cache
    /// path, which is returned.
    ///
    /// Outputs containing an overlay are named like [`PhotoContext::composite_overlay`] results,
    /// text-only outputs like [`PhotoContext::render_text`] results.
    pub fn composite(
        &self,
        background: &ImageRef,
        layers: &[Layer],
        output: &OutputOptions,
    ) -> PhotoResult<PathBuf> {
        let kind = if layers.iter().any(|l| matches!(l, Layer::Overlay(_))) {
            OutputKind::Overlay
        } else {
            OutputKind::PrintText
        };
        self.composite_as(background, layers, output, kind, output.mime.extension())
    }

    #[tracing::instrument(
        skip_all,
        fields(background = %background, layers = layers.len(), mime = %output.mime, ?kind, ext = %ext)
    )]
    fn composite_as(
        &self,
        background: &ImageRef,
        layers: &[Layer],
        output: &OutputOptions,
        kind: OutputKind,
        ext: &str,
    ) -> PhotoResult<PathBuf> {
        let surface = self.compose_surface(background, layers)?;
        let bytes = encode_surface(&surface, output)?;
        let path = generate_cache_path(&self.config.cache_dir, kind, ext);
        persist(&path, &bytes)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote output");
        Ok(path)
    }

    /// Draw `layers` over `background` without encoding.
    ///
    /// Every image and font is resolved before the surface is allocated, so load failures
    /// leave nothing behind. Each layer draws inside its own save scope.
    pub fn compose_surface(&self, background: &ImageRef, layers: &[Layer]) -> PhotoResult<Surface> {
        let bg = self.loader.load(background)?;
        let prepared = layers
            .iter()
            .map(|l| self.prepare(l))
            .collect::<PhotoResult<Vec<_>>>()?;

        let mut surface = Surface::new(bg.width(), bg.height())?;
        surface.draw_image(&bg, 0.0, 0.0)?;

        for (i, layer) in prepared.iter().enumerate() {
            let mut g = surface.save();
            match layer {
                Prepared::Image(img, at) => {
                    tracing::debug!(layer = i, x = at.x, y = at.y, "draw overlay");
                    g.draw_image(img, at.x, at.y)?;
                }
                Prepared::Text(style, font) => {
                    self.engine.render(&mut g, style, font)?;
                }
            }
        }
        Ok(surface)
    }

    fn prepare<'a>(&'a self, layer: &'a Layer) -> PhotoResult<Prepared<'a>> {
        match layer {
            Layer::Overlay(o) => Ok(Prepared::Image(self.loader.load(&o.image)?, o.anchor)),
            Layer::Text(t) => {
                let style = t.style();
                let font = self
                    .fonts
                    .select(style.font_name.as_deref(), is_rtl(&style.text))?;
                Ok(Prepared::Text(style, font))
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
