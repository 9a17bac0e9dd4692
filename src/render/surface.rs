use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::assets::decode::DecodedImage;
use crate::foundation::core::{Affine, Argb8, Canvas, Point};
use crate::foundation::error::{PhotoError, PhotoResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;
use crate::render::blur::blur_in_place;
use crate::render::composite::{premul_over_at, premul_over_in_place};
use crate::style::shadow::ShadowSpec;
use crate::text::font::{FontFace, ShapedLine};

/// Brush used to fill glyph outlines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillPaint {
    /// Fill color.
    pub color: Argb8,
    /// Shadow drawn beneath the fill.
    pub shadow: ShadowSpec,
}

/// Pen used to outline glyphs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokePaint {
    /// Stroke color.
    pub color: Argb8,
    /// Stroke width in pixels.
    pub width: f32,
    /// Shadow drawn beneath the stroke.
    pub shadow: ShadowSpec,
}

/// The save/restore-able part of a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintState {
    /// Current transformation matrix.
    pub transform: Affine,
    /// Attached brush, if any.
    pub fill: Option<FillPaint>,
    /// Attached pen, if any.
    pub stroke: Option<StrokePaint>,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            fill: None,
            stroke: None,
        }
    }
}

/// Mutable raster canvas in premultiplied RGBA8, exclusively owned by one compositing call.
///
/// Every draw is rasterized into a cleared scratch pixmap and composited source-over onto the
/// canvas, so shadows can be blurred independently of what is already on the canvas.
pub struct Surface {
    width: u16,
    height: u16,
    pixels: Vec<u8>,
    ctx: vello_cpu::RenderContext,
    scratch: vello_cpu::Pixmap,
    state: PaintState,
    stack: Vec<PaintState>,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("state", &self.state)
            .field("depth", &self.stack.len())
            .finish()
    }
}

/// Scope of one `save()`: dereferences to the surface and restores the paint state on drop.
pub struct SurfaceGuard<'a> {
    surface: &'a mut Surface,
    depth: usize,
}

impl Deref for SurfaceGuard<'_> {
    type Target = Surface;

    fn deref(&self) -> &Surface {
        self.surface
    }
}

impl DerefMut for SurfaceGuard<'_> {
    fn deref_mut(&mut self) -> &mut Surface {
        self.surface
    }
}

impl Drop for SurfaceGuard<'_> {
    fn drop(&mut self) {
        self.surface.restore_to(self.depth);
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn integer_translation(a: Affine) -> Option<(i64, i64)> {
    let [xx, yx, xy, yy, tx, ty] = a.as_coeffs();
    let is_int = |v: f64| v.is_finite() && v.fract() == 0.0;
    if xx == 1.0 && yx == 0.0 && xy == 0.0 && yy == 1.0 && is_int(tx) && is_int(ty) {
        Some((tx as i64, ty as i64))
    } else {
        None
    }
}

fn pixmap_from_premul_bytes(bytes: &[u8], width: u32, height: u32) -> PhotoResult<vello_cpu::Pixmap> {
    let (w, h) = dims_u16(width, height)?;
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

fn dims_u16(width: u32, height: u32) -> PhotoResult<(u16, u16)> {
    let too_big = || {
        PhotoError::render(
            "allocate surface",
            anyhow::anyhow!("{width}x{height} exceeds the maximum of 65535x65535"),
        )
    };
    let w: u16 = width.try_into().map_err(|_| too_big())?;
    let h: u16 = height.try_into().map_err(|_| too_big())?;
    Ok((w, h))
}

impl Surface {
    /// Allocate a fully transparent `width × height` surface.
    pub fn new(width: u32, height: u32) -> PhotoResult<Self> {
        if width == 0 || height == 0 {
            return Err(PhotoError::render(
                "allocate surface",
                anyhow::anyhow!("surface dimensions must be non-zero, got {width}x{height}"),
            ));
        }
        let (w, h) = dims_u16(width, height)?;
        Ok(Self {
            width: w,
            height: h,
            pixels: vec![0; Canvas { width, height }.rgba8_len()],
            ctx: vello_cpu::RenderContext::new(w, h),
            scratch: vello_cpu::Pixmap::new(w, h),
            state: PaintState::default(),
            stack: Vec::new(),
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Current paint state.
    pub fn state(&self) -> &PaintState {
        &self.state
    }

    /// Number of open `save()` scopes.
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    /// Push the paint state; it is restored when the returned guard is dropped.
    pub fn save(&mut self) -> SurfaceGuard<'_> {
        let depth = self.stack.len();
        self.stack.push(self.state);
        SurfaceGuard {
            surface: self,
            depth,
        }
    }

    fn restore_to(&mut self, depth: usize) {
        if let Some(saved) = self.stack.get(depth).copied() {
            self.state = saved;
            self.stack.truncate(depth);
        }
    }

    /// Rotate subsequent drawing by `degrees` (clockwise on screen) about `pivot`.
    pub fn rotate(&mut self, degrees: f64, pivot: Point) {
        self.state.transform =
            self.state.transform * Affine::rotate_about(degrees.to_radians(), pivot);
    }

    /// Translate subsequent drawing.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.state.transform = self.state.transform * Affine::translate((dx, dy));
    }

    /// Attach a brush for glyph fills.
    pub fn attach_fill(&mut self, paint: FillPaint) {
        self.state.fill = Some(paint);
    }

    /// Attach a pen for glyph outlines.
    pub fn attach_stroke(&mut self, paint: StrokePaint) {
        self.state.stroke = Some(paint);
    }

    /// Detach the brush.
    pub fn detach_fill(&mut self) {
        self.state.fill = None;
    }

    /// Detach the pen.
    pub fn detach_stroke(&mut self) {
        self.state.stroke = None;
    }

    /// Draw `image` with its top-left corner at `(x, y)` in the current transform.
    pub fn draw_image(&mut self, image: &DecodedImage, x: f64, y: f64) -> PhotoResult<()> {
        let tr = self.state.transform * Affine::translate((x, y));
        if let Some((dx, dy)) = integer_translation(tr) {
            let (w, h) = (self.width(), self.height());
            return premul_over_at(
                &mut self.pixels,
                w,
                h,
                image.rgba8_premul(),
                image.width(),
                image.height(),
                dx,
                dy,
            );
        }

        let pixmap = pixmap_from_premul_bytes(image.rgba8_premul(), image.width(), image.height())?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.ctx.reset();
        self.ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(tr));
        self.ctx.set_paint(paint);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(image.width()),
            f64::from(image.height()),
        ));
        self.flush_scratch();
        premul_over_in_place(&mut self.pixels, self.scratch.data_as_u8_slice())
    }

    /// Draw a shaped line with its origin (left end of the baseline) at `origin`, using the
    /// attached paints: shadows first, then the stroke, then the fill on top.
    pub fn draw_glyphs(
        &mut self,
        font: &FontFace,
        size: f32,
        line: &ShapedLine,
        origin: Point,
    ) -> PhotoResult<()> {
        if line.glyphs.is_empty() {
            return Ok(());
        }
        let PaintState { fill, stroke, .. } = self.state;

        if let Some(s) = stroke.filter(|s| s.shadow.is_visible()) {
            self.glyph_shadow(font, size, line, origin, &s.shadow, Some(s.width))?;
        }
        if let Some(f) = fill.filter(|f| f.shadow.is_visible()) {
            self.glyph_shadow(font, size, line, origin, &f.shadow, None)?;
        }
        if let Some(s) = stroke {
            self.glyph_pass(font, size, line, origin, s.color, Some(s.width), Affine::IDENTITY);
            premul_over_in_place(&mut self.pixels, self.scratch.data_as_u8_slice())?;
        }
        if let Some(f) = fill {
            self.glyph_pass(font, size, line, origin, f.color, None, Affine::IDENTITY);
            premul_over_in_place(&mut self.pixels, self.scratch.data_as_u8_slice())?;
        }
        Ok(())
    }

    fn glyph_shadow(
        &mut self,
        font: &FontFace,
        size: f32,
        line: &ShapedLine,
        origin: Point,
        shadow: &ShadowSpec,
        stroke_width: Option<f32>,
    ) -> PhotoResult<()> {
        let offset = Affine::translate((f64::from(shadow.dx), f64::from(shadow.dy)));
        self.glyph_pass(font, size, line, origin, shadow.color, stroke_width, offset);
        let (w, h) = (self.width(), self.height());
        blur_in_place(self.scratch.data_as_u8_slice_mut(), w, h, shadow.sigma())?;
        premul_over_in_place(&mut self.pixels, self.scratch.data_as_u8_slice())
    }

    #[allow(clippy::too_many_arguments)]
    fn glyph_pass(
        &mut self,
        font: &FontFace,
        size: f32,
        line: &ShapedLine,
        origin: Point,
        color: Argb8,
        stroke_width: Option<f32>,
        device_offset: Affine,
    ) {
        self.ctx.reset();
        self.ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        self.ctx.set_transform(affine_to_cpu(device_offset * self.state.transform));
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        let (ox, oy) = (origin.x as f32, origin.y as f32);
        let glyphs = line.glyphs.iter().map(|g| vello_cpu::Glyph {
            id: g.id,
            x: ox + g.x,
            y: oy,
        });
        match stroke_width {
            Some(w) => {
                self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(f64::from(w)));
                self.ctx
                    .glyph_run(font.font_data())
                    .font_size(size)
                    .stroke_glyphs(glyphs);
            }
            None => {
                self.ctx
                    .glyph_run(font.font_data())
                    .font_size(size)
                    .fill_glyphs(glyphs);
            }
        }
        self.flush_scratch();
    }

    fn flush_scratch(&mut self) {
        self.scratch.data_as_u8_slice_mut().fill(0);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.scratch);
    }

    /// Canvas pixels, premultiplied RGBA8, row-major.
    pub fn rgba8_premul(&self) -> &[u8] {
        &self.pixels
    }

    /// Premultiplied RGBA8 value at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let i = ((y as usize) * (self.width() as usize) + x as usize) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Canvas pixels converted to straight-alpha RGBA8 for encoding.
    pub fn to_rgba8_straight(&self) -> Vec<u8> {
        let mut out = self.pixels.clone();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
