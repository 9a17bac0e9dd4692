use crate::foundation::core::Point;
use crate::foundation::error::PhotoResult;
use crate::render::surface::{FillPaint, StrokePaint, Surface};
use crate::style::resolve::{Direction, ResolvedStyle, TextAlign};
use crate::text::bidi::visual_line;
use crate::text::font::{FontFace, ShapedLine};

/// Split on `\n`, dropping one trailing `\r` per line. Empty input yields no lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect()
}

/// Horizontal start of a line of advance `width` anchored at `x`.
///
/// For `rtl` an unrecognized alignment mirrors the anchor against the surface width; for `ltr`
/// it keeps `x`; any other direction always keeps `x`.
pub fn anchor_x(direction: Direction, align: TextAlign, x: f64, width: f64, surface_width: f64) -> f64 {
    match direction {
        Direction::Rtl => match align {
            TextAlign::Center => x - width / 2.0,
            TextAlign::Start => x - width,
            TextAlign::End => x,
            TextAlign::Unrecognized => surface_width - (x + width),
        },
        Direction::Ltr => match align {
            TextAlign::Center => x - width / 2.0,
            TextAlign::Start => x,
            TextAlign::End => x - width,
            TextAlign::Unrecognized => x,
        },
        Direction::Unrecognized => x,
    }
}

/// Vertical offset of line `index`.
pub fn line_offset(index: usize, line_height: f64) -> f64 {
    index as f64 * line_height
}

/// Baseline of a line: the anchor `y`, pushed down by half the text size plus the line offset.
pub fn baseline_y(anchor_y: f64, size: f32, offset: f64) -> f64 {
    anchor_y + f64::from(size) / 2.0 + offset
}

/// One laid-out line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    /// Position within the text.
    pub index: usize,
    /// Glyphs in visual order.
    pub shaped: ShapedLine,
    /// `index × lineHeight`.
    pub offset: f64,
    /// Left end of the baseline.
    pub origin: Point,
}

/// Lays out styled multi-line text and draws it onto a [`Surface`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TextLayoutEngine;

impl TextLayoutEngine {
    /// Compute every line's glyphs and origin without drawing.
    pub fn layout(
        &self,
        style: &ResolvedStyle,
        font: &FontFace,
        surface_width: u32,
    ) -> PhotoResult<Vec<LineLayout>> {
        let line_height = f64::from(font.metrics(style.size).line_height());
        split_lines(&style.text)
            .into_iter()
            .enumerate()
            .map(|(index, line)| {
                let shaped = font.shape(&visual_line(line), style.size)?;
                let x = anchor_x(
                    style.direction,
                    style.align,
                    style.anchor.x,
                    f64::from(shaped.advance),
                    f64::from(surface_width),
                );
                let offset = line_offset(index, line_height);
                let y = baseline_y(style.anchor.y, style.size, offset);
                Ok(LineLayout {
                    index,
                    shaped,
                    offset,
                    origin: Point::new(x, y),
                })
            })
            .collect()
    }

    /// Draw `style` onto `surface` with `font`. Paint state is restored afterwards.
    ///
    /// Pixels already drawn stay in place if a later line fails.
    pub fn render(&self, surface: &mut Surface, style: &ResolvedStyle, font: &FontFace) -> PhotoResult<()> {
        let lines = self.layout(style, font, surface.width())?;
        if lines.is_empty() {
            return Ok(());
        }
        tracing::debug!(
            lines = lines.len(),
            family = font.family(),
            size = style.size,
            "draw text layer"
        );

        let mut g = surface.save();
        if style.has_stroke() {
            g.attach_stroke(StrokePaint {
                color: style.color,
                width: style.stroke_width,
                shadow: style.shadow,
            });
        }
        g.attach_fill(FillPaint {
            color: style.color,
            shadow: style.shadow,
        });

        for line in &lines {
            let mut lg = g.save();
            if style.rotation != 0.0 {
                lg.rotate(-style.rotation, line.origin);
            }
            lg.draw_glyphs(font, style.size, &line.shaped, line.origin)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
