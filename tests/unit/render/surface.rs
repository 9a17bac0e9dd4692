use super::*;
use crate::text::registry::system_test_font;

fn solid(w: u32, h: u32, px: [u8; 4]) -> DecodedImage {
    let bytes = px.iter().copied().cycle().take((w * h * 4) as usize).collect();
    DecodedImage::from_premul_rgba8(w, h, bytes).unwrap()
}

fn ink_columns(s: &Surface) -> Vec<u32> {
    (0..s.width())
        .filter(|&x| (0..s.height()).any(|y| s.pixel(x, y).is_some_and(|p| p[3] > 0)))
        .collect()
}

#[test]
fn zero_sized_surface_is_rejected() {
    assert!(matches!(Surface::new(0, 10), Err(PhotoError::Render { .. })));
    assert!(matches!(Surface::new(70_000, 1), Err(PhotoError::Render { .. })));
}

#[test]
fn guard_restores_state_on_drop() {
    let mut s = Surface::new(8, 8).unwrap();
    {
        let mut g = s.save();
        g.rotate(45.0, Point::new(4.0, 4.0));
        g.attach_fill(FillPaint {
            color: Argb8::BLACK,
            shadow: ShadowSpec::NONE,
        });
        {
            let mut inner = g.save();
            inner.translate(1.0, 2.0);
            assert_eq!(inner.save_depth(), 2);
        }
        assert_eq!(g.save_depth(), 1);
        assert_ne!(g.state().transform, Affine::IDENTITY);
        assert!(g.state().fill.is_some());
    }
    assert_eq!(s.save_depth(), 0);
    assert_eq!(*s.state(), PaintState::default());
}

#[test]
fn draw_image_at_integer_offset_is_exact() {
    let mut s = Surface::new(4, 4).unwrap();
    s.draw_image(&solid(4, 4, [0, 0, 255, 255]), 0.0, 0.0).unwrap();
    s.draw_image(&solid(2, 2, [255, 0, 0, 255]), 1.0, 1.0).unwrap();

    assert_eq!(s.pixel(0, 0), Some([0, 0, 255, 255]));
    assert_eq!(s.pixel(1, 1), Some([255, 0, 0, 255]));
    assert_eq!(s.pixel(2, 2), Some([255, 0, 0, 255]));
    assert_eq!(s.pixel(3, 3), Some([0, 0, 255, 255]));
    assert_eq!(s.pixel(4, 0), None);
}

#[test]
fn later_images_cover_earlier_ones() {
    let mut a = Surface::new(2, 2).unwrap();
    a.draw_image(&solid(2, 2, [255, 0, 0, 255]), 0.0, 0.0).unwrap();
    a.draw_image(&solid(2, 2, [0, 255, 0, 255]), 0.0, 0.0).unwrap();

    let mut b = Surface::new(2, 2).unwrap();
    b.draw_image(&solid(2, 2, [0, 255, 0, 255]), 0.0, 0.0).unwrap();
    b.draw_image(&solid(2, 2, [255, 0, 0, 255]), 0.0, 0.0).unwrap();

    assert_eq!(a.pixel(0, 0), Some([0, 255, 0, 255]));
    assert_eq!(b.pixel(0, 0), Some([255, 0, 0, 255]));
}

#[test]
fn straight_export_unpremultiplies() {
    let mut s = Surface::new(1, 1).unwrap();
    s.draw_image(&solid(1, 1, [64, 0, 0, 128]), 0.0, 0.0).unwrap();
    let straight = s.to_rgba8_straight();
    assert_eq!(straight[3], 128);
    assert_eq!(straight[0], 128);
}

#[test]
fn glyphs_without_paint_draw_nothing() {
    let Some(font) = system_test_font() else {
        return;
    };
    let mut s = Surface::new(64, 32).unwrap();
    let line = font.shape("Hi", 20.0).unwrap();
    s.draw_glyphs(&font, 20.0, &line, Point::new(4.0, 24.0)).unwrap();
    assert!(s.rgba8_premul().iter().all(|&b| b == 0));
}

#[test]
fn filled_glyphs_leave_ink_right_of_origin() {
    let Some(font) = system_test_font() else {
        return;
    };
    let mut s = Surface::new(80, 40).unwrap();
    s.attach_fill(FillPaint {
        color: Argb8::BLACK,
        shadow: ShadowSpec::NONE,
    });
    let line = font.shape("Hi", 24.0).unwrap();
    s.draw_glyphs(&font, 24.0, &line, Point::new(20.0, 30.0)).unwrap();

    let cols = ink_columns(&s);
    assert!(!cols.is_empty());
    assert!(cols[0] >= 19, "first ink column {}", cols[0]);
    assert!(cols[0] <= 25, "first ink column {}", cols[0]);
}

#[test]
fn shadow_extends_ink_past_the_glyphs() {
    let Some(font) = system_test_font() else {
        return;
    };
    let line = font.shape("I", 24.0).unwrap();
    let paint = |shadow| FillPaint {
        color: Argb8::BLACK,
        shadow,
    };

    let mut plain = Surface::new(80, 40).unwrap();
    plain.attach_fill(paint(ShadowSpec::NONE));
    plain.draw_glyphs(&font, 24.0, &line, Point::new(20.0, 30.0)).unwrap();

    let mut shadowed = Surface::new(80, 40).unwrap();
    shadowed.attach_fill(paint(ShadowSpec {
        radius: 3.0,
        dx: 10.0,
        dy: 0.0,
        color: Argb8::new(255, 255, 0, 0),
    }));
    shadowed.draw_glyphs(&font, 24.0, &line, Point::new(20.0, 30.0)).unwrap();

    let plain_last = *ink_columns(&plain).last().unwrap();
    let shadow_last = *ink_columns(&shadowed).last().unwrap();
    assert!(shadow_last > plain_last + 5);
}

#[test]
fn stroke_widens_the_ink() {
    let Some(font) = system_test_font() else {
        return;
    };
    let line = font.shape("I", 24.0).unwrap();

    let mut fill_only = Surface::new(80, 40).unwrap();
    fill_only.attach_fill(FillPaint {
        color: Argb8::BLACK,
        shadow: ShadowSpec::NONE,
    });
    fill_only.draw_glyphs(&font, 24.0, &line, Point::new(20.0, 30.0)).unwrap();

    let mut stroked = Surface::new(80, 40).unwrap();
    stroked.attach_fill(FillPaint {
        color: Argb8::BLACK,
        shadow: ShadowSpec::NONE,
    });
    stroked.attach_stroke(StrokePaint {
        color: Argb8::BLACK,
        width: 6.0,
        shadow: ShadowSpec::NONE,
    });
    stroked.draw_glyphs(&font, 24.0, &line, Point::new(20.0, 30.0)).unwrap();

    assert!(ink_columns(&stroked).len() > ink_columns(&fill_only).len());
}
