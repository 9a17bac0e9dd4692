use std::io::Cursor;
use std::path::Path;

use serde_json::json;

use super::*;
use crate::compose::layer::styles_from_json;
use crate::foundation::error::PhotoError;
use crate::text::registry::system_test_font;

fn write_png(path: &Path, w: u32, h: u32, px: [u8; 4]) {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, buf).unwrap();
}

fn context(root: &Path, fonts: FontRegistry) -> PhotoContext {
    let config = PhotoConfig {
        cache_dir: root.join("cache"),
        assets_dir: root.to_path_buf(),
        ..PhotoConfig::default()
    };
    PhotoContext::with_fonts(config, fonts).unwrap()
}

fn fonts_with_system_default() -> Option<FontRegistry> {
    let mut fonts = FontRegistry::empty();
    fonts.set_default(system_test_font()?);
    Some(fonts)
}

#[test]
fn context_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PhotoContext>();
}

#[test]
fn overlay_lands_at_anchor() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("bg.png"), 8, 6, [0, 0, 255, 255]);
    write_png(&dir.path().join("fg.png"), 2, 2, [255, 0, 0, 255]);
    let ctx = context(dir.path(), FontRegistry::empty());

    let layers = [Layer::Overlay(OverlayLayer {
        image: ImageRef::parse("asset://fg.png").unwrap(),
        anchor: Anchor::new(3.0, 1.0),
    })];
    let s = ctx
        .compose_surface(&ImageRef::parse("asset://bg.png").unwrap(), &layers)
        .unwrap();

    assert_eq!((s.width(), s.height()), (8, 6));
    assert_eq!(s.pixel(3, 1), Some([255, 0, 0, 255]));
    assert_eq!(s.pixel(4, 2), Some([255, 0, 0, 255]));
    assert_eq!(s.pixel(2, 1), Some([0, 0, 255, 255]));
    assert_eq!(s.pixel(5, 3), Some([0, 0, 255, 255]));
}

#[test]
fn overlay_outside_bounds_is_clipped() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("bg.png"), 4, 4, [0, 255, 0, 255]);
    write_png(&dir.path().join("fg.png"), 3, 3, [255, 0, 0, 255]);
    let ctx = context(dir.path(), FontRegistry::empty());

    let layers = [Layer::Overlay(OverlayLayer {
        image: ImageRef::parse("asset://fg.png").unwrap(),
        anchor: Anchor::new(-2.0, 3.0),
    })];
    let s = ctx
        .compose_surface(&ImageRef::parse("asset://bg.png").unwrap(), &layers)
        .unwrap();
    assert_eq!(s.pixel(0, 3), Some([255, 0, 0, 255]));
    assert_eq!(s.pixel(1, 3), Some([0, 255, 0, 255]));
    assert_eq!(s.pixel(0, 2), Some([0, 255, 0, 255]));
}

#[test]
fn absent_mime_encodes_png_under_jpg_name() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("bg.png"), 5, 5, [9, 9, 9, 255]);
    write_png(&dir.path().join("fg.png"), 1, 1, [200, 0, 0, 255]);
    let ctx = context(dir.path(), FontRegistry::empty());

    let path = ctx
        .composite_overlay(
            "asset://bg.png",
            "asset://fg.png",
            Anchor::new(0.0, 0.0),
            None,
        )
        .unwrap();

    assert!(path.starts_with(dir.path().join("cache")));
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("overlay_"), "{name}");
    assert!(name.ends_with(".jpg"), "{name}");

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
    let back = crate::assets::decode::decode_image(&bytes).unwrap();
    assert_eq!((back.width(), back.height()), (5, 5));
}

#[test]
fn extension_follows_requested_mime_string() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("bg.png"), 3, 3, [9, 9, 9, 255]);
    write_png(&dir.path().join("fg.png"), 1, 1, [200, 0, 0, 255]);
    let ctx = context(dir.path(), FontRegistry::empty());

    let ext = |mime: Option<&str>| {
        let p = ctx
            .composite_overlay("asset://bg.png", "asset://fg.png", Anchor::default(), mime)
            .unwrap();
        p.extension().unwrap().to_string_lossy().into_owned()
    };
    assert_eq!(ext(Some("image/png")), "png");
    assert_eq!(ext(Some("image/jpeg")), "jpg");
    assert_eq!(ext(Some("image/webp")), "jpg");
    assert_eq!(ext(None), "jpg");

    let typed = ctx
        .composite(
            &ImageRef::parse("asset://bg.png").unwrap(),
            &[],
            &OutputOptions::default(),
        )
        .unwrap();
    assert_eq!(typed.extension().and_then(|e| e.to_str()), Some("png"));
}

#[test]
fn jpeg_mime_uses_jpg_extension() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("bg.png"), 4, 4, [9, 9, 9, 255]);
    write_png(&dir.path().join("fg.png"), 1, 1, [200, 0, 0, 255]);
    let ctx = context(dir.path(), FontRegistry::empty());

    let path = ctx
        .composite_overlay(
            "asset://bg.png",
            "asset://fg.png",
            Anchor::default(),
            Some("image/jpeg"),
        )
        .unwrap();
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("jpg"));
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
}

#[test]
fn missing_overlay_fails_before_anything_is_written() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("bg.png"), 4, 4, [9, 9, 9, 255]);
    let ctx = context(dir.path(), FontRegistry::empty());

    let err = ctx
        .composite_overlay("asset://bg.png", "asset://nope.png", Anchor::default(), None)
        .unwrap_err();
    assert!(matches!(err, PhotoError::ImageLoadFailed(_)), "{err}");
    assert!(!dir.path().join("cache").exists());
}

#[test]
fn text_without_any_font_is_a_render_error() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("bg.png"), 4, 4, [9, 9, 9, 255]);
    let ctx = context(dir.path(), FontRegistry::empty());

    let styles = styles_from_json(json!([{"text": "Hi"}])).unwrap();
    let err = ctx.render_text("asset://bg.png", &styles, None).unwrap_err();
    assert!(matches!(err, PhotoError::Render { .. }), "{err}");
}

#[test]
fn render_text_writes_print_text_file() {
    let Some(fonts) = fonts_with_system_default() else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("bg.png"), 200, 80, [255, 255, 255, 255]);
    let ctx = context(dir.path(), fonts);

    let styles = styles_from_json(json!([
        {"text": "Hello", "color": "#FF000000", "textSize": 24, "position": [10, 20]}
    ]))
    .unwrap();
    let path = ctx.render_text("asset://bg.png", &styles, None).unwrap();
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("printText_"), "{name}");

    let back = crate::assets::decode::decode_image(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!((back.width(), back.height()), (200, 80));
    assert!(back.rgba8_premul().chunks_exact(4).any(|p| p[0] < 128));
}

#[test]
fn layers_draw_in_list_order() {
    let Some(fonts) = fonts_with_system_default() else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("bg.png"), 60, 40, [255, 255, 255, 255]);
    write_png(&dir.path().join("fg.png"), 60, 40, [0, 0, 255, 255]);
    let ctx = context(dir.path(), fonts);

    let bg = ImageRef::parse("asset://bg.png").unwrap();
    let overlay = Layer::Overlay(OverlayLayer {
        image: ImageRef::parse("asset://fg.png").unwrap(),
        anchor: Anchor::default(),
    });
    let text = text_layers(
        &styles_from_json(json!([{"text": "XX", "color": "#FFFF0000", "textSize": 30, "position": [5, 10]}]))
            .unwrap(),
    )
    .unwrap()
    .remove(0);

    let text_on_top = ctx.compose_surface(&bg, &[overlay.clone(), text.clone()]).unwrap();
    let overlay_on_top = ctx.compose_surface(&bg, &[text, overlay]).unwrap();

    assert!(
        overlay_on_top
            .rgba8_premul()
            .chunks_exact(4)
            .all(|p| p == [0, 0, 255, 255])
    );
    assert!(
        text_on_top
            .rgba8_premul()
            .chunks_exact(4)
            .any(|p| p[0] > 128)
    );
}

#[test]
fn composing_twice_is_deterministic() {
    let Some(fonts) = fonts_with_system_default() else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("bg.png"), 80, 40, [30, 60, 90, 255]);
    let ctx = context(dir.path(), fonts);

    let bg = ImageRef::parse("asset://bg.png").unwrap();
    let layers = text_layers(
        &styles_from_json(json!([{
            "text": "Shadow\nline", "textSize": 16, "position": [8, 6],
            "thickness": 1, "shadowRadius": 2, "shadowOffset": [1, 1], "rotation": 10
        }]))
        .unwrap(),
    )
    .unwrap();

    let a = ctx.compose_surface(&bg, &layers).unwrap();
    let b = ctx.compose_surface(&bg, &layers).unwrap();
    assert_eq!(a.rgba8_premul(), b.rgba8_premul());
}
