use std::io::Cursor;

use image::ImageEncoder as _;

use crate::encode::mime::{MimeType, OutputOptions};
use crate::foundation::error::{PhotoError, PhotoResult};
use crate::render::surface::Surface;

/// Encode the surface in memory.
///
/// PNG keeps alpha. JPEG has none: the premultiplied color channels are written as-is, which
/// equals the image composited over black.
pub fn encode_surface(surface: &Surface, opts: &OutputOptions) -> PhotoResult<Vec<u8>> {
    let (w, h) = (surface.width(), surface.height());
    let mut buf = Vec::new();
    match opts.mime {
        MimeType::Png => {
            let rgba = surface.to_rgba8_straight();
            image::codecs::png::PngEncoder::new(Cursor::new(&mut buf))
                .write_image(&rgba, w, h, image::ExtendedColorType::Rgba8)
                .map_err(|e| PhotoError::encode(format!("png: {e}")))?;
        }
        MimeType::Jpeg => {
            let rgb: Vec<u8> = surface
                .rgba8_premul()
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect();
            let quality = opts.quality.clamp(1, 100);
            image::codecs::jpeg::JpegEncoder::new_with_quality(Cursor::new(&mut buf), quality)
                .write_image(&rgb, w, h, image::ExtendedColorType::Rgb8)
                .map_err(|e| PhotoError::encode(format!("jpeg: {e}")))?;
        }
    }
    tracing::debug!(mime = %opts.mime, quality = opts.quality, bytes = buf.len(), "encoded surface");
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/packer.rs"]
mod tests;
