use std::sync::Arc;

use crate::foundation::core::Canvas;
use crate::foundation::error::{PhotoError, PhotoResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Decoded raster image in premultiplied RGBA8 form, ready to be drawn onto a surface.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    rgba8_premul: Arc<Vec<u8>>,
}

impl DecodedImage {
    /// Wrap premultiplied RGBA8 bytes. Fails when the length does not match the dimensions.
    pub fn from_premul_rgba8(width: u32, height: u32, bytes: Vec<u8>) -> PhotoResult<Self> {
        let expected = Canvas { width, height }.rgba8_len();
        if width == 0 || height == 0 || bytes.len() != expected {
            return Err(PhotoError::image_load(format!(
                "image buffer of {} bytes does not match {width}x{height}",
                bytes.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(bytes),
        })
    }

    /// Premultiply straight RGBA8 bytes and wrap them.
    pub fn from_straight_rgba8(width: u32, height: u32, mut bytes: Vec<u8>) -> PhotoResult<Self> {
        premultiply_rgba8_in_place(&mut bytes);
        Self::from_premul_rgba8(width, height, bytes)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major premultiplied RGBA8 pixels.
    pub fn rgba8_premul(&self) -> &[u8] {
        &self.rgba8_premul
    }
}

/// Decode any format `image` understands (PNG, JPEG, WebP, GIF, BMP, ...).
pub fn decode_image(bytes: &[u8]) -> PhotoResult<DecodedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| PhotoError::image_load(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    DecodedImage::from_straight_rgba8(width, height, rgba.into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
