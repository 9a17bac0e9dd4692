use crate::foundation::error::{PhotoError, PhotoResult};

/// Kernel half-width covering three standard deviations.
pub(crate) fn kernel_radius(sigma: f32) -> u32 {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    (3.0 * sigma).ceil() as u32
}

/// Normalized gaussian weights in Q16 fixed point, summing to exactly `1 << 16`.
pub(crate) fn gaussian_kernel_q16(radius: u32, sigma: f32) -> PhotoResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(PhotoError::render(
            "build blur kernel",
            anyhow::anyhow!("blur sigma must be finite and > 0, got {sigma}"),
        ));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

/// Separable gaussian blur of a premultiplied RGBA8 buffer. Samples outside the buffer are
/// transparent, so blurred content fades out at the edges instead of smearing.
pub(crate) fn blur_rgba8_premul_q16(
    src: &[u8],
    dst: &mut [u8],
    tmp: &mut [u8],
    width: u32,
    height: u32,
    kernel_q16: &[u32],
) {
    if kernel_q16.len() == 1 {
        dst.copy_from_slice(src);
        return;
    }
    horizontal_blur_q16(src, tmp, width, height, kernel_q16);
    vertical_blur_q16(tmp, dst, width, height, kernel_q16);
}

fn horizontal_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = x + ki as i32 - radius;
                if sx < 0 || sx >= w {
                    continue;
                }
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = y + ki as i32 - radius;
                if sy < 0 || sy >= h {
                    continue;
                }
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

/// Pixel rectangle `[x0, x1) × [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PixelRect {
    pub(crate) x0: u32,
    pub(crate) y0: u32,
    pub(crate) x1: u32,
    pub(crate) y1: u32,
}

impl PixelRect {
    pub(crate) fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub(crate) fn height(&self) -> u32 {
        self.y1 - self.y0
    }

    /// Grow by `by` pixels on every side, clamped to `width × height`.
    pub(crate) fn inflate(self, by: u32, width: u32, height: u32) -> Self {
        Self {
            x0: self.x0.saturating_sub(by),
            y0: self.y0.saturating_sub(by),
            x1: self.x1.saturating_add(by).min(width),
            y1: self.y1.saturating_add(by).min(height),
        }
    }
}

/// Bounding box of every pixel with non-zero alpha, or `None` for a fully transparent buffer.
pub(crate) fn alpha_bounds(rgba: &[u8], width: u32, height: u32) -> Option<PixelRect> {
    let mut out: Option<PixelRect> = None;
    for y in 0..height {
        let row = &rgba[(y as usize) * (width as usize) * 4..][..(width as usize) * 4];
        let mut first = None;
        let mut last = 0;
        for (x, px) in row.chunks_exact(4).enumerate() {
            if px[3] != 0 {
                first.get_or_insert(x as u32);
                last = x as u32;
            }
        }
        let Some(first) = first else { continue };
        out = Some(match out {
            None => PixelRect {
                x0: first,
                y0: y,
                x1: last + 1,
                y1: y + 1,
            },
            Some(r) => PixelRect {
                x0: r.x0.min(first),
                y0: r.y0,
                x1: r.x1.max(last + 1),
                y1: y + 1,
            },
        });
    }
    out
}

/// Blur the content of `rgba` in place, touching only the region around its visible pixels.
pub(crate) fn blur_in_place(rgba: &mut [u8], width: u32, height: u32, sigma: f32) -> PhotoResult<()> {
    let radius = kernel_radius(sigma);
    if radius == 0 {
        return Ok(());
    }
    let Some(bounds) = alpha_bounds(rgba, width, height) else {
        return Ok(());
    };
    let region = bounds.inflate(radius, width, height);
    let kernel = gaussian_kernel_q16(radius, sigma)?;

    let rw = region.width() as usize;
    let rh = region.height() as usize;
    let mut src = Vec::with_capacity(rw * rh * 4);
    for y in region.y0..region.y1 {
        let start = ((y as usize) * (width as usize) + region.x0 as usize) * 4;
        src.extend_from_slice(&rgba[start..start + rw * 4]);
    }
    let mut dst = vec![0u8; src.len()];
    let mut tmp = vec![0u8; src.len()];
    blur_rgba8_premul_q16(
        &src,
        &mut dst,
        &mut tmp,
        region.width(),
        region.height(),
        &kernel,
    );
    for (row, y) in (region.y0..region.y1).enumerate() {
        let start = ((y as usize) * (width as usize) + region.x0 as usize) * 4;
        rgba[start..start + rw * 4].copy_from_slice(&dst[row * rw * 4..(row + 1) * rw * 4]);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
