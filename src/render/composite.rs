use crate::foundation::error::{PhotoError, PhotoResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u8};

fn premul_over_px(d: &mut [u8], s: &[u8]) {
    let sa = u16::from(s[3]);
    if sa == 0 {
        return;
    }
    if sa == 255 {
        d.copy_from_slice(s);
        return;
    }
    let inv = 255u16 - sa;
    d[3] = add_sat_u8(s[3], mul_div255_u8(u16::from(d[3]), inv));
    for c in 0..3 {
        let dc = mul_div255_u8(u16::from(d[c]), inv);
        d[c] = add_sat_u8(s[c], dc);
    }
}

/// Source-over of two equally sized premultiplied RGBA8 buffers.
pub(crate) fn premul_over_in_place(dst: &mut [u8], src: &[u8]) -> PhotoResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(PhotoError::render(
            "composite layer",
            anyhow::anyhow!("premul_over_in_place expects equal-length rgba8 buffers"),
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        premul_over_px(d, s);
    }
    Ok(())
}

/// Source-over of a `src_w × src_h` buffer placed with its top-left corner at `(dx, dy)`.
///
/// Parts falling outside the destination are clipped.
#[allow(clippy::too_many_arguments)]
pub(crate) fn premul_over_at(
    dst: &mut [u8],
    dst_w: u32,
    dst_h: u32,
    src: &[u8],
    src_w: u32,
    src_h: u32,
    dx: i64,
    dy: i64,
) -> PhotoResult<()> {
    if dst.len() != (dst_w as usize) * (dst_h as usize) * 4
        || src.len() != (src_w as usize) * (src_h as usize) * 4
    {
        return Err(PhotoError::render(
            "composite layer",
            anyhow::anyhow!("premul_over_at buffer length does not match dimensions"),
        ));
    }

    let x0 = dx.max(0);
    let y0 = dy.max(0);
    let x1 = dx.saturating_add(i64::from(src_w)).min(i64::from(dst_w));
    let y1 = dy.saturating_add(i64::from(src_h)).min(i64::from(dst_h));
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    let span = (x1 - x0) as usize * 4;
    for y in y0..y1 {
        let sy = (y - dy) as usize;
        let sx = (x0 - dx) as usize;
        let s_start = (sy * src_w as usize + sx) * 4;
        let d_start = (y as usize * dst_w as usize + x0 as usize) * 4;
        let s_row = &src[s_start..s_start + span];
        let d_row = &mut dst[d_start..d_start + span];
        for (d, s) in d_row.chunks_exact_mut(4).zip(s_row.chunks_exact(4)) {
            premul_over_px(d, s);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
