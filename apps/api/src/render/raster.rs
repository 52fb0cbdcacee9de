//! Pixel-level drawing on the card surface.
//!
//! The surface is an opaque straight-alpha `RgbaImage`. Overlays and panels
//! are blended directly; the glyph layer arrives premultiplied from
//! `vello_cpu` and is composited with `over_premul`.

use std::io::Cursor;

use image::{imageops::FilterType, ImageFormat, Rgba, RgbaImage};

use crate::render::plan::{CanvasSize, DetailPanel, GradientOverlay, Rgba8};

/// Decodes `bytes` and scales/crops to fill `canvas` exactly (cover fit).
pub fn decode_cover(bytes: &[u8], canvas: CanvasSize) -> Result<RgbaImage, image::ImageError> {
    let decoded = image::load_from_memory(bytes)?;
    let filled = decoded.resize_to_fill(canvas.width, canvas.height, FilterType::Triangle);
    let mut surface = filled.to_rgba8();
    // Transparent sources are flattened onto black so every later blend sees an opaque base.
    for px in surface.pixels_mut() {
        if px[3] != 255 {
            let a = u16::from(px[3]);
            *px = Rgba([
                mul_div255(u16::from(px[0]), a),
                mul_div255(u16::from(px[1]), a),
                mul_div255(u16::from(px[2]), a),
                255,
            ]);
        }
    }
    Ok(surface)
}

pub fn encode_png(surface: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let mut out = Cursor::new(Vec::new());
    surface.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Blends `color` at `alpha` (0.0–1.0) over one opaque pixel.
pub fn blend_pixel(px: &mut Rgba<u8>, color: Rgba8, alpha: f32) {
    let alpha = alpha.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let a = (alpha * 255.0).round() as u16;
    let inv = 255 - a;
    let src = [color.r, color.g, color.b];
    for (i, s) in src.iter().enumerate() {
        px[i] = add_sat_u8(mul_div255(u16::from(*s), a), mul_div255(u16::from(px[i]), inv));
    }
    px[3] = 255;
}

/// Vertical linear gradient across the full width, alpha interpolated per row.
pub fn apply_gradient(surface: &mut RgbaImage, overlay: &GradientOverlay) {
    let height = surface.height();
    let span = overlay.y_end - overlay.y_start;
    if span <= 0.0 {
        return;
    }
    let y0 = overlay.y_start.max(0.0).floor() as u32;
    let y1 = (overlay.y_end.ceil() as u32).min(height);
    let base_alpha = overlay.color.alpha_f32();

    for y in y0..y1 {
        let t = ((y as f32 + 0.5 - overlay.y_start) / span).clamp(0.0, 1.0);
        let alpha = (overlay.alpha_start + (overlay.alpha_end - overlay.alpha_start) * t) * base_alpha;
        if alpha <= 0.0 {
            continue;
        }
        for x in 0..surface.width() {
            blend_pixel(surface.get_pixel_mut(x, y), overlay.color, alpha);
        }
    }
}

/// Signed distance from `(px, py)` to the rounded rectangle edge. Negative inside.
pub fn rounded_rect_distance(panel: &DetailPanel, px: f32, py: f32) -> f32 {
    let half_w = panel.width / 2.0;
    let half_h = panel.height / 2.0;
    let radius = panel.radius.min(half_w).min(half_h).max(0.0);
    let cx = panel.x + half_w;
    let cy = panel.y + half_h;

    let qx = (px - cx).abs() - half_w + radius;
    let qy = (py - cy).abs() - half_h + radius;
    let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
    let inside = qx.max(qy).min(0.0);
    outside + inside - radius
}

/// Draws shadow, fill and border of the detail panel, in that order.
pub fn draw_panel(surface: &mut RgbaImage, panel: &DetailPanel) {
    let sigma = (panel.shadow_blur / 2.0).max(0.0);
    let reach = (sigma * 3.0).ceil() + panel.border_width;
    let x0 = (panel.x - reach).floor().max(0.0) as u32;
    let y0 = (panel.y - reach).floor().max(0.0) as u32;
    let x1 = ((panel.x + panel.width + reach).ceil() as u32).min(surface.width());
    let y1 = ((panel.y + panel.height + reach).ceil() as u32).min(surface.height());

    let shadow_alpha = panel.shadow.alpha_f32();
    let fill_alpha = panel.fill.alpha_f32();
    let border_alpha = panel.border.alpha_f32();
    let half_border = panel.border_width / 2.0;

    for y in y0..y1 {
        for x in x0..x1 {
            let d = rounded_rect_distance(panel, x as f32 + 0.5, y as f32 + 0.5);
            let px = surface.get_pixel_mut(x, y);

            if shadow_alpha > 0.0 && sigma > 0.0 {
                let falloff = if d <= 0.0 {
                    1.0
                } else {
                    (-(d * d) / (2.0 * sigma * sigma)).exp()
                };
                blend_pixel(px, panel.shadow, shadow_alpha * falloff);
            }

            let fill_coverage = (0.5 - d).clamp(0.0, 1.0);
            if fill_coverage > 0.0 {
                blend_pixel(px, panel.fill, fill_alpha * fill_coverage);
            }

            if half_border > 0.0 {
                let ring = (0.5 - (d.abs() - half_border)).clamp(0.0, 1.0);
                if ring > 0.0 {
                    blend_pixel(px, panel.border, border_alpha * ring);
                }
            }
        }
    }
}

/// Source-over of a premultiplied RGBA8 layer onto the opaque surface.
///
/// Returns `false` (and leaves the surface untouched) on a size mismatch.
pub fn over_premul(surface: &mut RgbaImage, layer: &[u8]) -> bool {
    let dst: &mut [u8] = &mut **surface;
    if dst.len() != layer.len() || layer.len() % 4 != 0 {
        return false;
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(layer.chunks_exact(4)) {
        let sa = s[3];
        if sa == 0 {
            continue;
        }
        let inv = 255 - u16::from(sa);
        for i in 0..3 {
            d[i] = add_sat_u8(s[i], mul_div255(u16::from(d[i]), inv));
        }
        d[3] = 255;
    }
    true
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}
