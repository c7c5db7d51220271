//! Pixel-level helpers for the transform pipeline.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use yamj_core::CropRegion;

use crate::settings::{PerspectiveDirection, ReflectionConfig};

/// Keep a percentage sub-rectangle of `img`.
pub(crate) fn crop_percent(img: &RgbaImage, region: CropRegion) -> RgbaImage {
    let (w, h) = (img.width(), img.height());
    let x = w * region.x / 100;
    let y = h * region.y / 100;
    let cw = (w * region.width / 100).clamp(1, w - x.min(w - 1));
    let ch = (h * region.height / 100).clamp(1, h - y.min(h - 1));
    imageops::crop_imm(img, x, y, cw, ch).to_image()
}

/// Dimensions that cover `max_w` x `max_h` while keeping the aspect ratio.
pub(crate) fn cover_bounds(src_w: u32, src_h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if src_w == 0 || src_h == 0 {
        return (0, 0);
    }

    let scale_w = max_w as f64 / src_w as f64;
    let scale_h = max_h as f64 / src_h as f64;
    let scale = scale_w.max(scale_h);

    let new_w = (src_w as f64 * scale).round() as u32;
    let new_h = (src_h as f64 * scale).round() as u32;

    (new_w.max(max_w).max(1), new_h.max(max_h).max(1))
}

fn filter_for(src_w: u32, dst_w: u32) -> FilterType {
    if dst_w > src_w {
        FilterType::CatmullRom
    } else {
        FilterType::Lanczos3
    }
}

/// Scale to the target width and place bottom-aligned on a target-sized
/// transparent canvas. Images taller than the target lose their bottom.
pub(crate) fn scale_to_size(img: &RgbaImage, max_w: u32, max_h: u32) -> RgbaImage {
    let (w, h) = (img.width(), img.height());
    let scaled_h = ((h as f64 * max_w as f64 / w as f64).round() as u32).max(1);
    let scaled = imageops::resize(img, max_w, scaled_h, filter_for(w, max_w));

    let mut canvas = RgbaImage::new(max_w, max_h);
    let y = if scaled_h < max_h { (max_h - scaled_h) as i64 } else { 0 };
    imageops::overlay(&mut canvas, &scaled, 0, y);
    canvas
}

/// Cover the target box, then center-crop to it.
pub(crate) fn scale_to_size_normalized(img: &RgbaImage, max_w: u32, max_h: u32) -> RgbaImage {
    let (w, h) = cover_bounds(img.width(), img.height(), max_w, max_h);
    let scaled = imageops::resize(img, w, h, filter_for(img.width(), w));
    crop_to_size(&scaled, max_w, max_h)
}

/// Center-crop to at most `max_w` x `max_h`.
pub(crate) fn crop_to_size(img: &RgbaImage, max_w: u32, max_h: u32) -> RgbaImage {
    let cw = max_w.min(img.width()).max(1);
    let ch = max_h.min(img.height()).max(1);
    let x = (img.width() - cw) / 2;
    let y = (img.height() - ch) / 2;
    imageops::crop_imm(img, x, y, cw, ch).to_image()
}

/// Center-crop to the target aspect ratio without scaling.
pub(crate) fn crop_to_aspect(img: &RgbaImage, target_w: u32, target_h: u32) -> RgbaImage {
    let (w, h) = (img.width(), img.height());
    if target_w == 0 || target_h == 0 {
        return img.clone();
    }
    let want_w = (h as u64 * target_w as u64 / target_h as u64) as u32;
    if want_w <= w {
        crop_to_size(img, want_w, h)
    } else {
        let want_h = (w as u64 * target_h as u64 / target_w as u64) as u32;
        crop_to_size(img, w, want_h)
    }
}

pub(crate) fn scale_to_size_stretch(img: &RgbaImage, max_w: u32, max_h: u32) -> RgbaImage {
    imageops::resize(img, max_w, max_h, filter_for(img.width(), max_w))
}

/// Scale to the target width; the height follows the source aspect.
pub(crate) fn scale_to_width(img: &RgbaImage, max_w: u32) -> RgbaImage {
    let (w, h) = (img.width(), img.height());
    let new_h = ((h as f64 * max_w as f64 / w as f64).round() as u32).max(1);
    imageops::resize(img, max_w, new_h, filter_for(w, max_w))
}

/// Shrink the image inside a solid border of `size` pixels.
pub(crate) fn add_frame(img: &RgbaImage, size: u32, color: [u8; 3]) -> RgbaImage {
    let (w, h) = (img.width(), img.height());
    if size == 0 || size * 2 >= w || size * 2 >= h {
        return img.clone();
    }

    let inner = imageops::resize(img, w - size * 2, h - size * 2, FilterType::Lanczos3);
    let mut framed = RgbaImage::from_pixel(w, h, Rgba([color[0], color[1], color[2], 255]));
    imageops::overlay(&mut framed, &inner, size as i64, size as i64);
    framed
}

/// Apply rounded corners by zeroing alpha outside the rounded rectangle.
pub(crate) fn apply_rounded_corners(img: &mut RgbaImage, radius: u32) {
    let (w, h) = (img.width(), img.height());
    let r = radius.min(w / 2).min(h / 2);

    if r == 0 {
        return;
    }

    let r_sq = (r * r) as i64;
    let inner_sq = (r as i64 - 2) * (r as i64 - 2);

    for y in 0..h {
        for x in 0..w {
            let Some(dist_sq) = corner_distance_sq(x, y, w, h, r) else {
                continue;
            };
            if dist_sq > r_sq {
                img.put_pixel(x, y, Rgba([0, 0, 0, 0]));
            } else if dist_sq > inner_sq {
                // Soften the edge
                let p = *img.get_pixel(x, y);
                let dist = (dist_sq as f64).sqrt();
                let alpha_factor = (r as f64 - dist).clamp(0.0, 1.0);
                let new_alpha = (p[3] as f64 * alpha_factor) as u8;
                img.put_pixel(x, y, Rgba([p[0], p[1], p[2], new_alpha]));
            }
        }
    }
}

/// Squared distance from the corner circle's center, or `None` outside
/// every corner region.
fn corner_distance_sq(x: u32, y: u32, w: u32, h: u32, r: u32) -> Option<i64> {
    let cx = if x < r {
        r
    } else if x >= w - r {
        w - r - 1
    } else {
        return None;
    };
    let cy = if y < r {
        r
    } else if y >= h - r {
        h - r - 1
    } else {
        return None;
    };

    let dx = x as i64 - cx as i64;
    let dy = y as i64 - cy as i64;
    Some(dx * dx + dy * dy)
}

/// Canvas of the overlay's size with `img` at the offset and the overlay
/// drawn over it.
pub(crate) fn compose_overlay(img: &RgbaImage, overlay: &RgbaImage, offset_x: i32, offset_y: i32) -> RgbaImage {
    let mut canvas = RgbaImage::new(overlay.width(), overlay.height());
    imageops::overlay(&mut canvas, img, offset_x as i64, offset_y as i64);
    imageops::overlay(&mut canvas, overlay, 0, 0);
    canvas
}

/// Append a mirrored, fading copy of the bottom of the image.
pub(crate) fn create_reflection(img: &RgbaImage, config: &ReflectionConfig) -> RgbaImage {
    let (w, h) = (img.width(), img.height());
    let band = ((h as f64 * config.height as f64 / 100.0).round() as u32).min(h);
    if band == 0 {
        return img.clone();
    }

    let mut out = RgbaImage::new(w, h + band);
    imageops::overlay(&mut out, img, 0, 0);

    for row in 0..band {
        let keep = 1.0 - reflection_opacity(row as f32 / band as f32 * 100.0, config) / 100.0;
        let src_y = h - 1 - row;
        for x in 0..w {
            let p = img.get_pixel(x, src_y);
            let alpha = (p[3] as f32 * keep).round().clamp(0.0, 255.0) as u8;
            out.put_pixel(x, h + row, Rgba([p[0], p[1], p[2], alpha]));
        }
    }
    out
}

/// Mask opacity (percent) at `pos` percent down the reflected band.
/// Constant outside the start..end range.
pub(crate) fn reflection_opacity(pos: f32, config: &ReflectionConfig) -> f32 {
    if pos <= config.start || config.end <= config.start {
        return config.opacity_start;
    }
    if pos >= config.end {
        return config.opacity_end;
    }
    let t = (pos - config.start) / (config.end - config.start);
    config.opacity_start + (config.opacity_end - config.opacity_start) * t
}

/// Skew the image so one vertical edge recedes. The receding edge is
/// shortened by `top` percent at the top and `bottom` percent at the
/// bottom; the area it leaves is transparent.
pub(crate) fn create_perspective(
    img: &RgbaImage,
    direction: PerspectiveDirection,
    top: f32,
    bottom: f32,
) -> RgbaImage {
    let (w, h) = (img.width(), img.height());
    if w < 2 || h < 2 {
        return img.clone();
    }
    let top_px = h as f32 * top / 100.0;
    let bottom_px = h as f32 * bottom / 100.0;

    let mut out = RgbaImage::new(w, h);
    for x in 0..w {
        let along = x as f32 / (w - 1) as f32;
        let depth = match direction {
            PerspectiveDirection::Right => along,
            PerspectiveDirection::Left => 1.0 - along,
        };
        let y_top = top_px * depth;
        let y_bottom = h as f32 - bottom_px * depth;
        let span = y_bottom - y_top;
        if span <= 0.0 {
            continue;
        }

        for y in y_top.ceil() as u32..(y_bottom.floor() as u32).min(h) {
            let src_y = ((y as f32 - y_top) / span * h as f32) as u32;
            out.put_pixel(x, y, *img.get_pixel(x, src_y.min(h - 1)));
        }
    }
    out
}

#[cfg(test)]
#[path = "tests/graphics_tests.rs"]
mod tests;
