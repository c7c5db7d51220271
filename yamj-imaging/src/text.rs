//! Text drawing with `fontdue`.

use std::path::Path;

use fontdue::{Font, FontSettings};
use image::{Rgba, RgbaImage};

use crate::ImagingError;
use crate::settings::TextAlignment;

/// Shadow offset in pixels, down and right.
const SHADOW_OFFSET: i64 = 1;

pub struct TextRenderer {
    font: Font,
}

impl TextRenderer {
    pub fn load(path: &Path) -> Result<Self, ImagingError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImagingError> {
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| ImagingError::Font(e.to_string()))?;
        Ok(Self { font })
    }

    /// Advance width of `text` at `size` pixels.
    pub fn measure(&self, text: &str, size: f32) -> u32 {
        text.chars()
            .map(|c| self.font.metrics(c, size).advance_width)
            .sum::<f32>()
            .ceil() as u32
    }

    fn ascent(&self, size: f32) -> f32 {
        self.font
            .horizontal_line_metrics(size)
            .map(|m| m.ascent)
            .unwrap_or(size * 0.8)
    }

    /// Draw one line of text with a drop shadow. `top` places the line
    /// `offset` pixels below the top edge, otherwise `offset` pixels above
    /// the bottom edge.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_line(
        &self,
        img: &mut RgbaImage,
        text: &str,
        size: f32,
        color: [u8; 3],
        shadow: [u8; 3],
        alignment: TextAlignment,
        offset: u32,
        top: bool,
    ) {
        let width = self.measure(text, size) as i64;
        let img_w = img.width() as i64;
        let x = match alignment {
            TextAlignment::Left => offset as i64,
            TextAlignment::Center => (img_w - width) / 2,
            TextAlignment::Right => img_w - width - offset as i64,
        };
        let ascent = self.ascent(size);
        let baseline = if top {
            offset as f32 + ascent
        } else {
            img.height() as f32 - offset as f32
        };

        self.draw_at(img, text, size, shadow, x + SHADOW_OFFSET, baseline + SHADOW_OFFSET as f32);
        self.draw_at(img, text, size, color, x, baseline);
    }

    fn draw_at(&self, img: &mut RgbaImage, text: &str, size: f32, color: [u8; 3], x: i64, baseline: f32) {
        let mut pen_x = x as f32;
        for c in text.chars() {
            let (metrics, coverage) = self.font.rasterize(c, size);
            let gx = (pen_x + metrics.xmin as f32).round() as i64;
            let gy = (baseline - metrics.height as f32 - metrics.ymin as f32).round() as i64;

            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let cov = coverage[row * metrics.width + col];
                    if cov == 0 {
                        continue;
                    }
                    let px = gx + col as i64;
                    let py = gy + row as i64;
                    if px < 0 || py < 0 || px >= img.width() as i64 || py >= img.height() as i64 {
                        continue;
                    }
                    blend(img.get_pixel_mut(px as u32, py as u32), color, cov);
                }
            }
            pen_x += metrics.advance_width;
        }
    }
}

/// Source-over blend of a solid color at `coverage` onto `dst`.
fn blend(dst: &mut Rgba<u8>, color: [u8; 3], coverage: u8) {
    let a = coverage as u32;
    let inv = 255 - a;
    for i in 0..3 {
        dst[i] = ((color[i] as u32 * a + dst[i] as u32 * inv) / 255) as u8;
    }
    dst[3] = (a + dst[3] as u32 * inv / 255).min(255) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_full_coverage_replaces_color() {
        let mut p = Rgba([0, 0, 0, 0]);
        blend(&mut p, [200, 100, 50], 255);
        assert_eq!(p, Rgba([200, 100, 50, 255]));
    }

    #[test]
    fn test_blend_zero_coverage_keeps_pixel() {
        let mut p = Rgba([10, 20, 30, 128]);
        blend(&mut p, [200, 100, 50], 0);
        assert_eq!(p, Rgba([10, 20, 30, 128]));
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(matches!(
            TextRenderer::from_bytes(b"not a font"),
            Err(ImagingError::Font(_))
        ));
    }
}
