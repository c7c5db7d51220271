//! The artwork transform pipeline.
//!
//! Stages run in a fixed order and each one is switched by the kind's
//! [`ImageSettings`]: crop, resize, text, overlay, frame, rounded corners,
//! badges, reflection, perspective. A stage whose resource file is missing
//! logs a warning and leaves the image as it was.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use image::imageops;
use image::{DynamicImage, RgbaImage};
use yamj_core::{ArtworkConfig, ArtworkKind, ResolutionTier, VideoItem};

use crate::graphics;
use crate::settings::{ImageSettings, OverlaySource, PerspectiveDirection, ResizeMode, TextAlignment};
use crate::text::TextRenderer;

/// Margin between a badge and the image edge.
const BADGE_MARGIN: i64 = 5;

/// Turns a decoded source image into jukebox artwork.
pub trait ArtworkImagePlugin: Send + Sync {
    /// `perspective` overrides the configured skew direction.
    fn generate(
        &self,
        item: &VideoItem,
        image: DynamicImage,
        kind: ArtworkKind,
        perspective: Option<PerspectiveDirection>,
    ) -> DynamicImage;
}

pub struct DefaultImagePlugin {
    settings: BTreeMap<ArtworkKind, ImageSettings>,
    fonts: HashMap<PathBuf, TextRenderer>,
}

impl DefaultImagePlugin {
    pub fn new(config: &ArtworkConfig) -> Self {
        let settings = ArtworkKind::ALL
            .iter()
            .map(|&kind| {
                ImageSettings::from_properties(
                    config.settings(kind),
                    &config.properties,
                    &config.skin_dir,
                    config.highdef_differentiate,
                )
            })
            .collect();
        Self::with_settings(settings)
    }

    pub fn with_settings(settings: Vec<ImageSettings>) -> Self {
        let mut fonts = HashMap::new();
        for s in &settings {
            let Some(path) = &s.text.font else { continue };
            if fonts.contains_key(path) {
                continue;
            }
            match TextRenderer::load(path) {
                Ok(renderer) => {
                    fonts.insert(path.clone(), renderer);
                }
                Err(e) => log::warn!("Could not load font {}: {}", path.display(), e),
            }
        }

        Self {
            settings: settings.into_iter().map(|s| (s.kind, s)).collect(),
            fonts,
        }
    }

    pub fn settings(&self, kind: ArtworkKind) -> Option<&ImageSettings> {
        self.settings.get(&kind)
    }

    fn font(&self, s: &ImageSettings) -> Option<&TextRenderer> {
        s.text.font.as_ref().and_then(|p| self.fonts.get(p))
    }

    fn transform(
        &self,
        item: &VideoItem,
        mut img: RgbaImage,
        s: &ImageSettings,
        perspective: Option<PerspectiveDirection>,
    ) -> RgbaImage {
        if let Some(region) = item.crop(s.kind) {
            img = graphics::crop_percent(&img, region);
        }

        img = resize(img, s);
        self.draw_text(item, &mut img, s);

        if s.overlay.enabled {
            img = draw_overlay(item, img, s);
        }
        if s.frame.enabled {
            img = graphics::add_frame(&img, s.frame.size, s.frame_color(item.resolution));
        }
        if s.round_corners {
            graphics::apply_rounded_corners(&mut img, s.corner_radius);
        }

        draw_badges(item, &mut img, s);

        if s.reflection.enabled {
            img = graphics::create_reflection(&img, &s.reflection);
        }
        if s.perspective.enabled {
            let direction = perspective.unwrap_or(s.perspective.direction);
            img = graphics::create_perspective(&img, direction, s.perspective.top, s.perspective.bottom);
        }
        img
    }

    fn draw_text(&self, item: &VideoItem, img: &mut RgbaImage, s: &ImageSettings) {
        let mut lines: Vec<(String, bool)> = Vec::new();
        if s.text.title {
            lines.push((item.title.clone(), true));
        }
        if s.text.season
            && item.is_tv()
            && let Some(season) = item.season
        {
            lines.push((format!("Season {}", season), false));
        }
        if s.text.set_size && item.set_master && item.set_size > 0 {
            let size = if item.set_size > 9 {
                "9+".to_string()
            } else {
                item.set_size.to_string()
            };
            lines.push((size, false));
        }
        if lines.is_empty() {
            return;
        }

        let Some(font) = self.font(s) else {
            log::warn!("{}: text requested but no font is loaded", s.kind);
            return;
        };
        for (text, top) in lines {
            let alignment = if top { s.text.alignment } else { TextAlignment::Right };
            font.draw_line(
                img,
                &text,
                s.text.font_size,
                s.text.font_color,
                s.text.font_shadow,
                alignment,
                s.text.offset,
                top,
            );
        }
    }
}

impl ArtworkImagePlugin for DefaultImagePlugin {
    fn generate(
        &self,
        item: &VideoItem,
        image: DynamicImage,
        kind: ArtworkKind,
        perspective: Option<PerspectiveDirection>,
    ) -> DynamicImage {
        let Some(s) = self.settings.get(&kind) else {
            return image;
        };
        if image.width() == 0 || image.height() == 0 {
            return image;
        }
        DynamicImage::ImageRgba8(self.transform(item, image.into_rgba8(), s, perspective))
    }
}

fn resize(img: RgbaImage, s: &ImageSettings) -> RgbaImage {
    if s.width == 0 || s.height == 0 {
        return img;
    }
    // Small sources are left alone unless a badge needs the full canvas.
    let skip = img.width() < s.width && img.height() < s.height && !s.badges.hd && !s.badges.language;

    match (s.resize, skip) {
        (ResizeMode::Normalize, true) => graphics::crop_to_aspect(&img, s.width, s.height),
        (ResizeMode::Normalize, false) => graphics::scale_to_size_normalized(&img, s.width, s.height),
        (_, true) => img,
        (ResizeMode::Stretch, false) => graphics::scale_to_size_stretch(&img, s.width, s.height),
        (ResizeMode::BestFit, false) => graphics::scale_to_width(&img, s.width),
        (ResizeMode::Fit, false) => graphics::scale_to_size(&img, s.width, s.height),
    }
}

fn load_resource(s: &ImageSettings, name: &str) -> Option<RgbaImage> {
    let path = s.resource(name);
    if !path.is_file() {
        log::warn!("{}: missing resource {}", s.kind, path.display());
        return None;
    }
    match image::open(&path) {
        Ok(img) => Some(img.into_rgba8()),
        Err(e) => {
            log::warn!("{}: unreadable resource {}: {}", s.kind, path.display(), e);
            None
        }
    }
}

/// Overlay file name for the item, e.g. `bluray_overlay_poster.png`.
pub(crate) fn overlay_name(item: &VideoItem, s: &ImageSettings) -> Option<String> {
    let value = match s.overlay.source {
        OverlaySource::Default => Some("default"),
        OverlaySource::VideoSource => item.video_source.as_deref(),
        OverlaySource::Certification => item.certification.as_deref(),
        OverlaySource::Container => item.container.as_deref(),
    }?;
    let value = value.trim();
    if !yamj_core::is_valid_value(value) {
        return None;
    }
    Some(format!("{}_overlay_{}.png", value.to_lowercase(), s.kind.name()))
}

fn draw_overlay(item: &VideoItem, img: RgbaImage, s: &ImageSettings) -> RgbaImage {
    let Some(name) = overlay_name(item, s) else {
        log::debug!("{}: no overlay value for {}", s.kind, item.base_name);
        return img;
    };
    match load_resource(s, &name) {
        Some(overlay) => graphics::compose_overlay(&img, &overlay, s.overlay.offset_x, s.overlay.offset_y),
        None => img,
    }
}

/// HD badge file for a tier; falls back to `hd.png`.
pub(crate) fn hd_logo_names(tier: ResolutionTier, differentiate: bool) -> Vec<&'static str> {
    match (tier, differentiate) {
        (ResolutionTier::Hd1080, true) => vec!["hd-1080.png", "hd.png"],
        (ResolutionTier::Hd720, true) => vec!["hd-720.png", "hd.png"],
        _ => vec!["hd.png"],
    }
}

fn load_first(s: &ImageSettings, names: &[&str]) -> Option<RgbaImage> {
    let found = names.iter().find(|n| s.resource(n).is_file());
    load_resource(s, found.copied().unwrap_or(names[0]))
}

/// Where the HD and TV badges sit. Both present: HD left, TV right.
/// Alone: centered. Returns `(hd_x, tv_x)` given the badge widths.
pub(crate) fn badge_columns(width: u32, hd_w: Option<u32>, tv_w: Option<u32>) -> (Option<i64>, Option<i64>) {
    let w = width as i64;
    let centered = |bw: u32| (w - bw as i64) / 2;
    match (hd_w, tv_w) {
        (Some(_), Some(tw)) => (Some(BADGE_MARGIN), Some(w - tw as i64 - BADGE_MARGIN)),
        (Some(hw), None) => (Some(centered(hw)), None),
        (None, Some(tw)) => (None, Some(centered(tw))),
        (None, None) => (None, None),
    }
}

fn draw_badges(item: &VideoItem, img: &mut RgbaImage, s: &ImageSettings) {
    let (w, h) = (img.width() as i64, img.height() as i64);

    let hd = (s.badges.hd && item.resolution.is_hd())
        .then(|| load_first(s, &hd_logo_names(item.resolution, s.highdef_differentiate)))
        .flatten();
    let tv = (s.badges.tv && item.is_tv()).then(|| load_resource(s, "tv.png")).flatten();

    let (hd_x, tv_x) = badge_columns(img.width(), hd.as_ref().map(|l| l.width()), tv.as_ref().map(|l| l.width()));
    if let (Some(logo), Some(x)) = (&hd, hd_x) {
        imageops::overlay(img, logo, x, h - logo.height() as i64 - BADGE_MARGIN);
    }
    if let (Some(logo), Some(x)) = (&tv, tv_x) {
        imageops::overlay(img, logo, x, h - logo.height() as i64 - BADGE_MARGIN);
    }

    if s.badges.language && !item.languages.is_empty() {
        draw_languages(item, img, s);
    }

    if s.badges.subtitle
        && item.subtitles
        && let Some(logo) = load_resource(s, "subtitle.png")
    {
        imageops::overlay(img, &logo, w - logo.width() as i64 - BADGE_MARGIN, BADGE_MARGIN);
    }

    if s.badges.set
        && item.set_master
        && let Some(logo) = load_resource(s, "set.png")
    {
        imageops::overlay(img, &logo, w - logo.width() as i64 - BADGE_MARGIN, 1);
    }
}

/// Flag for the item's languages at the top-left: a combined
/// `languages/<A_B>.png` if the skin has one, else a grid of the single
/// flags.
fn draw_languages(item: &VideoItem, img: &mut RgbaImage, s: &ImageSettings) {
    let combined = format!("languages/{}.png", item.languages.join("_"));
    if s.resource(&combined).is_file() {
        if let Some(flag) = load_resource(s, &combined) {
            imageops::overlay(img, &flag, 1, 1);
        }
        return;
    }
    if item.languages.len() == 1 {
        log::warn!("{}: missing resource {}", s.kind, s.resource(&combined).display());
        return;
    }

    let flags: Vec<RgbaImage> = item
        .languages
        .iter()
        .filter_map(|lang| load_resource(s, &format!("languages/{}.png", lang)))
        .collect();
    let Some(first) = flags.first() else {
        return;
    };

    let (cols, rows) = language_grid(flags.len());
    let cell_w = (first.width() / cols).max(1);
    let cell_h = (first.height() / rows).max(1);
    for (i, flag) in flags.iter().enumerate() {
        let col = i as u32 % cols;
        let row = i as u32 / cols;
        let cell = imageops::resize(flag, cell_w, cell_h, imageops::FilterType::Triangle);
        imageops::overlay(img, &cell, 1 + (cell_w * col) as i64, 1 + (cell_h * row) as i64);
    }
}

/// Columns and rows for `n` language flags: `floor(sqrt(n))` columns.
pub(crate) fn language_grid(n: usize) -> (u32, u32) {
    let cols = ((n as f64).sqrt().floor() as u32).max(1);
    let rows = (n as u32).div_ceil(cols).max(1);
    (cols, rows)
}

#[cfg(test)]
#[path = "tests/plugin_tests.rs"]
mod tests;
