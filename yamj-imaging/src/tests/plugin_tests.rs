use std::path::Path;

use image::Rgba;
use yamj_core::{PropertySet, VideoType};

use super::*;

fn plugin_with(props: &str, skin: &Path) -> DefaultImagePlugin {
    let mut props = PropertySet::parse_properties(props);
    props.set("mjb.skin.dir", skin.to_string_lossy());
    DefaultImagePlugin::new(&ArtworkConfig::from_properties(props))
}

fn solid(w: u32, h: u32, c: [u8; 4]) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba(c)))
}

fn write_resource(skin: &Path, name: &str, img: &DynamicImage) {
    let path = skin.join("resources").join(name);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    img.save(&path).unwrap();
}

fn movie() -> VideoItem {
    VideoItem::new("/lib/Heat.mkv", "/lib")
}

const RED: [u8; 4] = [255, 0, 0, 255];
const GREEN: [u8; 4] = [0, 255, 0, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

#[test]
fn test_default_pipeline_resizes_to_target() {
    let skin = tempfile::tempdir().unwrap();
    let plugin = plugin_with("", skin.path());
    let out = plugin.generate(&movie(), solid(800, 1200, BLACK), ArtworkKind::Poster, None);
    assert_eq!((out.width(), out.height()), (400, 600));
}

#[test]
fn test_small_source_is_not_upscaled() {
    let skin = tempfile::tempdir().unwrap();
    let plugin = plugin_with("", skin.path());
    let out = plugin.generate(&movie(), solid(100, 150, BLACK), ArtworkKind::Poster, None);
    assert_eq!((out.width(), out.height()), (100, 150));
}

#[test]
fn test_hd_badge_forces_resize_of_small_source() {
    let skin = tempfile::tempdir().unwrap();
    let plugin = plugin_with("poster.logoHD=true\n", skin.path());
    let out = plugin.generate(&movie(), solid(100, 150, BLACK), ArtworkKind::Poster, None);
    assert_eq!((out.width(), out.height()), (400, 600));
}

#[test]
fn test_crop_region_applied_first() {
    let skin = tempfile::tempdir().unwrap();
    let plugin = plugin_with("", skin.path());
    let mut item = movie();
    item.set_crop(ArtworkKind::Poster, "0, 0, 50, 50".parse().ok());
    let out = plugin.generate(&item, solid(200, 300, BLACK), ArtworkKind::Poster, None);
    assert_eq!((out.width(), out.height()), (100, 150));
}

#[test]
fn test_missing_overlay_resource_is_noop() {
    let skin = tempfile::tempdir().unwrap();
    let plugin = plugin_with("poster.overlay=true\n", skin.path());
    let out = plugin.generate(&movie(), solid(400, 600, BLACK), ArtworkKind::Poster, None);
    assert_eq!((out.width(), out.height()), (400, 600));
}

#[test]
fn test_overlay_sets_canvas_size() {
    let skin = tempfile::tempdir().unwrap();
    write_resource(skin.path(), "default_overlay_poster.png", &solid(420, 640, [0, 0, 0, 0]));
    let plugin = plugin_with(
        "poster.overlay=true\nposter.overlay.offsetX=10\nposter.overlay.offsetY=20\n",
        skin.path(),
    );
    let out = plugin
        .generate(&movie(), solid(400, 600, RED), ArtworkKind::Poster, None)
        .into_rgba8();
    assert_eq!((out.width(), out.height()), (420, 640));
    assert_eq!(out.get_pixel(5, 5)[3], 0);
    assert_eq!(*out.get_pixel(10, 20), Rgba(RED));
}

#[test]
fn test_single_hd_badge_is_centered() {
    let skin = tempfile::tempdir().unwrap();
    write_resource(skin.path(), "hd.png", &solid(10, 10, RED));
    let plugin = plugin_with("poster.logoHD=true\n", skin.path());
    let mut item = movie();
    item.resolution = ResolutionTier::Hd1080;

    let out = plugin
        .generate(&item, solid(400, 600, BLACK), ArtworkKind::Poster, None)
        .into_rgba8();
    assert_eq!(*out.get_pixel(200, 590), Rgba(RED));
    assert_eq!(*out.get_pixel(7, 590), Rgba(BLACK));
}

#[test]
fn test_hd_and_tv_badges_split() {
    let skin = tempfile::tempdir().unwrap();
    write_resource(skin.path(), "hd.png", &solid(10, 10, RED));
    write_resource(skin.path(), "tv.png", &solid(10, 10, GREEN));
    let plugin = plugin_with("poster.logoHD=true\nposter.logoTV=true\n", skin.path());
    let mut item = movie();
    item.resolution = ResolutionTier::Hd720;
    item.video_type = VideoType::TvShow;

    let out = plugin
        .generate(&item, solid(400, 600, BLACK), ArtworkKind::Poster, None)
        .into_rgba8();
    assert_eq!(*out.get_pixel(7, 590), Rgba(RED));
    assert_eq!(*out.get_pixel(390, 590), Rgba(GREEN));
    assert_eq!(*out.get_pixel(200, 590), Rgba(BLACK));
}

#[test]
fn test_sd_item_gets_no_hd_badge() {
    let skin = tempfile::tempdir().unwrap();
    write_resource(skin.path(), "hd.png", &solid(10, 10, RED));
    let plugin = plugin_with("poster.logoHD=true\n", skin.path());
    let out = plugin
        .generate(&movie(), solid(400, 600, BLACK), ArtworkKind::Poster, None)
        .into_rgba8();
    assert_eq!(*out.get_pixel(200, 590), Rgba(BLACK));
}

#[test]
fn test_subtitle_badge_top_right() {
    let skin = tempfile::tempdir().unwrap();
    write_resource(skin.path(), "subtitle.png", &solid(10, 10, GREEN));
    let plugin = plugin_with("poster.logoSubTitle=true\n", skin.path());
    let mut item = movie();
    item.subtitles = true;
    let out = plugin
        .generate(&item, solid(400, 600, BLACK), ArtworkKind::Poster, None)
        .into_rgba8();
    assert_eq!(*out.get_pixel(390, 10), Rgba(GREEN));
}

#[test]
fn test_combined_language_flag_preferred() {
    let skin = tempfile::tempdir().unwrap();
    write_resource(skin.path(), "languages/English_French.png", &solid(20, 10, GREEN));
    write_resource(skin.path(), "languages/English.png", &solid(20, 10, RED));
    let plugin = plugin_with("poster.language=true\n", skin.path());
    let mut item = movie();
    item.languages = vec!["English".to_string(), "French".to_string()];
    let out = plugin
        .generate(&item, solid(400, 600, BLACK), ArtworkKind::Poster, None)
        .into_rgba8();
    assert_eq!(*out.get_pixel(5, 5), Rgba(GREEN));
}

#[test]
fn test_reflection_then_perspective() {
    let skin = tempfile::tempdir().unwrap();
    let plugin = plugin_with("poster.reflection=true\nposter.perspective=true\n", skin.path());
    let out = plugin
        .generate(&movie(), solid(400, 600, BLACK), ArtworkKind::Poster, None)
        .into_rgba8();
    // 12.5% reflection band
    assert_eq!((out.width(), out.height()), (400, 675));
    // Default direction recedes to the right
    assert_eq!(out.get_pixel(399, 0)[3], 0);
    assert_eq!(out.get_pixel(0, 0)[3], 255);
}

#[test]
fn test_perspective_hint_overrides_direction() {
    let skin = tempfile::tempdir().unwrap();
    let plugin = plugin_with("poster.perspective=true\n", skin.path());
    let out = plugin
        .generate(
            &movie(),
            solid(400, 600, BLACK),
            ArtworkKind::Poster,
            Some(PerspectiveDirection::Left),
        )
        .into_rgba8();
    assert_eq!(out.get_pixel(0, 0)[3], 0);
    assert_eq!(out.get_pixel(399, 0)[3], 255);
}

#[test]
fn test_text_without_font_is_noop() {
    let skin = tempfile::tempdir().unwrap();
    let plugin = plugin_with("banner.addText.title=true\n", skin.path());
    let out = plugin
        .generate(&movie(), solid(758, 140, BLACK), ArtworkKind::Banner, None)
        .into_rgba8();
    assert!(out.pixels().all(|p| *p == Rgba(BLACK)));
}

#[test]
fn test_frame_then_round_corners() {
    let skin = tempfile::tempdir().unwrap();
    let plugin = plugin_with(
        "poster.addFrame=true\nposter.frame.colorSD=0/0/255\nposter.roundCorners=true\n",
        skin.path(),
    );
    let out = plugin
        .generate(&movie(), solid(400, 600, BLACK), ArtworkKind::Poster, None)
        .into_rgba8();
    assert_eq!(out.get_pixel(0, 0)[3], 0);
    assert_eq!(*out.get_pixel(200, 2), Rgba([0, 0, 255, 255]));
    assert_eq!(*out.get_pixel(200, 300), Rgba(BLACK));
}

#[test]
fn test_overlay_name_by_source() {
    let skin = tempfile::tempdir().unwrap();
    let plugin = plugin_with("poster.overlay.source=certification\n", skin.path());
    let s = plugin.settings(ArtworkKind::Poster).unwrap();
    let mut item = movie();
    assert_eq!(overlay_name(&item, s), None);
    item.certification = Some("PG-13".to_string());
    assert_eq!(overlay_name(&item, s).as_deref(), Some("pg-13_overlay_poster.png"));
}

#[test]
fn test_hd_logo_names() {
    assert_eq!(hd_logo_names(ResolutionTier::Hd1080, true), vec!["hd-1080.png", "hd.png"]);
    assert_eq!(hd_logo_names(ResolutionTier::Hd720, true), vec!["hd-720.png", "hd.png"]);
    assert_eq!(hd_logo_names(ResolutionTier::Hd1080, false), vec!["hd.png"]);
}

#[test]
fn test_badge_columns() {
    assert_eq!(badge_columns(400, Some(10), Some(20)), (Some(5), Some(375)));
    assert_eq!(badge_columns(400, Some(10), None), (Some(195), None));
    assert_eq!(badge_columns(400, None, Some(20)), (None, Some(190)));
}

#[test]
fn test_language_grid() {
    assert_eq!(language_grid(1), (1, 1));
    assert_eq!(language_grid(2), (1, 2));
    assert_eq!(language_grid(4), (2, 2));
    assert_eq!(language_grid(5), (2, 3));
}
