use super::*;

#[test]
fn test_new_item_is_info_dirty() {
    let item = VideoItem::new("/movies/Inception.mkv", "/movies");
    assert_eq!(item.base_name, "Inception");
    assert_eq!(item.title, "Inception");
    assert!(item.info_dirty);
    assert_eq!(item.video_dir(), Path::new("/movies"));
}

#[test]
fn test_is_valid_value() {
    assert!(is_valid_value("http://example.com/a.jpg"));
    assert!(!is_valid_value(""));
    assert!(!is_valid_value("   "));
    assert!(!is_valid_value("UNKNOWN"));
    assert!(!is_valid_value("Unknown"));
}

#[test]
fn test_accessors_default_to_empty() {
    let item = VideoItem::new("/m/A.avi", "/m");
    assert_eq!(item.get_url(ArtworkKind::Poster), None);
    assert_eq!(item.get_filename(ArtworkKind::Poster), None);
    assert!(!item.is_dirty(ArtworkKind::Poster));
    assert!(!item.has_valid_url(ArtworkKind::Poster));
}

#[test]
fn test_set_and_clear_artwork_pair() {
    let mut item = VideoItem::new("/m/A.avi", "/m");
    item.set_dirty(ArtworkKind::Fanart, true);
    item.set_artwork(
        ArtworkKind::Fanart,
        "http://x/f.jpg".to_string(),
        "A.fanart.jpg".to_string(),
    );
    assert_eq!(item.get_url(ArtworkKind::Fanart), Some("http://x/f.jpg"));
    assert_eq!(item.get_filename(ArtworkKind::Fanart), Some("A.fanart.jpg"));

    item.clear_artwork(ArtworkKind::Fanart);
    assert_eq!(item.get_url(ArtworkKind::Fanart), None);
    assert_eq!(item.get_filename(ArtworkKind::Fanart), None);
    assert!(item.is_dirty(ArtworkKind::Fanart));
}

#[test]
fn test_placeholder_url_is_not_valid() {
    let mut item = VideoItem::new("/m/A.avi", "/m");
    item.set_url(ArtworkKind::Banner, Some(UNKNOWN.to_string()));
    assert!(!item.has_valid_url(ArtworkKind::Banner));
}

#[test]
fn test_sanitized_base_name() {
    let mut item = VideoItem::new("/m/x.mkv", "/m");
    item.base_name = "Who: What? <Why>|\"How\"*".to_string();
    assert_eq!(item.sanitized_base_name(), "Who_ What_ _Why___How__");
    assert_eq!(item.jukebox_stem(), "Who_ What_ _Why___How__");

    item.jukebox_name = Some("Who: 2".to_string());
    assert_eq!(item.jukebox_stem(), "Who_ 2");
    assert_eq!(item.sanitized_base_name(), "Who_ What_ _Why___How__");
}

#[test]
fn test_blocked_ids() {
    let mut item = VideoItem::new("/m/x.mkv", "/m");
    item.set_id("imdb", "tt1375666");
    assert!(!item.has_blocked_id());
    item.set_id("TheTVDB", "-1");
    assert!(item.has_blocked_id());
    assert_eq!(item.id("thetvdb"), Some("-1"));
}

#[test]
fn test_mark_clean() {
    let mut item = VideoItem::new("/m/x.mkv", "/m");
    item.recheck = true;
    item.mark_clean();
    assert!(!item.info_dirty);
    assert!(!item.recheck);
}

#[test]
fn test_crop_region_parse() {
    let crop: CropRegion = "10, 0, 80, 100".parse().unwrap();
    assert_eq!(
        crop,
        CropRegion {
            x: 10,
            y: 0,
            width: 80,
            height: 100
        }
    );
    assert!("10,0,95,100".parse::<CropRegion>().is_err());
    assert!("10,0,80".parse::<CropRegion>().is_err());
    assert!("a,b,c,d".parse::<CropRegion>().is_err());
}

#[test]
fn test_hd_tiers() {
    assert!(!ResolutionTier::Sd.is_hd());
    assert!(ResolutionTier::Hd720.is_hd());
    assert!(ResolutionTier::Hd1080.is_hd());
}
