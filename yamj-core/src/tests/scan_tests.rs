use super::*;

fn touch(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, b"").unwrap();
}

fn video_exts() -> HashSet<String> {
    extension_set(DEFAULT_VIDEO_EXTENSIONS)
}

#[test]
fn test_parse_title_year() {
    assert_eq!(
        parse_title_year("Inception (2010)"),
        ("Inception".to_string(), Some(2010))
    );
    assert_eq!(
        parse_title_year("The.Matrix.1999.1080p"),
        ("The Matrix".to_string(), Some(1999))
    );
    assert_eq!(parse_title_year("Inception"), ("Inception".to_string(), None));
}

#[test]
fn test_resolution_from_name() {
    assert_eq!(resolution_from_name("Movie.1080p"), ResolutionTier::Hd1080);
    assert_eq!(resolution_from_name("Movie.720P"), ResolutionTier::Hd720);
    assert_eq!(resolution_from_name("Movie"), ResolutionTier::Sd);
}

#[test]
fn test_scan_movies_skips_hidden_and_non_video() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(&root.join("Inception (2010)").join("Inception.mkv"));
    touch(&root.join("Inception (2010)").join("Inception.fanart.jpg"));
    touch(&root.join(".trash").join("Deleted.mkv"));
    touch(&root.join("Alien.1979.AVI"));

    let items = scan_library(root, &video_exts()).unwrap();
    let names: Vec<&str> = items.iter().map(|i| i.base_name.as_str()).collect();
    assert_eq!(names, vec!["Alien.1979", "Inception"]);
    assert_eq!(items[0].title, "Alien");
    assert_eq!(items[0].year, Some(1979));
    assert!(items.iter().all(|i| i.video_type == VideoType::Movie));
    assert!(items.iter().all(|i| i.library_root == root));
}

#[test]
fn test_scan_groups_episodes_into_seasons_and_masters() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let show = root.join("Lost");
    touch(&show.join("Season 1").join("Lost.S01E01.720p.mkv"));
    touch(&show.join("Season 1").join("Lost.S01E02.720p.mkv"));
    touch(&show.join("Season 2").join("Lost.S02E01.mkv"));

    let items = scan_library(root, &video_exts()).unwrap();
    let seasons: Vec<&VideoItem> = items.iter().filter(|i| i.is_tv() && !i.set_master).collect();
    let masters: Vec<&VideoItem> = items.iter().filter(|i| i.set_master).collect();

    assert_eq!(seasons.len(), 2);
    assert_eq!(seasons[0].title, "Lost");
    assert_eq!(seasons[0].season, Some(1));
    assert_eq!(seasons[0].base_name, "Lost.S01E01.720p");
    assert_eq!(seasons[0].resolution, ResolutionTier::Hd720);
    assert_eq!(seasons[1].season, Some(2));

    assert_eq!(masters.len(), 1);
    assert_eq!(masters[0].base_name, "Set_Lost_1");
    assert_eq!(masters[0].set_size, 2);
    assert_eq!(masters[0].video_dir(), show.join("Season 1"));
}

#[test]
fn test_season_folder_without_episode_tags() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(&root.join("Firefly").join("Season 1").join("01 - Serenity.avi"));

    let items = scan_library(root, &video_exts()).unwrap();
    let season = items.iter().find(|i| !i.set_master).unwrap();
    assert_eq!(season.title, "Firefly");
    assert_eq!(season.season, Some(1));
    assert!(season.is_tv());
}

#[test]
fn test_same_base_name_in_two_folders_gets_distinct_stems() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(&root.join("a").join("Heat.mkv"));
    touch(&root.join("b").join("Heat.mkv"));
    touch(&root.join("c").join("heat.avi"));

    let items = scan_library(root, &video_exts()).unwrap();
    assert_eq!(items.len(), 3);
    assert!(items.iter().take(2).all(|i| i.base_name == "Heat"));
    assert_eq!(items[0].jukebox_stem(), "Heat");
    assert_eq!(items[1].jukebox_stem(), "Heat_2");
    assert_eq!(items[2].jukebox_stem(), "heat_3");
}

#[test]
fn test_assign_jukebox_names_is_stable() {
    let mut items = vec![
        VideoItem::new("/m/a/Heat.mkv", "/m"),
        VideoItem::new("/m/Heat_2.mkv", "/m"),
        VideoItem::new("/m/b/Heat.mkv", "/m"),
    ];
    assert_eq!(assign_jukebox_names(&mut items), 1);
    assert_eq!(items[2].jukebox_stem(), "Heat_3");

    // Already distinct: a second pass changes nothing.
    assert_eq!(assign_jukebox_names(&mut items), 0);
    let stems: Vec<String> = items.iter().map(|i| i.jukebox_stem()).collect();
    assert_eq!(stems, vec!["Heat", "Heat_2", "Heat_3"]);
}
