use super::*;

#[test]
fn test_defaults_without_properties() {
    let props = PropertySet::new();
    let s = ArtworkSettings::from_properties(ArtworkKind::Fanart, &props);
    assert!(s.search_local);
    assert!(s.movie_download);
    assert!(s.tv_download);
    assert_eq!(s.extensions, vec!["jpg", "png", "gif"]);
    assert_eq!(s.token, ".fanart");
    assert_eq!(s.format, "jpg");
    assert!(s.validate);
    assert_eq!(s.validate_match, 75);
    assert!(s.validate_aspect);
    assert_eq!(s.artwork_directory, "");
    assert_eq!(
        s.priority,
        vec!["video", "folder", "fixed", "series", "directory"]
    );
    assert_eq!(s.image_names, vec!["fanart", "backdrop", "background"]);
    assert!(s.search_priority_movie.is_empty());
    assert!(!s.force_overwrite);
}

#[test]
fn test_properties_override_defaults() {
    let props = PropertySet::parse_properties(
        "# comment\n\
         poster.scanner.artworkExtensions=png;jpg|jpeg\n\
         poster.scanner.ValidateMatch = 150\n\
         poster.tv.download=false\n\
         poster.width=500\n\
         poster.format=PNG\n\
         mjb.forcePosterOverwrite=TRUE\n\
         poster.scanner.SearchPriority.movie=tmdb, imdb\n",
    );
    let s = ArtworkSettings::from_properties(ArtworkKind::Poster, &props);
    assert_eq!(s.extensions, vec!["png", "jpg", "jpeg"]);
    assert_eq!(s.validate_match, 100);
    assert!(!s.tv_download);
    assert!(s.movie_download);
    assert_eq!(s.width, 500);
    assert_eq!(s.height, 600);
    assert_eq!(s.format, "png");
    assert!(s.force_overwrite);
    assert_eq!(s.search_priority(false), ["tmdb", "imdb"]);
    assert!(s.search_priority(true).is_empty());
}

#[test]
fn test_non_true_bool_is_false() {
    let props = PropertySet::parse_properties("fanart.scanner.Validate=yes\n");
    assert!(!props.get_bool("fanart.scanner.Validate", true));
    assert!(props.get_bool("missing.key", true));
}

#[test]
fn test_invalid_number_falls_back() {
    let props = PropertySet::parse_properties("poster.width=wide\n");
    assert_eq!(props.get_u32("poster.width", 400), 400);
}

#[test]
fn test_properties_value_may_contain_separators() {
    let props = PropertySet::parse_properties("source.url=http://example.com/a=b\n");
    assert_eq!(props.get("source.url"), Some("http://example.com/a=b"));
}

#[test]
fn test_toml_flattening() {
    let props = PropertySet::parse_toml(
        r#"
[fanart.scanner]
Validate = false
ValidateMatch = 60
artworkExtensions = ["jpg", "png"]

[mjb]
forceFanartOverwrite = true
"#,
    )
    .unwrap();
    assert_eq!(props.get("fanart.scanner.Validate"), Some("false"));
    assert_eq!(props.get_u32("fanart.scanner.ValidateMatch", 75), 60);
    assert_eq!(props.get("fanart.scanner.artworkExtensions"), Some("jpg,png"));
    let s = ArtworkSettings::from_properties(ArtworkKind::Fanart, &props);
    assert!(!s.validate);
    assert!(s.force_overwrite);
}

#[test]
fn test_yaml_flattening() {
    let props = PropertySet::parse_yaml(
        "banner:\n  scanner:\n    artworkDirectory: Artwork\n  height: 200\n",
    )
    .unwrap();
    assert_eq!(props.get("banner.scanner.artworkDirectory"), Some("Artwork"));
    assert_eq!(props.get_u32("banner.height", 140), 200);
}

#[test]
fn test_invalid_toml_is_error() {
    assert!(PropertySet::parse_toml("[unclosed").is_err());
}

#[test]
fn test_load_by_extension_and_merge() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("base.properties");
    let over = dir.path().join("over.toml");
    std::fs::write(&base, "poster.width=300\nposter.height=450\n").unwrap();
    std::fs::write(&over, "poster.width = 350\n").unwrap();

    let props = PropertySet::load_all(&[base, over]).unwrap();
    assert_eq!(props.get("poster.width"), Some("350"));
    assert_eq!(props.get("poster.height"), Some("450"));

    let unknown = dir.path().join("config.ini");
    std::fs::write(&unknown, "x=1").unwrap();
    assert!(matches!(
        PropertySet::load(&unknown),
        Err(ConfigError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_artwork_config_globals() {
    let props = PropertySet::parse_properties(
        "mjb.artwork.maxWorkers=0\n\
         mjb.artwork.fetchTimeout=10\n\
         mjb.artwork.kinds=poster,bogus,clearlogo\n\
         mjb.skin.dir=/skins/blue\n\
         highdef.differentiate=true\n",
    );
    let config = ArtworkConfig::from_properties(props);
    assert_eq!(config.max_workers, 1);
    assert_eq!(config.fetch_timeout, Duration::from_secs(10));
    assert_eq!(
        config.batch_kinds,
        vec![ArtworkKind::Poster, ArtworkKind::ClearLogo]
    );
    assert_eq!(config.skin_dir, PathBuf::from("/skins/blue"));
    assert!(config.highdef_differentiate);
}

#[test]
fn test_required_kinds_excludes_fully_disabled() {
    let props = PropertySet::parse_properties(
        "banner.movie.download=false\n\
         banner.tv.download=false\n\
         banner.scanner.searchForExistingArtwork=false\n",
    );
    let config = ArtworkConfig::from_properties(props);
    let required = config.required_kinds();
    assert!(!required.contains(&ArtworkKind::Banner));
    assert!(required.contains(&ArtworkKind::Poster));
}
