use super::*;
use crate::test_support::FakeSource;

fn heat() -> VideoItem {
    let mut item = VideoItem::new("/movies/Heat.mkv", "/movies");
    item.title = "Heat & Dust".to_string();
    item.year = Some(1995);
    item.set_id("imdb", "tt0113277");
    item
}

#[test]
fn test_scope_parse_and_applies() {
    assert_eq!("Movie".parse::<SourceScope>(), Ok(SourceScope::Movie));
    assert_eq!("".parse::<SourceScope>(), Ok(SourceScope::Both));
    assert!("radio".parse::<SourceScope>().is_err());

    assert!(SourceScope::Movie.applies_to(false));
    assert!(!SourceScope::Movie.applies_to(true));
    assert!(SourceScope::Tv.applies_to(true));
    assert!(SourceScope::Both.applies_to(true));
}

#[test]
fn test_registry_lookup_is_case_insensitive() {
    let mut registry = SourceRegistry::new();
    registry.register(FakeSource::new("TheTVDB", SourceScope::Tv));
    registry.register(FakeSource::new("fanart", SourceScope::Both));

    assert_eq!(registry.len(), 2);
    assert!(registry.get("thetvdb").is_some());
    assert!(registry.get(" FANART ").is_some());
    assert!(registry.get("tmdb").is_none());
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["fanart", "thetvdb"]);
}

#[test]
fn test_registry_replaces_duplicate() {
    let mut registry = SourceRegistry::new();
    registry.register(FakeSource::new("tmdb", SourceScope::Movie));
    registry.register(FakeSource::new("TMDB", SourceScope::Tv));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("tmdb").unwrap().scope(), SourceScope::Tv);
}

#[test]
fn test_template_render() {
    let source = TemplateSource::new(
        "posters",
        "https://img.example/{id:imdb}/{kind}.jpg?t={title}&y={year}",
        SourceScope::Movie,
    );
    assert_eq!(
        source.render(&heat(), ArtworkKind::Poster).as_deref(),
        Some("https://img.example/tt0113277/poster.jpg?t=Heat%20%26%20Dust&y=1995")
    );
}

#[test]
fn test_template_missing_value_yields_nothing() {
    let source = TemplateSource::new("tvdb", "https://img.example/{id:tvdb}/{season}.jpg", SourceScope::Tv);
    assert_eq!(source.render(&heat(), ArtworkKind::Poster), None);

    let mut blank = heat();
    blank.set_id("tvdb", "UNKNOWN");
    assert_eq!(source.render(&blank, ArtworkKind::Poster), None);
}

#[test]
fn test_template_unknown_placeholder() {
    let source = TemplateSource::new("x", "https://img.example/{director}.jpg", SourceScope::Both);
    assert_eq!(source.render(&heat(), ArtworkKind::Poster), None);
}

#[test]
fn test_template_from_properties() {
    let props = PropertySet::parse_properties(
        "yamj.source.posters.template = https://img.example/{id:imdb}.jpg\n\
         yamj.source.posters.scope = movie\n\
         yamj.source.empty.template =\n\
         yamj.other = 1\n",
    );
    let sources = TemplateSource::from_properties(&props);
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].name(), "posters");
    assert_eq!(sources[0].scope(), SourceScope::Movie);
}

struct StubMetadata;

impl MetadataPlugin for StubMetadata {
    fn name(&self) -> &str {
        "stub"
    }

    fn scan(&self, item: &mut VideoItem) -> bool {
        item.title = "Changed".to_string();
        item.set_url(ArtworkKind::Fanart, Some("http://stub/fanart.jpg".to_string()));
        true
    }
}

#[tokio::test]
async fn test_metadata_source_leaves_item_alone() {
    let source = MetadataArtworkSource::new(Arc::new(StubMetadata), SourceScope::Both);
    let item = heat();

    assert_eq!(
        source.artwork_url(&item, ArtworkKind::Fanart).await.as_deref(),
        Some("http://stub/fanart.jpg")
    );
    assert_eq!(source.artwork_url(&item, ArtworkKind::Poster).await, None);
    assert_eq!(item.title, "Heat & Dust");
    assert_eq!(item.get_url(ArtworkKind::Fanart), None);
}
