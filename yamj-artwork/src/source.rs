//! Online artwork sources.
//!
//! A source maps an item to one candidate URL for a kind. Sources are
//! registered by name and consulted in the order each kind's search
//! priority lists them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use yamj_core::{ArtworkKind, MetadataPlugin, PropertySet, VideoItem, is_valid_value};

/// Which item types a source serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceScope {
    Movie,
    Tv,
    #[default]
    Both,
}

impl SourceScope {
    pub fn applies_to(self, tv: bool) -> bool {
        match self {
            SourceScope::Movie => !tv,
            SourceScope::Tv => tv,
            SourceScope::Both => true,
        }
    }
}

impl FromStr for SourceScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" => Ok(SourceScope::Movie),
            "tv" => Ok(SourceScope::Tv),
            "both" | "" => Ok(SourceScope::Both),
            other => Err(format!("unknown source scope '{}'", other)),
        }
    }
}

impl fmt::Display for SourceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceScope::Movie => "movie",
            SourceScope::Tv => "tv",
            SourceScope::Both => "both",
        })
    }
}

/// Yields a candidate artwork URL for an item.
#[async_trait]
pub trait ArtworkSourcePlugin: Send + Sync {
    fn name(&self) -> &str;

    fn scope(&self) -> SourceScope {
        SourceScope::Both
    }

    async fn artwork_url(&self, item: &VideoItem, kind: ArtworkKind) -> Option<String>;
}

/// Sources keyed by lowercase name.
#[derive(Default, Clone)]
pub struct SourceRegistry {
    sources: BTreeMap<String, Arc<dyn ArtworkSourcePlugin>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, source: impl ArtworkSourcePlugin + 'static) {
        self.register_arc(Arc::new(source));
    }

    /// A later registration under the same name replaces the earlier one.
    pub fn register_arc(&mut self, source: Arc<dyn ArtworkSourcePlugin>) {
        let key = source.name().to_lowercase();
        if self.sources.insert(key.clone(), source).is_some() {
            log::warn!("Artwork source '{}' registered twice; keeping the last", key);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ArtworkSourcePlugin>> {
        self.sources.get(&name.trim().to_lowercase())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Adapts a [`MetadataPlugin`], which sets artwork URLs as a side effect
/// of `scan`, into an artwork source. The scan runs on a copy of the item
/// so the caller's item is only changed by the orchestrator.
pub struct MetadataArtworkSource {
    plugin: Arc<dyn MetadataPlugin>,
    scope: SourceScope,
}

impl MetadataArtworkSource {
    pub fn new(plugin: Arc<dyn MetadataPlugin>, scope: SourceScope) -> Self {
        Self { plugin, scope }
    }
}

#[async_trait]
impl ArtworkSourcePlugin for MetadataArtworkSource {
    fn name(&self) -> &str {
        self.plugin.name()
    }

    fn scope(&self) -> SourceScope {
        self.scope
    }

    async fn artwork_url(&self, item: &VideoItem, kind: ArtworkKind) -> Option<String> {
        let plugin = Arc::clone(&self.plugin);
        let mut copy = item.clone();
        copy.clear_artwork(kind);

        let result = tokio::task::spawn_blocking(move || {
            plugin.scan(&mut copy);
            copy.get_url(kind).filter(|u| is_valid_value(u)).map(str::to_string)
        })
        .await;

        match result {
            Ok(url) => url,
            Err(e) => {
                log::warn!("{}: metadata scan failed for {}: {}", self.name(), item.base_name, e);
                None
            }
        }
    }
}

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(?P<key>[a-z]+)(?::(?P<arg>[A-Za-z0-9_.\-]+))?\}").expect("static pattern"));

/// A URL template read from configuration:
///
/// ```text
/// yamj.source.posters.template = https://img.example/{id:imdb}/{kind}.jpg
/// yamj.source.posters.scope = movie
/// ```
///
/// Placeholders: `{id:<source>}`, `{title}`, `{year}`, `{season}`,
/// `{kind}`. Values are URL-encoded. A template whose placeholder has no
/// value on the item yields nothing.
#[derive(Debug, Clone)]
pub struct TemplateSource {
    name: String,
    template: String,
    scope: SourceScope,
}

impl TemplateSource {
    pub fn new(name: impl Into<String>, template: impl Into<String>, scope: SourceScope) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            scope,
        }
    }

    /// Every `yamj.source.<name>.template` in the properties.
    pub fn from_properties(props: &PropertySet) -> Vec<TemplateSource> {
        const PREFIX: &str = "yamj.source.";
        const SUFFIX: &str = ".template";

        props
            .with_prefix(PREFIX)
            .filter_map(|(key, value)| {
                let name = key.strip_prefix(PREFIX)?.strip_suffix(SUFFIX)?;
                if name.is_empty() || value.trim().is_empty() {
                    return None;
                }
                let scope_key = format!("{}{}.scope", PREFIX, name);
                let scope = props
                    .get(&scope_key)
                    .map(|s| {
                        s.parse().unwrap_or_else(|e| {
                            log::warn!("{}: {}", scope_key, e);
                            SourceScope::Both
                        })
                    })
                    .unwrap_or_default();
                Some(TemplateSource::new(name, value.trim(), scope))
            })
            .collect()
    }

    /// Fill the template for an item, or `None` if a value is missing.
    pub fn render(&self, item: &VideoItem, kind: ArtworkKind) -> Option<String> {
        let mut out = String::with_capacity(self.template.len());
        let mut last = 0;
        for caps in PLACEHOLDER_RE.captures_iter(&self.template) {
            let whole = caps.get(0)?;
            out.push_str(&self.template[last..whole.start()]);
            last = whole.end();

            let value = match (&caps["key"], caps.name("arg").map(|m| m.as_str())) {
                ("id", Some(source)) => item.id(&source.to_lowercase()).filter(|v| is_valid_value(v))?.to_string(),
                ("title", None) => Some(item.title.as_str()).filter(|t| is_valid_value(t))?.to_string(),
                ("year", None) => item.year?.to_string(),
                ("season", None) => item.season?.to_string(),
                ("kind", None) => kind.name().to_string(),
                _ => {
                    log::warn!("{}: unknown placeholder {}", self.name, whole.as_str());
                    return None;
                }
            };
            out.push_str(&urlencoding::encode(&value));
        }
        out.push_str(&self.template[last..]);
        Some(out)
    }
}

#[async_trait]
impl ArtworkSourcePlugin for TemplateSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn scope(&self) -> SourceScope {
        self.scope
    }

    async fn artwork_url(&self, item: &VideoItem, kind: ArtworkKind) -> Option<String> {
        self.render(item, kind)
    }
}

#[cfg(test)]
#[path = "tests/source_tests.rs"]
mod tests;
