//! Field resolvers.
//!
//! A resolver is a pure function from raw source data to a partial set of
//! item fields. A [`ResolverChain`] runs resolvers in order and keeps the
//! first non-empty value for every field.

use std::collections::BTreeMap;

use regex::Regex;

use crate::item::{VideoItem, is_valid_value};
use crate::kind::ArtworkKind;

/// Raw text fetched from, or stored by, one metadata source.
#[derive(Debug, Clone)]
pub struct RawSourceData {
    pub source: String,
    pub text: String,
}

impl RawSourceData {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }
}

/// Fields a resolver may produce. Absent means "no opinion".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialFields {
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub year: Option<u16>,
    pub ids: BTreeMap<String, String>,
    pub artwork_urls: BTreeMap<ArtworkKind, String>,
}

impl PartialFields {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.original_title.is_none()
            && self.year.is_none()
            && self.ids.is_empty()
            && self.artwork_urls.is_empty()
    }

    /// Fill fields still missing here from `other`.
    pub fn merge_missing(&mut self, other: PartialFields) {
        if self.title.is_none() {
            self.title = other.title;
        }
        if self.original_title.is_none() {
            self.original_title = other.original_title;
        }
        if self.year.is_none() {
            self.year = other.year;
        }
        for (k, v) in other.ids {
            self.ids.entry(k).or_insert(v);
        }
        for (k, v) in other.artwork_urls {
            self.artwork_urls.entry(k).or_insert(v);
        }
    }

    /// Write the fields into `item`. Title, original title and year replace
    /// the filename-derived values; ids and artwork URLs only fill gaps.
    /// A newly filled artwork URL marks that kind dirty so it gets fetched.
    /// Returns true if anything changed.
    pub fn apply_to(&self, item: &mut VideoItem) -> bool {
        let mut changed = false;

        if let Some(title) = &self.title
            && item.title != *title
        {
            item.title = title.clone();
            changed = true;
        }
        if self.original_title.is_some() && item.original_title != self.original_title {
            item.original_title = self.original_title.clone();
            changed = true;
        }
        if self.year.is_some() && item.year != self.year {
            item.year = self.year;
            changed = true;
        }
        for (source, id) in &self.ids {
            if item.id(source).is_none() {
                item.set_id(source, id.clone());
                changed = true;
            }
        }
        for (&kind, url) in &self.artwork_urls {
            if !item.has_valid_url(kind) {
                item.set_url(kind, Some(url.clone()));
                item.set_dirty(kind, true);
                changed = true;
            }
        }

        if changed {
            item.info_dirty = true;
        }
        changed
    }
}

/// Produces partial fields from raw source data.
pub trait FieldResolver: Send + Sync {
    fn name(&self) -> &str;

    fn resolve(&self, raw: &RawSourceData) -> PartialFields;
}

/// Item field a [`RegexResolver`] fills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Title,
    OriginalTitle,
    Year,
    Id(String),
    ArtworkUrl(ArtworkKind),
}

/// Extracts one field from the first capture group of a pattern.
pub struct RegexResolver {
    name: String,
    pattern: Regex,
    field: Field,
}

impl RegexResolver {
    pub fn new(name: impl Into<String>, pattern: &str, field: Field) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            pattern: Regex::new(pattern)?,
            field,
        })
    }
}

impl FieldResolver for RegexResolver {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, raw: &RawSourceData) -> PartialFields {
        let mut fields = PartialFields::default();
        let Some(value) = self
            .pattern
            .captures(&raw.text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|v| is_valid_value(v))
        else {
            return fields;
        };

        match &self.field {
            Field::Title => fields.title = Some(value),
            Field::OriginalTitle => fields.original_title = Some(value),
            Field::Year => fields.year = value.parse().ok(),
            Field::Id(source) => {
                fields.ids.insert(source.clone(), value);
            }
            Field::ArtworkUrl(kind) => {
                fields.artwork_urls.insert(*kind, value);
            }
        }
        fields
    }
}

/// Ordered resolvers merged with first-non-empty-wins.
#[derive(Default)]
pub struct ResolverChain {
    resolvers: Vec<Box<dyn FieldResolver>>,
}

impl ResolverChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, resolver: impl FieldResolver + 'static) {
        self.resolvers.push(Box::new(resolver));
    }

    pub fn with(mut self, resolver: impl FieldResolver + 'static) -> Self {
        self.push(resolver);
        self
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    pub fn merge(&self, raw: &RawSourceData) -> PartialFields {
        let mut merged = PartialFields::default();
        for resolver in &self.resolvers {
            let fields = resolver.resolve(raw);
            if !fields.is_empty() {
                log::debug!("{}: resolver '{}' matched", raw.source, resolver.name());
            }
            merged.merge_missing(fields);
        }
        merged
    }

    /// Merge and write into `item`. Returns true if the item changed.
    pub fn apply(&self, raw: &RawSourceData, item: &mut VideoItem) -> bool {
        self.merge(raw).apply_to(item)
    }
}

/// Resolvers for NFO-style sidecar files: XML tags first, then bare ids
/// and site URLs anywhere in the text.
pub fn sidecar_chain() -> ResolverChain {
    let specs: [(&str, &str, Field); 10] = [
        ("nfo-title", r"(?is)<title>(.*?)</title>", Field::Title),
        ("nfo-originaltitle", r"(?is)<originaltitle>(.*?)</originaltitle>", Field::OriginalTitle),
        ("nfo-year", r"(?is)<year>\s*(\d{4})\s*</year>", Field::Year),
        ("nfo-imdb", r"(?is)<id>\s*(tt\d{7,8})\s*</id>", Field::Id("imdb".to_string())),
        ("imdb-id", r"(tt\d{7,8})", Field::Id("imdb".to_string())),
        ("tmdb-url", r"themoviedb\.org/movie/(\d+)", Field::Id("themoviedb".to_string())),
        ("tvdb-url", r"thetvdb\.com/\S*?[?&]id=(\d+)", Field::Id("thetvdb".to_string())),
        ("nfo-thumb", r"(?is)<thumb>\s*(https?://\S+?)\s*</thumb>", Field::ArtworkUrl(ArtworkKind::Poster)),
        ("nfo-fanart", r"(?is)<fanart>\s*(?:<thumb>)?\s*(https?://\S+?)\s*<", Field::ArtworkUrl(ArtworkKind::Fanart)),
        ("nfo-banner", r"(?is)<banner>\s*(https?://\S+?)\s*</banner>", Field::ArtworkUrl(ArtworkKind::Banner)),
    ];

    let mut chain = ResolverChain::new();
    for (name, pattern, field) in specs {
        match RegexResolver::new(name, pattern, field) {
            Ok(r) => chain.push(r),
            Err(e) => log::warn!("Skipping resolver {}: {}", name, e),
        }
    }
    chain
}

#[cfg(test)]
#[path = "tests/resolve_tests.rs"]
mod tests;
