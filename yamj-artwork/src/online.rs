use yamj_core::{ArtworkSettings, VideoItem};

use crate::fetch::ArtworkLocation;
use crate::source::SourceRegistry;
use crate::validate::Validator;

/// An accepted online candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnlineHit {
    pub url: String,
    pub source: String,
}

/// Asks registered sources for candidates in priority order and returns
/// the first one the validator accepts.
pub struct OnlineArtworkLocator {
    registry: SourceRegistry,
    validator: Validator,
}

impl OnlineArtworkLocator {
    pub fn new(registry: SourceRegistry, validator: Validator) -> Self {
        Self { registry, validator }
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub async fn locate(&self, item: &VideoItem, settings: &ArtworkSettings) -> Option<OnlineHit> {
        let tv = item.is_tv();
        for name in settings.search_priority(tv) {
            let Some(source) = self.registry.get(name) else {
                log::debug!("{}: no artwork source named '{}'", settings.kind, name);
                continue;
            };
            if !source.scope().applies_to(tv) {
                log::debug!("{}: source '{}' does not serve this item type", settings.kind, name);
                continue;
            }

            let Some(url) = source.artwork_url(item, settings.kind).await else {
                continue;
            };
            if !yamj_core::is_valid_value(&url) {
                continue;
            }

            let location = ArtworkLocation::parse(&url);
            if self.validator.validate(&location, settings).await.is_ok() {
                return Some(OnlineHit {
                    url,
                    source: source.name().to_lowercase(),
                });
            }
        }
        None
    }
}

#[cfg(test)]
#[path = "tests/online_tests.rs"]
mod tests;
