//! The per-(item, kind) artwork state machine.
//!
//! [`ArtworkScanner::run`] decides whether a kind needs work at all, looks
//! for local artwork first and online artwork second, then fetches,
//! transforms and writes the winner to the temp root. Every failure is
//! scoped to the one unit and reported in the returned record.

use std::fmt;
use std::sync::Arc;

use yamj_core::{ArtworkConfig, ArtworkKind, ArtworkSettings, VideoItem};
use yamj_imaging::{ArtworkImagePlugin, ImagingError};

use crate::fetch::{ArtworkLocation, ResourceFetcher};
use crate::local::LocalArtworkLocator;
use crate::online::OnlineArtworkLocator;
use crate::source::SourceRegistry;
use crate::storage::JukeboxLayout;
use crate::validate::Validator;

/// Where committed artwork came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtworkOrigin {
    Local,
    /// Accepted from the named online source.
    Online(String),
    /// A URL already on the item, set by a metadata plugin.
    Existing,
}

impl fmt::Display for ArtworkOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtworkOrigin::Local => f.write_str("local"),
            ArtworkOrigin::Online(source) => write!(f, "online:{}", source),
            ArtworkOrigin::Existing => f.write_str("metadata"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Kind disabled for this item type.
    NotRequired,
    /// Stored URL is valid and nothing changed.
    CacheValid,
    /// No URL, but nothing asks for a new search.
    NotDue,
    /// Written to the temp root.
    Committed,
    /// Found, but the jukebox copy is current.
    Skipped,
    NotFound,
    FetchFailed,
    DecodeFailed,
    WriteFailed,
}

impl ScanOutcome {
    /// True if the outcome left usable artwork in place.
    pub fn has_artwork(self) -> bool {
        matches!(self, ScanOutcome::CacheValid | ScanOutcome::Committed | ScanOutcome::Skipped)
    }

    pub fn is_failure(self) -> bool {
        matches!(
            self,
            ScanOutcome::FetchFailed | ScanOutcome::DecodeFailed | ScanOutcome::WriteFailed
        )
    }
}

/// Result of one [`ArtworkScanner::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkRecord {
    pub kind: ArtworkKind,
    pub url: Option<String>,
    pub filename: Option<String>,
    pub origin: Option<ArtworkOrigin>,
    pub outcome: ScanOutcome,
    /// Failure detail for the run log.
    pub message: Option<String>,
}

struct Candidate {
    url: String,
    origin: ArtworkOrigin,
}

/// Output file name: jukebox stem, kind token, kind format.
pub fn artwork_filename(item: &VideoItem, settings: &ArtworkSettings) -> String {
    format!("{}{}.{}", item.jukebox_stem(), settings.token, settings.format)
}

pub struct ArtworkScanner {
    config: ArtworkConfig,
    local: LocalArtworkLocator,
    online: OnlineArtworkLocator,
    fetcher: Arc<dyn ResourceFetcher>,
    image_plugin: Arc<dyn ArtworkImagePlugin>,
}

impl ArtworkScanner {
    pub fn new(
        config: ArtworkConfig,
        fetcher: Arc<dyn ResourceFetcher>,
        sources: SourceRegistry,
        image_plugin: Arc<dyn ArtworkImagePlugin>,
    ) -> Self {
        let validator = Validator::new(Arc::clone(&fetcher));
        Self {
            config,
            local: LocalArtworkLocator::new(),
            online: OnlineArtworkLocator::new(sources, validator),
            fetcher,
            image_plugin,
        }
    }

    pub fn config(&self) -> &ArtworkConfig {
        &self.config
    }

    /// Process one kind of one item. Never fails; the outcome says what
    /// happened, and the item's URL/filename pair is consistent afterwards.
    pub async fn run(&self, layout: &JukeboxLayout, item: &mut VideoItem, kind: ArtworkKind) -> ArtworkRecord {
        let settings = self.config.settings(kind);
        let (outcome, origin, message) = match self.process(layout, item, settings).await {
            Ok((outcome, origin)) => (outcome, origin, None),
            Err((outcome, message)) => (outcome, None, Some(message)),
        };
        reconcile(item, settings);

        ArtworkRecord {
            kind,
            url: item.get_url(kind).map(str::to_string),
            filename: item.get_filename(kind).map(str::to_string),
            origin,
            outcome,
            message,
        }
    }

    async fn process(
        &self,
        layout: &JukeboxLayout,
        item: &mut VideoItem,
        settings: &ArtworkSettings,
    ) -> Result<(ScanOutcome, Option<ArtworkOrigin>), (ScanOutcome, String)> {
        let kind = settings.kind;
        let download = settings.download_enabled(item.is_tv());

        if !download && !settings.search_local {
            log::debug!("{}: {} not required", item.base_name, kind);
            return Ok((ScanOutcome::NotRequired, None));
        }

        if settings.force_overwrite {
            log::debug!("{}: {} forced refresh", item.base_name, kind);
            item.clear_artwork(kind);
        } else {
            let valid = item.has_valid_url(kind);
            let dirty = item.is_dirty(kind);
            if valid && !dirty && !item.info_dirty {
                return Ok((ScanOutcome::CacheValid, None));
            }
            if !valid && !dirty && !item.info_dirty && !item.recheck {
                log::debug!("{}: {} has no artwork and is not due for a search", item.base_name, kind);
                return Ok((ScanOutcome::NotDue, None));
            }
        }

        let Some(candidate) = self.search(item, settings, download).await else {
            if !item.has_valid_url(kind) {
                item.clear_artwork(kind);
            }
            log::debug!("{}: no {} found", item.base_name, kind);
            return Ok((ScanOutcome::NotFound, None));
        };

        self.commit(layout, item, settings, candidate).await
    }

    /// Local first; online only for scrape-flagged items that may download
    /// and whose stored URL is missing or explicitly stale.
    async fn search(&self, item: &VideoItem, settings: &ArtworkSettings, download: bool) -> Option<Candidate> {
        if settings.search_local
            && let Some(path) = self.local.locate(item, settings)
        {
            return Some(Candidate {
                url: path.to_string_lossy().into_owned(),
                origin: ArtworkOrigin::Local,
            });
        }

        if !download {
            return None;
        }

        let stale = !item.has_valid_url(settings.kind) || item.is_dirty(settings.kind) || item.recheck;
        if item.scrape_library && stale && !item.has_blocked_id() {
            if let Some(hit) = self.online.locate(item, settings).await {
                log::debug!("{}: {} accepted from {}", item.base_name, settings.kind, hit.source);
                return Some(Candidate {
                    url: hit.url,
                    origin: ArtworkOrigin::Online(hit.source),
                });
            }
        } else if item.has_blocked_id() {
            log::debug!("{}: online search blocked by id marker", item.base_name);
        }

        // A metadata plugin may already have supplied a URL.
        item.get_url(settings.kind)
            .filter(|u| yamj_core::is_valid_value(u))
            .map(|url| Candidate {
                url: url.to_string(),
                origin: ArtworkOrigin::Existing,
            })
    }

    async fn commit(
        &self,
        layout: &JukeboxLayout,
        item: &mut VideoItem,
        settings: &ArtworkSettings,
        candidate: Candidate,
    ) -> Result<(ScanOutcome, Option<ArtworkOrigin>), (ScanOutcome, String)> {
        let kind = settings.kind;
        let filename = artwork_filename(item, settings);
        let location = ArtworkLocation::parse(&candidate.url);
        item.set_artwork(kind, candidate.url.clone(), filename.clone());

        if !self.should_overwrite(layout, item, settings, &filename, &location) {
            log::debug!("{}: {} is current, skipping", item.base_name, filename);
            item.set_dirty(kind, false);
            return Ok((ScanOutcome::Skipped, Some(candidate.origin)));
        }

        let bytes = match self.fetcher.fetch(&location).await {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("{}: could not fetch {} {}: {}", item.base_name, kind, location, e);
                item.clear_artwork(kind);
                return Err((ScanOutcome::FetchFailed, e.to_string()));
            }
        };

        let encoded = match self.render(item, kind, bytes, &settings.format).await {
            Ok(encoded) => encoded,
            Err(e) => {
                log::warn!("{}: could not process {} {}: {}", item.base_name, kind, location, e);
                item.clear_artwork(kind);
                return Err((ScanOutcome::DecodeFailed, e.to_string()));
            }
        };

        if let Err(e) = layout.write_temp_atomic(&filename, &encoded) {
            log::warn!("{}: {}", item.base_name, e);
            item.clear_artwork(kind);
            return Err((ScanOutcome::WriteFailed, e.to_string()));
        }

        item.set_dirty(kind, false);
        log::info!("{}: wrote {} from {}", item.base_name, filename, candidate.origin);
        Ok((ScanOutcome::Committed, Some(candidate.origin)))
    }

    /// Decode, transform and encode on the blocking pool.
    async fn render(
        &self,
        item: &VideoItem,
        kind: ArtworkKind,
        bytes: Vec<u8>,
        format: &str,
    ) -> Result<Vec<u8>, ImagingError> {
        let plugin = Arc::clone(&self.image_plugin);
        let item = item.clone();
        let format = format.to_string();
        tokio::task::spawn_blocking(move || {
            let decoded = yamj_imaging::decode(&bytes)?;
            let generated = plugin.generate(&item, decoded, kind, None);
            yamj_imaging::encode(&generated, &format)
        })
        .await
        .map_err(|e| ImagingError::Io(std::io::Error::other(e.to_string())))?
    }

    /// Should the jukebox copy be (re)generated? Checked in order: forced
    /// overwrite, dirty kind, no copy in either root yet, a local source
    /// newer than the temp copy, a local source newer than the final copy.
    fn should_overwrite(
        &self,
        layout: &JukeboxLayout,
        item: &VideoItem,
        settings: &ArtworkSettings,
        filename: &str,
        location: &ArtworkLocation,
    ) -> bool {
        if settings.force_overwrite || item.is_dirty(settings.kind) {
            return true;
        }

        let temp = layout.temp_path(filename);
        let final_copy = layout.final_path(filename);
        let temp_exists = layout.exists(&temp);
        let final_exists = layout.exists(&final_copy);
        if !temp_exists && !final_exists {
            return true;
        }

        if let ArtworkLocation::Local(source) = location {
            if temp_exists && layout.is_newer(source, &temp) {
                return true;
            }
            if final_exists && layout.is_newer(source, &final_copy) {
                return true;
            }
        }
        false
    }
}

/// Keep URL and filename paired: a valid URL always has a filename, an
/// invalid one never does.
fn reconcile(item: &mut VideoItem, settings: &ArtworkSettings) {
    let kind = settings.kind;
    if item.has_valid_url(kind) {
        if item.get_filename(kind).is_none() {
            item.set_filename(kind, Some(artwork_filename(item, settings)));
        }
    } else if item.get_filename(kind).is_some() {
        item.set_filename(kind, None);
    }
}

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod tests;
