//! Metadata source plugin contract.

use std::path::PathBuf;

use crate::item::VideoItem;
use crate::resolve::{RawSourceData, ResolverChain, sidecar_chain};

/// A source that enriches items with metadata. Implementations may set a
/// candidate artwork URL on the item as a side effect of [`scan`].
///
/// [`scan`]: MetadataPlugin::scan
pub trait MetadataPlugin: Send + Sync {
    fn name(&self) -> &str;

    /// Enrich `item`. Returns true if the source knew the item.
    fn scan(&self, item: &mut VideoItem) -> bool;

    /// Fill per-episode titles for a TV item.
    fn scan_episode_titles(&self, _item: &mut VideoItem) {}

    /// Pick source ids out of sidecar file text.
    fn scan_id_from_sidecar(&self, _text: &str, _item: &mut VideoItem) {}
}

/// Reads `<base name>.nfo` (or `movie.nfo`) beside the video and applies
/// the sidecar resolver chain to it.
pub struct SidecarPlugin {
    chain: ResolverChain,
}

impl SidecarPlugin {
    pub fn new() -> Self {
        Self {
            chain: sidecar_chain(),
        }
    }

    pub fn with_chain(chain: ResolverChain) -> Self {
        Self { chain }
    }

    fn candidates(item: &VideoItem) -> [PathBuf; 2] {
        let dir = item.video_dir();
        [
            dir.join(format!("{}.nfo", item.base_name)),
            dir.join("movie.nfo"),
        ]
    }
}

impl Default for SidecarPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataPlugin for SidecarPlugin {
    fn name(&self) -> &str {
        "nfo"
    }

    fn scan(&self, item: &mut VideoItem) -> bool {
        for path in Self::candidates(item) {
            match std::fs::read_to_string(&path) {
                Ok(text) => {
                    log::debug!("Reading sidecar {}", path.display());
                    self.scan_id_from_sidecar(&text, item);
                    return true;
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => log::warn!("Could not read {}: {}", path.display(), e),
            }
        }
        false
    }

    fn scan_id_from_sidecar(&self, text: &str, item: &mut VideoItem) {
        let raw = RawSourceData::new(self.name(), text);
        if self.chain.apply(&raw, item) {
            log::debug!("{}: updated from sidecar", item.base_name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::ArtworkKind;

    #[test]
    fn test_sidecar_plugin_reads_nfo_beside_video() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("Heat.mkv");
        std::fs::write(&video, b"").unwrap();
        std::fs::write(
            dir.path().join("Heat.nfo"),
            "<movie><id>tt0113277</id><thumb>http://x/heat.jpg</thumb></movie>",
        )
        .unwrap();

        let mut item = VideoItem::new(&video, dir.path());
        let plugin = SidecarPlugin::new();
        assert!(plugin.scan(&mut item));
        assert_eq!(item.id("imdb"), Some("tt0113277"));
        assert_eq!(item.get_url(ArtworkKind::Poster), Some("http://x/heat.jpg"));
        assert!(item.is_dirty(ArtworkKind::Poster));
    }

    #[test]
    fn test_sidecar_plugin_without_nfo() {
        let dir = tempfile::tempdir().unwrap();
        let mut item = VideoItem::new(dir.path().join("Heat.mkv"), dir.path());
        assert!(!SidecarPlugin::new().scan(&mut item));
        assert!(item.ids.is_empty());
    }
}
