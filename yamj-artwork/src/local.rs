//! Finding artwork already present beside the video files.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use yamj_core::{ArtworkSettings, VideoItem};

/// One way of naming an existing local image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalStrategy {
    /// `<video base name><token>.<ext>` in the video directory.
    VideoName,
    /// `<folder name><token>.<ext>` in the video directory.
    FolderName,
    /// Generic names (`folder`, `poster`, ...) in the video directory.
    FixedName,
    /// Generic names one level up; set masters only.
    SeriesParent,
    /// Video name, then generic names, inside the artwork subdirectory.
    Subdirectory,
}

impl FromStr for LocalStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "video" => Ok(LocalStrategy::VideoName),
            "folder" => Ok(LocalStrategy::FolderName),
            "fixed" => Ok(LocalStrategy::FixedName),
            "series" => Ok(LocalStrategy::SeriesParent),
            "directory" => Ok(LocalStrategy::Subdirectory),
            other => Err(format!("unknown local artwork strategy '{}'", other)),
        }
    }
}

impl fmt::Display for LocalStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LocalStrategy::VideoName => "video",
            LocalStrategy::FolderName => "folder",
            LocalStrategy::FixedName => "fixed",
            LocalStrategy::SeriesParent => "series",
            LocalStrategy::Subdirectory => "directory",
        };
        f.write_str(name)
    }
}

/// Parse a configured priority list, warning about unknown entries.
pub fn parse_priority(entries: &[String]) -> Vec<LocalStrategy> {
    entries
        .iter()
        .filter_map(|e| match e.parse() {
            Ok(s) => Some(s),
            Err(msg) => {
                log::warn!("Skipping {}", msg);
                None
            }
        })
        .collect()
}

/// File-system artwork lookup. Holds no state; every call reads the disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalArtworkLocator;

impl LocalArtworkLocator {
    pub fn new() -> Self {
        Self
    }

    /// Try the configured strategies in order and return the first hit.
    pub fn locate(&self, item: &VideoItem, settings: &ArtworkSettings) -> Option<PathBuf> {
        self.locate_with(item, settings, &parse_priority(&settings.priority))
    }

    pub fn locate_with(
        &self,
        item: &VideoItem,
        settings: &ArtworkSettings,
        strategies: &[LocalStrategy],
    ) -> Option<PathBuf> {
        for &strategy in strategies {
            if let Some(found) = self.try_strategy(item, settings, strategy) {
                log::debug!("{}: {} found {} by {}", item.base_name, settings.kind, found.display(), strategy);
                return Some(found);
            }
        }
        None
    }

    fn try_strategy(
        &self,
        item: &VideoItem,
        settings: &ArtworkSettings,
        strategy: LocalStrategy,
    ) -> Option<PathBuf> {
        let dir = item.video_dir();
        let exts = &settings.extensions;
        match strategy {
            LocalStrategy::VideoName => {
                let stem = format!("{}{}", item.base_name, settings.token);
                find_with_extensions(dir, &stem, exts)
            }
            LocalStrategy::FolderName => {
                let folder = dir.file_name()?.to_str()?;
                let stem = format!("{}{}", folder, settings.token);
                find_with_extensions(dir, &stem, exts)
            }
            LocalStrategy::FixedName => find_fixed(dir, settings),
            LocalStrategy::SeriesParent => {
                if !item.set_master {
                    return None;
                }
                find_fixed(dir.parent()?, settings)
            }
            LocalStrategy::Subdirectory => {
                if settings.artwork_directory.trim().is_empty() {
                    return None;
                }
                let sub = settings.artwork_directory.trim();
                let stem = format!("{}{}", item.base_name, settings.token);
                [dir.join(sub), item.library_root.join(sub)]
                    .iter()
                    .find_map(|d| find_with_extensions(d, &stem, exts).or_else(|| find_fixed(d, settings)))
            }
        }
    }
}

fn find_fixed(dir: &Path, settings: &ArtworkSettings) -> Option<PathBuf> {
    settings
        .image_names
        .iter()
        .find_map(|name| find_with_extensions(dir, name, &settings.extensions))
}

/// First `<stem>.<ext>` that exists, trying each extension as configured
/// and then upper-cased.
fn find_with_extensions(dir: &Path, stem: &str, extensions: &[String]) -> Option<PathBuf> {
    for ext in extensions {
        let candidate = dir.join(format!("{}.{}", stem, ext));
        if candidate.is_file() {
            return Some(candidate);
        }
        let upper = ext.to_uppercase();
        if upper != *ext {
            let candidate = dir.join(format!("{}.{}", stem, upper));
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

#[cfg(test)]
#[path = "tests/local_tests.rs"]
mod tests;
