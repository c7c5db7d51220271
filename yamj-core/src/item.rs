//! The scanned video record and its per-kind artwork slots.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::kind::ArtworkKind;

/// Placeholder written by metadata sources for "no value".
pub const UNKNOWN: &str = "UNKNOWN";

/// True if `value` is non-blank and not the `UNKNOWN` placeholder.
pub fn is_valid_value(value: &str) -> bool {
    let v = value.trim();
    !v.is_empty() && !v.eq_ignore_ascii_case(UNKNOWN)
}

fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect()
}

/// Movie or TV content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoType {
    #[default]
    Movie,
    TvShow,
}

/// Resolution tier, used for frame colors and HD badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResolutionTier {
    #[default]
    Sd,
    Hd720,
    Hd1080,
}

impl ResolutionTier {
    pub fn is_hd(self) -> bool {
        !matches!(self, ResolutionTier::Sd)
    }
}

/// A percentage sub-rectangle (`x, y, width, height`, each 0-100) of a
/// source image to keep before resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl FromStr for CropRegion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<u32> = s
            .split([',', ' '])
            .filter(|p| !p.is_empty())
            .map(|p| p.parse::<u32>().map_err(|e| format!("bad crop value '{}': {}", p, e)))
            .collect::<Result<_, _>>()?;
        match parts.as_slice() {
            [x, y, width, height] if x + width <= 100 && y + height <= 100 => Ok(Self {
                x: *x,
                y: *y,
                width: *width,
                height: *height,
            }),
            [_, _, _, _] => Err(format!("crop region '{}' exceeds 100%", s)),
            _ => Err(format!("crop region '{}' needs four values", s)),
        }
    }
}

/// URL, generated filename and dirty marker for one artwork kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtworkSlot {
    pub url: Option<String>,
    pub filename: Option<String>,
    #[serde(default)]
    pub dirty: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop: Option<CropRegion>,
}

/// One scanned movie, or a TV season aggregate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoItem {
    /// Video file name without extension; the stem of every generated file.
    pub base_name: String,
    /// Stem for generated files when the base name is shared with another
    /// item in the library.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jukebox_name: Option<String>,
    pub video_path: PathBuf,
    pub library_root: PathBuf,
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub season: Option<u32>,
    #[serde(default)]
    pub video_type: VideoType,
    /// Series root record; its artwork is searched one level up.
    #[serde(default)]
    pub set_master: bool,
    #[serde(default)]
    pub set_size: u32,
    /// Source name to source-specific id.
    #[serde(default)]
    pub ids: BTreeMap<String, String>,
    /// Online artwork lookups are allowed only when set.
    #[serde(default)]
    pub scrape_library: bool,
    /// Set on new items and whenever metadata changed in this pass.
    #[serde(default)]
    pub info_dirty: bool,
    /// Search again this run although nothing changed.
    #[serde(default)]
    pub recheck: bool,
    /// RFC 3339 time of the last run that searched this item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<String>,
    #[serde(default)]
    pub artwork: BTreeMap<ArtworkKind, ArtworkSlot>,
    #[serde(default)]
    pub resolution: ResolutionTier,
    #[serde(default)]
    pub subtitles: bool,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub video_source: Option<String>,
    #[serde(default)]
    pub certification: Option<String>,
    #[serde(default)]
    pub container: Option<String>,
}

impl VideoItem {
    /// A freshly scanned item. New items start with `info_dirty` set.
    pub fn new(video_path: impl Into<PathBuf>, library_root: impl Into<PathBuf>) -> Self {
        let video_path = video_path.into();
        let base_name = video_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        Self {
            title: base_name.clone(),
            base_name,
            video_path,
            library_root: library_root.into(),
            info_dirty: true,
            ..Default::default()
        }
    }

    pub fn is_tv(&self) -> bool {
        self.video_type == VideoType::TvShow
    }

    /// Directory containing the video file.
    pub fn video_dir(&self) -> &Path {
        self.video_path.parent().unwrap_or(Path::new("."))
    }

    pub fn id(&self, source: &str) -> Option<&str> {
        self.ids.get(source).map(String::as_str)
    }

    pub fn set_id(&mut self, source: &str, id: impl Into<String>) {
        self.ids.insert(source.to_lowercase(), id.into());
    }

    /// True when any source id is the `0`/`-1` "not on this site" marker.
    pub fn has_blocked_id(&self) -> bool {
        self.ids.values().any(|id| id == "0" || id == "-1")
    }

    /// Base name with characters invalid in file names replaced by `_`.
    pub fn sanitized_base_name(&self) -> String {
        sanitize_file_name(&self.base_name)
    }

    /// Sanitized stem of every file generated for this item.
    pub fn jukebox_stem(&self) -> String {
        sanitize_file_name(self.jukebox_name.as_deref().unwrap_or(&self.base_name))
    }

    pub fn slot(&self, kind: ArtworkKind) -> Option<&ArtworkSlot> {
        self.artwork.get(&kind)
    }

    fn slot_mut(&mut self, kind: ArtworkKind) -> &mut ArtworkSlot {
        self.artwork.entry(kind).or_default()
    }

    pub fn get_url(&self, kind: ArtworkKind) -> Option<&str> {
        self.slot(kind).and_then(|s| s.url.as_deref())
    }

    pub fn set_url(&mut self, kind: ArtworkKind, url: Option<String>) {
        self.slot_mut(kind).url = url;
    }

    pub fn get_filename(&self, kind: ArtworkKind) -> Option<&str> {
        self.slot(kind).and_then(|s| s.filename.as_deref())
    }

    pub fn set_filename(&mut self, kind: ArtworkKind, filename: Option<String>) {
        self.slot_mut(kind).filename = filename;
    }

    pub fn is_dirty(&self, kind: ArtworkKind) -> bool {
        self.slot(kind).is_some_and(|s| s.dirty)
    }

    pub fn set_dirty(&mut self, kind: ArtworkKind, dirty: bool) {
        self.slot_mut(kind).dirty = dirty;
    }

    pub fn crop(&self, kind: ArtworkKind) -> Option<CropRegion> {
        self.slot(kind).and_then(|s| s.crop)
    }

    pub fn set_crop(&mut self, kind: ArtworkKind, crop: Option<CropRegion>) {
        self.slot_mut(kind).crop = crop;
    }

    /// True if the stored URL for `kind` is a usable value.
    pub fn has_valid_url(&self, kind: ArtworkKind) -> bool {
        self.get_url(kind).is_some_and(is_valid_value)
    }

    /// Set URL and filename together.
    pub fn set_artwork(&mut self, kind: ArtworkKind, url: String, filename: String) {
        let slot = self.slot_mut(kind);
        slot.url = Some(url);
        slot.filename = Some(filename);
    }

    /// Clear URL and filename together. The dirty flag is left alone.
    pub fn clear_artwork(&mut self, kind: ArtworkKind) {
        let slot = self.slot_mut(kind);
        slot.url = None;
        slot.filename = None;
    }

    /// Reset the item-level change markers once a pass has been persisted.
    pub fn mark_clean(&mut self) {
        self.info_dirty = false;
        self.recheck = false;
    }
}

#[cfg(test)]
#[path = "tests/item_tests.rs"]
mod tests;
