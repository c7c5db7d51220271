//! Persisted item state between runs.
//!
//! The state file keeps what a scan of the library cannot rediscover:
//! artwork URLs and filenames, dirty markers, source ids and resolved
//! titles. It lives in the final root as `yamj_state.json`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use yamj_core::VideoItem;

use crate::error::StateError;

pub const STATE_FILE: &str = "yamj_state.json";

const STATE_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryState {
    pub version: u32,
    #[serde(default)]
    pub saved_at: Option<String>,
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

impl LibraryState {
    pub fn path(final_root: &Path) -> PathBuf {
        final_root.join(STATE_FILE)
    }

    /// Load the state file, or an empty state if there is none yet.
    pub fn load(final_root: &Path) -> Result<Self, StateError> {
        let path = Self::path(final_root);
        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        let state: Self = serde_json::from_str(&contents).map_err(|source| StateError::Json { path: path.clone(), source })?;
        log::debug!("Loaded {} items from {}", state.items.len(), path.display());
        Ok(state)
    }

    /// Snapshot items after a run, with their change markers cleared.
    /// Items that were due for a search this run get a fresh
    /// `last_checked` stamp.
    pub fn from_items(items: &[VideoItem]) -> Self {
        let now = chrono::Local::now().to_rfc3339();
        let items = items
            .iter()
            .cloned()
            .map(|mut item| {
                if item.info_dirty || item.recheck || item.last_checked.is_none() {
                    item.last_checked = Some(now.clone());
                }
                item.mark_clean();
                item
            })
            .collect();
        Self {
            version: STATE_VERSION,
            saved_at: Some(now),
            items,
        }
    }

    /// Write atomically (temp file + rename).
    pub fn save(&self, final_root: &Path) -> Result<(), StateError> {
        std::fs::create_dir_all(final_root)?;
        let path = Self::path(final_root);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self).map_err(|source| StateError::Json {
            path: path.clone(),
            source,
        })?;
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &path)?;
        log::debug!("Saved {} items to {}", self.items.len(), path.display());
        Ok(())
    }

    /// Carry stored state into freshly scanned items, matched by video
    /// path and base name. Returns how many items were matched.
    pub fn merge_into(&self, items: &mut [VideoItem]) -> usize {
        let stored: HashMap<(&Path, &str), &VideoItem> = self
            .items
            .iter()
            .map(|i| ((i.video_path.as_path(), i.base_name.as_str()), i))
            .collect();

        let mut matched = 0;
        for item in items.iter_mut() {
            let Some(old) = stored.get(&(item.video_path.as_path(), item.base_name.as_str())) else {
                continue;
            };
            matched += 1;

            item.title = old.title.clone();
            item.original_title = old.original_title.clone().or(item.original_title.take());
            item.year = old.year.or(item.year);
            for (source, id) in &old.ids {
                item.ids.entry(source.clone()).or_insert_with(|| id.clone());
            }
            for (kind, slot) in &old.artwork {
                item.artwork.entry(*kind).or_insert_with(|| slot.clone());
            }
            item.info_dirty = old.info_dirty;
            item.last_checked = old.last_checked.clone();
            item.recheck = item.recheck || old.recheck;
        }
        matched
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
