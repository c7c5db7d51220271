//! Two-root jukebox storage.
//!
//! Generated artwork is written to the temp root only. Publishing to the
//! final root is a separate step; the pipeline only reads the final root
//! to decide whether a file needs regenerating.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use dashmap::DashMap;

use crate::error::StorageError;

/// Concurrent file-existence cache shared by all workers of a batch.
#[derive(Debug, Default)]
pub struct FileCache {
    entries: DashMap<PathBuf, bool>,
}

impl FileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached existence, statting the file on first query.
    pub fn exists(&self, path: &Path) -> bool {
        if let Some(known) = self.entries.get(path) {
            return *known;
        }
        let exists = path.is_file();
        self.entries.insert(path.to_path_buf(), exists);
        exists
    }

    pub fn record(&self, path: &Path, exists: bool) {
        self.entries.insert(path.to_path_buf(), exists);
    }

    /// Mark every file directly inside `dir` as present.
    pub fn prime(&self, dir: &Path) -> usize {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return 0;
        };
        let mut count = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() {
                self.entries.insert(path, true);
                count += 1;
            }
        }
        count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug)]
pub struct JukeboxLayout {
    temp_root: PathBuf,
    final_root: PathBuf,
    cache: FileCache,
}

impl JukeboxLayout {
    /// Create both roots and prime the existence cache from them.
    pub fn new(temp_root: impl Into<PathBuf>, final_root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let temp_root = temp_root.into();
        let final_root = final_root.into();
        for root in [&temp_root, &final_root] {
            std::fs::create_dir_all(root).map_err(|source| StorageError::CreateDir {
                path: root.clone(),
                source,
            })?;
        }

        let cache = FileCache::new();
        let primed = cache.prime(&temp_root) + cache.prime(&final_root);
        log::debug!(
            "Jukebox temp={} final={} ({} existing files)",
            temp_root.display(),
            final_root.display(),
            primed
        );

        Ok(Self {
            temp_root,
            final_root,
            cache,
        })
    }

    pub fn temp_root(&self) -> &Path {
        &self.temp_root
    }

    pub fn final_root(&self) -> &Path {
        &self.final_root
    }

    pub fn temp_path(&self, name: &str) -> PathBuf {
        self.temp_root.join(name)
    }

    pub fn final_path(&self, name: &str) -> PathBuf {
        self.final_root.join(name)
    }

    pub fn exists(&self, path: &Path) -> bool {
        self.cache.exists(path)
    }

    /// True if `a` was modified after `b`. A missing `b` counts as older;
    /// a missing `a` is never newer.
    pub fn is_newer(&self, a: &Path, b: &Path) -> bool {
        match (modified(a), modified(b)) {
            (Some(ma), Some(mb)) => ma > mb,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// Write `<name>.part` in the temp root, then rename it over `name`.
    /// An existing file is never left half-written.
    pub fn write_temp_atomic(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        let path = self.temp_path(name);
        let part = self.temp_path(&format!("{}.part", name));
        let write_err = |source| StorageError::Write {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(&part, bytes).map_err(write_err)?;
        if let Err(e) = std::fs::rename(&part, &path) {
            let _ = std::fs::remove_file(&part);
            return Err(write_err(e));
        }

        self.cache.record(&path, true);
        Ok(path)
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

#[cfg(test)]
#[path = "tests/storage_tests.rs"]
mod tests;
