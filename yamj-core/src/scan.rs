//! Directory scanner for video libraries.
//!
//! Walks a library root, turns each video file into a [`VideoItem`] and
//! folds TV episodes into one item per series season. A set master item is
//! added for every series so series-wide artwork has an owner.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::item::{ResolutionTier, VideoItem, VideoType};

/// Extensions treated as video files when none are configured.
pub const DEFAULT_VIDEO_EXTENSIONS: &[&str] = &["mkv", "avi", "mp4", "m4v", "ts", "iso", "mov", "wmv"];

static EPISODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?P<title>.*?)[ ._\-]*S(?P<season>\d{1,2})E(?P<episode>\d{1,3})").expect("static pattern"));

static SEASON_DIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^season[ ._\-]*(?P<season>\d{1,2})$").expect("static pattern"));

static TITLE_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<title>.+?)[ ._\-]*[\(\[]?(?P<year>(?:19|20)\d{2})[\)\]]?(?:[ ._\-]|$)").expect("static pattern")
});

/// Build the extension set from a list of names.
pub fn extension_set(extensions: &[&str]) -> HashSet<String> {
    extensions.iter().map(|e| e.to_lowercase()).collect()
}

/// Scan a library root and return one item per movie, one per TV season
/// and one set master per TV series.
pub fn scan_library(root: &Path, extensions: &HashSet<String>) -> std::io::Result<Vec<VideoItem>> {
    let mut files = Vec::new();
    collect_video_files(root, extensions, &mut files)?;

    let mut items = Vec::new();
    // (series dir, title, season) -> season item
    let mut seasons: BTreeMap<(PathBuf, String, u32), VideoItem> = BTreeMap::new();

    for path in files {
        let mut item = VideoItem::new(&path, root);
        item.resolution = resolution_from_name(&item.base_name);

        match detect_episode(&path) {
            Some((title, season)) => {
                let series_dir = series_dir(&path, season);
                let key = (series_dir, title.clone(), season);
                // First episode (sorted) names the season item.
                if !seasons.contains_key(&key) {
                    item.title = title;
                    item.season = Some(season);
                    item.video_type = VideoType::TvShow;
                    seasons.insert(key, item);
                }
            }
            None => {
                let (title, year) = parse_title_year(&item.base_name);
                item.title = title;
                item.year = year;
                items.push(item);
            }
        }
    }

    let masters = series_masters(&seasons, root);
    log::debug!(
        "Scanned {}: {} movies, {} seasons, {} series",
        root.display(),
        items.len(),
        seasons.len(),
        masters.len()
    );

    items.extend(seasons.into_values());
    items.extend(masters);
    let renamed = assign_jukebox_names(&mut items);
    if renamed > 0 {
        log::debug!("{} items share a base name with an earlier item; suffixed", renamed);
    }
    Ok(items)
}

/// Give every item a distinct jukebox stem. The first item keeps its own;
/// later items with the same stem (compared case-insensitively) get `_2`,
/// `_3`, ... appended. Returns how many items were renamed.
pub fn assign_jukebox_names(items: &mut [VideoItem]) -> usize {
    let mut taken: HashSet<String> = HashSet::with_capacity(items.len());
    let mut renamed = 0;
    for item in items.iter_mut() {
        let stem = item.jukebox_stem();
        if taken.insert(stem.to_lowercase()) {
            continue;
        }
        let unique = (2..)
            .map(|n| format!("{}_{}", stem, n))
            .find(|candidate| !taken.contains(&candidate.to_lowercase()))
            .unwrap_or_default();
        taken.insert(unique.to_lowercase());
        item.jukebox_name = Some(unique);
        renamed += 1;
    }
    renamed
}

/// One set master per series, sized by the number of seasons found.
fn series_masters(
    seasons: &BTreeMap<(PathBuf, String, u32), VideoItem>,
    root: &Path,
) -> Vec<VideoItem> {
    // (series dir, title) -> seasons, in order
    let mut series: BTreeMap<(&Path, &str), Vec<&VideoItem>> = BTreeMap::new();
    for ((dir, title, _), item) in seasons {
        series.entry((dir.as_path(), title.as_str())).or_default().push(item);
    }

    series
        .into_iter()
        .map(|((_, title), members)| {
            let first = members[0];
            let mut master = VideoItem::new(&first.video_path, root);
            master.base_name = format!("Set_{}_1", title.replace(' ', "_"));
            master.title = title.to_string();
            master.video_type = VideoType::TvShow;
            master.set_master = true;
            master.set_size = members.len() as u32;
            master.resolution = first.resolution;
            master
        })
        .collect()
}

fn collect_video_files(
    dir: &Path,
    extensions: &HashSet<String>,
    out: &mut Vec<PathBuf>,
) -> std::io::Result<()> {
    let mut entries: Vec<std::fs::DirEntry> = std::fs::read_dir(dir)?.flatten().collect();
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        if hidden {
            continue;
        }
        if path.is_dir() {
            if let Err(e) = collect_video_files(&path, extensions, out) {
                log::warn!("Skipping unreadable directory {}: {}", path.display(), e);
            }
        } else if has_matching_extension(&path, extensions) {
            out.push(path);
        }
    }
    Ok(())
}

/// Check if a path has an extension in the allowed set.
fn has_matching_extension(path: &Path, extensions: &HashSet<String>) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.contains(&e.to_lowercase()))
        .unwrap_or(false)
}

/// Series title and season for an episode file, from `SxxEyy` in the
/// name or a `Season N` parent folder.
fn detect_episode(path: &Path) -> Option<(String, u32)> {
    let stem = path.file_stem()?.to_str()?;
    if let Some(caps) = EPISODE_RE.captures(stem) {
        let season = caps["season"].parse().ok()?;
        let mut title = clean_title(&caps["title"]);
        if title.is_empty() {
            title = parent_series_name(path, season)?;
        }
        return Some((title, season));
    }

    let parent = path.parent()?.file_name()?.to_str()?;
    let caps = SEASON_DIR_RE.captures(parent)?;
    let season = caps["season"].parse().ok()?;
    Some((parent_series_name(path, season)?, season))
}

/// Name of the series folder above a `Season N` folder.
fn parent_series_name(path: &Path, season: u32) -> Option<String> {
    let dir = series_dir(path, season);
    dir.file_name()
        .and_then(|n| n.to_str())
        .map(clean_title)
        .filter(|t| !t.is_empty())
}

/// The series root: the grandparent when the file sits in a `Season N`
/// folder, otherwise the file's own directory.
fn series_dir(path: &Path, season: u32) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new("."));
    let in_season_dir = parent
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| SEASON_DIR_RE.captures(n))
        .and_then(|c| c["season"].parse::<u32>().ok())
        .is_some_and(|s| s == season);
    if in_season_dir {
        parent.parent().unwrap_or(parent).to_path_buf()
    } else {
        parent.to_path_buf()
    }
}

/// Split `Title (2010)` or `Title.2010.1080p` into title and year.
pub fn parse_title_year(base_name: &str) -> (String, Option<u16>) {
    match TITLE_YEAR_RE.captures(base_name) {
        Some(caps) => (clean_title(&caps["title"]), caps["year"].parse().ok()),
        None => (clean_title(base_name), None),
    }
}

fn clean_title(raw: &str) -> String {
    raw.replace(['.', '_'], " ")
        .trim_matches(|c: char| c.is_whitespace() || c == '-')
        .to_string()
}

pub fn resolution_from_name(name: &str) -> ResolutionTier {
    let lower = name.to_lowercase();
    if lower.contains("1080") {
        ResolutionTier::Hd1080
    } else if lower.contains("720") {
        ResolutionTier::Hd720
    } else {
        ResolutionTier::Sd
    }
}

#[cfg(test)]
#[path = "tests/scan_tests.rs"]
mod tests;
