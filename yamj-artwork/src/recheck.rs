//! Deciding which stored items are searched again.
//!
//! A stored item whose artwork was not found is normally left alone (the
//! "not due" state). The policy here periodically puts such items back in
//! line: items checked longer ago than `mjb.recheck.Days`, and items still
//! missing required artwork once `mjb.recheck.minDays` have passed. At most
//! `mjb.recheck.Max` items are picked per run.

use std::fmt;

use chrono::{DateTime, Local};
use yamj_core::{ArtworkConfig, ArtworkKind, PropertySet, VideoItem, is_valid_value};

/// Why an item was picked for a recheck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecheckReason {
    /// Requested on the command line.
    Forced,
    /// No record of a previous check.
    NeverChecked,
    /// Last checked this many days ago.
    Age(i64),
    MissingTitle,
    MissingArtwork(ArtworkKind),
}

impl fmt::Display for RecheckReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecheckReason::Forced => f.write_str("forced"),
            RecheckReason::NeverChecked => f.write_str("never checked"),
            RecheckReason::Age(days) => write!(f, "last checked {} days ago", days),
            RecheckReason::MissingTitle => f.write_str("missing title"),
            RecheckReason::MissingArtwork(kind) => write!(f, "missing {}", kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecheckPolicy {
    pub enabled: bool,
    /// Recheck anything older than this many days; 0 disables.
    pub days: u32,
    /// Never recheck anything checked within this many days; 0 disables.
    pub min_days: u32,
    /// Most items rechecked in one run.
    pub max: usize,
    /// Recheck items that still lack a title or required artwork.
    pub unknown: bool,
    /// Recheck every stored item, ignoring age and the cap.
    pub force: bool,
}

impl Default for RecheckPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            days: 30,
            min_days: 7,
            max: 50,
            unknown: true,
            force: false,
        }
    }
}

impl RecheckPolicy {
    pub fn from_properties(props: &PropertySet) -> Self {
        let d = Self::default();
        Self {
            enabled: props.get_bool("mjb.recheck.XML", d.enabled),
            days: props.get_u32("mjb.recheck.Days", d.days),
            min_days: props.get_u32("mjb.recheck.minDays", d.min_days),
            max: props.get_u32("mjb.recheck.Max", d.max as u32) as usize,
            unknown: props.get_bool("mjb.recheck.Unknown", d.unknown),
            force: false,
        }
    }

    pub fn forced(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Why `item` should be searched again, if it should. Items already
    /// due this run (new or changed) are never picked.
    pub fn reason(
        &self,
        item: &VideoItem,
        config: &ArtworkConfig,
        kinds: &[ArtworkKind],
        now: DateTime<Local>,
    ) -> Option<RecheckReason> {
        if item.info_dirty || item.recheck {
            return None;
        }
        if self.force {
            return Some(RecheckReason::Forced);
        }
        if !self.enabled {
            return None;
        }

        let Some(age) = item.last_checked.as_deref().and_then(|t| age_in_days(t, now)) else {
            return Some(RecheckReason::NeverChecked);
        };
        if self.min_days > 0 && age <= i64::from(self.min_days) {
            return None;
        }
        if self.days > 0 && age > i64::from(self.days) {
            return Some(RecheckReason::Age(age));
        }

        if !self.unknown {
            return None;
        }
        if !is_valid_value(&item.title) {
            return Some(RecheckReason::MissingTitle);
        }
        kinds
            .iter()
            .copied()
            .find(|&kind| {
                let settings = config.settings(kind);
                let wanted = settings.download_enabled(item.is_tv()) || settings.search_local;
                wanted && !item.has_valid_url(kind)
            })
            .map(RecheckReason::MissingArtwork)
    }

    /// Set `recheck` on the items this policy picks, up to the per-run
    /// cap. Returns how many were picked.
    pub fn apply(
        &self,
        items: &mut [VideoItem],
        config: &ArtworkConfig,
        kinds: &[ArtworkKind],
        now: DateTime<Local>,
    ) -> usize {
        let mut picked = 0;
        for item in items.iter_mut() {
            if !self.force && picked >= self.max {
                log::debug!("Recheck limit of {} reached; the rest wait for a later run", self.max);
                break;
            }
            if let Some(reason) = self.reason(item, config, kinds, now) {
                log::debug!("{}: recheck ({})", item.base_name, reason);
                item.recheck = true;
                picked += 1;
            }
        }
        picked
    }
}

/// Whole days between an RFC 3339 timestamp and `now`.
fn age_in_days(stamp: &str, now: DateTime<Local>) -> Option<i64> {
    let then = DateTime::parse_from_rfc3339(stamp).ok()?;
    Some(now.signed_duration_since(then).num_days())
}

#[cfg(test)]
#[path = "tests/recheck_tests.rs"]
mod tests;
