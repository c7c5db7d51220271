//! Size and aspect checks for candidate artwork.

use std::sync::Arc;

use yamj_core::{ArtworkSettings, Orientation};

use crate::fetch::{ArtworkLocation, ResourceFetcher};

/// Why a candidate was turned down. Not an error: the next source is tried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("dimensions unreadable: {0}")]
    Unreadable(String),

    #[error("{width}x{height} has the wrong orientation")]
    WrongOrientation { width: u32, height: u32 },

    #[error("width {width} below minimum {min}")]
    TooNarrow { width: u32, min: u32 },

    #[error("height {height} below minimum {min}")]
    TooShort { height: u32, min: u32 },
}

/// Target size and tolerances for one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizePolicy {
    pub width: u32,
    pub height: u32,
    pub match_percent: u32,
    pub enforce_aspect: bool,
    pub orientation: Orientation,
}

impl SizePolicy {
    pub fn from_settings(settings: &ArtworkSettings) -> Self {
        Self {
            width: settings.width,
            height: settings.height,
            match_percent: settings.validate_match,
            enforce_aspect: settings.validate_aspect,
            orientation: settings.orientation,
        }
    }

    /// Smallest acceptable `(width, height)`.
    pub fn thresholds(&self) -> (u32, u32) {
        let scale = |v: u32| (u64::from(v) * u64::from(self.match_percent) / 100).min(u64::from(u32::MAX)) as u32;
        (scale(self.width), scale(self.height))
    }
}

/// Check candidate dimensions: width, then height, then orientation.
/// A candidate exactly at a threshold passes.
pub fn check_dimensions(width: u32, height: u32, policy: &SizePolicy) -> Result<(), Rejection> {
    let (min_w, min_h) = policy.thresholds();
    if width < min_w {
        return Err(Rejection::TooNarrow { width, min: min_w });
    }
    if height < min_h {
        return Err(Rejection::TooShort { height, min: min_h });
    }
    if policy.enforce_aspect {
        let wrong = match policy.orientation {
            Orientation::Portrait => width > height,
            Orientation::Landscape => height > width,
            Orientation::Any => false,
        };
        if wrong {
            return Err(Rejection::WrongOrientation { width, height });
        }
    }
    Ok(())
}

/// Header-only validation of candidate images.
#[derive(Clone)]
pub struct Validator {
    fetcher: Arc<dyn ResourceFetcher>,
}

impl Validator {
    pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn validate(&self, location: &ArtworkLocation, settings: &ArtworkSettings) -> Result<(), Rejection> {
        if !settings.validate {
            return Ok(());
        }

        let result = match self.fetcher.read_dimensions(location).await {
            Ok((w, h)) => check_dimensions(w, h, &SizePolicy::from_settings(settings)),
            Err(e) => Err(Rejection::Unreadable(e.to_string())),
        };
        if let Err(rejection) = &result {
            log::debug!("{}: rejected {}: {}", settings.kind, location, rejection);
        }
        result
    }
}

#[cfg(test)]
#[path = "tests/validate_tests.rs"]
mod tests;
