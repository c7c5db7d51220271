//! The artwork kind table.
//!
//! Every per-kind default (filename token, output format, orientation,
//! target size, well-known local file names) lives in one static table so
//! the rest of the pipeline looks values up instead of branching on kind.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An image asset category produced for each video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtworkKind {
    Poster,
    Fanart,
    Banner,
    WideBanner,
    Thumbnail,
    VideoImage,
    ClearArt,
    ClearLogo,
    TvThumb,
    SeasonThumb,
    MovieDisc,
    MovieArt,
    MovieLogo,
    CharacterArt,
}

/// Expected shape of a candidate image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Taller than wide (posters, thumbnails).
    Portrait,
    /// Wider than tall (fanart, banners).
    Landscape,
    /// No aspect constraint.
    Any,
}

/// Static per-kind defaults.
#[derive(Debug, Clone, Copy)]
pub struct KindSpec {
    pub kind: ArtworkKind,
    /// Lowercase name, used as the property prefix (`poster.width`).
    pub name: &'static str,
    /// CamelCase name, used in `mjb.force{Kind}Overwrite`.
    pub camel: &'static str,
    pub token: &'static str,
    pub format: &'static str,
    pub orientation: Orientation,
    pub width: u32,
    pub height: u32,
    /// Generic local file names searched by the fixed-name strategy.
    pub image_names: &'static [&'static str],
}

#[allow(clippy::too_many_arguments)]
const fn spec(
    kind: ArtworkKind,
    name: &'static str,
    camel: &'static str,
    token: &'static str,
    format: &'static str,
    orientation: Orientation,
    width: u32,
    height: u32,
    image_names: &'static [&'static str],
) -> KindSpec {
    KindSpec {
        kind,
        name,
        camel,
        token,
        format,
        orientation,
        width,
        height,
        image_names,
    }
}

use ArtworkKind::*;
use Orientation::*;

static KIND_TABLE: [KindSpec; 14] = [
    spec(Poster, "poster", "Poster", "", "jpg", Portrait, 400, 600, &["folder", "poster"]),
    spec(Fanart, "fanart", "Fanart", ".fanart", "jpg", Landscape, 1280, 720, &["fanart", "backdrop", "background"]),
    spec(Banner, "banner", "Banner", ".banner", "jpg", Landscape, 758, 140, &["banner"]),
    spec(WideBanner, "widebanner", "WideBanner", ".widebanner", "jpg", Landscape, 1000, 185, &["widebanner"]),
    spec(Thumbnail, "thumbnail", "Thumbnail", ".thumbnail", "jpg", Portrait, 200, 300, &["thumbnail"]),
    spec(VideoImage, "videoimage", "VideoImage", ".videoimage", "jpg", Landscape, 400, 225, &["videoimage"]),
    spec(ClearArt, "clearart", "ClearArt", ".clearart", "png", Any, 500, 281, &["clearart"]),
    spec(ClearLogo, "clearlogo", "ClearLogo", ".clearlogo", "png", Any, 400, 155, &["clearlogo"]),
    spec(TvThumb, "tvthumb", "TvThumb", ".tvthumb", "jpg", Landscape, 500, 281, &["tvthumb"]),
    spec(SeasonThumb, "seasonthumb", "SeasonThumb", ".seasonthumb", "jpg", Any, 500, 281, &["seasonthumb"]),
    spec(MovieDisc, "moviedisc", "MovieDisc", ".moviedisc", "png", Any, 500, 500, &["moviedisc", "disc"]),
    spec(MovieArt, "movieart", "MovieArt", ".movieart", "png", Any, 500, 281, &["movieart"]),
    spec(MovieLogo, "movielogo", "MovieLogo", ".movielogo", "png", Any, 400, 155, &["movielogo"]),
    spec(CharacterArt, "characterart", "CharacterArt", ".characterart", "png", Any, 512, 512, &["characterart"]),
];

impl ArtworkKind {
    pub const ALL: [ArtworkKind; 14] = [
        Poster,
        Fanart,
        Banner,
        WideBanner,
        Thumbnail,
        VideoImage,
        ClearArt,
        ClearLogo,
        TvThumb,
        SeasonThumb,
        MovieDisc,
        MovieArt,
        MovieLogo,
        CharacterArt,
    ];

    /// Table entry for this kind.
    pub fn spec(self) -> &'static KindSpec {
        &KIND_TABLE[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Key of the global force-overwrite flag for this kind.
    pub fn force_overwrite_key(self) -> String {
        format!("mjb.force{}Overwrite", self.spec().camel)
    }
}

impl fmt::Display for ArtworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a kind name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown artwork kind: {0}")]
pub struct KindParseError(pub String);

impl FromStr for ArtworkKind {
    type Err = KindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        KIND_TABLE
            .iter()
            .find(|k| k.name == wanted)
            .map(|k| k.kind)
            .ok_or_else(|| KindParseError(s.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/kind_tests.rs"]
mod tests;
