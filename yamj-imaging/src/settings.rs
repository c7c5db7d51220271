use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use yamj_core::{ArtworkKind, ArtworkSettings, PropertySet, ResolutionTier};

use crate::ImagingError;

/// How the decoded image is brought to the target size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeMode {
    /// Scale to the target width, bottom-aligned on a target-sized canvas.
    #[default]
    Fit,
    /// Cover the target box, then center-crop.
    Normalize,
    /// Ignore the aspect ratio.
    Stretch,
    /// Scale to the target width only; height follows the source aspect.
    BestFit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerspectiveDirection {
    Left,
    #[default]
    Right,
}

impl PerspectiveDirection {
    fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("left") {
            PerspectiveDirection::Left
        } else {
            PerspectiveDirection::Right
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlignment {
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "center" => TextAlignment::Center,
            "right" => TextAlignment::Right,
            _ => TextAlignment::Left,
        }
    }
}

/// Which item property picks the overlay image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlaySource {
    #[default]
    Default,
    VideoSource,
    Certification,
    Container,
}

impl OverlaySource {
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "videosource" => OverlaySource::VideoSource,
            "certification" => OverlaySource::Certification,
            "container" => OverlaySource::Container,
            _ => OverlaySource::Default,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionConfig {
    pub enabled: bool,
    /// Height of the mirrored band as a percentage of the image height.
    pub height: f32,
    pub start: f32,
    pub end: f32,
    pub opacity_start: f32,
    pub opacity_end: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerspectiveConfig {
    pub enabled: bool,
    pub direction: PerspectiveDirection,
    /// Percent of the height the far edge shrinks at the top.
    pub top: f32,
    pub bottom: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextConfig {
    pub title: bool,
    pub season: bool,
    pub set_size: bool,
    pub alignment: TextAlignment,
    pub font: Option<PathBuf>,
    pub font_size: f32,
    pub font_color: [u8; 3],
    pub font_shadow: [u8; 3],
    pub offset: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    pub enabled: bool,
    pub source: OverlaySource,
    pub offset_x: i32,
    pub offset_y: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameConfig {
    pub enabled: bool,
    pub size: u32,
    pub color_sd: [u8; 3],
    pub color_hd: [u8; 3],
    pub color_720: [u8; 3],
    pub color_1080: [u8; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeConfig {
    pub hd: bool,
    pub tv: bool,
    pub subtitle: bool,
    pub language: bool,
    pub set: bool,
}

/// Transform settings for one artwork kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSettings {
    pub kind: ArtworkKind,
    pub width: u32,
    pub height: u32,
    pub resize: ResizeMode,
    pub text: TextConfig,
    pub overlay: OverlayConfig,
    pub frame: FrameConfig,
    pub round_corners: bool,
    pub corner_radius: u32,
    pub badges: BadgeConfig,
    pub reflection: ReflectionConfig,
    pub perspective: PerspectiveConfig,
    pub highdef_differentiate: bool,
    /// `<skin>/resources`
    pub resources: PathBuf,
}

impl ImageSettings {
    /// Read `{kind}.*` image keys. Sizes come from the resolved artwork
    /// settings so both sides agree on the target.
    pub fn from_properties(
        artwork: &ArtworkSettings,
        props: &PropertySet,
        skin_dir: &Path,
        highdef_differentiate: bool,
    ) -> Self {
        let name = artwork.kind.name();
        let key = |suffix: &str| format!("{}.{}", name, suffix);
        let flag = |suffix: &str| props.get_bool(&key(suffix), false);

        let resize = if flag("normalize") {
            ResizeMode::Normalize
        } else if flag("stretch") {
            ResizeMode::Stretch
        } else if flag("bestFit") {
            ResizeMode::BestFit
        } else {
            ResizeMode::Fit
        };

        let color = |suffix: &str, default: &str| {
            let value = props.get_or(&key(suffix), default);
            parse_color(&value).unwrap_or_else(|e| {
                log::warn!("{}: {}", key(suffix), e);
                parse_color(default).unwrap_or([255, 255, 255])
            })
        };

        Self {
            kind: artwork.kind,
            width: artwork.width,
            height: artwork.height,
            resize,
            text: TextConfig {
                title: flag("addText.title"),
                season: flag("addText.season"),
                set_size: flag("addText.setSize"),
                alignment: TextAlignment::parse(&props.get_or(&key("addText.alignment"), "left")),
                font: props
                    .get(&key("addText.font"))
                    .filter(|f| !f.trim().is_empty())
                    .map(|f| skin_dir.join(f.trim())),
                font_size: props.get_f32(&key("addText.fontSize"), 36.0),
                font_color: color("addText.fontColor", "LIGHT_GRAY"),
                font_shadow: color("addText.fontShadow", "DARK_GRAY"),
                offset: props.get_u32(&key("addText.offset"), 10),
            },
            overlay: OverlayConfig {
                enabled: flag("overlay"),
                source: OverlaySource::parse(&props.get_or(&key("overlay.source"), "default")),
                offset_x: props.get_i32(&key("overlay.offsetX"), 0),
                offset_y: props.get_i32(&key("overlay.offsetY"), 0),
            },
            frame: FrameConfig {
                enabled: flag("addFrame"),
                size: props.get_u32(&key("frame.size"), 5),
                color_sd: color("frame.colorSD", "255/255/255"),
                color_hd: color("frame.colorHD", "255/255/255"),
                color_720: color("frame.color720", "255/255/255"),
                color_1080: color("frame.color1080", "255/255/255"),
            },
            round_corners: flag("roundCorners"),
            corner_radius: props.get_u32(&key("cornerRadius"), 25),
            badges: BadgeConfig {
                hd: flag("logoHD"),
                tv: flag("logoTV"),
                subtitle: flag("logoSubTitle"),
                language: flag("language"),
                set: flag("logoSet"),
            },
            reflection: ReflectionConfig {
                enabled: flag("reflection"),
                height: props.get_f32(&key("reflectionHeight"), 12.5),
                start: props.get_f32(&key("reflectionStart"), 0.0),
                end: props.get_f32(&key("reflectionEnd"), 100.0),
                opacity_start: props.get_f32(&key("opacityStart"), 30.0),
                opacity_end: props.get_f32(&key("opacityEnd"), 100.0),
            },
            perspective: PerspectiveConfig {
                enabled: flag("perspective"),
                direction: PerspectiveDirection::parse(&props.get_or(&key("perspectiveDirection"), "right")),
                top: props.get_f32(&key("perspectiveTop"), 3.0),
                bottom: props.get_f32(&key("perspectiveBottom"), 3.0),
            },
            highdef_differentiate,
            resources: skin_dir.join("resources"),
        }
    }

    /// Frame color for an item's resolution tier.
    pub fn frame_color(&self, tier: ResolutionTier) -> [u8; 3] {
        match tier {
            ResolutionTier::Sd => self.frame.color_sd,
            _ if !self.highdef_differentiate => self.frame.color_hd,
            ResolutionTier::Hd720 => self.frame.color_720,
            ResolutionTier::Hd1080 => self.frame.color_1080,
        }
    }

    pub fn resource(&self, name: &str) -> PathBuf {
        self.resources.join(name)
    }

    /// YAML dump, used by `yamj kinds --verbose`.
    pub fn to_yaml(&self) -> Result<String, ImagingError> {
        serde_yml::to_string(self).map_err(|e| ImagingError::InvalidSettings(e.to_string()))
    }
}

/// Parse `r/g/b` or a named color (`LIGHT_GRAY`, `white`, ...).
pub fn parse_color(value: &str) -> Result<[u8; 3], String> {
    let value = value.trim();
    if value.contains('/') {
        let parts: Vec<u8> = value
            .split('/')
            .map(|p| p.trim().parse::<u8>().map_err(|_| format!("bad color component '{}'", p)))
            .collect::<Result<_, _>>()?;
        return match parts.as_slice() {
            [r, g, b] => Ok([*r, *g, *b]),
            _ => Err(format!("color '{}' needs three components", value)),
        };
    }

    let rgb = match value.to_uppercase().replace(['-', ' '], "_").as_str() {
        "WHITE" => [255, 255, 255],
        "LIGHT_GRAY" | "LIGHTGRAY" => [192, 192, 192],
        "GRAY" => [128, 128, 128],
        "DARK_GRAY" | "DARKGRAY" => [64, 64, 64],
        "BLACK" => [0, 0, 0],
        "RED" => [255, 0, 0],
        "PINK" => [255, 175, 175],
        "ORANGE" => [255, 200, 0],
        "YELLOW" => [255, 255, 0],
        "GREEN" => [0, 255, 0],
        "MAGENTA" => [255, 0, 255],
        "CYAN" => [0, 255, 255],
        "BLUE" => [0, 0, 255],
        _ => return Err(format!("unknown color '{}'", value)),
    };
    Ok(rgb)
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
