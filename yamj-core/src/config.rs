//! Property-based configuration.
//!
//! Configuration is a flat map of dotted keys (`fanart.scanner.Validate`).
//! It can be loaded from `.properties`, `.toml` or `.yaml` files; nested
//! tables in the structured formats are flattened into dotted keys. Typed
//! per-kind settings are resolved once from the map at startup.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::kind::{ArtworkKind, Orientation};

/// Characters that separate entries of a list-valued property.
pub const LIST_SPLITTER: &[char] = &[',', ';', '|'];

/// Default local search strategy order.
pub const DEFAULT_ARTWORK_PRIORITY: &str = "video,folder,fixed,series,directory";

/// Default extensions tried by the local locator.
pub const DEFAULT_ARTWORK_EXTENSIONS: &str = "jpg,png,gif";

/// Kinds a batch processes when none are configured.
pub const DEFAULT_BATCH_KINDS: &str = "poster,fanart,banner,videoimage";

/// Default config file path: `~/.config/yamj/yamj.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("yamj").join("yamj.toml"))
}

/// A flat string map of configuration properties.
#[derive(Debug, Clone, Default)]
pub struct PropertySet {
    values: BTreeMap<String, String>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a single file, choosing the parser by extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "properties" => Ok(Self::parse_properties(&contents)),
            "toml" => Self::parse_toml(&contents).map_err(|message| ConfigError::Toml {
                path: path.to_path_buf(),
                message,
            }),
            "yaml" | "yml" => Self::parse_yaml(&contents).map_err(|message| ConfigError::Yaml {
                path: path.to_path_buf(),
                message,
            }),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Load several files in order; later files override earlier ones.
    pub fn load_all(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        let mut props = Self::new();
        for path in paths {
            log::debug!("Loading properties from {}", path.display());
            props.merge(Self::load(path)?);
        }
        Ok(props)
    }

    /// Parse Java-style `key=value` lines. `#` and `!` start comments.
    pub fn parse_properties(contents: &str) -> Self {
        let mut props = Self::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let Some(split) = line.find(['=', ':']) else {
                props.set(line, "");
                continue;
            };
            let (key, value) = line.split_at(split);
            props.set(key.trim(), value[1..].trim());
        }
        props
    }

    pub fn parse_toml(contents: &str) -> Result<Self, String> {
        let doc: toml::Value = contents.parse().map_err(|e: toml::de::Error| e.to_string())?;
        let mut props = Self::new();
        flatten_toml("", &doc, &mut props);
        Ok(props)
    }

    pub fn parse_yaml(contents: &str) -> Result<Self, String> {
        let doc: serde_yml::Value = serde_yml::from_str(contents).map_err(|e| e.to_string())?;
        let mut props = Self::new();
        flatten_yaml("", &doc, &mut props);
        Ok(props)
    }

    pub fn merge(&mut self, other: PropertySet) {
        self.values.extend(other.values);
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    /// Only a literal `true` (any case) is true.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(v) => v.trim().eq_ignore_ascii_case("true"),
            None => default,
        }
    }

    pub fn get_u32(&self, key: &str, default: u32) -> u32 {
        self.get_parsed(key, default)
    }

    pub fn get_i32(&self, key: &str, default: i32) -> i32 {
        self.get_parsed(key, default)
    }

    pub fn get_f32(&self, key: &str, default: f32) -> f32 {
        self.get_parsed(key, default)
    }

    fn get_parsed<T: std::str::FromStr + Copy>(&self, key: &str, default: T) -> T {
        match self.get(key) {
            Some(v) => v.trim().parse().unwrap_or_else(|_| {
                log::warn!("Invalid value '{}' for {}, using default", v, key);
                default
            }),
            None => default,
        }
    }

    /// Split a list property on `,`, `;` or `|`, dropping blank entries.
    pub fn get_list(&self, key: &str, default: &str) -> Vec<String> {
        split_list(self.get(key).unwrap_or(default))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// All properties whose key starts with `prefix`.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.iter().filter(move |(k, _)| k.starts_with(prefix))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Split a list value on `,`, `;` or `|`, trimming and dropping blanks.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(LIST_SPLITTER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn flatten_toml(prefix: &str, value: &toml::Value, out: &mut PropertySet) {
    match value {
        toml::Value::Table(table) => {
            for (k, v) in table {
                flatten_toml(&join_key(prefix, k), v, out);
            }
        }
        toml::Value::Array(items) => {
            let joined: Vec<String> = items.iter().map(toml_scalar).collect();
            out.set(prefix, joined.join(","));
        }
        other => out.set(prefix, toml_scalar(other)),
    }
}

fn toml_scalar(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn flatten_yaml(prefix: &str, value: &serde_yml::Value, out: &mut PropertySet) {
    match value {
        serde_yml::Value::Mapping(map) => {
            for (k, v) in map {
                let key = yaml_scalar(k);
                flatten_yaml(&join_key(prefix, &key), v, out);
            }
        }
        serde_yml::Value::Sequence(items) => {
            let joined: Vec<String> = items.iter().map(yaml_scalar).collect();
            out.set(prefix, joined.join(","));
        }
        serde_yml::Value::Null => out.set(prefix, ""),
        other => out.set(prefix, yaml_scalar(other)),
    }
}

fn yaml_scalar(value: &serde_yml::Value) -> String {
    match value {
        serde_yml::Value::String(s) => s.clone(),
        serde_yml::Value::Bool(b) => b.to_string(),
        serde_yml::Value::Number(n) => n.to_string(),
        serde_yml::Value::Null => String::new(),
        other => serde_yml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

/// Resolved settings for one artwork kind.
#[derive(Debug, Clone)]
pub struct ArtworkSettings {
    pub kind: ArtworkKind,
    /// `{kind}.scanner.searchForExistingArtwork`
    pub search_local: bool,
    /// `{kind}.movie.download`
    pub movie_download: bool,
    /// `{kind}.tv.download`
    pub tv_download: bool,
    pub extensions: Vec<String>,
    pub token: String,
    pub format: String,
    pub validate: bool,
    /// Percentage of the target size a candidate must reach, 0-100.
    pub validate_match: u32,
    pub validate_aspect: bool,
    pub artwork_directory: String,
    /// Local strategy names in priority order.
    pub priority: Vec<String>,
    /// Generic names for the fixed-name strategy.
    pub image_names: Vec<String>,
    pub search_priority_movie: Vec<String>,
    pub search_priority_tv: Vec<String>,
    pub width: u32,
    pub height: u32,
    pub orientation: Orientation,
    /// `mjb.force{Kind}Overwrite`
    pub force_overwrite: bool,
}

impl ArtworkSettings {
    pub fn from_properties(kind: ArtworkKind, props: &PropertySet) -> Self {
        let spec = kind.spec();
        let key = |suffix: &str| format!("{}.{}", spec.name, suffix);
        let default_names = spec.image_names.join(",");

        Self {
            kind,
            search_local: props.get_bool(&key("scanner.searchForExistingArtwork"), true),
            movie_download: props.get_bool(&key("movie.download"), true),
            tv_download: props.get_bool(&key("tv.download"), true),
            extensions: props.get_list(&key("scanner.artworkExtensions"), DEFAULT_ARTWORK_EXTENSIONS),
            token: props.get_or(&key("scanner.artworkToken"), spec.token),
            format: props.get_or(&key("format"), spec.format).to_lowercase(),
            validate: props.get_bool(&key("scanner.Validate"), true),
            validate_match: props.get_u32(&key("scanner.ValidateMatch"), 75).min(100),
            validate_aspect: props.get_bool(&key("scanner.ValidateAspect"), true),
            artwork_directory: props.get_or(&key("scanner.artworkDirectory"), ""),
            priority: props.get_list(&key("scanner.artworkPriority"), DEFAULT_ARTWORK_PRIORITY),
            image_names: props.get_list(&key("scanner.imageName"), &default_names),
            search_priority_movie: props.get_list(&key("scanner.SearchPriority.movie"), ""),
            search_priority_tv: props.get_list(&key("scanner.SearchPriority.tv"), ""),
            width: props.get_u32(&key("width"), spec.width),
            height: props.get_u32(&key("height"), spec.height),
            orientation: spec.orientation,
            force_overwrite: props.get_bool(&kind.force_overwrite_key(), false),
        }
    }

    /// Download flag for the given item type.
    pub fn download_enabled(&self, tv: bool) -> bool {
        if tv { self.tv_download } else { self.movie_download }
    }

    /// Online source order for the given item type.
    pub fn search_priority(&self, tv: bool) -> &[String] {
        if tv {
            &self.search_priority_tv
        } else {
            &self.search_priority_movie
        }
    }
}

/// All artwork settings plus the globals the pipeline reads.
#[derive(Debug, Clone)]
pub struct ArtworkConfig {
    pub properties: PropertySet,
    settings: BTreeMap<ArtworkKind, ArtworkSettings>,
    /// `mjb.artwork.fetchTimeout`, seconds.
    pub fetch_timeout: Duration,
    /// `mjb.artwork.maxWorkers`
    pub max_workers: usize,
    /// `mjb.artwork.kinds`
    pub batch_kinds: Vec<ArtworkKind>,
    /// `mjb.skin.dir`
    pub skin_dir: PathBuf,
    /// `highdef.differentiate`
    pub highdef_differentiate: bool,
}

impl ArtworkConfig {
    pub fn from_properties(properties: PropertySet) -> Self {
        let settings = ArtworkKind::ALL
            .iter()
            .map(|&k| (k, ArtworkSettings::from_properties(k, &properties)))
            .collect();

        let batch_kinds = properties
            .get_list("mjb.artwork.kinds", DEFAULT_BATCH_KINDS)
            .iter()
            .filter_map(|name| match name.parse::<ArtworkKind>() {
                Ok(k) => Some(k),
                Err(e) => {
                    log::warn!("Ignoring mjb.artwork.kinds entry: {}", e);
                    None
                }
            })
            .collect();

        Self {
            fetch_timeout: Duration::from_secs(properties.get_u32("mjb.artwork.fetchTimeout", 30).max(1) as u64),
            max_workers: properties.get_u32("mjb.artwork.maxWorkers", 4).max(1) as usize,
            batch_kinds,
            skin_dir: PathBuf::from(properties.get_or("mjb.skin.dir", "skins/default")),
            highdef_differentiate: properties.get_bool("highdef.differentiate", false),
            settings,
            properties,
        }
    }

    pub fn settings(&self, kind: ArtworkKind) -> &ArtworkSettings {
        // Every kind is inserted in `from_properties`.
        &self.settings[&kind]
    }

    /// Kinds that need processing for some item type.
    pub fn required_kinds(&self) -> Vec<ArtworkKind> {
        self.settings
            .values()
            .filter(|s| s.movie_download || s.tv_download || s.search_local)
            .map(|s| s.kind)
            .collect()
    }

    /// Write every resolved setting at debug level.
    pub fn log_settings(&self) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }
        log::debug!("Artwork globals: fetchTimeout={}s maxWorkers={} skin={} highdef.differentiate={}",
            self.fetch_timeout.as_secs(),
            self.max_workers,
            self.skin_dir.display(),
            self.highdef_differentiate,
        );
        for s in self.settings.values() {
            log::debug!(
                "{}: local={} movie={} tv={} ext={:?} token='{}' format={} validate={} match={}% aspect={} dir='{}' priority={:?} names={:?} size={}x{} force={}",
                s.kind,
                s.search_local,
                s.movie_download,
                s.tv_download,
                s.extensions,
                s.token,
                s.format,
                s.validate,
                s.validate_match,
                s.validate_aspect,
                s.artwork_directory,
                s.priority,
                s.image_names,
                s.width,
                s.height,
                s.force_overwrite,
            );
        }
    }
}

impl Default for ArtworkConfig {
    fn default() -> Self {
        Self::from_properties(PropertySet::new())
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
