use std::path::PathBuf;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in {path}: {message}")]
    Toml { path: PathBuf, message: String },

    #[error("Invalid YAML in {path}: {message}")]
    Yaml { path: PathBuf, message: String },

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Could not determine config directory")]
    NoConfigDir,
}
