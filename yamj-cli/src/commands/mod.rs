pub(crate) mod artwork;
pub(crate) mod config;
pub(crate) mod kinds;

use std::path::PathBuf;

use yamj_core::{PropertySet, config_path};

use crate::error::CliError;

/// Properties from the given files, or from the default config file if
/// none were given and it exists.
pub(crate) fn load_properties(paths: &[PathBuf]) -> Result<(PropertySet, Vec<PathBuf>), CliError> {
    if !paths.is_empty() {
        return Ok((PropertySet::load_all(paths)?, paths.to_vec()));
    }
    match config_path() {
        Some(path) if path.is_file() => Ok((PropertySet::load(&path)?, vec![path])),
        _ => {
            log::debug!("No config file given or found; using defaults");
            Ok((PropertySet::new(), Vec::new()))
        }
    }
}
