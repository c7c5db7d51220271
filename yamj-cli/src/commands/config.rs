use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use yamj_core::{ArtworkConfig, ConfigError, PropertySet, config_path};

use crate::error::CliError;

/// Print where the default config file lives.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    println!("{}", path.display());
    Ok(())
}

/// Show loaded files, resolved globals and every property.
pub(crate) fn run_config_show(props: PropertySet, files: &[PathBuf]) {
    log::info!(
        "{}",
        "YAMJ Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

    if files.is_empty() {
        match config_path() {
            Some(p) => log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
            ),
            None => log::info!(
                "  Config file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            ),
        }
    }
    for f in files {
        log::info!(
            "  Config file: {} {}",
            f.display().if_supports_color(Stdout, |t| t.cyan()),
            "(loaded)".if_supports_color(Stdout, |t| t.green()),
        );
    }
    log::info!("");

    let shown: Vec<(String, String)> = props.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    let config = ArtworkConfig::from_properties(props);
    let kinds: Vec<&str> = config.batch_kinds.iter().map(|k| k.name()).collect();
    log::info!("  Fetch timeout:  {}s", config.fetch_timeout.as_secs());
    log::info!("  Max workers:    {}", config.max_workers);
    log::info!("  Batch kinds:    {}", kinds.join(", "));
    log::info!("  Skin directory: {}", config.skin_dir.display());
    log::info!("  HD frames:      {}", config.highdef_differentiate);
    log::info!("");

    if shown.is_empty() {
        log::info!(
            "  {}",
            "No properties set".if_supports_color(Stdout, |t| t.dimmed()),
        );
        return;
    }
    log::info!("  {} properties:", shown.len());
    for (key, value) in &shown {
        log::info!(
            "    {} = {}",
            key.if_supports_color(Stdout, |t| t.dimmed()),
            value,
        );
    }
}
