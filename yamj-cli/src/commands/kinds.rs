use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use yamj_core::{ArtworkConfig, ArtworkKind, ArtworkSettings};
use yamj_imaging::ImageSettings;

use crate::error::CliError;

fn flag(on: bool) -> &'static str {
    if on { "yes" } else { "-" }
}

fn describe(s: &ArtworkSettings) -> String {
    format!(
        "{:<13} {:>4}x{:<4} {:<4} {:<14} {:<5} {:<5} {:<5} {:>3}%",
        s.kind.name(),
        s.width,
        s.height,
        s.format,
        if s.token.is_empty() { "(none)" } else { &s.token },
        flag(s.search_local),
        flag(s.movie_download),
        flag(s.tv_download),
        s.validate_match,
    )
}

/// Print the kind table, or one kind's image settings as YAML.
pub(crate) fn run_kinds(config: &ArtworkConfig, image: Option<ArtworkKind>) -> Result<(), CliError> {
    if let Some(kind) = image {
        let settings = ImageSettings::from_properties(
            config.settings(kind),
            &config.properties,
            &config.skin_dir,
            config.highdef_differentiate,
        );
        let yaml = settings.to_yaml().map_err(|e| CliError::other(e.to_string()))?;
        println!("{}", yaml.trim_end());
        return Ok(());
    }

    log::info!(
        "{}",
        format!(
            "{:<13} {:>9} {:<4} {:<14} {:<5} {:<5} {:<5} {:>4}",
            "KIND", "SIZE", "FMT", "TOKEN", "LOCAL", "MOVIE", "TV", "MIN"
        )
        .if_supports_color(Stdout, |t| t.bold()),
    );
    let batch = &config.batch_kinds;
    for kind in ArtworkKind::ALL {
        let line = describe(config.settings(kind));
        if batch.contains(&kind) {
            log::info!("{}", line.if_supports_color(Stdout, |t| t.green()));
        } else {
            log::info!("{}", line);
        }
    }
    log::info!("");
    log::info!(
        "{}",
        "Highlighted kinds are processed by `yamj artwork`.".if_supports_color(Stdout, |t| t.dimmed()),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use yamj_core::PropertySet;

    #[test]
    fn test_describe_row() {
        let mut props = PropertySet::new();
        props.set("fanart.tv.download", "false");
        let config = ArtworkConfig::from_properties(props);

        let row = describe(config.settings(ArtworkKind::Fanart));
        assert!(row.starts_with("fanart"));
        assert!(row.contains("1280x720"));
        assert!(row.contains(".fanart"));
        assert!(row.trim_end().ends_with("75%"));

        let poster = describe(config.settings(ArtworkKind::Poster));
        assert!(poster.contains("(none)"));
    }
}
