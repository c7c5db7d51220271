use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::LevelFilter;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use yamj_artwork::{
    ArtworkEvent, ArtworkScanner, ArtworkSourcePlugin, BatchOptions, HttpFetcher, JukeboxLayout, LibraryState, LogEntry,
    MetadataArtworkSource, RecheckPolicy, SourceRegistry, SourceScope, TemplateSource,
};
use yamj_core::scan::{DEFAULT_VIDEO_EXTENSIONS, extension_set, scan_library};
use yamj_core::{ArtworkConfig, ArtworkKind, MetadataPlugin, PropertySet, SidecarPlugin};
use yamj_imaging::DefaultImagePlugin;

use crate::error::CliError;
use crate::spinner::SpinnerPool;

/// Arguments of the `artwork` command.
pub(crate) struct ArtworkArgs {
    pub library: PathBuf,
    pub jukebox: PathBuf,
    pub temp: Option<PathBuf>,
    pub kinds: Option<Vec<ArtworkKind>>,
    pub threads: Option<usize>,
    pub force: bool,
    pub scrape: bool,
    pub recheck: bool,
    pub no_log: bool,
}

/// `<jukebox>-temp` next to the jukebox directory.
fn default_temp(jukebox: &Path) -> PathBuf {
    let name = jukebox
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "jukebox".to_string());
    jukebox
        .parent()
        .unwrap_or(jukebox)
        .join(format!("{}-temp", name))
}

/// Fold command-line overrides into the loaded properties.
fn apply_overrides(props: &mut PropertySet, args: &ArtworkArgs) {
    if let Some(kinds) = &args.kinds {
        let names: Vec<&str> = kinds.iter().map(|k| k.name()).collect();
        props.set("mjb.artwork.kinds", names.join(","));
    }
    if let Some(n) = args.threads {
        props.set("mjb.artwork.maxWorkers", n.to_string());
    }
    if args.force {
        for kind in ArtworkKind::ALL {
            props.set(kind.force_overwrite_key(), "true");
        }
    }
}

/// Template sources from the config, plus the sidecar (`nfo`) source.
fn build_sources(config: &ArtworkConfig, sidecar: Arc<SidecarPlugin>) -> SourceRegistry {
    let mut registry = SourceRegistry::new();
    registry.register(MetadataArtworkSource::new(sidecar, SourceScope::Both));
    for source in TemplateSource::from_properties(&config.properties) {
        log::debug!("Artwork source '{}' ({})", source.name(), source.scope());
        registry.register(source);
    }
    registry
}

/// Run the artwork command.
pub(crate) fn run_artwork(mut props: PropertySet, args: ArtworkArgs, quiet: bool) -> Result<(), CliError> {
    apply_overrides(&mut props, &args);
    let config = ArtworkConfig::from_properties(props);
    config.log_settings();

    let temp_root = args.temp.clone().unwrap_or_else(|| default_temp(&args.jukebox));
    log::info!(
        "Library: {}",
        args.library.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!(
        "Jukebox: {}",
        args.jukebox.display().if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!(
        "Temp:    {}",
        temp_root.display().if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!("");

    let default_exts = DEFAULT_VIDEO_EXTENSIONS.join(",");
    let exts = config.properties.get_list("mjb.extensions", &default_exts);
    let exts: Vec<&str> = exts.iter().map(String::as_str).collect();
    let mut items = scan_library(&args.library, &extension_set(&exts))?;
    if items.is_empty() {
        log::warn!(
            "{} No video files found in {}",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            args.library.display(),
        );
        return Ok(());
    }

    let layout = JukeboxLayout::new(&temp_root, &args.jukebox)?;
    let state = LibraryState::load(layout.final_root()).unwrap_or_else(|e| {
        log::warn!(
            "{} Ignoring saved state: {}",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            e,
        );
        LibraryState::default()
    });
    let known = state.merge_into(&mut items);

    let sidecar = Arc::new(SidecarPlugin::new());
    let mut with_sidecar = 0usize;
    for item in &mut items {
        if sidecar.scan(item) {
            with_sidecar += 1;
        }
        if args.scrape {
            item.scrape_library = true;
        }
    }
    let rechecked = RecheckPolicy::from_properties(&config.properties)
        .forced(args.recheck)
        .apply(&mut items, &config, &config.batch_kinds, chrono::Local::now());
    log::info!(
        "Found {} items ({} known from a previous run, {} with sidecar metadata, {} due for a recheck)",
        items.len(),
        known,
        with_sidecar,
        rechecked,
    );

    let sources = build_sources(&config, sidecar);
    let fetcher = Arc::new(HttpFetcher::new(config.fetch_timeout)?);
    let image_plugin = Arc::new(DefaultImagePlugin::new(&config));
    let options = BatchOptions::new(config.batch_kinds.clone(), config.max_workers);
    let scanner = ArtworkScanner::new(config, fetcher, sources, image_plugin);

    let rt = tokio::runtime::Runtime::new().map_err(|e| CliError::runtime(e.to_string()))?;
    let result = rt.block_on(async {
        let mut pool = SpinnerPool::new(options.max_workers, quiet);
        let mut total = 0usize;
        let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel::<ArtworkEvent>();

        let batch = yamj_artwork::run_batch(&scanner, &layout, items, &options, event_tx);
        let result = yamj_artwork::run_with_events(batch, event_rx, |e| match e {
            ArtworkEvent::Started { total: t } => total = t,
            ArtworkEvent::ItemStarted { index, ref name } => {
                pool.claim(index, format!("[{}/{}] {}", index + 1, total, name));
            }
            ArtworkEvent::KindStarted { index, ref name, kind } => {
                pool.update(index, format!("[{}/{}] {} {}", index + 1, total, name, kind));
            }
            ArtworkEvent::KindFinished { index, ref name, ref record } => {
                if record.outcome.is_failure() {
                    pool.update(
                        index,
                        format!("[{}/{}] {} {} failed", index + 1, total, name, record.kind),
                    );
                }
            }
            ArtworkEvent::ItemFinished { index, .. } => pool.release(index),
            ArtworkEvent::Done => {}
        })
        .await;

        pool.clear_all();
        result
    });

    let summary = result.log.summary();
    let has_issues = summary.failures > 0;
    if has_issues && log::max_level() < LevelFilter::Info {
        log::warn!("{}:", args.library.display());
    }
    if summary.committed > 0 {
        log::info!(
            "  {} {} images written (local: {}, online: {}, metadata: {})",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            summary.committed,
            summary.from_local,
            summary.from_online,
            summary.from_metadata,
        );
    }
    if summary.skipped + summary.cached > 0 {
        log::info!(
            "  {} {} already up to date",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            summary.skipped + summary.cached,
        );
    }
    if summary.not_found > 0 {
        log::info!(
            "  {} {} not found",
            "?".if_supports_color(Stdout, |t| t.yellow()),
            summary.not_found,
        );
    }
    if summary.failures > 0 {
        log::warn!(
            "  {} {} failed",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            summary.failures,
        );
        for entry in result.log.entries() {
            if let LogEntry::Failure { item, kind, message, .. } = entry {
                log::warn!("      {} {}: {}", item, kind, message);
            }
        }
    }

    if !args.no_log {
        let log_path = layout.temp_root().join(format!(
            "artwork-log-{}.txt",
            chrono::Local::now().format("%Y%m%d-%H%M%S"),
        ));
        match result.log.write_to_file(&log_path) {
            Ok(()) => log::info!(
                "  Log written to {}",
                log_path.display().if_supports_color(Stdout, |t| t.dimmed()),
            ),
            Err(e) => log::warn!("Warning: could not write artwork log: {}", e),
        }
    }

    LibraryState::from_items(&result.items)
        .save(layout.final_root())
        .map_err(|e| CliError::other(format!("Could not save library state: {}", e)))?;
    Ok(())
}
