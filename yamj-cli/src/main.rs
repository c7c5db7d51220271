//! yamj CLI
//!
//! Command-line interface for acquiring and generating jukebox artwork.

mod cli_types;
mod commands;
mod error;
mod spinner;

use std::io::Write;

use clap::Parser;
use env_logger::{Builder, Target};
use log::LevelFilter;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use cli_types::{Cli, Commands, ConfigAction};
use commands::artwork::ArtworkArgs;
use error::CliError;

/// Plain messages at info, timestamps and levels with `--verbose`.
/// `RUST_LOG` overrides the level.
fn init_logger(verbose: bool, quiet: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    let mut builder = Builder::new();
    builder
        .target(Target::Stdout)
        .filter_level(level)
        .filter_module("hyper_util", LevelFilter::Info)
        .filter_module("reqwest", LevelFilter::Info);
    if verbose {
        builder.format_timestamp_millis();
    } else {
        builder.format(|buf, record| writeln!(buf, "{}", record.args()));
    }
    builder.parse_default_env();
    builder.init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Artwork {
            library,
            jukebox,
            temp,
            kinds,
            threads,
            force,
            scrape,
            recheck,
            no_log,
        } => {
            let (props, _) = commands::load_properties(&cli.config)?;
            let args = ArtworkArgs {
                library,
                jukebox,
                temp,
                kinds,
                threads,
                force,
                scrape,
                recheck,
                no_log,
            };
            commands::artwork::run_artwork(props, args, cli.quiet)
        }
        Commands::Kinds { image } => {
            let (props, _) = commands::load_properties(&cli.config)?;
            let config = yamj_core::ArtworkConfig::from_properties(props);
            commands::kinds::run_kinds(&config, image)
        }
        Commands::Config { action } => match action {
            ConfigAction::Path => commands::config::run_config_path(),
            ConfigAction::Show => {
                let (props, files) = commands::load_properties(&cli.config)?;
                commands::config::run_config_show(props, &files);
                Ok(())
            }
        },
    }
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        log::error!(
            "{} {}",
            "\u{2718}".if_supports_color(Stderr, |t| t.red()),
            e,
        );
        std::process::exit(1);
    }
}
