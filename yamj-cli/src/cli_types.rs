//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use yamj_core::ArtworkKind;

#[derive(Parser)]
#[command(name = "yamj")]
#[command(about = "Find, validate and generate artwork for a video jukebox", long_about = None)]
pub(crate) struct Cli {
    /// Configuration files (.properties, .toml, .yaml); later files win.
    /// Defaults to ~/.config/yamj/yamj.toml when present.
    #[arg(short, long, global = true)]
    pub config: Vec<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Acquire artwork for every video in a library
    Artwork {
        /// Library root to scan for video files
        #[arg(short, long)]
        library: PathBuf,

        /// Jukebox (final) directory
        #[arg(short, long)]
        jukebox: PathBuf,

        /// Directory for freshly generated artwork (default: <jukebox>-temp)
        #[arg(long)]
        temp: Option<PathBuf>,

        /// Artwork kinds to process (e.g., poster,fanart,banner)
        #[arg(short, long, value_delimiter = ',')]
        kinds: Option<Vec<ArtworkKind>>,

        /// Maximum concurrent items (default: mjb.artwork.maxWorkers)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Regenerate artwork even when the jukebox copy is current
        #[arg(long)]
        force: bool,

        /// Allow online sources for every item
        #[arg(long)]
        scrape: bool,

        /// Search again for every known item, ignoring the recheck age
        /// and per-run limit (mjb.recheck.*)
        #[arg(long)]
        recheck: bool,

        /// Disable the artwork log file
        #[arg(long)]
        no_log: bool,
    },

    /// List artwork kinds and their resolved settings
    Kinds {
        /// Print the image-processing settings of this kind as YAML
        #[arg(long)]
        image: Option<ArtworkKind>,
    },

    /// Show configuration details
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Print the default config file path
    Path,
    /// Show the loaded configuration
    Show,
}
