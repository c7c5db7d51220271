//! Artwork acquisition and placement for a YAMJ jukebox.
//!
//! For every (item, kind) pair the [`ArtworkScanner`] looks for artwork
//! beside the video files, then asks online sources in priority order,
//! validates candidates by their image headers, and writes the processed
//! image into the jukebox temp root. [`run_batch`] drives a whole library
//! through the scanner with bounded concurrency.

pub mod batch;
pub mod error;
pub mod events;
pub mod fetch;
pub mod local;
pub mod log;
pub mod online;
pub mod recheck;
pub mod scanner;
pub mod source;
pub mod state;
pub mod storage;
pub mod validate;

pub use batch::{ArtworkEvent, BatchOptions, BatchResult, run_batch};
pub use error::{FetchError, StateError, StorageError};
pub use events::run_with_events;
pub use fetch::{ArtworkLocation, HttpFetcher, ResourceFetcher};
pub use local::{LocalArtworkLocator, LocalStrategy};
pub use crate::log::{ArtworkLog, LogEntry, LogSummary};
pub use online::{OnlineArtworkLocator, OnlineHit};
pub use recheck::{RecheckPolicy, RecheckReason};
pub use scanner::{ArtworkOrigin, ArtworkRecord, ArtworkScanner, ScanOutcome, artwork_filename};
pub use source::{ArtworkSourcePlugin, MetadataArtworkSource, SourceRegistry, SourceScope, TemplateSource};
pub use state::LibraryState;
pub use storage::{FileCache, JukeboxLayout};
pub use validate::{Rejection, SizePolicy, Validator};
