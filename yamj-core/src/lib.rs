//! Core types for the YAMJ artwork pipeline: the artwork kind table, the
//! scanned video record, configuration, library scanning and the metadata
//! plugin contract.

pub mod config;
pub mod error;
pub mod item;
pub mod kind;
pub mod plugin;
pub mod resolve;
pub mod scan;

pub use config::{ArtworkConfig, ArtworkSettings, PropertySet, config_path, split_list};
pub use error::ConfigError;
pub use item::{
    ArtworkSlot, CropRegion, ResolutionTier, UNKNOWN, VideoItem, VideoType, is_valid_value,
};
pub use kind::{ArtworkKind, KindParseError, KindSpec, Orientation};
pub use plugin::{MetadataPlugin, SidecarPlugin};
pub use resolve::{FieldResolver, PartialFields, RawSourceData, ResolverChain};
