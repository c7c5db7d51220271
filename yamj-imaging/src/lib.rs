//! Image transforms for jukebox artwork.
//!
//! [`DefaultImagePlugin`] runs the configured pipeline over a decoded
//! source image; [`codec`] turns bytes into images and back.

pub mod codec;
pub mod error;
mod graphics;
pub mod plugin;
pub mod settings;
pub mod text;

pub use codec::{decode, encode};
pub use error::ImagingError;
pub use plugin::{ArtworkImagePlugin, DefaultImagePlugin};
pub use settings::{ImageSettings, PerspectiveDirection, ResizeMode, TextAlignment, parse_color};
pub use text::TextRenderer;
