/// Errors that can occur while decoding, transforming or encoding artwork.
#[derive(Debug, thiserror::Error)]
pub enum ImagingError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("Font error: {0}")]
    Font(String),

    #[error("Invalid image settings: {0}")]
    InvalidSettings(String),
}
