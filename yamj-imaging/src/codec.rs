//! Decoding fetched bytes and encoding finished artwork.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};

use crate::ImagingError;

const JPEG_QUALITY: u8 = 90;

/// Decode image bytes, guessing the format from the content.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, ImagingError> {
    let reader = image::ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    Ok(reader.decode()?)
}

/// Encode to the configured output format (`jpg`, `png`, ...).
/// JPEG output drops the alpha channel.
pub fn encode(image: &DynamicImage, format: &str) -> Result<Vec<u8>, ImagingError> {
    let mut buf = Vec::new();
    match format.to_lowercase().as_str() {
        "jpg" | "jpeg" => {
            let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
            DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)?;
        }
        other => {
            let fmt = ImageFormat::from_extension(other)
                .filter(|f| f.can_write())
                .ok_or_else(|| ImagingError::UnsupportedFormat(other.to_string()))?;
            image.write_to(&mut Cursor::new(&mut buf), fmt)?;
        }
    }
    Ok(buf)
}
