//! Image saving utilities.

use std::path::Path;

use image::DynamicImage;

use crate::error::{Error, Result};

use super::PixelBuffer;

/// Save a pixel buffer to disk, format inferred from the extension.
///
/// JPEG output drops the alpha channel and honours `quality` (1-100); every
/// other format ignores it.
///
/// # Errors
///
/// Returns an error if the file cannot be created or encoded.
pub fn save_image<P: AsRef<Path>>(buffer: &PixelBuffer, path: P, quality: u8) -> Result<()> {
    let path = path.as_ref();

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("png")
        .to_lowercase();

    match extension.as_str() {
        "jpg" | "jpeg" => {
            let rgb = DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(buffer.clone()).into_rgb8());
            let mut output = std::fs::File::create(path)?;
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut output, quality);
            rgb.write_with_encoder(encoder)
                .map_err(|source| Error::ImageSave {
                    path: path.to_path_buf(),
                    source,
                })?;
        }
        _ => {
            buffer.save(path).map_err(|source| Error::ImageSave {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    tracing::debug!("Saved {}", path.display());
    Ok(())
}
