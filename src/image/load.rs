//! Image loading utilities.

use std::path::Path;

use crate::error::{Error, Result};

use super::{ensure_area, PixelBuffer};

/// Load an image from disk as packed RGBA pixels.
///
/// Any format the `image` crate can decode is accepted. RGB and grayscale
/// sources are expanded to RGBA with an opaque alpha channel.
///
/// # Errors
///
/// Returns an error if the image cannot be decoded or has zero area.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<PixelBuffer> {
    let path = path.as_ref();

    let img = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let rgba = img.into_rgba8();
    ensure_area(rgba.width(), rgba.height(), "loaded image")?;

    tracing::debug!(
        "Loaded {} ({}x{})",
        path.display(),
        rgba.width(),
        rgba.height()
    );

    Ok(rgba)
}

/// Decode an in-memory encoded image (PNG, JPEG, ...) as packed RGBA pixels.
///
/// # Errors
///
/// Returns an error if the bytes cannot be decoded or the image has zero area.
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer> {
    let rgba = image::load_from_memory(bytes)
        .map_err(|source| Error::ImageLoad {
            path: "<memory>".into(),
            source,
        })?
        .into_rgba8();

    ensure_area(rgba.width(), rgba.height(), "decoded image")?;
    Ok(rgba)
}
