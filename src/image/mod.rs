//! Image loading, tensor conversion, and saving utilities.

pub mod codec;
mod load;
mod save;

pub use codec::{crop_to_square, flip_horizontal, from_tensor, resize, rotate, to_tensor};
pub use load::{decode_image, load_image};
pub use save::save_image;

use image::RgbaImage;

use crate::error::{Error, Result};

/// Packed RGBA pixels, row-major, origin top-left.
pub type PixelBuffer = RgbaImage;

/// Number of channels in model tensors (R, G, B).
pub const RGB_CHANNELS: usize = 3;

/// Per-channel affine transform `(raw - offset) / scale` applied when turning
/// 8-bit channel values into tensor values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationPolicy {
    pub offset: f32,
    pub scale: f32,
}

impl NormalizationPolicy {
    /// Maps `[0, 255]` to `[0, 1]`.
    pub const UNIT: Self = Self::new(0.0, 255.0);

    /// Maps `[0, 255]` to `[-1, 1]`.
    pub const SIGNED: Self = Self::new(127.5, 127.5);

    /// Leaves raw channel values in `[0, 255]`.
    pub const RAW: Self = Self::new(0.0, 1.0);

    #[must_use]
    pub const fn new(offset: f32, scale: f32) -> Self {
        Self { offset, scale }
    }

    /// Normalize one 8-bit channel value.
    #[inline]
    #[must_use]
    pub fn apply(self, raw: u8) -> f32 {
        (f32::from(raw) - self.offset) / self.scale
    }

    /// Map a normalized value back into the raw channel range (unclamped).
    #[inline]
    #[must_use]
    pub fn invert(self, value: f32) -> f32 {
        value.mul_add(self.scale, self.offset)
    }

    /// Check that the policy is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if `scale` is zero or either field is not finite.
    pub fn validate(self, name: &str) -> Result<()> {
        if !self.offset.is_finite() || !self.scale.is_finite() {
            return Err(Error::InvalidParameter {
                name: name.to_string(),
                reason: "offset and scale must be finite".to_string(),
            });
        }

        if self.scale == 0.0 {
            return Err(Error::InvalidParameter {
                name: name.to_string(),
                reason: "scale must be non-zero".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for NormalizationPolicy {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Fail with [`Error::UnsupportedDimensions`] for zero-area sizes.
pub(crate) fn ensure_area(width: u32, height: u32, what: &str) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::UnsupportedDimensions {
            width,
            height,
            reason: format!("{what} must have a positive area"),
        });
    }
    Ok(())
}
