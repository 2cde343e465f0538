//! Shaped float tensors exchanged with the inference engine.

use ndarray::ArrayD;

use crate::error::{Error, Result};

/// Flat `f32` buffer with a dynamic shape, channel-last (H, W, C) layout.
pub type Tensor = ArrayD<f32>;

/// Fail with [`Error::ShapeMismatch`] unless `actual` equals `expected` in every
/// dimension.
///
/// # Errors
///
/// Returns an error if the rank or any dimension differs.
pub fn check_shape(expected: &[usize], actual: &[usize]) -> Result<()> {
    if expected == actual {
        return Ok(());
    }

    Err(Error::ShapeMismatch {
        expected: format!("{expected:?}"),
        actual: format!("{actual:?}"),
    })
}
