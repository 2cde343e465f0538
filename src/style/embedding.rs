use crate::error::Result;
use crate::model::BOTTLENECK_SIZE;
use crate::tensor::{check_shape, Tensor};

/// Compact summary of a style image's texture, shape `[1, 1, 100]`.
///
/// Produced once per style image and reusable across any number of content
/// images. The values are opaque; only the transfer model reads them.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleEmbedding(Tensor);

impl StyleEmbedding {
    pub const SHAPE: [usize; 3] = [1, 1, BOTTLENECK_SIZE];

    /// Wrap a bottleneck tensor.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ShapeMismatch`] unless the tensor is `[1, 1, 100]`.
    pub fn new(tensor: Tensor) -> Result<Self> {
        check_shape(&Self::SHAPE, tensor.shape())?;
        Ok(Self(tensor))
    }

    #[must_use]
    pub const fn as_tensor(&self) -> &Tensor {
        &self.0
    }

    #[must_use]
    pub fn into_tensor(self) -> Tensor {
        self.0
    }
}
