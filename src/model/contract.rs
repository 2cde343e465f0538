//! Fixed tensor contracts of the two pretrained models.

use crate::error::{Error, Result};
use crate::image::RGB_CHANNELS;
use crate::tensor::{check_shape, Tensor};

/// Side of the square style image fed to the prediction model.
pub const STYLE_IMAGE_SIZE: u32 = 256;

/// Side of the square content image fed to, and produced by, the transfer model.
pub const CONTENT_IMAGE_SIZE: u32 = 384;

/// Length of the style bottleneck vector.
pub const BOTTLENECK_SIZE: usize = 100;

const STYLE_INPUT: &[usize] = &[
    1,
    STYLE_IMAGE_SIZE as usize,
    STYLE_IMAGE_SIZE as usize,
    RGB_CHANNELS,
];
const CONTENT_INPUT: &[usize] = &[
    1,
    CONTENT_IMAGE_SIZE as usize,
    CONTENT_IMAGE_SIZE as usize,
    RGB_CHANNELS,
];
const BOTTLENECK: &[usize] = &[1, 1, BOTTLENECK_SIZE];

const PREDICTION_INPUTS: &[&[usize]] = &[STYLE_INPUT];
const PREDICTION_OUTPUTS: &[&[usize]] = &[BOTTLENECK];
const TRANSFER_INPUTS: &[&[usize]] = &[CONTENT_INPUT, BOTTLENECK];
const TRANSFER_OUTPUTS: &[&[usize]] = &[CONTENT_INPUT];

/// The models used in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// Style image to bottleneck.
    StylePrediction,
    /// Content image plus bottleneck to stylized image.
    StyleTransfer,
}

impl ModelKind {
    /// Get the default asset name for this model.
    #[must_use]
    pub const fn default_name(&self) -> &'static str {
        match self {
            Self::StylePrediction => "style_predict_256.onnx",
            Self::StyleTransfer => "style_transfer_384.onnx",
        }
    }

    /// Declared input shapes, in positional order.
    #[must_use]
    pub const fn input_shapes(&self) -> &'static [&'static [usize]] {
        match self {
            Self::StylePrediction => PREDICTION_INPUTS,
            Self::StyleTransfer => TRANSFER_INPUTS,
        }
    }

    /// Declared output shapes, in positional order.
    #[must_use]
    pub const fn output_shapes(&self) -> &'static [&'static [usize]] {
        match self {
            Self::StylePrediction => PREDICTION_OUTPUTS,
            Self::StyleTransfer => TRANSFER_OUTPUTS,
        }
    }

    /// Check tensors fed to this model against its declared inputs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] on a wrong count or any wrong shape.
    pub fn check_inputs(&self, inputs: &[Tensor]) -> Result<()> {
        check_all(self.input_shapes(), inputs, "inputs")
    }

    /// Check tensors returned by this model against its declared outputs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] on a wrong count or any wrong shape.
    pub fn check_outputs(&self, outputs: &[Tensor]) -> Result<()> {
        check_all(self.output_shapes(), outputs, "outputs")
    }
}

fn check_all(declared: &[&[usize]], tensors: &[Tensor], what: &str) -> Result<()> {
    if declared.len() != tensors.len() {
        return Err(Error::ShapeMismatch {
            expected: format!("{} {what}", declared.len()),
            actual: format!("{} {what}", tensors.len()),
        });
    }

    declared
        .iter()
        .zip(tensors)
        .try_for_each(|(shape, tensor)| check_shape(shape, tensor.shape()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    #[test]
    fn test_declared_shapes() {
        let predict = ModelKind::StylePrediction;
        assert_eq!(predict.input_shapes().len(), 1);
        assert_eq!(predict.input_shapes()[0], [1, 256, 256, 3]);
        assert_eq!(predict.output_shapes()[0], [1, 1, 100]);

        let transfer = ModelKind::StyleTransfer;
        assert_eq!(transfer.input_shapes().len(), 2);
        assert_eq!(transfer.input_shapes()[0], [1, 384, 384, 3]);
        assert_eq!(transfer.input_shapes()[1], [1, 1, 100]);
        assert_eq!(transfer.output_shapes()[0], [1, 384, 384, 3]);
    }

    #[test]
    fn test_check_inputs() {
        let content = Tensor::zeros(IxDyn(&[1, 384, 384, 3]));
        let bottleneck = Tensor::zeros(IxDyn(&[1, 1, 100]));

        assert!(ModelKind::StyleTransfer
            .check_inputs(&[content.clone(), bottleneck.clone()])
            .is_ok());
        // swapped order
        assert!(ModelKind::StyleTransfer
            .check_inputs(&[bottleneck, content.clone()])
            .is_err());
        // missing input
        assert!(ModelKind::StyleTransfer.check_inputs(&[content]).is_err());
    }

    #[test]
    fn test_check_outputs() {
        let unbatched = Tensor::zeros(IxDyn(&[1, 100]));
        let err = ModelKind::StylePrediction
            .check_outputs(&[unbatched])
            .unwrap_err();
        assert!(err.is_contract_violation());
    }
}
