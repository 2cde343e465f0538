//! Forward-inference capability injected into the style components.
//!
//! The pipeline only depends on [`InferenceEngine`]; [`OnnxEngine`] is the
//! production implementation, and tests substitute engines that return fixture
//! tensors.

mod onnx;

pub use onnx::OnnxEngine;

use crate::error::Result;
use crate::model::ModelBlob;
use crate::tensor::Tensor;

/// Runs a single forward pass of a loaded model.
///
/// Implementations must be deterministic in `(model, inputs)` and keep no state
/// between calls beyond what is derived from the model bytes. They need not be
/// reentrant per model; serializing concurrent calls against the same model is
/// the implementation's job.
pub trait InferenceEngine: Send + Sync {
    /// Feed `inputs` positionally to `model` and return one tensor per entry of
    /// `output_shapes`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Inference`] if the engine fails and
    /// [`crate::Error::ShapeMismatch`] if the model disagrees with the requested
    /// shapes.
    fn run(
        &self,
        model: &ModelBlob,
        inputs: &[Tensor],
        output_shapes: &[&[usize]],
    ) -> Result<Vec<Tensor>>;
}
