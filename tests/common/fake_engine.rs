use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use ndarray::IxDyn;
use pastiche::{Error, InferenceEngine, ModelBlob, Result, Tensor};

/// What the fake does for a given call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Deterministic fixture outputs derived from the inputs.
    Fixture,
    /// Every call fails inside the engine.
    Fail,
    /// Outputs have the wrong shape.
    WrongShape,
}

/// Inference engine returning fixture tensors.
///
/// An output whose requested shape equals an input's shape is a copy of that
/// input (the transfer model returns the content unchanged). Any other output is
/// filled with the mean of all input values plus a ramp, so distinct style
/// images give distinct embeddings.
pub struct FakeEngine {
    behavior: Behavior,
    calls: Mutex<Vec<String>>,
    runs: AtomicUsize,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::with_behavior(Behavior::Fixture)
    }

    pub fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
            runs: AtomicUsize::new(0),
        }
    }

    /// Model names passed to `run`, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn run_count(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

impl InferenceEngine for FakeEngine {
    fn run(
        &self,
        model: &ModelBlob,
        inputs: &[Tensor],
        output_shapes: &[&[usize]],
    ) -> Result<Vec<Tensor>> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(model.name().to_string());

        match self.behavior {
            Behavior::Fail => {
                return Err(Error::Inference {
                    model: model.name().to_string(),
                    source: "fixture failure".into(),
                })
            }
            Behavior::WrongShape => {
                return Ok(output_shapes
                    .iter()
                    .map(|shape| Tensor::zeros(IxDyn(&shape[1..])))
                    .collect())
            }
            Behavior::Fixture => {}
        }

        let count: usize = inputs.iter().map(Tensor::len).sum();
        #[allow(clippy::cast_precision_loss)]
        let mean = inputs.iter().map(Tensor::sum).sum::<f32>() / count.max(1) as f32;

        Ok(output_shapes
            .iter()
            .map(|&shape| {
                inputs
                    .iter()
                    .find(|input| input.shape() == shape)
                    .cloned()
                    .unwrap_or_else(|| {
                        let mut index = 0.0_f32;
                        Tensor::from_shape_fn(IxDyn(shape), |_| {
                            index += 1.0;
                            mean + index / 1000.0
                        })
                    })
            })
            .collect())
    }
}
