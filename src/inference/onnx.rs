//! ONNX Runtime implementation of [`InferenceEngine`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use ndarray::IxDyn;
use ort::session::Session;
use ort::value::Tensor as OrtTensor;

use crate::error::{Error, Result};
use crate::model::ModelBlob;
use crate::tensor::{check_shape, Tensor};

use super::InferenceEngine;

/// Builds one ONNX Runtime session per model name and runs it.
///
/// Each session sits behind its own mutex, so at most one forward pass is in
/// flight per model while different models run concurrently.
#[derive(Default)]
pub struct OnnxEngine {
    intra_threads: usize,
    sessions: Mutex<HashMap<String, Arc<Mutex<Session>>>>,
}

impl OnnxEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of intra-op threads per session (0 = runtime default).
    #[must_use]
    pub const fn with_intra_threads(mut self, threads: usize) -> Self {
        self.intra_threads = threads;
        self
    }

    fn session(&self, model: &ModelBlob) -> Result<Arc<Mutex<Session>>> {
        if let Some(session) = self.cached_session(model.name()) {
            return Ok(session);
        }

        // Built without holding the map lock so runs of other models are not
        // stalled. A racing build of the same model loses to the first insert.
        tracing::info!("Creating inference session for {}...", model.name());
        let built = Arc::new(Mutex::new(self.build_session(model)?));

        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let session = sessions
            .entry(model.name().to_string())
            .or_insert(built);
        Ok(Arc::clone(session))
    }

    fn cached_session(&self, name: &str) -> Option<Arc<Mutex<Session>>> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map(Arc::clone)
    }

    fn build_session(&self, model: &ModelBlob) -> Result<Session> {
        let mut builder = Session::builder().map_err(|source| Error::inference(model.name(), source))?;

        if self.intra_threads > 0 {
            builder = builder
                .with_intra_threads(self.intra_threads)
                .map_err(|source| Error::inference(model.name(), source))?;
        }

        builder
            .commit_from_memory(model.as_bytes())
            .map_err(|source| Error::inference(model.name(), source))
    }
}

impl InferenceEngine for OnnxEngine {
    fn run(
        &self,
        model: &ModelBlob,
        inputs: &[Tensor],
        output_shapes: &[&[usize]],
    ) -> Result<Vec<Tensor>> {
        let session = self.session(model)?;
        let mut session = session.lock().unwrap_or_else(PoisonError::into_inner);

        let input_names: Vec<String> = session.inputs.iter().map(|i| i.name.clone()).collect();
        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();

        if input_names.len() != inputs.len() {
            return Err(Error::ShapeMismatch {
                expected: format!("{} inputs", input_names.len()),
                actual: format!("{} inputs", inputs.len()),
            });
        }

        if output_names.len() < output_shapes.len() {
            return Err(Error::ShapeMismatch {
                expected: format!("{} outputs", output_shapes.len()),
                actual: format!("{} outputs", output_names.len()),
            });
        }

        let mut feeds = Vec::with_capacity(inputs.len());
        for (name, tensor) in input_names.into_iter().zip(inputs) {
            let value = OrtTensor::from_array(tensor.clone())
                .map_err(|source| Error::inference(model.name(), source))?;
            feeds.push((name, value));
        }

        let outputs = session
            .run(feeds)
            .map_err(|source| Error::inference(model.name(), source))?;

        let mut results = Vec::with_capacity(output_shapes.len());
        for (name, expected) in output_names.iter().zip(output_shapes) {
            let value = outputs
                .get(name.as_str())
                .ok_or_else(|| Error::ShapeMismatch {
                    expected: format!("output {name}"),
                    actual: "no output".to_string(),
                })?;

            let (shape, data) = value
                .try_extract_tensor::<f32>()
                .map_err(|source| Error::inference(model.name(), source))?;

            let dims = output_dims(expected, shape)?;
            check_shape(expected, &dims)?;

            let tensor = Tensor::from_shape_vec(IxDyn(&dims), data.to_vec()).map_err(|_| {
                Error::ShapeMismatch {
                    expected: format!("{dims:?}"),
                    actual: "reshape failed".to_string(),
                }
            })?;
            results.push(tensor);
        }

        Ok(results)
    }
}

/// Convert a runtime tensor shape to dimensions. A negative extent is a shape
/// mismatch.
fn output_dims(expected: &[usize], shape: &[i64]) -> Result<Vec<usize>> {
    shape
        .iter()
        .map(|&d| usize::try_from(d))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| Error::ShapeMismatch {
            expected: format!("{expected:?}"),
            actual: format!("{shape:?}"),
        })
}
