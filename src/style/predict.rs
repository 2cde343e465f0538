//! Style image to style embedding.

use std::sync::Arc;

use ndarray::Axis;

use crate::error::{Error, Result};
use crate::image::{codec, NormalizationPolicy, PixelBuffer};
use crate::inference::InferenceEngine;
use crate::model::{ModelKind, ModelRepository, STYLE_IMAGE_SIZE};

use super::StyleEmbedding;

const KIND: ModelKind = ModelKind::StylePrediction;

/// Runs the style-prediction model.
pub struct StylePredictor {
    models: Arc<ModelRepository>,
    engine: Arc<dyn InferenceEngine>,
    model_name: String,
    normalization: NormalizationPolicy,
}

impl StylePredictor {
    pub fn new(
        models: Arc<ModelRepository>,
        engine: Arc<dyn InferenceEngine>,
        model_name: impl Into<String>,
        normalization: NormalizationPolicy,
    ) -> Self {
        Self {
            models,
            engine,
            model_name: model_name.into(),
            normalization,
        }
    }

    /// Compute the embedding of a style image.
    ///
    /// The image is center-cropped to a square (a no-op when it already is one),
    /// resized to 256x256 and normalized, then fed to the prediction model as a
    /// `[1, 256, 256, 3]` tensor.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be loaded, inference fails, or the
    /// style image has zero area.
    pub fn predict(&self, style: &PixelBuffer) -> Result<StyleEmbedding> {
        let square = codec::crop_to_square(style);
        let tensor = codec::to_tensor(&square, STYLE_IMAGE_SIZE, STYLE_IMAGE_SIZE, self.normalization)?
            .insert_axis(Axis(0));

        let inputs = [tensor];
        KIND.check_inputs(&inputs)?;

        let model = self.models.load(&self.model_name)?;

        tracing::info!("Predicting style bottleneck...");
        let outputs = self.engine.run(&model, &inputs, KIND.output_shapes())?;
        KIND.check_outputs(&outputs)?;

        let bottleneck = outputs
            .into_iter()
            .next()
            .ok_or_else(|| Error::ShapeMismatch {
                expected: "style bottleneck output".to_string(),
                actual: "no output".to_string(),
            })?;

        StyleEmbedding::new(bottleneck)
    }
}
