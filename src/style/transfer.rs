//! Content image plus style embedding to stylized image.

use std::sync::Arc;

use ndarray::Axis;

use crate::error::{Error, Result};
use crate::image::{codec, NormalizationPolicy, PixelBuffer};
use crate::inference::InferenceEngine;
use crate::model::{ModelKind, ModelRepository, CONTENT_IMAGE_SIZE};

use super::StyleEmbedding;

const KIND: ModelKind = ModelKind::StyleTransfer;

/// Runs the style-transfer model.
pub struct StyleTransferer {
    models: Arc<ModelRepository>,
    engine: Arc<dyn InferenceEngine>,
    model_name: String,
    normalization: NormalizationPolicy,
    crop_content: bool,
}

impl StyleTransferer {
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
            crop_content: true,
        }
    }

    /// Center-crop content to a square before resizing. When disabled, non-square
    /// content is stretched to 384x384.
    #[must_use]
    pub const fn with_crop_content(mut self, crop: bool) -> Self {
        self.crop_content = crop;
        self
    }

    /// Stylize `content` with `embedding`. The result is always 384x384.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be loaded, inference fails, or the
    /// content image has zero area.
    pub fn transfer(&self, content: &PixelBuffer, embedding: &StyleEmbedding) -> Result<PixelBuffer> {
        let content = if self.crop_content {
            codec::crop_to_square(content)
        } else {
            content.clone()
        };

        let tensor = codec::to_tensor(
            &content,
            CONTENT_IMAGE_SIZE,
            CONTENT_IMAGE_SIZE,
            self.normalization,
        )?
        .insert_axis(Axis(0));

        let inputs = [tensor, embedding.as_tensor().clone()];
        KIND.check_inputs(&inputs)?;

        let model = self.models.load(&self.model_name)?;

        tracing::info!("Transferring style...");
        let outputs = self.engine.run(&model, &inputs, KIND.output_shapes())?;
        KIND.check_outputs(&outputs)?;

        let stylized = outputs.first().ok_or_else(|| Error::ShapeMismatch {
            expected: "stylized image output".to_string(),
            actual: "no output".to_string(),
        })?;

        codec::from_tensor(stylized, CONTENT_IMAGE_SIZE, CONTENT_IMAGE_SIZE)
    }
}
