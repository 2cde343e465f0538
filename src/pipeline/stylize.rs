//! Orchestration of preprocessing, prediction, transfer and decoding.

use std::sync::Arc;

use crate::error::Result;
use crate::image::{ensure_area, PixelBuffer};
use crate::inference::InferenceEngine;
use crate::model::ModelRepository;
use crate::style::{StyleEmbedding, StylePredictor, StyleTransferer};

use super::Config;

/// Progress of a single stylization.
///
/// ```text
/// Start -> Preprocessing -> Predicting -> Predicted -> Transferring -> Transferred -> Done
///                       \            \                           \
///                        +------------+-> PredictFailed -> Done   +-> TransferFailed -> Done
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Preprocessing,
    Predicting,
    Predicted,
    PredictFailed,
    Transferring,
    Transferred,
    TransferFailed,
    Done,
}

impl Stage {
    /// Whether `next` may directly follow `self`. There are no retries, so no
    /// stage is ever re-entered.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Start, Self::Preprocessing)
                | (Self::Preprocessing, Self::Predicting | Self::PredictFailed)
                | (Self::Predicting, Self::Predicted | Self::PredictFailed)
                | (Self::Predicted, Self::Transferring)
                | (Self::Transferring, Self::Transferred | Self::TransferFailed)
                | (
                    Self::Transferred | Self::PredictFailed | Self::TransferFailed,
                    Self::Done
                )
        )
    }
}

/// Stage tracker for one invocation.
struct Run {
    stage: Stage,
}

impl Run {
    const fn start() -> Self {
        Self {
            stage: Stage::Start,
        }
    }

    /// A run whose embedding was computed by an earlier call.
    const fn predicted() -> Self {
        Self {
            stage: Stage::Predicted,
        }
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(
            self.stage.can_advance_to(next),
            "illegal stage transition {:?} -> {next:?}",
            self.stage
        );
        tracing::debug!(from = ?self.stage, to = ?next, "stylize stage");
        self.stage = next;
    }

    fn fail(&mut self, failed: Stage) {
        self.advance(failed);
        self.advance(Stage::Done);
    }
}

/// Two-stage style transfer: predict a style embedding, then apply it to the
/// content image.
///
/// The pipeline is a blocking call chain with no internal parallelism. It is
/// `Send + Sync`; share it by `Arc` to stylize from several threads.
pub struct StylizationPipeline {
    config: Config,
    predictor: StylePredictor,
    transferer: StyleTransferer,
}

impl StylizationPipeline {
    /// Create a new pipeline. Models are loaded lazily on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(
        config: Config,
        models: Arc<ModelRepository>,
        engine: Arc<dyn InferenceEngine>,
    ) -> Result<Self> {
        config.validate()?;

        tracing::info!("Initializing pipeline with config: {config:?}");

        let predictor = StylePredictor::new(
            Arc::clone(&models),
            Arc::clone(&engine),
            config.style_model.clone(),
            config.style_normalization,
        );
        let transferer = StyleTransferer::new(
            models,
            engine,
            config.transfer_model.clone(),
            config.content_normalization,
        )
        .with_crop_content(config.crop_content);

        Ok(Self {
            config,
            predictor,
            transferer,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Stylize `content` with the texture of `style`.
    ///
    /// Returns `None` if either stage fails; the diagnostic is logged. Transfer
    /// is never attempted without an embedding.
    ///
    /// # Panics
    ///
    /// Panics if a tensor does not match a model's declared shape. That is a
    /// broken contract between codec and model, not a runtime condition.
    #[must_use]
    pub fn stylize(&self, content: &PixelBuffer, style: &PixelBuffer) -> Option<PixelBuffer> {
        settle(self.try_stylize(content, style))
    }

    /// Same as [`Self::stylize`] but hands the diagnostic to the caller.
    ///
    /// # Errors
    ///
    /// Returns the first error of the prediction or transfer stage.
    pub fn try_stylize(&self, content: &PixelBuffer, style: &PixelBuffer) -> Result<PixelBuffer> {
        let mut run = Run::start();

        run.advance(Stage::Preprocessing);
        let checked = ensure_area(style.width(), style.height(), "style image")
            .and_then(|()| ensure_area(content.width(), content.height(), "content image"));
        if let Err(err) = checked {
            run.fail(Stage::PredictFailed);
            return Err(err);
        }

        run.advance(Stage::Predicting);
        let embedding = match self.predictor.predict(style) {
            Ok(embedding) => embedding,
            Err(err) => {
                run.fail(Stage::PredictFailed);
                return Err(err);
            }
        };
        run.advance(Stage::Predicted);

        self.transfer(&mut run, content, &embedding)
    }

    /// Compute a style embedding once for reuse with
    /// [`Self::stylize_with_embedding`].
    ///
    /// # Errors
    ///
    /// Returns an error if the prediction model cannot be loaded or run.
    pub fn predict_style(&self, style: &PixelBuffer) -> Result<StyleEmbedding> {
        self.predictor.predict(style)
    }

    /// Stylize `content` with a previously predicted embedding.
    ///
    /// # Panics
    ///
    /// Panics on a tensor shape contract violation, like [`Self::stylize`].
    #[must_use]
    pub fn stylize_with_embedding(
        &self,
        content: &PixelBuffer,
        embedding: &StyleEmbedding,
    ) -> Option<PixelBuffer> {
        settle(self.transfer(&mut Run::predicted(), content, embedding))
    }

    fn transfer(
        &self,
        run: &mut Run,
        content: &PixelBuffer,
        embedding: &StyleEmbedding,
    ) -> Result<PixelBuffer> {
        run.advance(Stage::Transferring);

        match self.transferer.transfer(content, embedding) {
            Ok(output) => {
                run.advance(Stage::Transferred);
                run.advance(Stage::Done);
                Ok(output)
            }
            Err(err) => {
                run.fail(Stage::TransferFailed);
                Err(err)
            }
        }
    }
}

fn settle(result: Result<PixelBuffer>) -> Option<PixelBuffer> {
    match result {
        Ok(output) => Some(output),
        Err(err) if err.is_contract_violation() => panic!("model contract violated: {err}"),
        Err(err) => {
            tracing::error!("Stylization failed: {err}");
            None
        }
    }
}
