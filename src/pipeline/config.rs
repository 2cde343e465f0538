use crate::error::{Error, Result};
use crate::image::NormalizationPolicy;
use crate::model::ModelKind;

/// Configuration for the stylization pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    /// Asset name of the style-prediction model.
    pub style_model: String,

    /// Asset name of the style-transfer model.
    pub transfer_model: String,

    /// Normalization the prediction model was trained with.
    pub style_normalization: NormalizationPolicy,

    /// Normalization the transfer model was trained with.
    pub content_normalization: NormalizationPolicy,

    /// Center-crop content images to a square before resizing.
    pub crop_content: bool,

    /// Output JPEG quality (1-100).
    pub output_quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            style_model: ModelKind::StylePrediction.default_name().to_string(),
            transfer_model: ModelKind::StyleTransfer.default_name().to_string(),
            // Both models take inputs in [0, 1].
            style_normalization: NormalizationPolicy::UNIT,
            content_normalization: NormalizationPolicy::UNIT,
            crop_content: true,
            output_quality: 95,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if self.style_model.trim().is_empty() {
            return Err(Error::InvalidParameter {
                name: "style_model".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        if self.transfer_model.trim().is_empty() {
            return Err(Error::InvalidParameter {
                name: "transfer_model".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        self.style_normalization.validate("style_normalization")?;
        self.content_normalization.validate("content_normalization")?;

        if !(1..=100).contains(&self.output_quality) {
            return Err(Error::InvalidParameter {
                name: "output_quality".to_string(),
                reason: "must be between 1 and 100".to_string(),
            });
        }

        Ok(())
    }
}
