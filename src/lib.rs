//! # Pastiche
//!
//! Two-stage arbitrary style transfer. A style-prediction model condenses a
//! style image into a 100-value embedding; a style-transfer model applies that
//! embedding to a content image.
//!
//! The crate owns the deterministic part: cropping, resizing and normalizing
//! pixels into the exact tensor shapes each model declares, sequencing the two
//! inference passes, and decoding the result back into pixels. Models come from
//! an injected [`ModelRepository`] and run on an injected [`InferenceEngine`].
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use pastiche::{Config, DirectoryAssets, ModelRepository, OnnxEngine, StylizationPipeline};
//!
//! # fn main() -> pastiche::Result<()> {
//! let models = Arc::new(ModelRepository::new(DirectoryAssets::new("models")));
//! let pipeline = StylizationPipeline::new(Config::default(), models, Arc::new(OnnxEngine::new()))?;
//!
//! let content = pastiche::image::load_image("photo.jpg")?;
//! let style = pastiche::image::load_image("starry_night.jpg")?;
//!
//! if let Some(stylized) = pipeline.stylize(&content, &style) {
//!     pastiche::image::save_image(&stylized, "stylized.png", 95)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod artwork;
pub mod error;
pub mod image;
pub mod inference;
pub mod model;
pub mod pipeline;
pub mod style;
pub mod tensor;

pub use artwork::{Artwork, ArtworkCatalog};
pub use error::{Error, Result};
pub use crate::image::{NormalizationPolicy, PixelBuffer};
pub use inference::{InferenceEngine, OnnxEngine};
pub use model::{AssetSource, DirectoryAssets, MemoryAssets, ModelBlob, ModelRepository};
pub use pipeline::{Config, Stage, StylizationPipeline};
pub use style::{StyleEmbedding, StylePredictor, StyleTransferer};
pub use tensor::Tensor;
