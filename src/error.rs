//! Custom error types for pastiche.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed error raised from inside an inference engine.
pub type EngineError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for the pastiche library.
#[derive(Error, Debug)]
pub enum Error {
    /// The named model artifact does not exist in the asset store.
    #[error("model {name} not found in asset store")]
    ModelNotFound { name: String },

    /// The named model artifact exists but could not be read.
    #[error("failed to read model {name}: {source}")]
    ModelRead {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// A tensor does not match the shape the model contract declares.
    #[error("tensor shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// The inference engine failed while loading or running a model.
    #[error("inference failed for model {model}: {source}")]
    Inference {
        model: String,
        #[source]
        source: EngineError,
    },

    /// Failed to load an image file.
    #[error("failed to load image from {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Failed to save an image file.
    #[error("failed to save image to {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Image dimensions are not supported.
    #[error("unsupported image dimensions {width}x{height}: {reason}")]
    UnsupportedDimensions {
        width: u32,
        height: u32,
        reason: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// A built-in artwork has no image file in the catalog directory.
    #[error("artwork {name} not found in {dir}")]
    ArtworkNotFound { name: String, dir: PathBuf },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn inference(model: &str, source: impl Into<EngineError>) -> Self {
        Self::Inference {
            model: model.to_string(),
            source: source.into(),
        }
    }

    /// Whether this error is a broken contract between codec and model rather
    /// than a runtime failure.
    #[must_use]
    pub const fn is_contract_violation(&self) -> bool {
        matches!(self, Self::ShapeMismatch { .. })
    }
}

/// Result type alias for pastiche operations.
pub type Result<T> = std::result::Result<T, Error>;
