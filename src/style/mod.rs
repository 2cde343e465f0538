//! The two inference stages: style prediction and style transfer.

mod embedding;
mod predict;
mod transfer;

pub use embedding::StyleEmbedding;
pub use predict::StylePredictor;
pub use transfer::StyleTransferer;
