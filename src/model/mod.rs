//! Model assets: where blobs come from, how they are cached, and the tensor
//! contract each model declares.

mod contract;
mod repository;
mod source;

pub use contract::{ModelKind, BOTTLENECK_SIZE, CONTENT_IMAGE_SIZE, STYLE_IMAGE_SIZE};
pub use repository::ModelRepository;
pub use source::{AssetSource, DirectoryAssets, MemoryAssets, ModelBlob};
