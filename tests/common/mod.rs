#![allow(dead_code)]

pub mod fake_engine;
pub mod synthetic_image;

use std::sync::Arc;

use pastiche::{Config, MemoryAssets, ModelRepository, StylizationPipeline};

use fake_engine::FakeEngine;

/// Memory asset store holding both default models.
pub fn both_models() -> MemoryAssets {
    let config = Config::default();
    MemoryAssets::new()
        .with(&config.style_model, b"predict".to_vec())
        .with(&config.transfer_model, b"transfer".to_vec())
}

/// Pipeline over `assets` with default configuration and the given engine.
pub fn pipeline_with(assets: MemoryAssets, engine: Arc<FakeEngine>) -> StylizationPipeline {
    let models = Arc::new(ModelRepository::new(assets));
    StylizationPipeline::new(Config::default(), models, engine).expect("default config is valid")
}
