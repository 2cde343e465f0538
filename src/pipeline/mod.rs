//! Two-stage style transfer pipeline.

mod config;
mod stylize;

pub use config::Config;
pub use stylize::{Stage, StylizationPipeline};
