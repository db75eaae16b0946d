//! This module is responsible for loading configuration and source data
//! and assembling a validated drainage model.

mod builder;
mod config;
mod sources;

pub use builder::{DrainageModel, EventSummary, create_drainage_model};
pub use config::{ModelConfig, RoadTypeParams};
pub use sources::{DrainageSource, ElevationSampler};
