//! Convenience re-exports of the main model and engine types

pub use crate::Error;
pub use crate::engine::FlowEngine;
pub use crate::loading::{
    DrainageModel, DrainageSource, ElevationSampler, EventSummary, ModelConfig, RoadTypeParams,
    create_drainage_model,
};
pub use crate::model::{
    ConnectedSegments, DrainageGraph, GraphNode, NodeKind, PointKey, PondAttributes,
};
