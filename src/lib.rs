//! Road-runoff drainage network model.
//!
//! Models how surface runoff and sediment generated along road segments
//! converge, travel downhill, and are partially trapped by detention
//! ponds before reaching a watershed outlet, for a chosen rainfall event
//! size on a fixed drainage topology.
//!
//! The network is a DAG of drain, pond and synthetic termination nodes in
//! which every node drains to at most one downstream child. Acyclicity is
//! validated at every insertion; the accumulation engine then folds over
//! the topological order, computing per-node runoff, sediment and pond
//! trapping efficiency and propagating the reduced volume downstream.
//!
//! Geospatial IO (vector/raster files, CRS checks, connectivity tracing)
//! is deliberately outside this crate: adapters supply fully populated
//! nodes through the [`loading::DrainageSource`] and
//! [`loading::ElevationSampler`] contracts.

pub mod engine;
pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;

pub use error::Error;

pub use crate::engine::{FlowEngine, outlet_totals, trapped_sediment_total};
pub use crate::loading::{
    DrainageModel, DrainageSource, ElevationSampler, EventSummary, ModelConfig, RoadTypeParams,
    create_drainage_model,
};
pub use crate::model::{
    ConnectedSegments, DrainageGraph, GraphNode, NodeKind, PointKey, PondAttributes,
};
