//! Data model for the drainage network
//!
//! Contains the typed representation of drainage nodes and the graph that
//! owns them.

pub mod graph;
pub mod node;

pub use graph::DrainageGraph;
pub use node::{ConnectedSegments, GraphNode, NodeKind, PointKey, PondAttributes};
