//! Collaborator contracts consumed during model assembly.
//!
//! All geometry, CRS and raster work happens behind these traits: the core
//! receives fully populated nodes and never touches spatial source files
//! itself.

use geo::Point;

use crate::{Error, model::GraphNode};

/// Supplies the drain and pond nodes of the network, ready for insertion.
///
/// Implementations have already resolved elevation, directly-connected
/// road-segment aggregates, the downstream point each node drains to and
/// the distance to reach it, and pond capacities.
pub trait DrainageSource {
    /// # Errors
    ///
    /// Returns an error if the underlying drain data cannot be read
    fn drain_nodes(&self) -> Result<Vec<GraphNode>, Error>;

    /// # Errors
    ///
    /// Returns an error if the underlying pond data cannot be read
    fn pond_nodes(&self) -> Result<Vec<GraphNode>, Error>;
}

/// Samples terrain elevation at an arbitrary point.
///
/// Used only when the graph synthesizes a termination node for an edge
/// target that no source node covers.
pub trait ElevationSampler {
    /// # Errors
    ///
    /// Returns an error if the point falls outside the covered area or the
    /// raster holds no data there
    fn sample_elevation(&self, point: Point<f64>) -> Result<f64, Error>;
}
