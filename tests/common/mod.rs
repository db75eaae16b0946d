//! Shared fixtures for integration tests
#![allow(dead_code)] // not every test crate uses every fixture

use geo::Point;
use roadshed::prelude::*;

/// Elevation sampler returning the same elevation everywhere
pub struct FlatSampler(pub f64);

impl ElevationSampler for FlatSampler {
    fn sample_elevation(&self, _point: Point<f64>) -> Result<f64, Error> {
        Ok(self.0)
    }
}

/// In-memory drainage source handing out pre-built node lists
pub struct StaticSource {
    pub drains: Vec<GraphNode>,
    pub ponds: Vec<GraphNode>,
}

impl DrainageSource for StaticSource {
    fn drain_nodes(&self) -> Result<Vec<GraphNode>, Error> {
        Ok(self.drains.clone())
    }

    fn pond_nodes(&self) -> Result<Vec<GraphNode>, Error> {
        Ok(self.ponds.clone())
    }
}

pub fn drain(x: f64, y: f64, child: Option<(f64, f64)>, distance: Option<f64>) -> GraphNode {
    let mut node = GraphNode::new(Point::new(x, y), NodeKind::Drain, 10.0);
    node.child = child.map(|(cx, cy)| Point::new(cx, cy));
    node.distance_to_child = distance;
    node
}

pub fn pond(
    x: f64,
    y: f64,
    max_capacity: f64,
    used_capacity: f64,
    child: Option<(f64, f64)>,
    distance: Option<f64>,
) -> GraphNode {
    let mut node = GraphNode::new(Point::new(x, y), NodeKind::Pond, 5.0);
    node.pond = Some(PondAttributes::new(max_capacity, used_capacity));
    node.child = child.map(|(cx, cy)| Point::new(cx, cy));
    node.distance_to_child = distance;
    node
}

/// Attaches one directly-connected road aggregate to a node
pub fn attach_segments(node: &mut GraphNode, road_type: &str, indices: &[u64], area: f64) {
    node.directly_connected
        .indices
        .insert(road_type.to_string(), indices.to_vec());
    node.directly_connected
        .length
        .insert(road_type.to_string(), area / 4.0);
    node.directly_connected
        .area
        .insert(road_type.to_string(), area);
}

pub fn road_table(entries: &[(&str, f64, f64)]) -> Vec<(String, RoadTypeParams)> {
    entries
        .iter()
        .map(|(name, runoff_coefficient, erosion_rate)| {
            (
                name.to_string(),
                RoadTypeParams {
                    runoff_coefficient: *runoff_coefficient,
                    erosion_rate: *erosion_rate,
                },
            )
        })
        .collect()
}

pub fn config(rainfall_values: &[f64], travel_cost: f64, table: &[(&str, f64, f64)]) -> ModelConfig {
    ModelConfig {
        rainfall_values: rainfall_values.to_vec(),
        travel_cost,
        road_types: road_table(table).into_iter().collect(),
    }
}
