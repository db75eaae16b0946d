//! Flow accumulation over the drainage network.
//!
//! A single-threaded fold over the topological order: every node is
//! processed exactly once, after all of its upstream parents. Processing a
//! node computes its locally generated runoff and sediment, merges in what
//! its parents delivered, applies pond trapping, and records the reduced
//! volume handed to the downstream child.

use hashbrown::HashMap;
use itertools::Itertools;
use log::{debug, info, trace};

use super::trapping::trapping_efficiency;
use crate::{
    Error,
    loading::RoadTypeParams,
    model::{ConnectedSegments, DrainageGraph, NodeKind, PointKey},
};

/// Per-run flow accumulation engine.
///
/// Holds the rainfall event size, the road-type parameter table and the
/// in-flight deliveries between parents and children. One engine value
/// drives one run; [`FlowEngine::prepare`] a fresh one per rainfall event.
#[derive(Debug)]
pub struct FlowEngine {
    rainfall_mm: f64,
    road_types: HashMap<String, RoadTypeParams>,
    /// Contributions recorded for nodes whose parents have been processed
    /// but which have not been processed themselves yet
    deliveries: HashMap<PointKey, ConnectedSegments>,
}

impl FlowEngine {
    /// Sets up an engine for one rainfall event.
    ///
    /// Any bookkeeping from a previous run is discarded by construction,
    /// so repeated runs with different event sizes cannot leak state into
    /// one another.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if the rainfall size is negative or
    /// not finite
    pub fn prepare(
        rainfall_event_mm: f64,
        road_types: HashMap<String, RoadTypeParams>,
    ) -> Result<Self, Error> {
        if !rainfall_event_mm.is_finite() || rainfall_event_mm < 0.0 {
            return Err(Error::InvalidData(format!(
                "rainfall event size must be finite and non-negative, got {rainfall_event_mm}"
            )));
        }

        Ok(Self {
            rainfall_mm: rainfall_event_mm,
            road_types,
            deliveries: HashMap::new(),
        })
    }

    /// Runs the accumulation pass over the whole graph.
    ///
    /// Source data is validated up front; once the traversal starts, the
    /// only failures left are programming-contract violations.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownRoadType`] / [`Error::InvalidData`] from
    ///   pre-validation, before any node is touched
    /// - [`Error::CycleDetected`] if the graph is somehow not acyclic
    ///   (defensive; insert-time validation makes this unreachable)
    /// - [`Error::InvariantViolation`] on contract violations, e.g. a pond
    ///   node without pond attributes
    pub fn run(&mut self, graph: &mut DrainageGraph) -> Result<(), Error> {
        self.validate_graph(graph)?;

        let order = graph.topological_order()?;
        info!(
            "Accumulating {} mm event over {} nodes",
            self.rainfall_mm,
            order.len()
        );

        self.deliveries.clear();
        for node in graph.nodes_mut() {
            node.reset_computed();
        }

        for key in order {
            self.process_node(graph, key)?;
        }

        let (runoff, sediment) = outlet_totals(graph);
        info!("Run complete: {runoff:.3} runoff and {sediment:.3} sediment reached the outlets");
        Ok(())
    }

    /// Checks everything that may be wrong with the *data* before the
    /// traversal starts, so no data error ever surfaces mid-run.
    fn validate_graph(&self, graph: &DrainageGraph) -> Result<(), Error> {
        let mut unknown: Vec<&str> = Vec::new();
        for node in graph.nodes() {
            for road_type in node.directly_connected.area.keys() {
                if !self.road_types.contains_key(road_type) {
                    unknown.push(road_type.as_str());
                }
            }

            if let Some(pond) = &node.pond {
                if !pond.max_capacity.is_finite()
                    || !pond.used_capacity.is_finite()
                    || pond.max_capacity < 0.0
                    || pond.used_capacity < 0.0
                {
                    return Err(Error::InvalidData(format!(
                        "Pond at {:?} has non-finite or negative capacity",
                        node.point
                    )));
                }
                if pond.used_capacity > pond.max_capacity {
                    return Err(Error::InvalidData(format!(
                        "Pond at {:?} has used capacity {} above max capacity {}",
                        node.point, pond.used_capacity, pond.max_capacity
                    )));
                }
            }
        }

        if !unknown.is_empty() {
            return Err(Error::UnknownRoadType(
                unknown.into_iter().unique().sorted().join(", "),
            ));
        }
        Ok(())
    }

    fn process_node(&mut self, graph: &mut DrainageGraph, key: PointKey) -> Result<(), Error> {
        let inherited = self.deliveries.remove(&key);

        let node = graph.node_mut(key.point()).ok_or_else(|| {
            Error::InvariantViolation(format!(
                "Topological order names {:?} but the graph holds no such node",
                key.point()
            ))
        })?;

        // Local generation from directly connected segments. Road types
        // with zero runoff contribute no sediment term at all.
        let rainfall_m = self.rainfall_mm / 1000.0;
        for (road_type, area) in &node.directly_connected.area {
            let params = self.road_types.get(road_type).ok_or_else(|| {
                Error::InvariantViolation(format!(
                    "Road type '{road_type}' disappeared from the table after validation"
                ))
            })?;

            let runoff = area * rainfall_m * params.runoff_coefficient;
            node.directly_connected
                .runoff
                .insert(road_type.clone(), runoff);
            if runoff > 0.0 {
                node.directly_connected
                    .sediment
                    .insert(road_type.clone(), rainfall_m * params.erosion_rate * area);
            }
        }

        // Upstream accumulation: sparse union-sum of the local aggregate
        // with everything the parents delivered.
        node.all_connected = node.directly_connected.clone();
        if let Some(delivery) = inherited {
            node.all_connected.merge(&delivery);
        }

        let total_runoff = node.all_connected.runoff_total();
        let total_sediment = node.all_connected.sediment_total();
        node.total_runoff = Some(total_runoff);
        node.total_sediment = Some(total_sediment);

        let mut trapped = 0.0;
        if node.kind == NodeKind::Pond && total_runoff > 0.0 {
            let pond = node.pond.as_mut().ok_or_else(|| {
                Error::InvariantViolation(format!(
                    "Pond node at {:?} carries no pond attributes",
                    key.point()
                ))
            })?;

            let trapped_runoff = pond.max_capacity.min(total_runoff);
            let efficiency =
                trapping_efficiency(pond.available_capacity(), total_runoff, trapped_runoff);
            pond.trapped_runoff = Some(trapped_runoff);
            pond.efficiency = Some(efficiency);
            pond.trapped_sediment = Some(total_sediment * efficiency);
            trapped = trapped_runoff;

            debug!(
                "Pond at {:?}: trapped {trapped_runoff:.3} of {total_runoff:.3} at efficiency {efficiency:.3}",
                key.point()
            );
        }

        // Delivery to the child: whatever survives trapping and travel
        // loss. Exhausted flow is a normal outcome, not an error.
        if let Some(child) = node.child {
            // Nodes assembled outside the builder may carry no precomputed
            // travel cost; treat the path as lossless.
            let cost = node.cost_to_child.unwrap_or(0.0);
            let volume = total_runoff - trapped - cost;

            if volume > 0.0 {
                let ratio = volume / total_runoff;
                let mut delivery = node.all_connected.clone();
                scale_in_place(&mut delivery.runoff, ratio);
                scale_in_place(&mut delivery.sediment, ratio);

                trace!(
                    "Delivering {volume:.3} from {:?} to {child:?} (ratio {ratio:.3})",
                    key.point()
                );
                self.deliveries
                    .entry(PointKey::new(child))
                    .or_default()
                    .merge(&delivery);
            } else {
                trace!(
                    "Flow from {:?} exhausted before reaching {child:?} (deficit {:.3})",
                    key.point(),
                    -volume
                );
            }
        }

        Ok(())
    }
}

fn scale_in_place(values: &mut HashMap<String, f64>, factor: f64) {
    for value in values.values_mut() {
        *value *= factor;
    }
}

/// Runoff and sediment totals over the termination nodes, i.e. what left
/// the modeled network.
pub fn outlet_totals(graph: &DrainageGraph) -> (f64, f64) {
    graph
        .nodes()
        .filter(|node| node.kind == NodeKind::Termination)
        .fold((0.0, 0.0), |(runoff, sediment), node| {
            (
                runoff + node.total_runoff.unwrap_or(0.0),
                sediment + node.total_sediment.unwrap_or(0.0),
            )
        })
}

/// Sediment mass retained by all ponds during the run.
pub fn trapped_sediment_total(graph: &DrainageGraph) -> f64 {
    graph
        .nodes()
        .filter_map(|node| node.pond.as_ref())
        .filter_map(|pond| pond.trapped_sediment)
        .sum()
}
