//! Drainage network graph: node registry, edge validation and
//! topological ordering.
//!
//! Each node drains to at most one downstream child, so the topology is a
//! forest of converging chains rather than a general graph. The single
//! outgoing edge lives on the node itself ([`GraphNode::child`]); there is
//! no separate adjacency structure to keep in sync.

use std::collections::VecDeque;

use geo::Point;
use hashbrown::HashMap;
use itertools::Itertools;
use log::trace;

use super::node::{GraphNode, PointKey};
use crate::{Error, loading::ElevationSampler};

/// The drainage network: all nodes keyed by their spatial point.
///
/// Acyclicity is enforced at every insertion, so any graph handed to the
/// accumulation engine is already a valid DAG.
#[derive(Debug, Clone, Default)]
pub struct DrainageGraph {
    nodes: HashMap<PointKey, GraphNode>,
}

impl DrainageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, point: Point<f64>) -> bool {
        self.nodes.contains_key(&PointKey::new(point))
    }

    pub fn node(&self, point: Point<f64>) -> Option<&GraphNode> {
        self.nodes.get(&PointKey::new(point))
    }

    pub fn node_mut(&mut self, point: Point<f64>) -> Option<&mut GraphNode> {
        self.nodes.get_mut(&PointKey::new(point))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut GraphNode> {
        self.nodes.values_mut()
    }

    /// Inserts a node (overwriting any node at the same point), validating
    /// the edge it carries.
    ///
    /// If the node references a downstream point no node covers yet, a
    /// termination node is synthesized there first, with elevation taken
    /// from `sampler`, so every edge endpoint always resolves to a real
    /// node.
    ///
    /// The insert is atomic: on any error the graph is left exactly as it
    /// was before the call.
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedEdge`] if `child` and `distance_to_child` are
    ///   not both present or both absent
    /// - [`Error::CycleDetected`] if the edge would make the graph cyclic
    ///   (a self-loop counts as a cycle, never as "no child")
    /// - any error from the elevation sampler while synthesizing a
    ///   termination node
    pub fn add_node(
        &mut self,
        node: GraphNode,
        sampler: &dyn ElevationSampler,
    ) -> Result<(), Error> {
        if node.child.is_some() != node.distance_to_child.is_some() {
            return Err(Error::MalformedEdge { point: node.point });
        }

        self.check_acyclic_with(&node)?;

        if let Some(child) = node.child
            && !self.contains(child)
        {
            let elevation = sampler.sample_elevation(child)?;
            trace!("Synthesizing termination node at {child:?} (elevation {elevation})");
            self.nodes
                .insert(PointKey::new(child), GraphNode::termination(child, elevation));
        }

        self.nodes.insert(node.key(), node);
        Ok(())
    }

    /// Inserts nodes in sequence, re-validating acyclicity after every
    /// single insertion.
    ///
    /// # Errors
    ///
    /// Fails on the first node that is malformed or would introduce a
    /// cycle, without completing the remaining insertions; the error
    /// identifies that specific node.
    pub fn add_nodes(
        &mut self,
        nodes: Vec<GraphNode>,
        sampler: &dyn ElevationSampler,
    ) -> Result<(), Error> {
        for node in nodes {
            self.add_node(node, sampler)?;
        }
        Ok(())
    }

    /// Simulates inserting `node` and checks that no cycle appears.
    ///
    /// Any cycle created by this insert must run through the new edge, so
    /// it suffices to follow child pointers from the prospective child and
    /// see whether the chain returns to the inserted point. The existing
    /// graph is acyclic with at most one outgoing edge per node, so the
    /// walk always terminates.
    fn check_acyclic_with(&self, node: &GraphNode) -> Result<(), Error> {
        let start = node.key();
        let mut current = node.child;
        while let Some(point) = current {
            if PointKey::new(point) == start {
                return Err(Error::CycleDetected { point: node.point });
            }
            current = self
                .nodes
                .get(&PointKey::new(point))
                .and_then(|n| n.child);
        }
        Ok(())
    }

    /// Number of parents draining into each node.
    pub(crate) fn parent_counts(&self) -> HashMap<PointKey, usize> {
        let mut counts: HashMap<PointKey, usize> =
            self.nodes.keys().map(|key| (*key, 0)).collect();
        for node in self.nodes.values() {
            if let Some(child) = node.child {
                *counts.entry(PointKey::new(child)).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Total node ordering consistent with all edges: every node appears
    /// exactly once, after all of its upstream parents.
    ///
    /// Kahn's algorithm over parent counts. Root order (and therefore the
    /// full order) is deterministic: ties are broken by coordinates.
    ///
    /// # Errors
    ///
    /// [`Error::CycleDetected`] if the graph is not acyclic. Unreachable
    /// given insert-time validation, but checked rather than assumed.
    pub fn topological_order(&self) -> Result<Vec<PointKey>, Error> {
        let mut remaining_parents = self.parent_counts();

        let mut queue: VecDeque<PointKey> = remaining_parents
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(key, _)| *key)
            .sorted_by(|a, b| {
                a.point()
                    .x()
                    .total_cmp(&b.point().x())
                    .then(a.point().y().total_cmp(&b.point().y()))
            })
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(key) = queue.pop_front() {
            order.push(key);

            if let Some(child) = self.nodes[&key].child {
                let child_key = PointKey::new(child);
                let count = remaining_parents
                    .get_mut(&child_key)
                    .ok_or_else(|| Error::InvariantViolation(format!(
                        "Edge target {child:?} is not a node of the graph"
                    )))?;
                *count -= 1;
                if *count == 0 {
                    queue.push_back(child_key);
                }
            }
        }

        if order.len() != self.nodes.len() {
            // Some node never reached zero remaining parents; it sits on a
            // cycle. Attribute the error to one of them deterministically.
            let offending = self
                .nodes
                .keys()
                .copied()
                .filter(|key| !order.contains(key))
                .map(|key| key.point())
                .sorted_by(|a, b| a.x().total_cmp(&b.x()).then(a.y().total_cmp(&b.y())))
                .next()
                .ok_or_else(|| {
                    Error::InvariantViolation("Topological order lost nodes".to_string())
                })?;
            return Err(Error::CycleDetected { point: offending });
        }

        Ok(order)
    }
}
