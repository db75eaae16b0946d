//! Drainage network components - node kinds, per-road-type aggregates
//! and pond attributes

use std::hash::{Hash, Hasher};

use geo::Point;
use hashbrown::HashMap;

/// Kind of a drainage node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Convergence point where road runoff enters the network
    Drain,
    /// Detention structure that stores and partially filters runoff
    Pond,
    /// Synthetic point where flow leaves the modeled network
    Termination,
}

/// Hashable key for a node's spatial point.
///
/// Coordinates are compared bit-exactly: two nodes are the same node iff
/// their source points carry identical coordinates. Sources must hand over
/// the same coordinates for the same physical point; the builder never
/// derives new ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointKey(Point<f64>);

impl PointKey {
    pub fn new(point: Point<f64>) -> Self {
        Self(point)
    }

    pub fn point(&self) -> Point<f64> {
        self.0
    }
}

impl From<Point<f64>> for PointKey {
    fn from(point: Point<f64>) -> Self {
        Self(point)
    }
}

impl Eq for PointKey {}

impl Hash for PointKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.x().to_bits().hash(state);
        self.0.y().to_bits().hash(state);
    }
}

/// Per-road-type aggregate of the segments draining into a node.
///
/// Every node carries two of these: the *directly connected* segments
/// (flow enters with no intermediate node) and the *all connected*
/// aggregate (directly connected plus everything inherited from upstream
/// parents during the accumulation pass).
///
/// Runoff and sediment are derived from area and are never set
/// independently: a key present in `runoff` or `sediment` is always
/// present in `area`.
#[derive(Debug, Clone, Default)]
pub struct ConnectedSegments {
    /// Source segment identifiers per road type
    pub indices: HashMap<String, Vec<u64>>,
    /// Summed segment length per road type
    pub length: HashMap<String, f64>,
    /// Summed segment area per road type
    pub area: HashMap<String, f64>,
    /// Computed runoff volume per road type
    pub runoff: HashMap<String, f64>,
    /// Computed sediment mass per road type
    pub sediment: HashMap<String, f64>,
}

impl ConnectedSegments {
    /// Sparse union-sum merge of another aggregate into this one.
    ///
    /// Indices are concatenated and numeric fields summed key-wise; a key
    /// present in only one side is carried through unchanged.
    pub fn merge(&mut self, other: &ConnectedSegments) {
        for (road_type, idx) in &other.indices {
            self.indices
                .entry(road_type.clone())
                .or_default()
                .extend(idx.iter().copied());
        }
        merge_sum(&mut self.length, &other.length);
        merge_sum(&mut self.area, &other.area);
        merge_sum(&mut self.runoff, &other.runoff);
        merge_sum(&mut self.sediment, &other.sediment);
    }

    /// Sum of the per-road-type runoff values
    pub fn runoff_total(&self) -> f64 {
        self.runoff.values().sum()
    }

    /// Sum of the per-road-type sediment values
    pub fn sediment_total(&self) -> f64 {
        self.sediment.values().sum()
    }
}

fn merge_sum(into: &mut HashMap<String, f64>, from: &HashMap<String, f64>) {
    for (road_type, value) in from {
        *into.entry(road_type.clone()).or_insert(0.0) += value;
    }
}

/// Detention pond attributes, present only on [`NodeKind::Pond`] nodes.
///
/// The computed fields stay `None` until the node has been processed by
/// the accumulation engine.
#[derive(Debug, Clone)]
pub struct PondAttributes {
    /// Maximum storage capacity of the pond
    pub max_capacity: f64,
    /// Capacity already occupied before the event
    pub used_capacity: f64,
    /// Runoff volume trapped during the event
    pub trapped_runoff: Option<f64>,
    /// Sediment trapping efficiency in [0, 1]
    pub efficiency: Option<f64>,
    /// Sediment mass trapped during the event
    pub trapped_sediment: Option<f64>,
}

impl PondAttributes {
    pub fn new(max_capacity: f64, used_capacity: f64) -> Self {
        Self {
            max_capacity,
            used_capacity,
            trapped_runoff: None,
            efficiency: None,
            trapped_sediment: None,
        }
    }

    /// Remaining storage available for the event
    pub fn available_capacity(&self) -> f64 {
        self.max_capacity - self.used_capacity
    }

    pub(crate) fn reset_computed(&mut self) {
        self.trapped_runoff = None;
        self.efficiency = None;
        self.trapped_sediment = None;
    }
}

/// A node of the drainage network, identified by its spatial point.
///
/// Identity (point, kind) is fixed at construction; only the derived
/// fields are written, exactly once per run, by the accumulation pass.
#[derive(Debug, Clone)]
pub struct GraphNode {
    /// Spatial point acting as the node key
    pub point: Point<f64>,
    pub kind: NodeKind,
    /// Terrain elevation at the point
    pub elevation: f64,
    /// Segments whose flow enters this node with no intermediate node
    pub directly_connected: ConnectedSegments,
    /// Directly connected segments plus everything inherited from parents
    pub all_connected: ConnectedSegments,
    /// Pond attributes, set iff `kind` is [`NodeKind::Pond`]
    pub pond: Option<PondAttributes>,
    /// Total runoff volume leaving local generation + accumulation
    pub total_runoff: Option<f64>,
    /// Total sediment mass after accumulation
    pub total_sediment: Option<f64>,
    /// Downstream point this node drains to
    pub child: Option<Point<f64>>,
    /// Length of the flow path to the child
    pub distance_to_child: Option<f64>,
    /// Travel loss consumed delivering flow to the child
    pub cost_to_child: Option<f64>,
}

impl GraphNode {
    pub fn new(point: Point<f64>, kind: NodeKind, elevation: f64) -> Self {
        Self {
            point,
            kind,
            elevation,
            directly_connected: ConnectedSegments::default(),
            all_connected: ConnectedSegments::default(),
            pond: None,
            total_runoff: None,
            total_sediment: None,
            child: None,
            distance_to_child: None,
            cost_to_child: None,
        }
    }

    /// Synthetic terminal node marking where flow exits the network
    pub(crate) fn termination(point: Point<f64>, elevation: f64) -> Self {
        Self::new(point, NodeKind::Termination, elevation)
    }

    pub fn key(&self) -> PointKey {
        PointKey(self.point)
    }

    /// Clears everything the accumulation pass writes, so repeated runs
    /// with different rainfall sizes do not leak state.
    pub(crate) fn reset_computed(&mut self) {
        self.all_connected = ConnectedSegments::default();
        self.directly_connected.runoff.clear();
        self.directly_connected.sediment.clear();
        self.total_runoff = None;
        self.total_sediment = None;
        if let Some(pond) = &mut self.pond {
            pond.reset_computed();
        }
    }
}
