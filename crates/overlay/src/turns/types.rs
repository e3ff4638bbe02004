//! Turn records, operation tags, clusters and node ids.
//!
//! Kept as plain data so `enrich`, `switch_detector` and `traverse` can mutate
//! fields in place while addressing everything by index.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::geometry::{Point, SegmentId};

/// Role of one input at a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Operation {
    #[default]
    None,
    Union,
    Intersection,
    Blocked,
    Continue,
}

/// How the two segments meet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    None,
    Crosses,
    Touch,
    TouchInterior,
    Equal,
    Collinear,
}

/// Fraction along a segment, in `[0, 1)` after normalization (the end point of
/// an open linestring keeps `1`); totally ordered.
#[derive(Clone, Copy, Debug, Default)]
pub struct SegmentRatio(f64);

impl SegmentRatio {
    pub const ZERO: SegmentRatio = SegmentRatio(0.0);
    pub const ONE: SegmentRatio = SegmentRatio(1.0);

    pub fn new(value: f64) -> Self {
        Self(value)
    }
    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

impl PartialEq for SegmentRatio {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for SegmentRatio {}
impl PartialOrd for SegmentRatio {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for SegmentRatio {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Fields attached by enrichment, the switch detector and traversal.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Enriched {
    /// Next turn reached walking forward along this operation's ring.
    pub travels_to_ip_index: Option<usize>,
    /// Last ring vertex to copy before reaching that turn.
    pub travels_to_vertex_index: Option<usize>,
    pub region_id: Option<usize>,
    pub component_id: Option<usize>,
    /// Covered sector run left of the outgoing edge (clustered turns).
    pub zone: Option<usize>,
    pub startable: bool,
    pub is_traversed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurnOperation {
    pub seg_id: SegmentId,
    pub fraction: SegmentRatio,
    pub operation: Operation,
    pub enriched: Enriched,
}

impl TurnOperation {
    pub fn new(seg_id: SegmentId, fraction: SegmentRatio) -> Self {
        Self {
            seg_id,
            fraction,
            operation: Operation::None,
            enriched: Enriched::default(),
        }
    }

    /// Position key on the owning ring.
    #[inline]
    pub fn position(&self) -> (SegmentId, SegmentRatio) {
        (self.seg_id, self.fraction)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Turn {
    pub point: Point,
    pub operations: [TurnOperation; 2],
    pub method: Method,
    pub discarded: bool,
    pub cluster_id: Option<usize>,
    /// Set by the switch detector on unclustered UU/II turns.
    pub switch_source: bool,
}

impl Turn {
    pub fn new(point: Point, operations: [TurnOperation; 2], method: Method) -> Self {
        Self {
            point,
            operations,
            method,
            discarded: false,
            cluster_id: None,
            switch_source: false,
        }
    }

    #[inline]
    pub fn both(&self, op: Operation) -> bool {
        self.operations[0].operation == op && self.operations[1].operation == op
    }

    #[inline]
    pub fn has(&self, op: Operation) -> bool {
        self.operations[0].operation == op || self.operations[1].operation == op
    }

    /// One operation is `a` and the other `b` (order free).
    #[inline]
    pub fn combination(&self, a: Operation, b: Operation) -> bool {
        self.has(a) && self.has(b)
    }

    #[inline]
    pub fn blocked(&self) -> bool {
        self.both(Operation::Blocked)
    }

    #[inline]
    pub fn is_clustered(&self) -> bool {
        self.cluster_id.is_some()
    }

    /// Both operations belong to the same input.
    #[inline]
    pub fn is_self_turn(&self) -> bool {
        self.operations[0].seg_id.source_index == self.operations[1].seg_id.source_index
    }
}

/// Address of one operation in the turn arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TurnOperationId {
    pub turn_index: usize,
    pub operation_index: usize,
}

impl TurnOperationId {
    pub fn new(turn_index: usize, operation_index: usize) -> Self {
        Self {
            turn_index,
            operation_index,
        }
    }
}

/// Co-located turns handled as one decision point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cluster {
    pub turn_indices: BTreeSet<usize>,
    /// Sectors around the point covered by neither input.
    pub open_count: usize,
}

pub type Clusters = BTreeMap<usize, Cluster>;

/// Graph node: a lone turn or a whole cluster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeId {
    Turn(usize),
    Cluster(usize),
}

#[inline]
pub fn node_id(turns: &[Turn], turn_index: usize) -> NodeId {
    match turns[turn_index].cluster_id {
        Some(c) => NodeId::Cluster(c),
        None => NodeId::Turn(turn_index),
    }
}

/// Non-discarded turn indices making up `node`.
pub fn turn_indices_of(turns: &[Turn], clusters: &Clusters, node: NodeId) -> Vec<usize> {
    match node {
        NodeId::Turn(i) => vec![i],
        NodeId::Cluster(c) => clusters
            .get(&c)
            .map(|cl| {
                cl.turn_indices
                    .iter()
                    .copied()
                    .filter(|&i| !turns[i].discarded)
                    .collect()
            })
            .unwrap_or_default(),
    }
}
