//! Switch detector: regions of rings and source switching at UU/II turns.
//!
//! Purpose
//! - Partition the rings that carry turns into regions: rings connected by
//!   turns that do not require switching between the inputs.
//! - Attach the region id to every operation and decide, per unclustered
//!   UU (union pass) or II (intersection pass) turn, whether traversal changes
//!   source there (`Turn::switch_source`).
//!
//! Why this design
//! - Regions are found by flood fill over a ring → turns → ring graph with an
//!   explicit stack; deep chains of touching rings cannot overflow the call stack.
//! - At a UU turn the two rings touch from outside each other. Union traversal
//!   only switches when the rings are already one region, so two shapes
//!   touching at a single point stay two output rings, while a touch closing a
//!   hole splits into an exterior and a hole ring.
//! - At an II turn the two outgoing edges open two separate intersection
//!   wedges; intersection traversal always switches there.
//!
//! References
//! - Code cross-refs: `enrich::enrich_and_cluster` (zones, clusters),
//!   `traverse::traverse` (consumer of `switch_source` and `component_id`).

use std::collections::{BTreeMap, BTreeSet};

use crate::geometry::RingId;
use crate::turns::{Clusters, Operation, Turn};

#[derive(Clone, Debug, Default)]
struct RingProperties {
    turn_indices: BTreeSet<usize>,
    region_id: Option<usize>,
}

/// Per-pass region bookkeeping over one turn vector.
struct RegionDetector<'a> {
    turns: &'a mut [Turn],
    clusters: &'a Clusters,
    target: Operation,
    merged_ring_properties: BTreeMap<RingId, RingProperties>,
    next_region_id: usize,
}

impl<'a> RegionDetector<'a> {
    fn new(turns: &'a mut [Turn], clusters: &'a Clusters, target: Operation) -> Self {
        Self {
            turns,
            clusters,
            target,
            merged_ring_properties: BTreeMap::new(),
            next_region_id: 0,
        }
    }

    fn collect_ring_properties(&mut self) {
        for (t, turn) in self.turns.iter().enumerate() {
            if turn.discarded {
                continue;
            }
            for op in &turn.operations {
                self.merged_ring_properties
                    .entry(op.seg_id.ring_id())
                    .or_default()
                    .turn_indices
                    .insert(t);
            }
        }
    }

    /// Does `turn` tie its two rings into one region for this pass?
    fn connects_same_region(&self, turn: &Turn) -> bool {
        if turn.discarded {
            return false;
        }
        if !turn.is_clustered() {
            return !(turn.both(Operation::Union) || turn.both(Operation::Intersection));
        }
        if self.target == Operation::Union {
            // A single uncovered sector leaves one covered run: one zone around the point.
            let single_zone = turn
                .cluster_id
                .and_then(|c| self.clusters.get(&c))
                .is_some_and(|c| c.open_count <= 1);
            single_zone || turn.operations[0].enriched.zone == turn.operations[1].enriched.zone
        } else {
            !(turn.both(Operation::Intersection)
                || turn.combination(Operation::Intersection, Operation::Union))
        }
    }

    fn create_region(&mut self, ring: RingId) {
        let region = self.next_region_id;
        self.next_region_id += 1;
        self.propagate_region(ring, region);
    }

    fn propagate_region(&mut self, start: RingId, region: usize) {
        let mut stack = vec![start];
        while let Some(ring) = stack.pop() {
            let turn_indices = match self.merged_ring_properties.get_mut(&ring) {
                Some(props) if props.region_id.is_none() => {
                    props.region_id = Some(region);
                    props.turn_indices.clone()
                }
                _ => continue,
            };
            for t in turn_indices {
                let turn = &self.turns[t];
                if !self.connects_same_region(turn) {
                    continue;
                }
                for op in &turn.operations {
                    let other = op.seg_id.ring_id();
                    let unassigned = self
                        .merged_ring_properties
                        .get(&other)
                        .is_some_and(|p| p.region_id.is_none());
                    if unassigned {
                        stack.push(other);
                    }
                }
            }
        }
    }

    fn assign_region_ids_to_enriched(&mut self) {
        for turn in self.turns.iter_mut().filter(|t| !t.discarded) {
            for op in turn.operations.iter_mut() {
                let region = self
                    .merged_ring_properties
                    .get(&op.seg_id.ring_id())
                    .and_then(|p| p.region_id);
                op.enriched.region_id = region;
                op.enriched.component_id = region;
            }
        }
    }

    fn assign_switch_sources(&mut self) {
        let union_pass = self.target == Operation::Union;
        for turn in self.turns.iter_mut() {
            turn.switch_source = false;
            if turn.discarded || turn.is_clustered() {
                continue;
            }
            let same_region = turn.operations[0].enriched.region_id
                == turn.operations[1].enriched.region_id;
            if union_pass && turn.both(Operation::Union) {
                turn.switch_source = same_region;
            } else if !union_pass && turn.both(Operation::Intersection) {
                turn.switch_source = true;
            }
        }
    }

    fn assign_connected_regions(&self) -> BTreeSet<usize> {
        self.merged_ring_properties
            .values()
            .filter_map(|p| p.region_id)
            .collect()
    }

    fn iterate(&mut self) -> BTreeSet<usize> {
        self.collect_ring_properties();
        let rings: Vec<RingId> = self.merged_ring_properties.keys().copied().collect();
        for ring in rings {
            let unassigned = self
                .merged_ring_properties
                .get(&ring)
                .is_some_and(|p| p.region_id.is_none());
            if unassigned {
                self.create_region(ring);
            }
        }
        self.assign_region_ids_to_enriched();
        self.assign_switch_sources();
        self.assign_connected_regions()
    }
}

/// Assign region ids (and component ids) to all operations and set
/// `switch_source` on unclustered UU/II turns. Returns the distinct region ids.
///
/// `target` is `Operation::Union` or `Operation::Intersection`; difference
/// passes use `Intersection` on a reversed input.
pub fn detect_regions(
    turns: &mut [Turn],
    clusters: &Clusters,
    target: Operation,
) -> BTreeSet<usize> {
    let mut detector = RegionDetector::new(turns, clusters, target);
    let regions = detector.iterate();
    tracing::debug!(
        rings = detector.merged_ring_properties.len(),
        regions = regions.len(),
        "detected regions"
    );
    regions
}
