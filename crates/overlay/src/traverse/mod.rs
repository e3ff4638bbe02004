//! Traversal: walk the enriched turn graph and emit output rings.
//!
//! Purpose
//! - For one target operation (union or intersection), start from every
//!   eligible operation, follow `travels_to` links node by node while copying
//!   boundary vertices, and close a ring when the walk returns to its start node.
//!
//! Why this design
//! - Per-attempt state machine: Idle → Started → Continuing → Finished or Stuck.
//!   Visited operations of an attempt live in a scratch set that is merged into
//!   the finished set only on success, so an abandoned attempt leaves no trace.
//! - At clusters the outgoing edge is the sharpest left turn from the incoming
//!   ray: interiors lie left of every boundary, so this pairs each incoming
//!   edge with the edge closing the same covered run.
//! - A loop cap bounded by the number of operations turns corrupted links into
//!   an abandoned attempt instead of an endless walk.
//!
//! References
//! - Code cross-refs: `enrich::enrich_and_cluster` (`travels_to`, `startable`),
//!   `switch_detector::detect_regions` (`switch_source`, `component_id`),
//!   `overlay::assign_parents` (consumer of the rings).

mod ring;
mod select;

use std::collections::BTreeSet;

use crate::geometry::{Inputs, Point, Ring, MIN_RING_SIZE};
use crate::strategy::Strategy;
use crate::turns::sides::pass_of;
use crate::turns::{
    node_id, turn_indices_of, Clusters, NodeId, Operation, Turn, TurnOperation, TurnOperationId,
};

/// One emitted ring plus the operations it consumed.
#[derive(Clone, Debug)]
pub(crate) struct TraversedRing {
    pub ring: Ring,
    pub tois: Vec<TurnOperationId>,
}

/// Runner for one traversal pass.
struct Traversal<'a> {
    inputs: Inputs<'a>,
    turns: &'a mut [Turn],
    clusters: &'a Clusters,
    target: Operation,
    strategy: &'a dyn Strategy,
    visited_tois: BTreeSet<TurnOperationId>,
    finished_tois: BTreeSet<TurnOperationId>,
    starts: BTreeSet<(NodeId, NodeId, Option<usize>)>,
    rings: Vec<TraversedRing>,
}

impl<'a> Traversal<'a> {
    fn operation(&self, toi: TurnOperationId) -> &TurnOperation {
        &self.turns[toi.turn_index].operations[toi.operation_index]
    }

    fn iterate(&mut self) {
        for turn_index in 0..self.turns.len() {
            for operation_index in 0..2 {
                self.try_start(TurnOperationId::new(turn_index, operation_index));
            }
        }
    }

    fn try_start(&mut self, toi: TurnOperationId) {
        let turn = &self.turns[toi.turn_index];
        let op = &turn.operations[toi.operation_index];
        if turn.discarded
            || !op.enriched.startable
            || op.enriched.is_traversed
            || !select::is_target(op.operation, self.target)
            || self.finished_tois.contains(&toi)
        {
            return;
        }
        let Some(to) = op.enriched.travels_to_ip_index else {
            return;
        };
        assert!(to < self.turns.len(), "travels_to_ip_index {to} out of range");
        let key = (
            node_id(self.turns, toi.turn_index),
            node_id(self.turns, to),
            op.enriched.component_id,
        );
        if !self.starts.insert(key) {
            return;
        }
        self.start_traverse(toi);
    }

    fn start_traverse(&mut self, start: TurnOperationId) {
        self.visited_tois.clear();
        let mut points = vec![self.turns[start.turn_index].point];
        let mut taken = Vec::new();
        if self.continue_traverse(start, &mut points, &mut taken) {
            let traversed = TraversedRing {
                ring: ring::close_ring(points, self.strategy),
                tois: taken,
            };
            tracing::debug!(
                start = ?start,
                points = traversed.ring.points.len(),
                operations = traversed.tois.len(),
                "traversal finished"
            );
            if traversed.ring.points.len() >= MIN_RING_SIZE {
                self.rings.push(traversed);
            }
            let visited = std::mem::take(&mut self.visited_tois);
            self.finished_tois.extend(visited);
        } else {
            tracing::debug!(start = ?start, "traversal stuck, attempt abandoned");
            self.visited_tois.clear();
        }
    }

    fn continue_traverse(
        &mut self,
        start: TurnOperationId,
        points: &mut Vec<Point>,
        taken: &mut Vec<TurnOperationId>,
    ) -> bool {
        let start_node = node_id(self.turns, start.turn_index);
        let mut current = start;
        self.set_visited(current);
        taken.push(current);
        for _ in 0..2 * self.turns.len() {
            let arrival = self.travel(current, points);
            if node_id(self.turns, arrival.turn_index) == start_node {
                return true;
            }
            let Some(next) = self.select_next(arrival) else {
                return false;
            };
            if self.visited_tois.contains(&next) || self.finished_tois.contains(&next) {
                return false;
            }
            self.set_visited(next);
            taken.push(next);
            current = next;
        }
        false
    }

    /// Walk from `current` to the turn it travels to; returns the arriving
    /// operation (same ring) at that turn.
    fn travel(&self, current: TurnOperationId, points: &mut Vec<Point>) -> TurnOperationId {
        let op = *self.operation(current);
        let Some(to) = op
            .enriched
            .travels_to_ip_index
            .filter(|&t| t < self.turns.len())
        else {
            panic!("operation {current:?} travels to no valid turn");
        };
        let ring_id = op.seg_id.ring_id();
        let next = &self.turns[to];
        let Some(arrival_index) = next
            .operations
            .iter()
            .position(|o| o.seg_id.ring_id() == ring_id)
        else {
            panic!("turn {to} has no operation on the ring of {current:?}");
        };
        ring::use_vertices(
            self.inputs.ring(&ring_id),
            &op,
            &next.operations[arrival_index],
            points,
            self.strategy,
        );
        ring::append_no_collinear(points, next.point, self.strategy);
        TurnOperationId::new(to, arrival_index)
    }

    fn select_next(&self, arrival: TurnOperationId) -> Option<TurnOperationId> {
        let turn = &self.turns[arrival.turn_index];
        if !turn.is_clustered() && turn.both(self.target) {
            return Some(select::select_source(turn, arrival));
        }
        let node = node_id(self.turns, arrival.turn_index);
        let candidates: Vec<TurnOperationId> = turn_indices_of(self.turns, self.clusters, node)
            .into_iter()
            .flat_map(|t| (0..2).map(move |j| TurnOperationId::new(t, j)))
            .filter(|&toi| {
                let op = self.operation(toi);
                select::is_target(op.operation, self.target)
                    && op.enriched.travels_to_ip_index.is_some()
            })
            .collect();
        match candidates.len() {
            0 => None,
            1 => candidates.first().copied(),
            _ => {
                let arriving = self.operation(arrival);
                let candidates = if self.target == Operation::Union {
                    select::prefer_component(self.turns, candidates, arriving.enriched.component_id)
                } else {
                    candidates
                };
                let incoming = pass_of(&self.inputs, arriving, &turn.point, self.strategy)?.in_pt;
                select::select_target_edge(
                    &self.inputs,
                    self.turns,
                    &turn.point,
                    &incoming,
                    &candidates,
                    self.strategy,
                )
            }
        }
    }

    /// Mark `toi` and its cluster siblings leaving along the same segment to
    /// the same turn.
    fn set_visited(&mut self, toi: TurnOperationId) {
        self.visited_tois.insert(toi);
        let op = *self.operation(toi);
        let Some(cluster_id) = self.turns[toi.turn_index].cluster_id else {
            return;
        };
        let siblings: Vec<TurnOperationId> =
            turn_indices_of(self.turns, self.clusters, NodeId::Cluster(cluster_id))
                .into_iter()
                .flat_map(|t| (0..2).map(move |j| TurnOperationId::new(t, j)))
                .filter(|&other| {
                    let o = self.operation(other);
                    o.seg_id == op.seg_id
                        && o.enriched.travels_to_ip_index == op.enriched.travels_to_ip_index
                })
                .collect();
        self.visited_tois.extend(siblings);
    }

    fn update_administration(&mut self) {
        for toi in &self.finished_tois {
            self.turns[toi.turn_index].operations[toi.operation_index]
                .enriched
                .is_traversed = true;
        }
    }
}

/// Traverse for `target`, returning the rings together with the operations
/// each ring consumed.
pub(crate) fn traverse_rings(
    inputs: &Inputs<'_>,
    turns: &mut [Turn],
    clusters: &Clusters,
    target: Operation,
    strategy: &dyn Strategy,
) -> Vec<TraversedRing> {
    let mut runner = Traversal {
        inputs: *inputs,
        turns,
        clusters,
        target,
        strategy,
        visited_tois: BTreeSet::new(),
        finished_tois: BTreeSet::new(),
        starts: BTreeSet::new(),
        rings: Vec::new(),
    };
    runner.iterate();
    runner.update_administration();
    tracing::debug!(
        target = ?target,
        rings = runner.rings.len(),
        consumed = runner.rings.iter().map(|r| r.tois.len()).sum::<usize>(),
        finished = runner.finished_tois.len(),
        "traversal pass done"
    );
    runner.rings
}

/// Walk the enriched turn graph for `target` (union or intersection) and
/// return the closed output rings.
///
/// Operations used by an emitted ring end with `is_traversed = true`.
pub fn traverse(
    inputs: &Inputs<'_>,
    turns: &mut [Turn],
    clusters: &Clusters,
    target: Operation,
    strategy: &dyn Strategy,
) -> Vec<Ring> {
    traverse_rings(inputs, turns, clusters, target, strategy)
        .into_iter()
        .map(|t| t.ring)
        .collect()
}
