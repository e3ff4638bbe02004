//! Choice of the outgoing operation at a node.

use std::f64::consts::TAU;

use crate::geometry::{Inputs, Point};
use crate::strategy::{Side, Strategy};
use crate::turns::sides::pass_of;
use crate::turns::{Operation, Turn, TurnOperationId};

/// Clockwise angle in `(0, 2π]` from direction `from` to direction `to`.
fn clockwise_angle(at: &Point, from: &Point, to: &Point) -> f64 {
    let a = (from.y - at.y).atan2(from.x - at.x);
    let b = (to.y - at.y).atan2(to.x - at.x);
    let d = (a - b).rem_euclid(TAU);
    if d == 0.0 {
        TAU
    } else {
        d
    }
}

/// Pick among `candidates` the outgoing edge reached first rotating clockwise
/// from the incoming ray (`at → incoming`), i.e. the sharpest left turn.
/// Candidates leaving in the same direction resolve to the lowest id.
pub(crate) fn select_target_edge(
    inputs: &Inputs<'_>,
    turns: &[Turn],
    at: &Point,
    incoming: &Point,
    candidates: &[TurnOperationId],
    strategy: &dyn Strategy,
) -> Option<TurnOperationId> {
    let mut rated: Vec<(f64, TurnOperationId, Point)> = candidates
        .iter()
        .filter_map(|&toi| {
            let op = &turns[toi.turn_index].operations[toi.operation_index];
            let pass = pass_of(inputs, op, at, strategy)?;
            let angle = if strategy.side(at, incoming, &pass.out_pt) == Side::Collinear
                && (incoming - at).dot(&(pass.out_pt - at)) > 0.0
            {
                TAU
            } else {
                clockwise_angle(at, incoming, &pass.out_pt)
            };
            Some((angle, toi, pass.out_pt))
        })
        .collect();
    rated.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    let &(_, best, best_out) = rated.first()?;
    let tied = rated
        .iter()
        .filter(|(_, _, out)| {
            strategy.side(at, &best_out, out) == Side::Collinear
                && (best_out - at).dot(&(out - at)) > 0.0
        })
        .map(|(_, toi, _)| *toi)
        .min();
    Some(tied.unwrap_or(best))
}

/// Operation to leave an unclustered UU/II turn by, honouring `switch_source`.
pub(crate) fn select_source(turn: &Turn, arrival: TurnOperationId) -> TurnOperationId {
    let pick = if turn.switch_source {
        1 - arrival.operation_index
    } else {
        arrival.operation_index
    };
    TurnOperationId::new(arrival.turn_index, pick)
}

/// Keep candidates on the arriving operation's component when any exist.
pub(crate) fn prefer_component(
    turns: &[Turn],
    candidates: Vec<TurnOperationId>,
    component: Option<usize>,
) -> Vec<TurnOperationId> {
    let same: Vec<TurnOperationId> = candidates
        .iter()
        .copied()
        .filter(|toi| {
            turns[toi.turn_index].operations[toi.operation_index]
                .enriched
                .component_id
                == component
        })
        .collect();
    if same.is_empty() {
        candidates
    } else {
        same
    }
}

/// Target tag check: the pass's own operation or `continue`.
#[inline]
pub(crate) fn is_target(operation: Operation, target: Operation) -> bool {
    operation == target || operation == Operation::Continue
}
