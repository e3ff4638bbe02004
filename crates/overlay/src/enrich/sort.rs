//! Per-ring ordering of operations and the `travels_to` links.

use std::collections::BTreeMap;

use crate::geometry::{Inputs, RingId};
use crate::strategy::{Side, Strategy};
use crate::turns::{node_id, Turn, TurnOperationId};

/// Side of the partner operation's outgoing point relative to `toi`'s segment.
fn partner_side(
    turns: &[Turn],
    toi: TurnOperationId,
    inputs: &Inputs<'_>,
    strategy: &dyn Strategy,
) -> Side {
    let turn = &turns[toi.turn_index];
    let own = &turn.operations[toi.operation_index];
    let other = &turn.operations[1 - toi.operation_index];
    let (s0, s1) = inputs.segment(&own.seg_id);
    let (_, probe) = inputs.segment(&other.seg_id);
    strategy.side(&s0, &s1, &probe)
}

/// Operations of non-discarded turns grouped by ring, in walk order.
///
/// Returns the orderings plus the pairs of turns whose order fell back to the
/// turn index (same position, same side).
pub(crate) fn sort_per_ring(
    turns: &[Turn],
    inputs: &Inputs<'_>,
    strategy: &dyn Strategy,
) -> (BTreeMap<RingId, Vec<TurnOperationId>>, Vec<(usize, usize)>) {
    let mut per_ring: BTreeMap<RingId, Vec<TurnOperationId>> = BTreeMap::new();
    for (t, turn) in turns.iter().enumerate() {
        if turn.discarded {
            continue;
        }
        for (j, op) in turn.operations.iter().enumerate() {
            per_ring
                .entry(op.seg_id.ring_id())
                .or_default()
                .push(TurnOperationId::new(t, j));
        }
    }

    let mut ties = Vec::new();
    for ops in per_ring.values_mut() {
        let keyed: BTreeMap<TurnOperationId, Side> = ops
            .iter()
            .map(|&toi| (toi, partner_side(turns, toi, inputs, strategy)))
            .collect();
        let position =
            |toi: &TurnOperationId| turns[toi.turn_index].operations[toi.operation_index].position();
        ops.sort_by(|a, b| {
            position(a)
                .cmp(&position(b))
                .then_with(|| keyed[a].cmp(&keyed[b]))
                .then(a.cmp(b))
        });
        for w in ops.windows(2) {
            if w[0].turn_index != w[1].turn_index
                && position(&w[0]) == position(&w[1])
                && keyed[&w[0]] == keyed[&w[1]]
            {
                ties.push((w[0].turn_index, w[1].turn_index));
            }
        }
    }
    (per_ring, ties)
}

/// Link every operation to the next operation on its ring sitting at another
/// node; an operation alone on its ring (up to its own node) links to itself.
pub(crate) fn assign_travel_targets(
    turns: &mut [Turn],
    per_ring: &BTreeMap<RingId, Vec<TurnOperationId>>,
) {
    for ops in per_ring.values() {
        let k = ops.len();
        for (idx, &toi) in ops.iter().enumerate() {
            let here = node_id(turns, toi.turn_index);
            let target = (1..k)
                .map(|step| ops[(idx + step) % k])
                .find(|cand| node_id(turns, cand.turn_index) != here)
                .unwrap_or(toi);
            let vertex = turns[target.turn_index].operations[target.operation_index]
                .seg_id
                .segment_index;
            let enriched = &mut turns[toi.turn_index].operations[toi.operation_index].enriched;
            enriched.travels_to_ip_index = Some(target.turn_index);
            enriched.travels_to_vertex_index = Some(vertex);
        }
    }
}
