//! Input rings without turns: keep or drop them by containment.

use std::collections::BTreeSet;

use crate::geometry::{Inputs, Ring, RingId};
use crate::strategy::Strategy;
use crate::turns::{Operation, Turn};

/// Input rings untouched by any non-discarded turn that belong to the result
/// of `target`.
///
/// The first vertex is the probe: with no turn on the ring it cannot lie on the
/// other input's boundary. Union keeps rings outside the other input,
/// intersection keeps rings inside it.
pub fn select_rings(
    inputs: &Inputs<'_>,
    turns: &[Turn],
    target: Operation,
    strategy: &dyn Strategy,
) -> Vec<Ring> {
    let touched: BTreeSet<RingId> = turns
        .iter()
        .filter(|t| !t.discarded)
        .flat_map(|t| t.operations.iter().map(|op| op.seg_id.ring_id()))
        .collect();
    let mut selected = Vec::new();
    for (id, ring) in inputs.all_rings() {
        if touched.contains(&id) {
            continue;
        }
        let Some(probe) = ring.points.first() else {
            continue;
        };
        let covered = inputs.covers(1 - id.source_index, probe, strategy);
        let keep = match target {
            Operation::Union => !covered,
            _ => covered,
        };
        if keep {
            selected.push(ring.clone());
        }
    }
    tracing::debug!(
        target = ?target,
        untouched = inputs.all_rings().count() - touched.len(),
        selected = selected.len(),
        "ring selection"
    );
    selected
}
