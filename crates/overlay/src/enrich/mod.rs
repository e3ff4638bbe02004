//! Enrichment: clustering of coincident turns and `travels_to` links per ring.
//!
//! Purpose
//! - Merge turns at (nearly) the same point into clusters and reclassify their
//!   operations from a side sort over every ring passing through that point.
//! - Order the operations of each ring along its boundary and link every
//!   operation to the next turn reached by walking forward (`travels_to`).
//! - Decide which operations may start a traversal (`startable`).
//!
//! Why this design
//! - Clusters are rebuilt from scratch on every call; all links are indices into
//!   the turn vector, so nothing dangles when the vector is reused.
//! - Operations at the same position whose order cannot be decided by side
//!   fall back to turn order. When such a pair sits on two different nodes the
//!   pair is merged into one cluster and the pass is repeated once, so the
//!   fallback order never decides a traversal.
//!
//! References
//! - Code cross-refs: `turns::sides::sort_by_side`, `switch_detector::detect_regions`,
//!   `traverse::traverse`.

mod cluster;
mod sort;

use crate::geometry::Inputs;
use crate::strategy::Strategy;
use crate::turns::{node_id, Clusters, Operation, Turn};

/// Clustering followed by at most one re-clustering after unresolved ties.
const MAX_ROUNDS: usize = 2;

/// Cluster coincident turns, then enrich every operation in place.
///
/// Turns whose operations are both `Operation::None` are discarded first.
pub fn enrich_and_cluster(
    turns: &mut [Turn],
    inputs: &Inputs<'_>,
    strategy: &dyn Strategy,
) -> Clusters {
    for t in turns.iter_mut() {
        if t.both(Operation::None) {
            t.discarded = true;
        }
    }

    let mut links: Vec<(usize, usize)> = Vec::new();
    let mut clusters = Clusters::new();
    for round in 0..MAX_ROUNDS {
        clusters = cluster::gather_clusters(turns, &links, strategy);
        for c in clusters.values_mut() {
            cluster::classify_cluster(turns, c, inputs, strategy);
        }
        let (per_ring, ties) = sort::sort_per_ring(turns, inputs, strategy);
        sort::assign_travel_targets(turns, &per_ring);

        let unresolved: Vec<(usize, usize)> = ties
            .into_iter()
            .filter(|&(a, b)| node_id(turns, a) != node_id(turns, b))
            .collect();
        if unresolved.is_empty() {
            break;
        }
        if round + 1 == MAX_ROUNDS {
            tracing::warn!(
                pairs = unresolved.len(),
                "coincident turns left ordered by discovery index"
            );
            break;
        }
        tracing::debug!(pairs = unresolved.len(), "merging tied turns into clusters");
        links.extend(unresolved);
    }

    for t in turns.iter_mut() {
        let discarded = t.discarded;
        for op in t.operations.iter_mut() {
            op.enriched.startable = !discarded
                && matches!(
                    op.operation,
                    Operation::Union | Operation::Intersection | Operation::Continue
                )
                && op.enriched.travels_to_ip_index.is_some();
        }
    }
    tracing::debug!(
        turns = turns.len(),
        clusters = clusters.len(),
        "enriched turns"
    );
    clusters
}
