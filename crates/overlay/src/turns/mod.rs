//! Turns: intersection events between the two input boundaries.
//!
//! Purpose
//! - Find every point where a segment of input 0 meets a segment of input 1
//!   and record, per input, the position on its ring and the operation tag
//!   (union / intersection / continue / blocked) its outgoing edge carries.
//! - The same sweep runs over open linestrings for `follow`; those turns are
//!   tagged there, not by the side sort.
//! - Provide the shared data model (`Turn`, `TurnOperation`, `Cluster`,
//!   `NodeId`) read and mutated by enrichment, the switch detector and traversal.
//!
//! Why this design
//! - Positions are normalized to `(segment, fraction in [0, 1))`, so one event
//!   reached through two segment pairs is reported once.
//! - Operation tags come from a side sort of the two passes through the point
//!   rather than a table keyed by touch kind; collinear and touching
//!   configurations reduce to the same sector coverage rule. Enrichment reruns
//!   the same sort over whole clusters.
//!
//! References
//! - Code cross-refs: `strategy::Strategy::intersect`, `enrich::enrich_and_cluster`,
//!   `traverse::traverse`.

mod detect;
pub(crate) mod sides;
mod types;

pub use detect::{
    compute_line_line_turns, compute_line_turns, compute_self_turns, compute_turns,
};
pub use types::{
    node_id, turn_indices_of, Cluster, Clusters, Enriched, Method, NodeId, Operation,
    SegmentRatio, Turn, TurnOperation, TurnOperationId,
};

#[cfg(test)]
mod tests;
