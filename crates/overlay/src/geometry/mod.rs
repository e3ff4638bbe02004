//! Geometry access layer: rings, polygons, ids, and the two-input view.
//!
//! Purpose
//! - Own the input representation the overlay stages read from: closed rings,
//!   polygons with holes, multi-polygons, open linestrings, and the `Inputs`
//!   pair addressed by `RingId`/`SegmentId`.
//! - Normalize user geometry once (dedupe, close, orient) so later stages can
//!   rely on "interior lies left of the boundary".
//!
//! Why this design
//! - Every stage addresses geometry by small copyable ids, never by reference
//!   into another stage's structures.
//! - A reversed input is the complement of the original; the `reversed` flag in
//!   `Inputs` keeps containment answers consistent with that reading.
//!
//! References
//! - Code cross-refs: `turns::compute_turns`, `overlay::select_rings`,
//!   `strategy::Strategy::winding`.

mod types;
mod util;

pub use types::{
    Box2, Geometry, Inputs, LineString, MultiLineString, MultiPolygon, Point, Polygon, Ring,
    RingId, SegmentId,
};
pub use util::{normalize, normalize_lines, normalize_ring, MIN_RING_SIZE};
