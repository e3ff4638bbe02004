//! Strategy layer: side, equality, segment intersection, and containment predicates.
//!
//! Purpose
//! - Give every overlay stage one explicit predicate interface, passed by
//!   reference as `&dyn Strategy`, instead of baking numeric policy into types.
//! - Provide the planar implementation (`Cartesian`) configured by `OverlayCfg`.
//!
//! Why this design
//! - Tolerances are decided in one place. Turn detection, clustering and ring
//!   closure must agree on what "collinear" and "equal" mean or the turn graph
//!   becomes inconsistent.
//! - Segment intersection snaps near-endpoint fractions to exactly 0 or 1 and
//!   then reports the vertex itself, so the same geometric event found through
//!   different segment pairs yields bitwise identical positions.
//!
//! References
//! - Code cross-refs: `turns::compute_turns`, `turns::sides`, `traverse::ring`.

mod cartesian;
mod cfg;

pub use cartesian::Cartesian;
pub use cfg::OverlayCfg;

use crate::geometry::{Point, Ring};

/// Position of a point relative to a directed line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Side {
    Right,
    Collinear,
    Left,
}

/// Point location relative to a ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    Inside,
    Outside,
    Boundary,
}

/// One intersection event on segments `a` and `b`.
///
/// `ta`/`tb` are fractions along `a`/`b`, snapped to exactly 0 or 1 near endpoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionPoint {
    pub point: Point,
    pub ta: f64,
    pub tb: f64,
}

impl IntersectionPoint {
    #[inline]
    pub fn a_at_endpoint(&self) -> bool {
        self.ta == 0.0 || self.ta == 1.0
    }
    #[inline]
    pub fn b_at_endpoint(&self) -> bool {
        self.tb == 0.0 || self.tb == 1.0
    }
}

/// Result of intersecting two segments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SegmentIntersection {
    None,
    Point(IntersectionPoint),
    /// Collinear overlap, endpoints ordered along `a`.
    Overlap(IntersectionPoint, IntersectionPoint),
}

/// Predicates consumed by the overlay pipeline.
pub trait Strategy {
    /// Side of `p` relative to the directed line `p1 → p2`.
    fn side(&self, p1: &Point, p2: &Point, p: &Point) -> Side;
    /// Coincidence test used for clustering and ring closure.
    fn equals(&self, a: &Point, b: &Point) -> bool;
    fn intersect(&self, a0: &Point, a1: &Point, b0: &Point, b1: &Point) -> SegmentIntersection;
    /// Winding number of `ring` around `p` (counter-clockwise positive).
    fn winding(&self, ring: &Ring, p: &Point) -> i32;
    fn location(&self, ring: &Ring, p: &Point) -> Location;
    /// Does `p` lie on the polyline through `points` (within the equality tolerance)?
    fn on_path(&self, points: &[Point], p: &Point) -> bool;
    /// Margin used by bounding-box prefilters.
    fn margin(&self) -> f64;
}

#[cfg(test)]
mod tests;
