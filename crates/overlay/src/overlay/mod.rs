//! Overlay entry point: input guard, pass selection, and output assembly.
//!
//! Purpose
//! - Run the whole pipeline for one boolean operation on two geometries and
//!   return a normalized multi-polygon, or the clipped lines when an input is
//!   linear.
//! - Handle input rings without turns (`select_rings`) and attach holes to
//!   their exteriors (`assign_parents`).
//!
//! Why this design
//! - Only two traversal targets exist. Difference is an intersection with the
//!   reversed (complemented) second input; symmetric difference is two
//!   differences concatenated.
//! - Linear inputs skip traversal and go through `follow`. A linear minus an
//!   areal input keeps the line pieces outside it; an areal minus a linear
//!   input is the areal input itself.
//! - Input validation happens once, here. Later stages assume valid rings.
//!
//! References
//! - Code cross-refs: `geometry::normalize`, `turns::compute_turns`,
//!   `enrich::enrich_and_cluster`, `switch_detector::detect_regions`,
//!   `traverse::traverse`, `follow::follow`.

mod assign_parents;
mod select_rings;

pub use assign_parents::assign_parents;
pub use select_rings::select_rings;

use crate::enrich::enrich_and_cluster;
use crate::error::OverlayError;
use crate::follow::{follow, Clip};
use crate::geometry::{
    normalize, normalize_lines, Geometry, Inputs, MultiLineString, MultiPolygon,
};
use crate::strategy::{Cartesian, OverlayCfg, Strategy};
use crate::switch_detector::detect_regions;
use crate::traverse::traverse;
use crate::turns::{compute_self_turns, compute_turns, Method, Operation};

/// Boolean operation requested from `overlay`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Union,
    Intersection,
    Difference,
    SymDifference,
}

/// Result of `overlay`: areal when no linestring is clipped, linear otherwise.
#[derive(Clone, Debug, PartialEq)]
pub enum OverlayOutput {
    Areal(MultiPolygon),
    Linear(MultiLineString),
}

impl OverlayOutput {
    pub fn is_empty(&self) -> bool {
        match self {
            OverlayOutput::Areal(mp) => mp.is_empty(),
            OverlayOutput::Linear(ml) => ml.is_empty(),
        }
    }

    /// Zero for linear output.
    pub fn area(&self) -> f64 {
        match self {
            OverlayOutput::Areal(mp) => mp.area(),
            OverlayOutput::Linear(_) => 0.0,
        }
    }

    /// Zero for areal output.
    pub fn length(&self) -> f64 {
        match self {
            OverlayOutput::Areal(_) => 0.0,
            OverlayOutput::Linear(ml) => ml.length(),
        }
    }

    pub fn areal(&self) -> Option<&MultiPolygon> {
        match self {
            OverlayOutput::Areal(mp) => Some(mp),
            OverlayOutput::Linear(_) => None,
        }
    }

    pub fn linear(&self) -> Option<&MultiLineString> {
        match self {
            OverlayOutput::Areal(_) => None,
            OverlayOutput::Linear(ml) => Some(ml),
        }
    }
}

/// Compute `a <kind> b`.
///
/// Errors
/// - `EmptyInput` / `DegenerateRing` / `DegenerateLine` from normalization.
/// - `SelfIntersection` when `cfg.check_validity` is set and an areal input is invalid.
/// - `MixedDimension` for union or symmetric difference of a linear and an areal input.
pub fn overlay(
    a: &Geometry,
    b: &Geometry,
    kind: OverlayKind,
    cfg: &OverlayCfg,
) -> Result<OverlayOutput, OverlayError> {
    let strategy = Cartesian::new(*cfg);
    let result = match (a.to_multi_line_string(), b.to_multi_line_string()) {
        (None, None) => {
            let first = normalize(a, 0, cfg)?;
            let second = normalize(b, 1, cfg)?;
            if cfg.check_validity {
                check_validity(&first, 0, &strategy)?;
                check_validity(&second, 1, &strategy)?;
            }
            OverlayOutput::Areal(overlay_areal(&first, &second, kind, &strategy))
        }
        (Some(lines), None) => {
            let lines = normalize_lines(&lines, 0, cfg)?;
            let areal = areal_input(b, 1, cfg, &strategy)?;
            overlay_mixed(&lines, &areal, true, kind, &strategy)?
        }
        (None, Some(lines)) => {
            let areal = areal_input(a, 0, cfg, &strategy)?;
            let lines = normalize_lines(&lines, 1, cfg)?;
            overlay_mixed(&lines, &areal, false, kind, &strategy)?
        }
        (Some(first), Some(second)) => {
            let first = normalize_lines(&first, 0, cfg)?;
            let second = normalize_lines(&second, 1, cfg)?;
            OverlayOutput::Linear(overlay_linear(&first, &second, kind, &strategy))
        }
    };
    tracing::debug!(
        kind = ?kind,
        empty = result.is_empty(),
        area = result.area(),
        length = result.length(),
        "overlay done"
    );
    Ok(result)
}

fn areal_input(
    geometry: &Geometry,
    source_index: usize,
    cfg: &OverlayCfg,
    strategy: &dyn Strategy,
) -> Result<MultiPolygon, OverlayError> {
    let mp = normalize(geometry, source_index, cfg)?;
    if cfg.check_validity {
        check_validity(&mp, source_index, strategy)?;
    }
    Ok(mp)
}

fn overlay_areal(
    first: &MultiPolygon,
    second: &MultiPolygon,
    kind: OverlayKind,
    strategy: &dyn Strategy,
) -> MultiPolygon {
    match kind {
        OverlayKind::Union => overlay_normalized(first, second, Operation::Union, strategy),
        OverlayKind::Intersection => {
            overlay_normalized(first, second, Operation::Intersection, strategy)
        }
        OverlayKind::Difference => difference(first, second, strategy),
        OverlayKind::SymDifference => {
            let mut out = difference(first, second, strategy);
            out.polygons.extend(difference(second, first, strategy).polygons);
            out
        }
    }
}

/// `lines_first` tells which side of the operation the lines are on.
fn overlay_mixed(
    lines: &MultiLineString,
    areal: &MultiPolygon,
    lines_first: bool,
    kind: OverlayKind,
    strategy: &dyn Strategy,
) -> Result<OverlayOutput, OverlayError> {
    let clip = Clip::Areal(areal);
    match kind {
        OverlayKind::Intersection => Ok(OverlayOutput::Linear(follow(
            lines,
            clip,
            Operation::Intersection,
            strategy,
        ))),
        OverlayKind::Difference if lines_first => Ok(OverlayOutput::Linear(follow(
            lines,
            clip,
            Operation::Union,
            strategy,
        ))),
        OverlayKind::Difference => Ok(OverlayOutput::Areal(areal.clone())),
        OverlayKind::Union | OverlayKind::SymDifference => {
            Err(OverlayError::MixedDimension { kind })
        }
    }
}

fn overlay_linear(
    first: &MultiLineString,
    second: &MultiLineString,
    kind: OverlayKind,
    strategy: &dyn Strategy,
) -> MultiLineString {
    let outside = |a: &MultiLineString, b: &MultiLineString| {
        follow(a, Clip::Linear(b), Operation::Union, strategy)
    };
    match kind {
        OverlayKind::Intersection => {
            follow(first, Clip::Linear(second), Operation::Intersection, strategy)
        }
        OverlayKind::Difference => outside(first, second),
        OverlayKind::Union => {
            let mut out = first.clone();
            out.lines.extend(outside(second, first).lines);
            out
        }
        OverlayKind::SymDifference => {
            let mut out = outside(first, second);
            out.lines.extend(outside(second, first).lines);
            out
        }
    }
}

fn difference(a: &MultiPolygon, b: &MultiPolygon, strategy: &dyn Strategy) -> MultiPolygon {
    let complement = b.reversed();
    let inputs = Inputs::new(a, &complement).with_reversed([false, true]);
    run_pipeline(&inputs, Operation::Intersection, strategy)
}

fn overlay_normalized(
    a: &MultiPolygon,
    b: &MultiPolygon,
    target: Operation,
    strategy: &dyn Strategy,
) -> MultiPolygon {
    run_pipeline(&Inputs::new(a, b), target, strategy)
}

fn run_pipeline(inputs: &Inputs<'_>, target: Operation, strategy: &dyn Strategy) -> MultiPolygon {
    let mut turns = compute_turns(inputs, strategy);
    let clusters = enrich_and_cluster(&mut turns, inputs, strategy);
    detect_regions(&mut turns, &clusters, target);
    let mut rings = traverse(inputs, &mut turns, &clusters, target, strategy);
    rings.extend(select_rings(inputs, &turns, target, strategy));
    assign_parents(rings, strategy)
}

/// Reject self-intersecting input: crossings, collinear overlaps, and rings
/// touching themselves. Touches between different rings are valid.
pub fn check_validity(
    geometry: &MultiPolygon,
    source_index: usize,
    strategy: &dyn Strategy,
) -> Result<(), OverlayError> {
    for turn in compute_self_turns(geometry, source_index, strategy) {
        let same_ring = turn.operations[0].seg_id.ring_id() == turn.operations[1].seg_id.ring_id();
        let invalid = match turn.method {
            Method::Crosses | Method::Collinear | Method::Equal => true,
            Method::Touch | Method::TouchInterior => same_ring,
            Method::None => false,
        };
        if invalid {
            return Err(OverlayError::SelfIntersection {
                source_index,
                point: turn.point,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
