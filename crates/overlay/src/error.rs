//! Input errors raised by the overlay guard before the pipeline runs.
//!
//! The kernel stages themselves never fail: numerical ambiguity is resolved
//! locally and broken invariants are assertions.

use std::fmt;

use crate::geometry::Point;
use crate::overlay::OverlayKind;

/// Error type for invalid overlay input.
#[derive(Clone, Debug, PartialEq)]
pub enum OverlayError {
    EmptyInput { source_index: usize },
    DegenerateRing { source_index: usize, reason: String },
    SelfIntersection { source_index: usize, point: Point },
    DegenerateLine { source_index: usize, reason: String },
    /// Union and symmetric difference of a linear with an areal input.
    MixedDimension { kind: OverlayKind },
}

impl OverlayError {
    pub(crate) fn degenerate(source_index: usize, reason: impl Into<String>) -> Self {
        Self::DegenerateRing {
            source_index,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for OverlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput { source_index } => {
                write!(f, "input {source_index} is empty")
            }
            Self::DegenerateRing {
                source_index,
                reason,
            } => write!(f, "degenerate ring in input {source_index}: {reason}"),
            Self::SelfIntersection {
                source_index,
                point,
            } => write!(
                f,
                "input {source_index} self-intersects at ({}, {})",
                point.x, point.y
            ),
            Self::DegenerateLine {
                source_index,
                reason,
            } => write!(f, "degenerate linestring in input {source_index}: {reason}"),
            Self::MixedDimension { kind } => {
                write!(f, "{kind:?} of a linear and an areal input is not defined")
            }
        }
    }
}

impl std::error::Error for OverlayError {}
