//! Polygon overlay kernel: turns, enrichment, regions, traversal.
//!
//! Pipeline (one call, one owner of all state):
//! `geometry::normalize` → `turns::compute_turns` → `enrich::enrich_and_cluster`
//! → `switch_detector::detect_regions` → `traverse::traverse`
//! → `overlay::{select_rings, assign_parents}`.
//!
//! Linestrings take the short path: `geometry::normalize_lines` →
//! `follow::follow`, which reuses the turn sweep.
//!
//! Conventions
//! - Rings are stored closed (first point repeated at the end).
//! - Interiors lie left of the directed boundary: exteriors counter-clockwise,
//!   holes clockwise. A reversed input stands for its complement.
//! - Turns live in one `Vec<Turn>`; everything else refers to them by index.

pub mod enrich;
pub mod error;
pub mod follow;
pub mod geometry;
pub mod overlay;
pub mod rand;
pub mod strategy;
pub mod switch_detector;
pub mod traverse;
pub mod turns;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::OverlayError;
pub use geometry::{Geometry, LineString, MultiLineString, MultiPolygon, Point, Polygon, Ring};
pub use overlay::{overlay, OverlayKind, OverlayOutput};
pub use strategy::{Cartesian, OverlayCfg, Strategy};

/// Common exports for callers driving the pipeline stage by stage.
pub mod prelude {
    pub use crate::enrich::enrich_and_cluster;
    pub use crate::error::OverlayError;
    pub use crate::follow::{follow, split_lines, Clip, Piece};
    pub use crate::geometry::{
        normalize, normalize_lines, Geometry, Inputs, LineString, MultiLineString, MultiPolygon,
        Point, Polygon, Ring, RingId, SegmentId,
    };
    pub use crate::overlay::{
        assign_parents, check_validity, overlay, select_rings, OverlayKind, OverlayOutput,
    };
    pub use crate::rand::{draw_ring_radial, RadialCfg, ReplayToken, VertexCount};
    pub use crate::strategy::{Cartesian, Location, OverlayCfg, Side, Strategy};
    pub use crate::switch_detector::detect_regions;
    pub use crate::traverse::traverse;
    pub use crate::turns::{
        compute_line_line_turns, compute_line_turns, compute_self_turns, compute_turns, Cluster,
        Clusters, Method, NodeId, Operation, SegmentRatio, Turn, TurnOperation, TurnOperationId,
    };
    pub use nalgebra::Vector2 as Vec2;
}
