//! Output assembly: pair holes with the exteriors that contain them.

use crate::geometry::{MultiPolygon, Polygon, Ring};
use crate::strategy::{Location, Strategy};

/// Is `hole` inside `exterior`? Decided at the first hole vertex that is not
/// on the exterior's boundary; a hole lying entirely on it is not contained.
fn contains(exterior: &Ring, hole: &Ring, strategy: &dyn Strategy) -> bool {
    hole.points
        .iter()
        .map(|p| strategy.location(exterior, p))
        .find(|loc| *loc != Location::Boundary)
        == Some(Location::Inside)
}

/// Build polygons from output rings.
///
/// Counter-clockwise rings become exteriors. A clockwise ring becomes a hole
/// of the smallest exterior containing it; holes without one are dropped.
/// Zero-area rings are dropped.
pub fn assign_parents(rings: Vec<Ring>, strategy: &dyn Strategy) -> MultiPolygon {
    let mut exteriors: Vec<(f64, Polygon)> = Vec::new();
    let mut holes: Vec<Ring> = Vec::new();
    for ring in rings {
        let area = ring.signed_area();
        if area > 0.0 {
            exteriors.push((area, Polygon::new(ring, Vec::new())));
        } else if area < 0.0 {
            holes.push(ring);
        }
    }
    for hole in holes {
        let parent = exteriors
            .iter()
            .enumerate()
            .filter(|(_, (_, poly))| contains(&poly.exterior, &hole, strategy))
            .min_by(|(_, (a, _)), (_, (b, _))| a.total_cmp(b))
            .map(|(k, _)| k);
        match parent {
            Some(k) => exteriors[k].1.interiors.push(hole),
            None => tracing::warn!(
                points = hole.points.len(),
                area = hole.signed_area(),
                "orphan hole dropped"
            ),
        }
    }
    MultiPolygon::new(exteriors.into_iter().map(|(_, poly)| poly).collect())
}
