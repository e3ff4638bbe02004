//! Input normalization: dedupe, close, orient.
//!
//! Linestrings are only deduped; they stay open and keep their direction.

use crate::error::OverlayError;
use crate::strategy::OverlayCfg;

use super::types::{Geometry, LineString, MultiLineString, MultiPolygon, Point, Polygon, Ring};

/// Minimum point count of a closed ring (triangle plus closing point).
pub const MIN_RING_SIZE: usize = 4;

/// Finite points with consecutive duplicates (within `eps`) removed; `None`
/// on a non-finite coordinate.
fn dedupe(points: &[Point], eps: f64) -> Option<Vec<Point>> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len() + 1);
    for p in points {
        if !(p.x.is_finite() && p.y.is_finite()) {
            return None;
        }
        match out.last() {
            Some(last) if (p - last).norm() <= eps => {}
            _ => out.push(*p),
        }
    }
    Some(out)
}

/// Drop consecutive duplicates (within `cfg.eps_equal`), close the ring and
/// orient it counter-clockwise (`ccw == true`) or clockwise.
pub fn normalize_ring(
    points: &[Point],
    ccw: bool,
    source_index: usize,
    cfg: &OverlayCfg,
) -> Result<Ring, OverlayError> {
    let Some(mut out) = dedupe(points, cfg.eps_equal) else {
        return Err(OverlayError::degenerate(
            source_index,
            "non-finite coordinate",
        ));
    };
    while out.len() > 1 {
        let first = out[0];
        match out.last() {
            Some(last) if (first - last).norm() <= cfg.eps_equal => {
                out.pop();
            }
            _ => break,
        }
    }
    if out.len() < MIN_RING_SIZE - 1 {
        return Err(OverlayError::degenerate(
            source_index,
            format!("ring has {} distinct points, need 3", out.len()),
        ));
    }
    out.push(out[0]);
    let ring = Ring::new(out);
    let area = ring.signed_area();
    if area == 0.0 {
        return Err(OverlayError::degenerate(source_index, "ring has zero area"));
    }
    if (area > 0.0) == ccw {
        Ok(ring)
    } else {
        Ok(ring.reversed())
    }
}

/// Lower `geometry` to a normalized multi-polygon: exteriors counter-clockwise,
/// holes clockwise.
pub fn normalize(
    geometry: &Geometry,
    source_index: usize,
    cfg: &OverlayCfg,
) -> Result<MultiPolygon, OverlayError> {
    let mp = geometry.to_multi_polygon();
    if mp.polygons.iter().all(|p| p.exterior.points.is_empty()) {
        return Err(OverlayError::EmptyInput { source_index });
    }
    let mut polygons = Vec::with_capacity(mp.polygons.len());
    for poly in &mp.polygons {
        if poly.exterior.points.is_empty() {
            continue;
        }
        let exterior = normalize_ring(&poly.exterior.points, true, source_index, cfg)?;
        let interiors = poly
            .interiors
            .iter()
            .map(|r| normalize_ring(&r.points, false, source_index, cfg))
            .collect::<Result<Vec<_>, _>>()?;
        polygons.push(Polygon::new(exterior, interiors));
    }
    Ok(MultiPolygon::new(polygons))
}

/// Dedupe every line of a linear input. Empty lines are skipped; a line
/// collapsing to a single point is degenerate.
pub fn normalize_lines(
    lines: &MultiLineString,
    source_index: usize,
    cfg: &OverlayCfg,
) -> Result<MultiLineString, OverlayError> {
    let mut out = Vec::with_capacity(lines.lines.len());
    for line in lines.lines.iter().filter(|l| !l.points.is_empty()) {
        let Some(points) = dedupe(&line.points, cfg.eps_equal) else {
            return Err(OverlayError::DegenerateLine {
                source_index,
                reason: "non-finite coordinate".to_string(),
            });
        };
        if points.len() < 2 {
            return Err(OverlayError::DegenerateLine {
                source_index,
                reason: "line has a single distinct point".to_string(),
            });
        }
        out.push(LineString::new(points));
    }
    if out.is_empty() {
        return Err(OverlayError::EmptyInput { source_index });
    }
    Ok(MultiLineString::new(out))
}
