//! Value types for rings, polygons, and the ids that address them.

use nalgebra::Point2;

use crate::strategy::Strategy;

/// Planar point used throughout the kernel.
pub type Point = Point2<f64>;

/// Identifies one ring of one input. `ring_index == -1` is the exterior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RingId {
    pub source_index: usize,
    pub multi_index: usize,
    pub ring_index: isize,
}

impl RingId {
    pub fn new(source_index: usize, multi_index: usize, ring_index: isize) -> Self {
        Self {
            source_index,
            multi_index,
            ring_index,
        }
    }
}

/// Identifies one directed edge (`points[segment_index] → points[segment_index + 1]`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentId {
    pub source_index: usize,
    pub multi_index: usize,
    pub ring_index: isize,
    pub segment_index: usize,
}

impl SegmentId {
    pub fn new(ring: RingId, segment_index: usize) -> Self {
        Self {
            source_index: ring.source_index,
            multi_index: ring.multi_index,
            ring_index: ring.ring_index,
            segment_index,
        }
    }

    #[inline]
    pub fn ring_id(&self) -> RingId {
        RingId::new(self.source_index, self.multi_index, self.ring_index)
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Box2 {
    pub min: Point,
    pub max: Point,
}

impl Box2 {
    pub fn empty() -> Self {
        Self {
            min: Point::new(f64::INFINITY, f64::INFINITY),
            max: Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn of_segment(a: &Point, b: &Point) -> Self {
        let mut bb = Self::empty();
        bb.expand(a);
        bb.expand(b);
        bb
    }

    pub fn of_points(points: &[Point]) -> Self {
        let mut bb = Self::empty();
        for p in points {
            bb.expand(p);
        }
        bb
    }

    pub fn expand(&mut self, p: &Point) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Overlap test with a symmetric margin `eps` (touching boxes overlap).
    pub fn intersects(&self, other: &Box2, eps: f64) -> bool {
        self.min.x <= other.max.x + eps
            && other.min.x <= self.max.x + eps
            && self.min.y <= other.max.y + eps
            && other.min.y <= self.max.y + eps
    }
}

/// Closed ring: `points.first() == points.last()` once normalized.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ring {
    pub points: Vec<Point>,
}

impl Ring {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Build from coordinate pairs, appending the closing point when missing.
    pub fn from_coords(coords: &[(f64, f64)]) -> Self {
        let mut points: Vec<Point> = coords.iter().map(|&(x, y)| Point::new(x, y)).collect();
        if let (Some(first), Some(last)) = (points.first().copied(), points.last().copied()) {
            if points.len() > 1 && first != last {
                points.push(first);
            }
        }
        Self { points }
    }

    /// Number of directed edges; zero for an empty ring.
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Vertex `k` taken cyclically over the distinct vertices.
    #[inline]
    pub fn vertex(&self, k: usize) -> Point {
        self.points[k % self.segment_count()]
    }

    #[inline]
    pub fn segment(&self, segment_index: usize) -> (Point, Point) {
        (
            self.points[segment_index],
            self.points[segment_index + 1],
        )
    }

    pub fn is_closed(&self) -> bool {
        self.points.len() > 1 && self.points.first() == self.points.last()
    }

    /// Shoelace area: positive for counter-clockwise rings.
    pub fn signed_area(&self) -> f64 {
        let n = self.segment_count();
        if n < 2 {
            return 0.0;
        }
        let o = self.points[0];
        let mut twice = 0.0;
        for i in 1..n {
            let a = self.points[i] - o;
            let b = self.points[i + 1] - o;
            twice += a.x * b.y - a.y * b.x;
        }
        0.5 * twice
    }

    pub fn bbox(&self) -> Box2 {
        Box2::of_points(&self.points)
    }

    pub fn reversed(&self) -> Ring {
        let mut points = self.points.clone();
        points.reverse();
        Ring { points }
    }
}

/// Polygon with one exterior and zero or more holes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    pub exterior: Ring,
    pub interiors: Vec<Ring>,
}

impl Polygon {
    pub fn new(exterior: Ring, interiors: Vec<Ring>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    /// Exterior area minus hole areas (orientation independent).
    pub fn area(&self) -> f64 {
        self.exterior.signed_area().abs()
            - self
                .interiors
                .iter()
                .map(|r| r.signed_area().abs())
                .sum::<f64>()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultiPolygon {
    pub polygons: Vec<Polygon>,
}

impl MultiPolygon {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn area(&self) -> f64 {
        self.polygons.iter().map(Polygon::area).sum()
    }

    /// Flip every ring; the result describes the complement.
    pub fn reversed(&self) -> MultiPolygon {
        MultiPolygon {
            polygons: self
                .polygons
                .iter()
                .map(|p| Polygon {
                    exterior: p.exterior.reversed(),
                    interiors: p.interiors.iter().map(Ring::reversed).collect(),
                })
                .collect(),
        }
    }

    /// Rings of this geometry, tagged with ids for `source_index`.
    pub fn rings(&self, source_index: usize) -> impl Iterator<Item = (RingId, &Ring)> + '_ {
        self.polygons
            .iter()
            .enumerate()
            .flat_map(move |(m, poly)| {
                std::iter::once((RingId::new(source_index, m, -1), &poly.exterior)).chain(
                    poly.interiors
                        .iter()
                        .enumerate()
                        .map(move |(k, r)| (RingId::new(source_index, m, k as isize), r)),
                )
            })
    }

    /// Ring lookup by the `(multi_index, ring_index)` part of an id.
    pub fn ring(&self, multi_index: usize, ring_index: isize) -> &Ring {
        let poly = &self.polygons[multi_index];
        if ring_index < 0 {
            &poly.exterior
        } else {
            &poly.interiors[ring_index as usize]
        }
    }
}

/// Open polyline. Ids address it like an exterior ring: `ring_index == -1`,
/// `multi_index` is the line's position in its multi-linestring.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineString {
    pub points: Vec<Point>,
}

impl LineString {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn from_coords(coords: &[(f64, f64)]) -> Self {
        Self {
            points: coords.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        }
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }

    pub fn bbox(&self) -> Box2 {
        Box2::of_points(&self.points)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultiLineString {
    pub lines: Vec<LineString>,
}

impl MultiLineString {
    pub fn new(lines: Vec<LineString>) -> Self {
        Self { lines }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn length(&self) -> f64 {
        self.lines.iter().map(LineString::length).sum()
    }

    /// Lines of this geometry, tagged with ids for `source_index`.
    pub fn paths(&self, source_index: usize) -> impl Iterator<Item = (RingId, &LineString)> + '_ {
        self.lines
            .iter()
            .enumerate()
            .map(move |(m, line)| (RingId::new(source_index, m, -1), line))
    }
}

/// Geometry kinds accepted by the overlay entry point.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Ring(Ring),
    Polygon(Polygon),
    MultiPolygon(MultiPolygon),
    LineString(LineString),
    MultiLineString(MultiLineString),
}

impl Geometry {
    /// Lower to a multi-polygon without any cleanup. Linear geometries have no
    /// rings and lower to an empty multi-polygon.
    pub fn to_multi_polygon(&self) -> MultiPolygon {
        match self {
            Geometry::Ring(r) => MultiPolygon::new(vec![Polygon::new(r.clone(), Vec::new())]),
            Geometry::Polygon(p) => MultiPolygon::new(vec![p.clone()]),
            Geometry::MultiPolygon(mp) => mp.clone(),
            Geometry::LineString(_) | Geometry::MultiLineString(_) => MultiPolygon::default(),
        }
    }

    /// The lines of a linear geometry; `None` for areal ones.
    pub fn to_multi_line_string(&self) -> Option<MultiLineString> {
        match self {
            Geometry::LineString(l) => Some(MultiLineString::new(vec![l.clone()])),
            Geometry::MultiLineString(ml) => Some(ml.clone()),
            Geometry::Ring(_) | Geometry::Polygon(_) | Geometry::MultiPolygon(_) => None,
        }
    }

    #[inline]
    pub fn is_linear(&self) -> bool {
        matches!(self, Geometry::LineString(_) | Geometry::MultiLineString(_))
    }

    pub fn point_count(&self) -> usize {
        match self.to_multi_line_string() {
            Some(ml) => ml.lines.iter().map(|l| l.points.len()).sum(),
            None => {
                let mp = self.to_multi_polygon();
                mp.rings(0).map(|(_, r)| r.points.len()).sum()
            }
        }
    }
}

/// The two overlay inputs. `reversed[s]` marks a complemented input.
#[derive(Clone, Copy, Debug)]
pub struct Inputs<'a> {
    pub geometries: [&'a MultiPolygon; 2],
    pub reversed: [bool; 2],
}

impl<'a> Inputs<'a> {
    pub fn new(first: &'a MultiPolygon, second: &'a MultiPolygon) -> Self {
        Self {
            geometries: [first, second],
            reversed: [false, false],
        }
    }

    pub fn with_reversed(mut self, reversed: [bool; 2]) -> Self {
        self.reversed = reversed;
        self
    }

    #[inline]
    pub fn ring(&self, id: &RingId) -> &'a Ring {
        self.geometries[id.source_index].ring(id.multi_index, id.ring_index)
    }

    #[inline]
    pub fn segment(&self, id: &SegmentId) -> (Point, Point) {
        self.ring(&id.ring_id()).segment(id.segment_index)
    }

    pub fn rings(&self, source_index: usize) -> impl Iterator<Item = (RingId, &'a Ring)> + 'a {
        self.geometries[source_index].rings(source_index)
    }

    pub fn all_rings(&self) -> impl Iterator<Item = (RingId, &'a Ring)> + 'a {
        self.rings(0).chain(self.rings(1))
    }

    /// Winding sum of input `source_index` at `p`, offset by one for a reversed input.
    /// Positive means covered. Rings listed in `skip` do not contribute.
    pub fn coverage(
        &self,
        source_index: usize,
        p: &Point,
        skip: &[RingId],
        strategy: &dyn Strategy,
    ) -> i32 {
        let base = i32::from(self.reversed[source_index]);
        self.rings(source_index)
            .filter(|(id, _)| !skip.contains(id))
            .map(|(_, r)| strategy.winding(r, p))
            .sum::<i32>()
            + base
    }

    /// Is `p` (assumed off the boundary) inside input `source_index`?
    pub fn covers(&self, source_index: usize, p: &Point, strategy: &dyn Strategy) -> bool {
        self.coverage(source_index, p, &[], strategy) > 0
    }
}
