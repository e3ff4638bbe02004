//! Segment-pair intersection sweep producing turns.

use std::collections::BTreeSet;

use crate::geometry::{Box2, Inputs, MultiLineString, MultiPolygon, Point, RingId, SegmentId};
use crate::strategy::{IntersectionPoint, SegmentIntersection, Strategy};

use super::sides::classify_turn;
use super::types::{Method, SegmentRatio, Turn, TurnOperation};

type Position = (SegmentId, SegmentRatio);

#[inline]
fn adjacent(i: usize, j: usize, n: usize) -> bool {
    j == i + 1 || (i == 0 && j + 1 == n)
}

/// One boundary walked by the sweep: a closed ring or an open linestring.
#[derive(Clone, Copy)]
struct Path<'a> {
    id: RingId,
    points: &'a [Point],
    closed: bool,
    bbox: Box2,
}

impl<'a> Path<'a> {
    fn ring(id: RingId, points: &'a [Point]) -> Self {
        Self {
            id,
            points,
            closed: true,
            bbox: Box2::of_points(points),
        }
    }

    fn open(id: RingId, points: &'a [Point]) -> Self {
        Self {
            closed: false,
            ..Self::ring(id, points)
        }
    }

    #[inline]
    fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    #[inline]
    fn segment(&self, i: usize) -> (Point, Point) {
        (self.points[i], self.points[i + 1])
    }

    /// Fraction 1 is the start of the next segment, except at the end of an
    /// open path.
    fn position(&self, segment_index: usize, t: f64) -> Position {
        let n = self.segment_count();
        if t < 1.0 {
            (SegmentId::new(self.id, segment_index), SegmentRatio::new(t))
        } else if self.closed {
            (SegmentId::new(self.id, (segment_index + 1) % n), SegmentRatio::ZERO)
        } else if segment_index + 1 < n {
            (SegmentId::new(self.id, segment_index + 1), SegmentRatio::ZERO)
        } else {
            (SegmentId::new(self.id, segment_index), SegmentRatio::ONE)
        }
    }
}

/// Collects turns for one path pair, skipping positions already seen.
struct PathPairSweep<'a> {
    strategy: &'a dyn Strategy,
    seen: &'a mut BTreeSet<(Position, Position)>,
    turns: &'a mut Vec<Turn>,
    /// Both paths belong to the same input; positions are stored ordered.
    self_turns: bool,
}

impl PathPairSweep<'_> {
    fn run(&mut self, a: &Path<'_>, b: &Path<'_>) {
        let margin = self.strategy.margin();
        if !a.bbox.intersects(&b.bbox, margin) {
            return;
        }
        let same_ring = self.self_turns && a.id == b.id;
        let na = a.segment_count();
        let nb = b.segment_count();
        for i in 0..na {
            let (a0, a1) = a.segment(i);
            let bb_a = Box2::of_segment(&a0, &a1);
            let j_start = if same_ring { i + 1 } else { 0 };
            for j in j_start..nb {
                let (b0, b1) = b.segment(j);
                if !bb_a.intersects(&Box2::of_segment(&b0, &b1), margin) {
                    continue;
                }
                let neighbours = same_ring && adjacent(i, j, na);
                match self.strategy.intersect(&a0, &a1, &b0, &b1) {
                    SegmentIntersection::None => {}
                    SegmentIntersection::Point(ip) => {
                        if neighbours {
                            continue;
                        }
                        let method = match (ip.a_at_endpoint(), ip.b_at_endpoint()) {
                            (true, true) => Method::Touch,
                            (false, false) => Method::Crosses,
                            _ => Method::TouchInterior,
                        };
                        self.push(&ip, method, (a, i), (b, j));
                    }
                    SegmentIntersection::Overlap(p, q) => {
                        let s = self.strategy;
                        let equal = (s.equals(&a0, &b0) && s.equals(&a1, &b1))
                            || (s.equals(&a0, &b1) && s.equals(&a1, &b0));
                        let method = if equal {
                            Method::Equal
                        } else {
                            Method::Collinear
                        };
                        self.push(&p, method, (a, i), (b, j));
                        self.push(&q, method, (a, i), (b, j));
                    }
                }
            }
        }
    }

    fn push(
        &mut self,
        ip: &IntersectionPoint,
        method: Method,
        (a, i): (&Path<'_>, usize),
        (b, j): (&Path<'_>, usize),
    ) {
        let mut pa = a.position(i, ip.ta);
        let mut pb = b.position(j, ip.tb);
        if self.self_turns && pb < pa {
            std::mem::swap(&mut pa, &mut pb);
        }
        if self.self_turns && pa == pb {
            return;
        }
        if !self.seen.insert((pa, pb)) {
            return;
        }
        self.turns.push(Turn::new(
            ip.point,
            [TurnOperation::new(pa.0, pa.1), TurnOperation::new(pb.0, pb.1)],
            method,
        ));
    }
}

/// Unclassified turns between every path of `first` and every path of `second`.
fn sweep_pairs(first: &[Path<'_>], second: &[Path<'_>], strategy: &dyn Strategy) -> Vec<Turn> {
    let mut turns = Vec::new();
    let mut seen = BTreeSet::new();
    let mut sweep = PathPairSweep {
        strategy,
        seen: &mut seen,
        turns: &mut turns,
        self_turns: false,
    };
    for a in first {
        for b in second {
            sweep.run(a, b);
        }
    }
    turns
}

/// All turns between the boundaries of input 0 and input 1, classified locally.
///
/// Ring pairs and segment pairs are prefiltered by bounding box. Positions are
/// normalized so each physical event is reported once; near-duplicates remain
/// and are left to clustering.
pub fn compute_turns(inputs: &Inputs<'_>, strategy: &dyn Strategy) -> Vec<Turn> {
    let first: Vec<Path<'_>> = inputs
        .rings(0)
        .map(|(id, r)| Path::ring(id, &r.points))
        .collect();
    let second: Vec<Path<'_>> = inputs
        .rings(1)
        .map(|(id, r)| Path::ring(id, &r.points))
        .collect();
    let mut turns = sweep_pairs(&first, &second, strategy);
    for (i, turn) in turns.iter_mut().enumerate() {
        classify_turn(turn, i, inputs, strategy);
    }
    tracing::debug!(turns = turns.len(), "computed turns");
    turns
}

/// Turns between linestrings (source 0) and the rings of an areal input
/// (source 1). Operations stay `Operation::None`; `follow` tags the line side.
pub fn compute_line_turns(
    lines: &MultiLineString,
    areal: &MultiPolygon,
    strategy: &dyn Strategy,
) -> Vec<Turn> {
    let first: Vec<Path<'_>> = lines
        .paths(0)
        .map(|(id, l)| Path::open(id, &l.points))
        .collect();
    let second: Vec<Path<'_>> = areal
        .rings(1)
        .map(|(id, r)| Path::ring(id, &r.points))
        .collect();
    let turns = sweep_pairs(&first, &second, strategy);
    tracing::debug!(turns = turns.len(), "computed line/ring turns");
    turns
}

/// Turns between the linestrings of two linear inputs (sources 0 and 1).
pub fn compute_line_line_turns(
    first: &MultiLineString,
    second: &MultiLineString,
    strategy: &dyn Strategy,
) -> Vec<Turn> {
    let a: Vec<Path<'_>> = first
        .paths(0)
        .map(|(id, l)| Path::open(id, &l.points))
        .collect();
    let b: Vec<Path<'_>> = second
        .paths(1)
        .map(|(id, l)| Path::open(id, &l.points))
        .collect();
    let turns = sweep_pairs(&a, &b, strategy);
    tracing::debug!(turns = turns.len(), "computed line/line turns");
    turns
}

/// Turns between rings of one geometry (including non-adjacent segments of the
/// same ring). Operations stay `Operation::None`; only points and methods matter.
pub fn compute_self_turns(
    geometry: &MultiPolygon,
    source_index: usize,
    strategy: &dyn Strategy,
) -> Vec<Turn> {
    let rings: Vec<Path<'_>> = geometry
        .rings(source_index)
        .map(|(id, r)| Path::ring(id, &r.points))
        .collect();
    let mut turns = Vec::new();
    let mut seen = BTreeSet::new();
    let mut sweep = PathPairSweep {
        strategy,
        seen: &mut seen,
        turns: &mut turns,
        self_turns: true,
    };
    for (x, a) in rings.iter().enumerate() {
        for b in &rings[x..] {
            sweep.run(a, b);
        }
    }
    turns
}
