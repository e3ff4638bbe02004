//! Follow: clip linestrings against an areal input or another set of linestrings.
//!
//! Purpose
//! - Cut every line at its turns with the other input and keep the pieces the
//!   requested result needs: covered pieces for intersection, uncovered ones
//!   for difference.
//! - Tag the line operation of each turn with what the line does after it:
//!   entering or staying inside (`Intersection`), leaving (`Union`), running
//!   along the other boundary (`Continue`), or ending there (`Blocked`).
//!
//! Why this design
//! - No turn lies strictly inside a piece, so one probe decides where the whole
//!   piece lies. The probe is the midpoint of the piece's first segment.
//! - Lines have no interior. Against another line a piece is either on it
//!   (`Boundary`) or off it (`Outside`).
//! - Kept pieces that meet end to start on the same line are joined, so a
//!   line that only touches the other input stays in one piece.
//!
//! References
//! - Code cross-refs: `turns::compute_line_turns`, `turns::compute_line_line_turns`,
//!   `overlay::overlay`.

use std::collections::BTreeMap;

use crate::geometry::{LineString, MultiLineString, MultiPolygon, Point};
use crate::strategy::{Location, Strategy};
use crate::turns::{compute_line_line_turns, compute_line_turns, Operation, SegmentRatio, Turn};

/// What the followed lines are clipped against.
#[derive(Clone, Copy, Debug)]
pub enum Clip<'a> {
    Areal(&'a MultiPolygon),
    Linear(&'a MultiLineString),
}

impl Clip<'_> {
    /// Turns between `lines` (source 0) and this input (source 1).
    pub fn turns(&self, lines: &MultiLineString, strategy: &dyn Strategy) -> Vec<Turn> {
        match self {
            Clip::Areal(mp) => compute_line_turns(lines, mp, strategy),
            Clip::Linear(ml) => compute_line_line_turns(lines, ml, strategy),
        }
    }

    fn locate(&self, p: &Point, strategy: &dyn Strategy) -> Location {
        match self {
            Clip::Areal(mp) => {
                let mut winding = 0;
                for (_, ring) in mp.rings(1) {
                    if strategy.on_path(&ring.points, p) {
                        return Location::Boundary;
                    }
                    winding += strategy.winding(ring, p);
                }
                if winding > 0 {
                    Location::Inside
                } else {
                    Location::Outside
                }
            }
            Clip::Linear(ml) => {
                if ml.lines.iter().any(|l| strategy.on_path(&l.points, p)) {
                    Location::Boundary
                } else {
                    Location::Outside
                }
            }
        }
    }
}

/// Stretch of one input line between two consecutive cuts.
#[derive(Clone, Debug, PartialEq)]
pub struct Piece {
    pub multi_index: usize,
    pub line: LineString,
    pub location: Location,
}

/// `(segment_index, fraction)` on one line.
type Cut = (usize, SegmentRatio);

fn tag(location: Location) -> Operation {
    match location {
        Location::Inside => Operation::Intersection,
        Location::Outside => Operation::Union,
        Location::Boundary => Operation::Continue,
    }
}

fn push_distinct(points: &mut Vec<Point>, p: Point, strategy: &dyn Strategy) {
    match points.last() {
        Some(last) if strategy.equals(last, &p) => {}
        _ => points.push(p),
    }
}

/// Points of `line` from cut `from` (at `p`) to cut `to` (at `q`); `None` when
/// they collapse to one point.
fn cut_piece(
    line: &LineString,
    (from, p): (Cut, Point),
    (to, q): (Cut, Point),
    strategy: &dyn Strategy,
) -> Option<LineString> {
    let mut points = vec![p];
    let end_vertex = if to.1.is_zero() { to.0 } else { to.0 + 1 };
    for k in from.0 + 1..end_vertex {
        push_distinct(&mut points, line.points[k], strategy);
    }
    push_distinct(&mut points, q, strategy);
    (points.len() >= 2).then(|| LineString::new(points))
}

/// Cut `lines` at `turns` and locate every piece against `clip`.
///
/// Sets the line operation (`operations[0]`) of each turn to the tag of the
/// piece leaving it; turns at a line's end become `Blocked`.
pub fn split_lines(
    lines: &MultiLineString,
    turns: &mut [Turn],
    clip: Clip<'_>,
    strategy: &dyn Strategy,
) -> Vec<Piece> {
    let mut cuts: BTreeMap<usize, BTreeMap<Cut, Point>> = BTreeMap::new();
    for turn in turns.iter() {
        let op = &turn.operations[0];
        cuts.entry(op.seg_id.multi_index)
            .or_default()
            .insert((op.seg_id.segment_index, op.fraction), turn.point);
    }

    let mut pieces = Vec::new();
    let mut tags: BTreeMap<(usize, Cut), Operation> = BTreeMap::new();
    for (m, line) in lines.lines.iter().enumerate() {
        let n = line.segment_count();
        if n == 0 {
            continue;
        }
        let mut line_cuts = cuts.remove(&m).unwrap_or_default();
        line_cuts
            .entry((0, SegmentRatio::ZERO))
            .or_insert(line.points[0]);
        line_cuts
            .entry((n - 1, SegmentRatio::ONE))
            .or_insert(line.points[n]);
        let line_cuts: Vec<(Cut, Point)> = line_cuts.into_iter().collect();
        for w in line_cuts.windows(2) {
            let Some(piece) = cut_piece(line, w[0], w[1], strategy) else {
                continue;
            };
            let probe = nalgebra::center(&piece.points[0], &piece.points[1]);
            let location = clip.locate(&probe, strategy);
            tags.insert((m, w[0].0), tag(location));
            pieces.push(Piece {
                multi_index: m,
                line: piece,
                location,
            });
        }
        tags.insert((m, (n - 1, SegmentRatio::ONE)), Operation::Blocked);
    }

    for turn in turns.iter_mut() {
        let op = &mut turn.operations[0];
        let key = (
            op.seg_id.multi_index,
            (op.seg_id.segment_index, op.fraction),
        );
        op.operation = tags.get(&key).copied().unwrap_or(Operation::None);
    }
    pieces
}

/// Pieces of `lines` covered by `clip` (`Operation::Intersection`) or outside
/// it (`Operation::Union`, the line part of a difference).
///
/// Consecutive kept pieces of one line that meet are joined. Isolated touch
/// points are not reported.
pub fn follow(
    lines: &MultiLineString,
    clip: Clip<'_>,
    target: Operation,
    strategy: &dyn Strategy,
) -> MultiLineString {
    let mut turns = clip.turns(lines, strategy);
    let pieces = split_lines(lines, &mut turns, clip, strategy);
    let keep = |location: Location| match target {
        Operation::Intersection => location != Location::Outside,
        _ => location == Location::Outside,
    };

    let mut out: Vec<LineString> = Vec::new();
    let mut open: Option<(usize, LineString)> = None;
    for piece in pieces {
        if !keep(piece.location) {
            out.extend(open.take().map(|(_, l)| l));
            continue;
        }
        let joins = matches!(
            &open,
            Some((m, joined)) if *m == piece.multi_index
                && matches!(
                    (joined.points.last(), piece.line.points.first()),
                    (Some(a), Some(b)) if strategy.equals(a, b)
                )
        );
        if joins {
            if let Some((_, joined)) = open.as_mut() {
                joined.points.extend_from_slice(&piece.line.points[1..]);
            }
        } else {
            out.extend(open.replace((piece.multi_index, piece.line)).map(|(_, l)| l));
        }
    }
    out.extend(open.map(|(_, l)| l));

    tracing::debug!(
        target = ?target,
        turns = turns.len(),
        lines = out.len(),
        "follow done"
    );
    MultiLineString::new(out)
}
