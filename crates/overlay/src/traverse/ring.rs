//! Output ring construction: vertex copying, collinear suppression, closure.

use crate::geometry::{Point, Ring};
use crate::strategy::{Side, Strategy};
use crate::turns::TurnOperation;

/// Append `p` unless it duplicates the last point; first drop trailing points
/// that become collinear (including spikes folding back over the last edge).
pub(crate) fn append_no_collinear(points: &mut Vec<Point>, p: Point, strategy: &dyn Strategy) {
    if points.last().is_some_and(|last| strategy.equals(last, &p)) {
        return;
    }
    while points.len() >= 2 {
        let n = points.len();
        if strategy.side(&points[n - 2], &points[n - 1], &p) != Side::Collinear {
            break;
        }
        points.pop();
    }
    if points.last().is_some_and(|last| strategy.equals(last, &p)) {
        return;
    }
    points.push(p);
}

/// Number of ring vertices passed walking from `from` to `to` on one ring.
///
/// Zero when `to` lies further along the same segment; the full ring when `to`
/// is at or behind `from` on the same segment (round trip).
pub(crate) fn vertex_count(n: usize, from: &TurnOperation, to: &TurnOperation) -> usize {
    let s = from.seg_id.segment_index;
    let t = to.seg_id.segment_index;
    if t > s {
        t - s
    } else if t < s {
        t + n - s
    } else if to.fraction > from.fraction {
        0
    } else {
        n
    }
}

/// Copy the ring vertices between two positions (exclusive of `from`'s point).
pub(crate) fn use_vertices(
    ring: &Ring,
    from: &TurnOperation,
    to: &TurnOperation,
    points: &mut Vec<Point>,
    strategy: &dyn Strategy,
) {
    let n = ring.segment_count();
    let s = from.seg_id.segment_index;
    for k in 1..=vertex_count(n, from, to) {
        append_no_collinear(points, ring.vertex(s + k), strategy);
    }
}

/// Make the last point equal the first, snapping a near-equal last point.
pub(crate) fn fix_closure(points: &mut Vec<Point>, strategy: &dyn Strategy) {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return;
    };
    if first == last {
        return;
    }
    if strategy.equals(&first, &last) {
        let n = points.len();
        points[n - 1] = first;
    } else {
        points.push(first);
    }
}

/// Remove collinear vertices and spikes left around the closing point of a
/// closed point list.
pub(crate) fn remove_spikes_at_closure(points: &mut Vec<Point>, strategy: &dyn Strategy) {
    while points.len() >= 4 {
        let n = points.len();
        if strategy.side(&points[n - 2], &points[0], &points[1]) == Side::Collinear {
            points.remove(0);
            let first = points[0];
            let last = points.len() - 1;
            points[last] = first;
            continue;
        }
        if strategy.side(&points[n - 3], &points[n - 2], &points[0]) == Side::Collinear {
            points.remove(n - 2);
            continue;
        }
        break;
    }
}

/// Close a traversed point list into a ring.
pub(crate) fn close_ring(mut points: Vec<Point>, strategy: &dyn Strategy) -> Ring {
    fix_closure(&mut points, strategy);
    remove_spikes_at_closure(&mut points, strategy);
    Ring::new(points)
}
