//! Side sort around one point: passes, rays, sectors, coverage, operation tags.
//!
//! Every ring running through the point contributes one *pass* (incoming and
//! outgoing vertex). Rays to those vertices are sorted by angle and grouped when
//! collinear in the same direction; the sectors between consecutive groups get
//! per-input coverage. An outgoing ray is then tagged by the coverage on its two
//! sides:
//! - union: left covered by some input, right by none;
//! - intersection: left covered by both inputs, right not by both;
//! - continue: both of the above;
//! - blocked: neither, or a later ray in an already tagged outgoing group.

use std::collections::BTreeMap;

use crate::geometry::{Inputs, Point, RingId};
use crate::strategy::{Side, Strategy};

use super::types::{Operation, Turn, TurnOperation, TurnOperationId};

/// Identity of a pass: same ring, same neighbouring vertices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct PassKey {
    pub ring: RingId,
    pub in_vertex: usize,
    pub out_vertex: usize,
}

#[derive(Clone, Debug)]
pub(crate) struct Pass {
    pub key: PassKey,
    pub source: usize,
    pub ring_cw: bool,
    pub in_pt: Point,
    pub out_pt: Point,
}

/// Pass of `op`'s ring through `at`, skipping vertices that coincide with `at`.
pub(crate) fn pass_of(
    inputs: &Inputs<'_>,
    op: &TurnOperation,
    at: &Point,
    strategy: &dyn Strategy,
) -> Option<Pass> {
    let ring_id = op.seg_id.ring_id();
    let ring = inputs.ring(&ring_id);
    let n = ring.segment_count();
    if n < 3 {
        return None;
    }
    let s = op.seg_id.segment_index;
    let mut out_k = s + 1;
    while strategy.equals(&ring.vertex(out_k), at) {
        out_k += 1;
        if out_k > s + n {
            return None;
        }
    }
    let mut in_k = if op.fraction.is_zero() { s + n - 1 } else { s + n };
    let mut steps = 0;
    while strategy.equals(&ring.vertex(in_k), at) {
        in_k -= 1;
        steps += 1;
        if steps >= n {
            return None;
        }
    }
    Some(Pass {
        key: PassKey {
            ring: ring_id,
            in_vertex: in_k % n,
            out_vertex: out_k % n,
        },
        source: ring_id.source_index,
        ring_cw: ring.signed_area() < 0.0,
        in_pt: ring.vertex(in_k),
        out_pt: ring.vertex(out_k),
    })
}

/// Coverage offset applied before adding pass contributions.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Baseline {
    /// Only the passes count: a sector is covered by an input iff it lies
    /// left of one of that input's passes.
    Local,
    /// Winding sums of the rings not passing through the point (plus the
    /// complement offset).
    Winding([i32; 2]),
}

/// Tags for the members of one side sort, in member order.
#[derive(Clone, Debug, Default)]
pub(crate) struct SideSort {
    pub tags: Vec<(TurnOperationId, Operation, Option<usize>)>,
    pub open_count: usize,
}

struct Ray {
    end: Point,
    pass: usize,
    outgoing: bool,
    angle: f64,
}

fn same_direction(strategy: &dyn Strategy, at: &Point, a: &Point, b: &Point) -> bool {
    strategy.side(at, a, b) == Side::Collinear && (a - at).dot(&(b - at)) > 0.0
}

/// Sort all passes of `members` around `at` and tag every member operation.
pub(crate) fn sort_by_side(
    at: &Point,
    members: &[(TurnOperationId, Option<Pass>)],
    baseline: Baseline,
    strategy: &dyn Strategy,
) -> SideSort {
    let mut passes: Vec<Pass> = Vec::new();
    let mut index_of: BTreeMap<PassKey, usize> = BTreeMap::new();
    let member_pass: Vec<Option<usize>> = members
        .iter()
        .map(|(_, pass)| {
            pass.as_ref().map(|p| {
                *index_of.entry(p.key).or_insert_with(|| {
                    passes.push(p.clone());
                    passes.len() - 1
                })
            })
        })
        .collect();

    let mut rays: Vec<Ray> = Vec::with_capacity(2 * passes.len());
    for (i, p) in passes.iter().enumerate() {
        for (end, outgoing) in [(p.in_pt, false), (p.out_pt, true)] {
            let d = end - at;
            rays.push(Ray {
                end,
                pass: i,
                outgoing,
                angle: d.y.atan2(d.x),
            });
        }
    }
    rays.sort_by(|a, b| {
        a.angle
            .total_cmp(&b.angle)
            .then(a.pass.cmp(&b.pass))
            .then(a.outgoing.cmp(&b.outgoing))
    });

    // Group collinear same-direction rays; `leaders` holds the first ray of each group.
    let mut group_of = vec![0usize; rays.len()];
    let mut leaders: Vec<usize> = Vec::new();
    for r in 0..rays.len() {
        let joins = match leaders.last() {
            Some(&lead) => same_direction(strategy, at, &rays[lead].end, &rays[r].end),
            None => false,
        };
        if !joins {
            leaders.push(r);
        }
        group_of[r] = leaders.len() - 1;
    }
    if leaders.len() > 1 {
        let last = leaders.len() - 1;
        if same_direction(strategy, at, &rays[leaders[last]].end, &rays[leaders[0]].end) {
            for g in group_of.iter_mut() {
                if *g == last {
                    *g = 0;
                }
            }
            leaders.pop();
        }
    }
    let m = leaders.len();
    if m < 2 {
        return SideSort {
            tags: members
                .iter()
                .map(|(toi, _)| (*toi, Operation::None, None))
                .collect(),
            open_count: 0,
        };
    }

    let mut g_in = vec![0usize; passes.len()];
    let mut g_out = vec![0usize; passes.len()];
    for (r, ray) in rays.iter().enumerate() {
        if ray.outgoing {
            g_out[ray.pass] = group_of[r];
        } else {
            g_in[ray.pass] = group_of[r];
        }
    }

    // Sector k spans from group k counter-clockwise to group k + 1.
    let base = match baseline {
        Baseline::Winding(b) => b,
        Baseline::Local => {
            let mut b = [0i32; 2];
            for p in &passes {
                b[p.source] += i32::from(p.ring_cw);
            }
            b
        }
    };
    let mut cov = vec![base; m];
    for (i, p) in passes.iter().enumerate() {
        let o = g_out[i];
        let width = (g_in[i] + m - o) % m;
        for (k, c) in cov.iter_mut().enumerate() {
            if (k + m - o) % m < width {
                c[p.source] += 1;
            }
            if p.ring_cw {
                c[p.source] -= 1;
            }
        }
    }
    let union: Vec<bool> = cov.iter().map(|c| c[0] > 0 || c[1] > 0).collect();
    let both: Vec<bool> = cov.iter().map(|c| c[0] > 0 && c[1] > 0).collect();

    let open_count = union.iter().filter(|covered| !**covered).count();
    let mut zone: Vec<Option<usize>> = vec![None; m];
    match union.iter().position(|covered| !*covered) {
        None => zone.iter_mut().for_each(|z| *z = Some(0)),
        Some(k0) => {
            let mut next_zone = 0;
            let mut current = None;
            for step in 1..=m {
                let k = (k0 + step) % m;
                if union[k] {
                    if current.is_none() {
                        current = Some(next_zone);
                        next_zone += 1;
                    }
                    zone[k] = current;
                } else {
                    current = None;
                }
            }
        }
    }

    // Only the first member (by operation id) of an outgoing group is tagged.
    let mut order: Vec<usize> = (0..members.len()).collect();
    order.sort_by_key(|&i| members[i].0);
    let mut tagged_group = vec![false; m];
    let mut tags: Vec<(TurnOperationId, Operation, Option<usize>)> = members
        .iter()
        .map(|(toi, _)| (*toi, Operation::None, None))
        .collect();
    for i in order {
        let Some(p) = member_pass[i] else {
            continue;
        };
        let g = g_out[p];
        let left = g;
        let right = (g + m - 1) % m;
        let op = if tagged_group[g] {
            Operation::Blocked
        } else {
            tagged_group[g] = true;
            let u = union[left] && !union[right];
            let x = both[left] && !both[right];
            match (u, x) {
                (true, true) => Operation::Continue,
                (true, false) => Operation::Union,
                (false, true) => Operation::Intersection,
                (false, false) => Operation::Blocked,
            }
        };
        tags[i] = (members[i].0, op, zone[left]);
    }
    SideSort { tags, open_count }
}

/// Local classification of one turn from its own two passes.
pub(crate) fn classify_turn(
    turn: &mut Turn,
    turn_index: usize,
    inputs: &Inputs<'_>,
    strategy: &dyn Strategy,
) {
    let members: Vec<(TurnOperationId, Option<Pass>)> = (0..2)
        .map(|j| {
            (
                TurnOperationId::new(turn_index, j),
                pass_of(inputs, &turn.operations[j], &turn.point, strategy),
            )
        })
        .collect();
    let sorted = sort_by_side(&turn.point, &members, Baseline::Local, strategy);
    for (toi, op, _) in sorted.tags {
        turn.operations[toi.operation_index].operation = op;
    }
}
