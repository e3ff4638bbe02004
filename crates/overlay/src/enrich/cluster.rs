//! Grouping of coincident turns and per-cluster reclassification.

use std::collections::BTreeMap;

use crate::geometry::{Inputs, RingId};
use crate::strategy::Strategy;
use crate::turns::sides::{pass_of, sort_by_side, Baseline, Pass};
use crate::turns::{Cluster, Clusters, Turn, TurnOperationId};

/// Disjoint sets over turn indices (path halving, union by index).
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi] = lo;
        }
    }
}

/// Rebuild clusters from scratch: equal points (plus explicit `links`) join.
///
/// Only non-discarded turns participate. Cluster ids are assigned in order of
/// each cluster's lowest turn index.
pub(crate) fn gather_clusters(
    turns: &mut [Turn],
    links: &[(usize, usize)],
    strategy: &dyn Strategy,
) -> Clusters {
    for t in turns.iter_mut() {
        t.cluster_id = None;
    }
    let margin = strategy.margin();
    let mut live: Vec<usize> = (0..turns.len()).filter(|&i| !turns[i].discarded).collect();
    live.sort_by(|&a, &b| turns[a].point.x.total_cmp(&turns[b].point.x).then(a.cmp(&b)));

    let mut uf = UnionFind::new(turns.len());
    for (k, &i) in live.iter().enumerate() {
        for &j in &live[k + 1..] {
            if turns[j].point.x - turns[i].point.x > margin {
                break;
            }
            if strategy.equals(&turns[i].point, &turns[j].point) {
                uf.union(i, j);
            }
        }
    }
    for &(a, b) in links {
        if !turns[a].discarded && !turns[b].discarded {
            uf.union(a, b);
        }
    }

    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for i in 0..turns.len() {
        if !turns[i].discarded {
            let root = uf.find(i);
            groups.entry(root).or_default().push(i);
        }
    }
    let mut clusters = Clusters::new();
    for members in groups.into_values().filter(|m| m.len() > 1) {
        let id = clusters.len();
        for &i in &members {
            turns[i].cluster_id = Some(id);
        }
        clusters.insert(
            id,
            Cluster {
                turn_indices: members.into_iter().collect(),
                open_count: 0,
            },
        );
    }
    clusters
}

/// Side sort over every pass through the cluster point; rewrites operations
/// and zones of the members and sets `open_count`.
pub(crate) fn classify_cluster(
    turns: &mut [Turn],
    cluster: &mut Cluster,
    inputs: &Inputs<'_>,
    strategy: &dyn Strategy,
) {
    let Some(&first) = cluster.turn_indices.iter().next() else {
        return;
    };
    let at = turns[first].point;
    let mut members: Vec<(TurnOperationId, Option<Pass>)> = Vec::new();
    for &t in &cluster.turn_indices {
        for (j, op) in turns[t].operations.iter().enumerate() {
            members.push((TurnOperationId::new(t, j), pass_of(inputs, op, &at, strategy)));
        }
    }

    let mut skip: [Vec<RingId>; 2] = [Vec::new(), Vec::new()];
    for p in members.iter().filter_map(|(_, p)| p.as_ref()) {
        if !skip[p.source].contains(&p.key.ring) {
            skip[p.source].push(p.key.ring);
        }
    }
    let baseline = Baseline::Winding([
        inputs.coverage(0, &at, &skip[0], strategy),
        inputs.coverage(1, &at, &skip[1], strategy),
    ]);

    let sorted = sort_by_side(&at, &members, baseline, strategy);
    for (toi, operation, zone) in sorted.tags {
        let op = &mut turns[toi.turn_index].operations[toi.operation_index];
        op.operation = operation;
        op.enriched.zone = zone;
    }
    cluster.open_count = sorted.open_count;
}
