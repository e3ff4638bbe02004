use super::*;
use crate::geometry::{Inputs, LineString, MultiLineString, MultiPolygon, Point, Polygon, Ring};
use crate::strategy::Cartesian;

fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon {
    MultiPolygon::new(vec![Polygon::new(
        Ring::from_coords(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1)]),
        Vec::new(),
    )])
}

fn close(p: &Point, x: f64, y: f64) -> bool {
    (p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9
}

fn ops(t: &Turn) -> [Operation; 2] {
    [t.operations[0].operation, t.operations[1].operation]
}

#[test]
fn crossing_squares_yield_two_crossings() {
    let a = square(0.0, 0.0, 2.0, 2.0);
    let b = square(1.0, 1.0, 3.0, 3.0);
    let turns = compute_turns(&Inputs::new(&a, &b), &Cartesian::default());
    assert_eq!(turns.len(), 2);
    assert!(turns.iter().all(|t| t.method == Method::Crosses));

    let t0 = &turns[0];
    assert!(close(&t0.point, 2.0, 1.0));
    assert_eq!(t0.operations[0].seg_id.segment_index, 1);
    assert!((t0.operations[0].fraction.value() - 0.5).abs() < 1e-12);
    // A heads up into B; B heads right, away from A.
    assert_eq!(ops(t0), [Operation::Intersection, Operation::Union]);

    let t1 = &turns[1];
    assert!(close(&t1.point, 1.0, 2.0));
    assert_eq!(ops(t1), [Operation::Union, Operation::Intersection]);
}

#[test]
fn disjoint_squares_have_no_turns() {
    let a = square(0.0, 0.0, 1.0, 1.0);
    let b = square(5.0, 5.0, 6.0, 6.0);
    assert!(compute_turns(&Inputs::new(&a, &b), &Cartesian::default()).is_empty());
}

#[test]
fn shared_edge_reported_once_per_endpoint() {
    let a = square(0.0, 0.0, 2.0, 2.0);
    let b = square(2.0, 0.0, 4.0, 2.0);
    let turns = compute_turns(&Inputs::new(&a, &b), &Cartesian::default());
    assert_eq!(turns.len(), 2);
    let bottom = turns.iter().find(|t| close(&t.point, 2.0, 0.0)).unwrap();
    let top = turns.iter().find(|t| close(&t.point, 2.0, 2.0)).unwrap();
    // The shared edge is interior to the union: whoever runs along it is blocked.
    assert_eq!(ops(bottom), [Operation::Blocked, Operation::Union]);
    assert_eq!(ops(top), [Operation::Union, Operation::Blocked]);
    // Positions are normalized to fraction zero on the following segment.
    assert!(bottom.operations.iter().all(|op| op.fraction.is_zero()));
}

#[test]
fn corner_touch_is_union_union() {
    let a = square(0.0, 0.0, 1.0, 1.0);
    let b = square(1.0, 1.0, 2.0, 2.0);
    let turns = compute_turns(&Inputs::new(&a, &b), &Cartesian::default());
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].method, Method::Touch);
    assert!(turns[0].both(Operation::Union));
}

#[test]
fn vertex_on_edge_is_touch_interior() {
    let a = square(0.0, 0.0, 2.0, 2.0);
    let b = MultiPolygon::new(vec![Polygon::new(
        Ring::from_coords(&[(2.0, 1.0), (4.0, 0.0), (4.0, 2.0)]),
        Vec::new(),
    )]);
    let turns = compute_turns(&Inputs::new(&a, &b), &Cartesian::default());
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].method, Method::TouchInterior);
    assert!(turns[0].both(Operation::Union));
    assert!(!turns[0].is_self_turn());
}

#[test]
fn line_turns_keep_the_open_end_and_skip_the_side_sort() {
    let s = Cartesian::default();
    let area = square(0.0, 0.0, 2.0, 2.0);

    // Ends on the top edge: the position stays on the last segment.
    let ending = MultiLineString::new(vec![LineString::from_coords(&[(1.0, 1.0), (1.0, 2.0)])]);
    let turns = compute_line_turns(&ending, &area, &s);
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].method, Method::TouchInterior);
    assert_eq!(turns[0].operations[0].seg_id.segment_index, 0);
    assert_eq!(turns[0].operations[0].fraction, SegmentRatio::ONE);
    assert_eq!(ops(&turns[0]), [Operation::None, Operation::None]);

    // An interior vertex on the bottom edge is the start of the next segment.
    let bent = MultiLineString::new(vec![LineString::from_coords(&[
        (1.0, 1.0),
        (1.0, 0.0),
        (3.0, 0.0),
    ])]);
    let turns = compute_line_turns(&bent, &area, &s);
    let at_vertex: Vec<&Turn> = turns.iter().filter(|t| close(&t.point, 1.0, 0.0)).collect();
    assert!(!at_vertex.is_empty());
    for t in at_vertex {
        assert_eq!(t.operations[0].seg_id.segment_index, 1);
        assert!(t.operations[0].fraction.is_zero());
    }
    assert!(turns.iter().any(|t| close(&t.point, 2.0, 0.0)));
}

#[test]
fn line_line_turns_report_overlap_ends() {
    let a = MultiLineString::new(vec![LineString::from_coords(&[(0.0, 0.0), (4.0, 0.0)])]);
    let b = MultiLineString::new(vec![LineString::from_coords(&[(2.0, 0.0), (6.0, 0.0)])]);
    let turns = compute_line_line_turns(&a, &b, &Cartesian::default());
    assert_eq!(turns.len(), 2);
    assert!(turns.iter().all(|t| t.method == Method::Collinear));
    assert!(close(&turns[0].point, 2.0, 0.0));
    assert!(close(&turns[1].point, 4.0, 0.0));
    assert_eq!(turns[1].operations[0].fraction, SegmentRatio::ONE);
    assert_eq!(turns[1].operations[1].seg_id.source_index, 1);
}

#[test]
fn self_turns_of_simple_square_are_empty() {
    let a = square(0.0, 0.0, 1.0, 1.0);
    assert!(compute_self_turns(&a, 0, &Cartesian::default()).is_empty());
}

#[test]
fn self_turns_find_bow_tie_crossing() {
    let bow = MultiPolygon::new(vec![Polygon::new(
        Ring::from_coords(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)]),
        Vec::new(),
    )]);
    let turns = compute_self_turns(&bow, 0, &Cartesian::default());
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].method, Method::Crosses);
    assert!(close(&turns[0].point, 1.0, 1.0));
    assert!(turns[0].both(Operation::None));
}

#[test]
fn self_turns_find_hole_touching_exterior() {
    let exterior = Ring::from_coords(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
    let hole = Ring::from_coords(&[(0.0, 2.0), (2.0, 3.0), (2.0, 1.0)]);
    let mp = MultiPolygon::new(vec![Polygon::new(exterior, vec![hole])]);
    let turns = compute_self_turns(&mp, 0, &Cartesian::default());
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].method, Method::TouchInterior);
    assert!(close(&turns[0].point, 0.0, 2.0));
}

#[test]
fn node_ids_follow_cluster_membership() {
    let a = square(0.0, 0.0, 2.0, 2.0);
    let b = square(1.0, 1.0, 3.0, 3.0);
    let mut turns = compute_turns(&Inputs::new(&a, &b), &Cartesian::default());
    turns[1].cluster_id = Some(0);
    let mut clusters = Clusters::new();
    clusters.insert(
        0,
        Cluster {
            turn_indices: [1].into_iter().collect(),
            open_count: 0,
        },
    );
    assert_eq!(node_id(&turns, 0), NodeId::Turn(0));
    assert_eq!(node_id(&turns, 1), NodeId::Cluster(0));
    assert_eq!(turn_indices_of(&turns, &clusters, NodeId::Cluster(0)), vec![1]);
    turns[1].discarded = true;
    assert!(turn_indices_of(&turns, &clusters, NodeId::Cluster(0)).is_empty());
}
