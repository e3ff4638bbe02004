use super::*;
use crate::geometry::{Point, Ring};

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

#[test]
fn side_is_signed_and_tolerant() {
    let s = Cartesian::default();
    assert_eq!(s.side(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.5, 1.0)), Side::Left);
    assert_eq!(s.side(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.5, -1.0)), Side::Right);
    assert_eq!(s.side(&p(0.0, 0.0), &p(1.0, 0.0), &p(7.0, 0.0)), Side::Collinear);
    assert_eq!(s.side(&p(0.0, 0.0), &p(1.0, 0.0), &p(7.0, 1e-15)), Side::Collinear);
}

#[test]
fn equals_uses_the_distance_tolerance() {
    let s = Cartesian::default();
    assert!(s.equals(&p(1.0, 1.0), &p(1.0 + 1e-10, 1.0)));
    assert!(!s.equals(&p(1.0, 1.0), &p(1.0 + 1e-6, 1.0)));
}

#[test]
fn proper_crossing_reports_fractions() {
    let s = Cartesian::default();
    match s.intersect(&p(0.0, 0.0), &p(2.0, 2.0), &p(0.0, 2.0), &p(2.0, 0.0)) {
        SegmentIntersection::Point(ip) => {
            assert_eq!(ip.point, p(1.0, 1.0));
            assert_eq!((ip.ta, ip.tb), (0.5, 0.5));
            assert!(!ip.a_at_endpoint() && !ip.b_at_endpoint());
        }
        other => panic!("expected a crossing, got {other:?}"),
    }
    assert_eq!(
        s.intersect(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 1.0), &p(1.0, 1.0)),
        SegmentIntersection::None
    );
}

#[test]
fn near_endpoint_hits_snap_to_the_vertex() {
    let s = Cartesian::default();
    // b starts a hair above a's midpoint; the hit is b's start vertex.
    match s.intersect(&p(0.0, 0.0), &p(2.0, 0.0), &p(1.0, 1e-13), &p(1.0, 2.0)) {
        SegmentIntersection::Point(ip) => {
            assert_eq!(ip.tb, 0.0);
            assert!(ip.b_at_endpoint());
            assert_eq!(ip.ta, 0.5);
        }
        other => panic!("expected a touch, got {other:?}"),
    }
    // Touch at a's end reports a's vertex exactly.
    match s.intersect(&p(0.0, 0.0), &p(1.0, 1.0), &p(0.0, 2.0), &p(2.0, 0.0)) {
        SegmentIntersection::Point(ip) => {
            assert_eq!(ip.point, p(1.0, 1.0));
            assert_eq!(ip.ta, 1.0);
        }
        other => panic!("expected a touch, got {other:?}"),
    }
}

#[test]
fn collinear_overlap_reports_both_ends_in_a_order() {
    let s = Cartesian::default();
    match s.intersect(&p(0.0, 0.0), &p(4.0, 0.0), &p(3.0, 0.0), &p(1.0, 0.0)) {
        SegmentIntersection::Overlap(first, second) => {
            assert_eq!(first.point, p(1.0, 0.0));
            assert_eq!((first.ta, first.tb), (0.25, 1.0));
            assert_eq!(second.point, p(3.0, 0.0));
            assert_eq!((second.ta, second.tb), (0.75, 0.0));
        }
        other => panic!("expected an overlap, got {other:?}"),
    }
    // Collinear segments meeting in one point only.
    match s.intersect(&p(0.0, 0.0), &p(1.0, 0.0), &p(1.0, 0.0), &p(2.0, 0.0)) {
        SegmentIntersection::Point(ip) => assert_eq!((ip.ta, ip.tb), (1.0, 0.0)),
        other => panic!("expected a point, got {other:?}"),
    }
}

#[test]
fn winding_and_location() {
    let s = Cartesian::default();
    let ccw = Ring::from_coords(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
    assert_eq!(s.winding(&ccw, &p(1.0, 1.0)), 1);
    assert_eq!(s.winding(&ccw.reversed(), &p(1.0, 1.0)), -1);
    assert_eq!(s.winding(&ccw, &p(3.0, 1.0)), 0);
    assert_eq!(s.location(&ccw, &p(1.0, 1.0)), Location::Inside);
    assert_eq!(s.location(&ccw, &p(2.0, 1.0)), Location::Boundary);
    assert_eq!(s.location(&ccw, &p(2.0 + 1e-12, 1.0)), Location::Boundary);
    assert_eq!(s.location(&ccw, &p(-1.0, 1.0)), Location::Outside);
}

#[test]
fn on_path_follows_open_polylines() {
    let s = Cartesian::default();
    let path = [p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0)];
    assert!(s.on_path(&path, &p(1.0, 0.0)));
    assert!(s.on_path(&path, &p(2.0, 1.0 + 1e-12)));
    // No closing segment back to the start.
    assert!(!s.on_path(&path, &p(1.0, 1.0)));
    assert!(!s.on_path(&path, &p(3.0, 0.0)));
}

#[test]
fn default_cfg_values() {
    let cfg = OverlayCfg::default();
    assert_eq!(cfg.eps_side, 1e-12);
    assert_eq!(cfg.eps_equal, 1e-9);
    assert_eq!(cfg.eps_snap, 1e-9);
    assert!(cfg.check_validity);
    assert_eq!(Cartesian::new(cfg).margin(), 1e-9);
}
