use proptest::prelude::{prop_assert, prop_assert_eq, proptest, ProptestConfig};

use super::*;
use crate::geometry::{LineString, Point, Polygon, Ring};
use crate::rand::{draw_ring_radial, RadialCfg, ReplayToken};

fn polygon(coords: &[(f64, f64)]) -> Geometry {
    Geometry::Polygon(Polygon::new(Ring::from_coords(coords), Vec::new()))
}

fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
    polygon(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
}

fn run(a: &Geometry, b: &Geometry, kind: OverlayKind) -> MultiPolygon {
    match overlay(a, b, kind, &OverlayCfg::default()) {
        Ok(OverlayOutput::Areal(mp)) => mp,
        Ok(other) => panic!("expected areal output, got {other:?}"),
        Err(e) => panic!("overlay failed: {e}"),
    }
}

fn line(coords: &[(f64, f64)]) -> Geometry {
    Geometry::LineString(LineString::from_coords(coords))
}

fn run_lines(a: &Geometry, b: &Geometry, kind: OverlayKind) -> MultiLineString {
    match overlay(a, b, kind, &OverlayCfg::default()) {
        Ok(OverlayOutput::Linear(ml)) => ml,
        Ok(other) => panic!("expected linear output, got {other:?}"),
        Err(e) => panic!("overlay failed: {e}"),
    }
}

fn assert_area(mp: &MultiPolygon, expected: f64) {
    let got = mp.area();
    assert!((got - expected).abs() < 1e-9, "area {got}, expected {expected}");
}

#[test]
fn overlapping_squares() {
    let a = square(0.0, 0.0, 2.0, 2.0);
    let b = square(1.0, 1.0, 3.0, 3.0);

    let union = run(&a, &b, OverlayKind::Union);
    assert_eq!(union.polygons.len(), 1);
    assert_eq!(union.polygons[0].exterior.points.len(), 9);
    assert!(union.polygons[0].interiors.is_empty());
    assert_area(&union, 7.0);

    let inter = run(&a, &b, OverlayKind::Intersection);
    assert_eq!(inter.polygons.len(), 1);
    assert_eq!(
        inter.polygons[0].exterior,
        Ring::from_coords(&[(2.0, 1.0), (2.0, 2.0), (1.0, 2.0), (1.0, 1.0)])
    );

    let diff = run(&a, &b, OverlayKind::Difference);
    assert_eq!(diff.polygons.len(), 1);
    assert_eq!(diff.polygons[0].exterior.points.len(), 7);
    assert!(diff.polygons[0].exterior.signed_area() > 0.0);
    assert_area(&diff, 3.0);

    let sym = run(&a, &b, OverlayKind::SymDifference);
    assert_eq!(sym.polygons.len(), 2);
    assert_area(&sym, 6.0);
}

#[test]
fn shared_edge_union_is_one_rectangle() {
    let a = square(0.0, 0.0, 2.0, 2.0);
    let b = square(2.0, 0.0, 4.0, 2.0);
    let union = run(&a, &b, OverlayKind::Union);
    assert_eq!(union.polygons.len(), 1);
    assert_eq!(union.polygons[0].exterior.points.len(), 5);
    assert_area(&union, 8.0);
    assert!(run(&a, &b, OverlayKind::Intersection).is_empty());
}

#[test]
fn corner_touch_union_keeps_two_polygons() {
    let a = square(0.0, 0.0, 1.0, 1.0);
    let b = square(1.0, 1.0, 2.0, 2.0);
    let union = run(&a, &b, OverlayKind::Union);
    assert_eq!(union.polygons.len(), 2);
    assert_area(&union, 2.0);
}

#[test]
fn disjoint_inputs_pass_through_ring_selection() {
    let a = square(0.0, 0.0, 1.0, 1.0);
    let b = square(5.0, 5.0, 6.0, 6.0);
    assert_eq!(run(&a, &b, OverlayKind::Union).polygons.len(), 2);
    assert!(run(&a, &b, OverlayKind::Intersection).is_empty());
    let diff = run(&a, &b, OverlayKind::Difference);
    assert_eq!(diff.polygons.len(), 1);
    assert_area(&diff, 1.0);
}

#[test]
fn contained_input_becomes_a_hole_of_the_difference() {
    let a = square(0.0, 0.0, 4.0, 4.0);
    let b = square(1.0, 1.0, 2.0, 2.0);
    let union = run(&a, &b, OverlayKind::Union);
    assert_eq!(union.polygons.len(), 1);
    assert_area(&union, 16.0);

    let inter = run(&a, &b, OverlayKind::Intersection);
    assert_eq!(inter.polygons.len(), 1);
    assert_area(&inter, 1.0);

    let diff = run(&a, &b, OverlayKind::Difference);
    assert_eq!(diff.polygons.len(), 1);
    assert_eq!(diff.polygons[0].interiors.len(), 1);
    assert!(diff.polygons[0].interiors[0].signed_area() < 0.0);
    assert_area(&diff, 15.0);

    // Nothing of b survives b - a.
    assert!(run(&b, &a, OverlayKind::Difference).is_empty());
}

#[test]
fn touch_inside_one_region_yields_a_polygon_with_a_hole() {
    let a = square(0.0, 0.0, 2.0, 2.0);
    let b = polygon(&[
        (1.0, 0.5),
        (3.0, 0.5),
        (3.0, 3.0),
        (-1.0, 3.0),
        (0.0, 2.0),
        (0.5, 2.5),
        (1.0, 2.5),
    ]);
    let union = run(&a, &b, OverlayKind::Union);
    assert_eq!(union.polygons.len(), 1);
    assert_eq!(union.polygons[0].interiors.len(), 1);
    assert_area(&union, 8.625);
}

#[test]
fn input_holes_are_respected() {
    let a = Geometry::Polygon(Polygon::new(
        Ring::from_coords(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]),
        vec![Ring::from_coords(&[(1.0, 1.0), (1.0, 3.0), (3.0, 3.0), (3.0, 1.0)])],
    ));
    let b = square(2.0, 2.0, 5.0, 5.0);
    let inter = run(&a, &b, OverlayKind::Intersection);
    // b covers a 2x2 corner of a, one unit square of which is the hole.
    assert_area(&inter, 3.0);
    let union = run(&a, &b, OverlayKind::Union);
    assert_area(&union, 12.0 + 9.0 - 3.0);
}

#[test]
fn empty_input_is_rejected() {
    let a = Geometry::MultiPolygon(MultiPolygon::default());
    let b = square(0.0, 0.0, 1.0, 1.0);
    let err = overlay(&a, &b, OverlayKind::Union, &OverlayCfg::default());
    assert_eq!(err, Err(OverlayError::EmptyInput { source_index: 0 }));
}

#[test]
fn degenerate_ring_is_rejected() {
    let a = square(0.0, 0.0, 1.0, 1.0);
    let b = polygon(&[(0.0, 0.0), (1.0, 0.0), (1.0, 0.0)]);
    let err = overlay(&a, &b, OverlayKind::Intersection, &OverlayCfg::default());
    assert!(matches!(
        err,
        Err(OverlayError::DegenerateRing { source_index: 1, .. })
    ));
}

#[test]
fn self_intersecting_input_is_rejected() {
    let a = square(0.0, 0.0, 1.0, 1.0);
    let bow_tie = polygon(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (-2.0, 4.0)]);
    let err = overlay(&a, &bow_tie, OverlayKind::Union, &OverlayCfg::default());
    assert_eq!(
        err,
        Err(OverlayError::SelfIntersection {
            source_index: 1,
            point: Point::new(1.0, 1.0),
        })
    );
}

#[test]
fn validity_allows_touching_rings_but_not_self_touching_ones() {
    let s = Cartesian::default();
    let cfg = OverlayCfg::default();
    let hole_on_edge = Geometry::Polygon(Polygon::new(
        Ring::from_coords(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]),
        vec![Ring::from_coords(&[(0.0, 2.0), (1.0, 3.0), (1.0, 1.0)])],
    ));
    let mp = normalize(&hole_on_edge, 0, &cfg).expect("valid input");
    assert_eq!(check_validity(&mp, 0, &s), Ok(()));

    let pinched = polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (2.0, 0.0), (0.0, 4.0)]);
    let mp = normalize(&pinched, 0, &cfg).expect("valid input");
    assert_eq!(
        check_validity(&mp, 0, &s),
        Err(OverlayError::SelfIntersection {
            source_index: 0,
            point: Point::new(2.0, 0.0),
        })
    );
}

#[test]
fn line_against_a_polygon_is_clipped_in_either_order() {
    let area = square(0.0, 0.0, 2.0, 2.0);
    let crossing = line(&[(-1.0, 1.0), (3.0, 1.0)]);

    let inter = run_lines(&crossing, &area, OverlayKind::Intersection);
    assert_eq!(inter.lines, vec![LineString::from_coords(&[(0.0, 1.0), (2.0, 1.0)])]);
    assert_eq!(run_lines(&area, &crossing, OverlayKind::Intersection), inter);

    let outside = run_lines(&crossing, &area, OverlayKind::Difference);
    assert_eq!(outside.lines.len(), 2);
    assert!((outside.length() - 2.0).abs() < 1e-12);

    // Removing a line from a polygon removes no area.
    let kept = run(&area, &crossing, OverlayKind::Difference);
    assert_area(&kept, 4.0);

    for kind in [OverlayKind::Union, OverlayKind::SymDifference] {
        assert_eq!(
            overlay(&crossing, &area, kind, &OverlayCfg::default()),
            Err(OverlayError::MixedDimension { kind })
        );
    }
}

#[test]
fn holes_cut_lines_too() {
    let a = Geometry::Polygon(Polygon::new(
        Ring::from_coords(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]),
        vec![Ring::from_coords(&[(1.0, 1.0), (1.0, 3.0), (3.0, 3.0), (3.0, 1.0)])],
    ));
    // Crosses the exterior, the hole, and the exterior again.
    let l = line(&[(-4.0, 2.0), (12.0, 2.0)]);
    let inter = run_lines(&l, &a, OverlayKind::Intersection);
    assert_eq!(
        inter.lines,
        vec![
            LineString::from_coords(&[(0.0, 2.0), (1.0, 2.0)]),
            LineString::from_coords(&[(3.0, 2.0), (4.0, 2.0)]),
        ]
    );
    let outside = run_lines(&l, &a, OverlayKind::Difference);
    assert!((outside.length() - 14.0).abs() < 1e-12);
    assert_eq!(outside.lines.len(), 3);
}

#[test]
fn two_lines_overlay_on_their_common_run() {
    let a = line(&[(0.0, 0.0), (4.0, 0.0)]);
    let b = line(&[(2.0, 0.0), (6.0, 0.0)]);
    let length = |kind| run_lines(&a, &b, kind).length();
    assert!((length(OverlayKind::Intersection) - 2.0).abs() < 1e-12);
    assert!((length(OverlayKind::Difference) - 2.0).abs() < 1e-12);
    assert!((length(OverlayKind::Union) - 6.0).abs() < 1e-12);
    let sym = run_lines(&a, &b, OverlayKind::SymDifference);
    assert_eq!(sym.lines.len(), 2);
    assert!((sym.length() - 4.0).abs() < 1e-12);
}

#[test]
fn degenerate_and_empty_lines_are_rejected() {
    let area = square(0.0, 0.0, 1.0, 1.0);
    let dot = line(&[(0.5, 0.5), (0.5, 0.5)]);
    assert!(matches!(
        overlay(&dot, &area, OverlayKind::Intersection, &OverlayCfg::default()),
        Err(OverlayError::DegenerateLine { source_index: 0, .. })
    ));
    let none = Geometry::MultiLineString(MultiLineString::default());
    assert_eq!(
        overlay(&area, &none, OverlayKind::Intersection, &OverlayCfg::default()),
        Err(OverlayError::EmptyInput { source_index: 1 })
    );
}

#[test]
fn self_union_reproduces_the_input() {
    let cfg = RadialCfg::default();
    for index in 0..16 {
        let ring = draw_ring_radial(cfg, ReplayToken::new(11, index), Point::new(0.0, 0.0));
        let g = Geometry::Ring(ring.clone());
        for kind in [OverlayKind::Union, OverlayKind::Intersection] {
            let out = run(&g, &g, kind);
            assert_eq!(out.polygons.len(), 1);
            assert_eq!(out.polygons[0].exterior.points.len(), ring.points.len());
            assert_area(&out, ring.signed_area());
        }
    }
}

fn random_pair(seed: u64, dx: f64, dy: f64) -> (Ring, Ring) {
    let cfg = RadialCfg::default();
    let a = draw_ring_radial(cfg, ReplayToken::new(seed, 0), Point::new(0.0, 0.0));
    let b = draw_ring_radial(cfg, ReplayToken::new(seed, 1), Point::new(dx, dy));
    (a, b)
}

fn assert_closed(mp: &MultiPolygon) {
    for poly in &mp.polygons {
        for ring in std::iter::once(&poly.exterior).chain(&poly.interiors) {
            assert!(ring.is_closed());
            assert!(ring.points.len() >= crate::geometry::MIN_RING_SIZE);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn area_identities_hold_on_star_polygons(
        seed in 0u64..10_000,
        dx in -1.5f64..1.5,
        dy in -1.5f64..1.5,
    ) {
        let (ra, rb) = random_pair(seed, dx, dy);
        let (area_a, area_b) = (ra.signed_area(), rb.signed_area());
        let (a, b) = (Geometry::Ring(ra), Geometry::Ring(rb));
        let union = run(&a, &b, OverlayKind::Union);
        let inter = run(&a, &b, OverlayKind::Intersection);
        let diff = run(&a, &b, OverlayKind::Difference);
        for mp in [&union, &inter, &diff] {
            assert_closed(mp);
        }
        let tol = 1e-7 * (area_a + area_b);
        prop_assert!((union.area() + inter.area() - area_a - area_b).abs() < tol);
        prop_assert!((diff.area() - (area_a - inter.area())).abs() < tol);
    }

    #[test]
    fn intersection_commutes(
        seed in 0u64..10_000,
        dx in -1.5f64..1.5,
        dy in -1.5f64..1.5,
    ) {
        let (ra, rb) = random_pair(seed, dx, dy);
        let (a, b) = (Geometry::Ring(ra), Geometry::Ring(rb));
        let ab = run(&a, &b, OverlayKind::Intersection);
        let ba = run(&b, &a, OverlayKind::Intersection);
        prop_assert_eq!(ab.polygons.len(), ba.polygons.len());
        prop_assert!((ab.area() - ba.area()).abs() < 1e-9);
    }
}
