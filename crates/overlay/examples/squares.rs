//! Print the four boolean operations on two overlapping squares, then clip a
//! line against the first square.
//!
//! Usage:
//!   cargo run -p overlay --example squares
//!
//! Prints, per operation, the polygon count, the area, and the exterior rings.

use overlay::prelude::*;

fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
    Geometry::Ring(Ring::from_coords(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1)]))
}

fn fmt_points(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("({}, {})", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn print(label: &str, result: Result<OverlayOutput, OverlayError>) {
    match result {
        Ok(OverlayOutput::Areal(mp)) => {
            println!("{label}: {} polygon(s), area {}", mp.polygons.len(), mp.area());
            for poly in &mp.polygons {
                println!("  {}", fmt_points(&poly.exterior.points));
            }
        }
        Ok(OverlayOutput::Linear(ml)) => {
            println!("{label}: {} line(s), length {}", ml.lines.len(), ml.length());
            for line in &ml.lines {
                println!("  {}", fmt_points(&line.points));
            }
        }
        Err(e) => eprintln!("{label}: {e}"),
    }
}

fn main() {
    let a = square(0.0, 0.0, 2.0, 2.0);
    let b = square(1.0, 1.0, 3.0, 3.0);
    let cfg = OverlayCfg::default();
    for kind in [
        OverlayKind::Union,
        OverlayKind::Intersection,
        OverlayKind::Difference,
        OverlayKind::SymDifference,
    ] {
        print(&format!("{kind:?}"), overlay(&a, &b, kind, &cfg));
    }

    let line = Geometry::LineString(LineString::from_coords(&[(-1.0, 1.0), (3.0, 1.0)]));
    for kind in [OverlayKind::Intersection, OverlayKind::Difference] {
        print(&format!("line {kind:?}"), overlay(&line, &a, kind, &cfg));
    }
}
