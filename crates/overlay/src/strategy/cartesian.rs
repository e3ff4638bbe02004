//! Planar predicates with snapping to segment endpoints.

use nalgebra::Vector2;

use crate::geometry::{Box2, Point, Ring};

use super::{IntersectionPoint, Location, OverlayCfg, SegmentIntersection, Side, Strategy};

/// Cartesian (planar, `f64`) strategy.
#[derive(Clone, Copy, Debug, Default)]
pub struct Cartesian {
    pub cfg: OverlayCfg,
}

#[inline]
fn cross(u: &Vector2<f64>, v: &Vector2<f64>) -> f64 {
    u.x * v.y - u.y * v.x
}

/// Fraction of the projection of `p` onto `s0 → s1`.
#[inline]
fn project(p: &Point, s0: &Point, s1: &Point) -> f64 {
    let d = s1 - s0;
    (p - s0).dot(&d) / d.norm_squared()
}

impl Cartesian {
    pub fn new(cfg: OverlayCfg) -> Self {
        Self { cfg }
    }

    #[inline]
    fn snap(&self, t: f64) -> f64 {
        if t.abs() <= self.cfg.eps_snap {
            0.0
        } else if (t - 1.0).abs() <= self.cfg.eps_snap {
            1.0
        } else {
            t
        }
    }

    /// Snap and range-check a fraction; `None` when it falls off the segment.
    fn fraction_on(&self, p: &Point, s0: &Point, s1: &Point) -> Option<f64> {
        let t = self.snap(project(p, s0, s1));
        let slack = self.cfg.eps_equal / (s1 - s0).norm();
        if t < -slack || t > 1.0 + slack {
            None
        } else {
            Some(t.clamp(0.0, 1.0))
        }
    }

    fn collinear(&self, a0: &Point, a1: &Point, b0: &Point, b1: &Point) -> SegmentIntersection {
        let da = a1 - a0;
        let len = da.norm();
        let tol = self.cfg.eps_equal / len;
        let tb0 = project(b0, a0, a1);
        let tb1 = project(b1, a0, a1);
        let (lo, lo_b, lo_tb) = if tb0 <= tb1 { (tb0, *b0, 0.0) } else { (tb1, *b1, 1.0) };
        let (hi, hi_b, hi_tb) = if tb0 <= tb1 { (tb1, *b1, 1.0) } else { (tb0, *b0, 0.0) };
        let start = lo.max(0.0);
        let end = hi.min(1.0);
        if start > end + tol {
            return SegmentIntersection::None;
        }
        let first = if lo <= tol {
            self.on_a_vertex(*a0, 0.0, b0, b1)
        } else {
            self.on_b_vertex(lo_b, lo_tb, a0, a1)
        };
        let second = if hi >= 1.0 - tol {
            self.on_a_vertex(*a1, 1.0, b0, b1)
        } else {
            self.on_b_vertex(hi_b, hi_tb, a0, a1)
        };
        match (first, second) {
            (Some(p), Some(q)) if (q.point - p.point).norm() > self.cfg.eps_equal => {
                SegmentIntersection::Overlap(p, q)
            }
            (Some(p), _) | (None, Some(p)) => SegmentIntersection::Point(p),
            (None, None) => SegmentIntersection::None,
        }
    }

    fn on_a_vertex(&self, v: Point, ta: f64, b0: &Point, b1: &Point) -> Option<IntersectionPoint> {
        let tb = self.fraction_on(&v, b0, b1)?;
        Some(IntersectionPoint { point: v, ta, tb })
    }

    fn on_b_vertex(&self, v: Point, tb: f64, a0: &Point, a1: &Point) -> Option<IntersectionPoint> {
        let ta = self.fraction_on(&v, a0, a1)?;
        // A b-vertex snapped onto an a-endpoint reports the a-vertex itself.
        let point = if ta == 0.0 {
            *a0
        } else if ta == 1.0 {
            *a1
        } else {
            v
        };
        Some(IntersectionPoint { point, ta, tb })
    }
}

impl Strategy for Cartesian {
    fn side(&self, p1: &Point, p2: &Point, p: &Point) -> Side {
        let u = p2 - p1;
        let v = p - p1;
        let c = cross(&u, &v);
        let tol = self.cfg.eps_side * u.norm() * v.norm();
        if c > tol {
            Side::Left
        } else if c < -tol {
            Side::Right
        } else {
            Side::Collinear
        }
    }

    fn equals(&self, a: &Point, b: &Point) -> bool {
        (a - b).norm() <= self.cfg.eps_equal
    }

    fn intersect(&self, a0: &Point, a1: &Point, b0: &Point, b1: &Point) -> SegmentIntersection {
        let eq = self.cfg.eps_equal;
        if (a1 - a0).norm() <= eq || (b1 - b0).norm() <= eq {
            return SegmentIntersection::None;
        }
        if !Box2::of_segment(a0, a1).intersects(&Box2::of_segment(b0, b1), eq) {
            return SegmentIntersection::None;
        }
        let sa0 = self.side(b0, b1, a0);
        let sa1 = self.side(b0, b1, a1);
        let sb0 = self.side(a0, a1, b0);
        let sb1 = self.side(a0, a1, b1);
        if (sa0 == Side::Collinear && sa1 == Side::Collinear)
            || (sb0 == Side::Collinear && sb1 == Side::Collinear)
        {
            return self.collinear(a0, a1, b0, b1);
        }
        if (sa0 == sa1 && sa0 != Side::Collinear) || (sb0 == sb1 && sb0 != Side::Collinear) {
            return SegmentIntersection::None;
        }

        // An endpoint on the other line is the intersection itself.
        let a_end = match (sa0, sa1) {
            (Side::Collinear, _) => Some((*a0, 0.0)),
            (_, Side::Collinear) => Some((*a1, 1.0)),
            _ => None,
        };
        let b_end = match (sb0, sb1) {
            (Side::Collinear, _) => Some((*b0, 0.0)),
            (_, Side::Collinear) => Some((*b1, 1.0)),
            _ => None,
        };
        let ip = match (a_end, b_end) {
            (Some((v, ta)), _) => self.on_a_vertex(v, ta, b0, b1),
            (None, Some((v, tb))) => self.on_b_vertex(v, tb, a0, a1),
            (None, None) => {
                let da = a1 - a0;
                let db = b1 - b0;
                let denom = cross(&da, &db);
                if denom == 0.0 {
                    return SegmentIntersection::None;
                }
                let w = b0 - a0;
                let ta = self.snap(cross(&w, &db) / denom).clamp(0.0, 1.0);
                let tb = self.snap(cross(&w, &da) / denom).clamp(0.0, 1.0);
                if ta == 0.0 || ta == 1.0 {
                    let v = if ta == 0.0 { *a0 } else { *a1 };
                    self.on_a_vertex(v, ta, b0, b1)
                } else if tb == 0.0 || tb == 1.0 {
                    let v = if tb == 0.0 { *b0 } else { *b1 };
                    self.on_b_vertex(v, tb, a0, a1)
                } else {
                    Some(IntersectionPoint {
                        point: a0 + da * ta,
                        ta,
                        tb,
                    })
                }
            }
        };
        match ip {
            Some(ip) => SegmentIntersection::Point(ip),
            None => SegmentIntersection::None,
        }
    }

    fn winding(&self, ring: &Ring, p: &Point) -> i32 {
        let mut wn = 0;
        for w in ring.points.windows(2) {
            let (s, e) = (&w[0], &w[1]);
            let is_left = (e.x - s.x) * (p.y - s.y) - (p.x - s.x) * (e.y - s.y);
            if s.y <= p.y {
                if e.y > p.y && is_left > 0.0 {
                    wn += 1;
                }
            } else if e.y <= p.y && is_left < 0.0 {
                wn -= 1;
            }
        }
        wn
    }

    fn location(&self, ring: &Ring, p: &Point) -> Location {
        if self.on_path(&ring.points, p) {
            return Location::Boundary;
        }
        if self.winding(ring, p) != 0 {
            Location::Inside
        } else {
            Location::Outside
        }
    }

    fn on_path(&self, points: &[Point], p: &Point) -> bool {
        points.windows(2).any(|w| {
            let (s, e) = (&w[0], &w[1]);
            let d = e - s;
            let len2 = d.norm_squared();
            let t = if len2 > 0.0 {
                ((p - s).dot(&d) / len2).clamp(0.0, 1.0)
            } else {
                0.0
            };
            (p - (s + d * t)).norm() <= self.cfg.eps_equal
        })
    }

    fn margin(&self) -> f64 {
        self.cfg.eps_equal
    }
}
