//! Tolerances and switches for one overlay call.

/// Overlay configuration (tolerances and guards).
#[derive(Clone, Copy, Debug)]
pub struct OverlayCfg {
    /// Relative tolerance of the side predicate: `|cross| <= eps_side * |u| * |v|` is collinear.
    pub eps_side: f64,
    /// Absolute distance under which two points are the same point.
    pub eps_equal: f64,
    /// Fractions this close to 0 or 1 snap to the segment endpoint.
    pub eps_snap: f64,
    /// Reject self-intersecting inputs before running the pipeline.
    pub check_validity: bool,
}

impl Default for OverlayCfg {
    fn default() -> Self {
        Self {
            eps_side: 1e-12,
            eps_equal: 1e-9,
            eps_snap: 1e-9,
            check_validity: true,
        }
    }
}
