#![forbid(unsafe_code)]

//! Pixel <-> domain coordinate transforms.
//!
//! # Invariants
//!
//! 1. `depth_to_y` and `y_to_depth` are exact linear inverses (up to float
//!    rounding) for any `max_depth > 0`.
//! 2. `x_to_hardness(hardness_to_x(code)) == code` for every code.
//! 3. Neither direction clamps; callers clamp before converting.

use serde::{Deserialize, Serialize};

use crate::geometry::GraphGeometry;
use crate::hardness::{HandHardness, Hardness, HardnessScale};

/// Linear depth axis plus the hardness band table for one graph placement.
///
/// `max_depth` is the depth drawn at the bottom of the graph (the pit depth),
/// so changing the pit depth rescales the Y axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateTransform {
    graph: GraphGeometry,
    scale: HardnessScale,
    max_depth: f64,
}

impl CoordinateTransform {
    /// Build a transform for `graph` with `max_depth` cm at the bottom edge.
    #[must_use]
    pub fn new(graph: GraphGeometry, max_depth: f64) -> Self {
        Self {
            scale: HardnessScale::new(&graph),
            graph,
            max_depth,
        }
    }

    /// Graph placement.
    #[must_use]
    pub const fn graph(&self) -> &GraphGeometry {
        &self.graph
    }

    /// Hardness band table.
    #[must_use]
    pub const fn scale(&self) -> &HardnessScale {
        &self.scale
    }

    /// Depth mapped to the bottom edge.
    #[must_use]
    pub const fn max_depth(&self) -> f64 {
        self.max_depth
    }

    /// Rescale the depth axis.
    pub fn set_max_depth(&mut self, max_depth: f64) {
        self.max_depth = max_depth;
    }

    /// Pixels per cm of depth.
    #[must_use]
    pub fn px_per_cm(&self) -> f64 {
        self.graph.height / self.max_depth
    }

    /// Depth (cm from surface) to Y pixel.
    #[must_use]
    pub fn depth_to_y(&self, depth: f64) -> f64 {
        depth * self.px_per_cm() + self.graph.y_origin
    }

    /// Y pixel to depth (cm from surface).
    #[must_use]
    pub fn y_to_depth(&self, y: f64) -> f64 {
        (y - self.graph.y_origin) / self.px_per_cm()
    }

    /// Band-center X for a hardness; `Untouched` sits at the softest edge.
    #[must_use]
    pub fn hardness_to_x(&self, hardness: Hardness) -> f64 {
        match hardness {
            Hardness::Code(code) => self.scale.center_x(code),
            Hardness::Untouched => self.graph.min_x(),
        }
    }

    /// Hardness code for an X pixel.
    #[must_use]
    pub fn x_to_hardness(&self, x: f64) -> HandHardness {
        self.scale.code_at(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn transform() -> CoordinateTransform {
        CoordinateTransform::new(GraphGeometry::new(40.0, 40.0, 340.0, 400.0), 200.0)
    }

    #[test]
    fn depth_axis_is_linear() {
        let t = transform();
        assert_eq!(t.px_per_cm(), 2.0);
        assert_eq!(t.depth_to_y(0.0), 40.0);
        assert_eq!(t.depth_to_y(200.0), 440.0);
        assert_eq!(t.y_to_depth(140.0), 50.0);
    }

    #[test]
    fn no_clamping_outside_graph() {
        let t = transform();
        assert_eq!(t.depth_to_y(-10.0), 20.0);
        assert_eq!(t.y_to_depth(0.0), -20.0);
    }

    #[test]
    fn untouched_sits_at_min_x() {
        let t = transform();
        assert_eq!(t.hardness_to_x(Hardness::Untouched), 40.0);
        assert_eq!(t.x_to_hardness(t.hardness_to_x(Hardness::Untouched)), HandHardness::SOFTEST);
    }

    #[test]
    fn rescale_changes_slope() {
        let mut t = transform();
        t.set_max_depth(100.0);
        assert_eq!(t.depth_to_y(100.0), 440.0);
    }

    #[test]
    fn hardness_round_trip_for_every_code() {
        let t = transform();
        for code in HandHardness::ALL {
            assert_eq!(t.x_to_hardness(t.hardness_to_x(Hardness::Code(code))), code);
        }
    }

    proptest! {
        #[test]
        fn depth_round_trip(depth in 0.0f64..=200.0) {
            let t = transform();
            let back = t.y_to_depth(t.depth_to_y(depth));
            prop_assert!((back - depth).abs() < 1e-9, "{depth} -> {back}");
        }

        #[test]
        fn depth_round_trip_any_scale(
            depth_frac in 0.0f64..=1.0,
            max_depth in 1.0f64..1000.0,
            height in 10.0f64..2000.0,
        ) {
            let t = CoordinateTransform::new(GraphGeometry::new(0.0, 25.0, 100.0, height), max_depth);
            let depth = depth_frac * max_depth;
            let back = t.y_to_depth(t.depth_to_y(depth));
            prop_assert!((back - depth).abs() < 1e-6);
        }

        #[test]
        fn x_beyond_edges_resolves_to_extremes(offset in 0.0f64..10_000.0) {
            let t = transform();
            prop_assert_eq!(t.x_to_hardness(t.graph().max_x() + offset), HandHardness::HARDEST);
            prop_assert_eq!(t.x_to_hardness(t.graph().min_x() - offset), HandHardness::SOFTEST);
        }
    }
}
