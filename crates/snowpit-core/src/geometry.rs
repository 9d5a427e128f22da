#![forbid(unsafe_code)]

//! Geometric primitives in graph pixel space.
//!
//! Pixel coordinates follow the SVG convention: origin at top-left, `y` grows
//! downward. Values are `f64` because handle positions are fractional while a
//! drag is in progress and are only quantized on release.

use serde::{Deserialize, Serialize};

/// A point in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f64,
    /// Top edge (inclusive).
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square of side `size` centered on `center`.
    #[inline]
    pub fn centered_square(center: Point, size: f64) -> Self {
        let half = size / 2.0;
        Self::new(center.x - half, center.y - half, size, size)
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// A straight line segment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Line {
    pub from: Point,
    pub to: Point,
}

impl Line {
    /// Create a new segment.
    #[inline]
    pub const fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }

    /// Horizontal segment at `y` between `x1` and `x2`.
    #[inline]
    pub const fn horizontal(y: f64, x1: f64, x2: f64) -> Self {
        Self::new(Point::new(x1, y), Point::new(x2, y))
    }

    /// Vertical segment at `x` between `y1` and `y2`.
    #[inline]
    pub const fn vertical(x: f64, y1: f64, y2: f64) -> Self {
        Self::new(Point::new(x, y1), Point::new(x, y2))
    }
}

/// Placement of the hardness/depth graph inside the drawing.
///
/// The handle area spans `[x_origin, x_origin + width]` horizontally
/// (softest to hardest) and `[y_origin, y_origin + height]` vertically
/// (snow surface to pit bottom).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphGeometry {
    pub x_origin: f64,
    pub y_origin: f64,
    pub width: f64,
    pub height: f64,
}

impl GraphGeometry {
    /// Create a graph placement.
    #[inline]
    pub const fn new(x_origin: f64, y_origin: f64, width: f64, height: f64) -> Self {
        Self {
            x_origin,
            y_origin,
            width,
            height,
        }
    }

    /// Leftmost handle X (softest hardness).
    #[inline]
    pub fn min_x(&self) -> f64 {
        self.x_origin
    }

    /// Rightmost handle X (hardest hardness).
    #[inline]
    pub fn max_x(&self) -> f64 {
        self.x_origin + self.width
    }

    /// Handle Y at the snow surface.
    #[inline]
    pub fn min_y(&self) -> f64 {
        self.y_origin
    }

    /// Handle Y at the pit bottom.
    #[inline]
    pub fn max_y(&self) -> f64 {
        self.y_origin + self.height
    }

    /// The graph area as a rectangle.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x_origin, self.y_origin, self.width, self.height)
    }

    /// Clamp `x` into the handle range.
    #[inline]
    pub fn clamp_x(&self, x: f64) -> f64 {
        x.clamp(self.min_x(), self.max_x())
    }
}

impl Default for GraphGeometry {
    fn default() -> Self {
        Self::new(40.0, 40.0, 340.0, 600.0)
    }
}
