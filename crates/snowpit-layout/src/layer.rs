#![forbid(unsafe_code)]

//! Layer entity and its screen geometry.
//!
//! A layer's place in the profile is its index in the
//! [`LayerCollection`](crate::LayerCollection); [`LayerId`] only exists so
//! collaborators (popup form, pointer capture) can name a layer across
//! mutations that shift indices.

use serde::{Deserialize, Serialize};
use snowpit_core::{CoordinateTransform, Hardness, Line, Point, ProfileConfig, Rect};

use crate::error::InvariantError;
use crate::features::LayerFeatures;

/// Stable identifier for a layer.
///
/// `0` is reserved/invalid so IDs are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(u64);

impl LayerId {
    /// Lowest valid layer ID.
    pub const MIN: Self = Self(1);

    /// Create a new layer ID, rejecting 0.
    pub fn new(raw: u64) -> Result<Self, InvariantError> {
        if raw == 0 {
            return Err(InvariantError::ZeroLayerId);
        }
        Ok(Self(raw))
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Return the next ID, saturating at `u64::MAX`.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::MIN
    }
}

/// Screen geometry of one layer, derived from its handle and neighbors.
///
/// Adjacent layers' outlines form one staircase: `top_edge` joins the layer
/// above's handle column to this handle, `right_edge` drops from this handle
/// to the next layer (or the pit bottom).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayerGeometry {
    /// Drag handle square.
    pub handle: Rect,
    /// Upward connector: from the layer above's X (or the graph's left edge
    /// for the top layer) to this handle, at this layer's Y.
    pub top_edge: Line,
    /// Downward connector: from this handle to the next layer's Y.
    pub right_edge: Line,
    /// Leader from the graph's right edge at mid-layer to the description row.
    pub leader: Line,
    /// Baseline of the description row; depends on index only.
    pub description_y: f64,
}

/// Inputs needed to compute [`LayerGeometry`].
#[derive(Debug, Clone, Copy)]
pub struct LayerLayout<'a> {
    transform: &'a CoordinateTransform,
    handle_size: f64,
    description_x: f64,
    row_height: f64,
}

impl<'a> LayerLayout<'a> {
    #[must_use]
    pub fn new(transform: &'a CoordinateTransform, config: &ProfileConfig) -> Self {
        Self {
            transform,
            handle_size: config.handle_size,
            description_x: config.description_x,
            row_height: config.description_row_height,
        }
    }

    #[must_use]
    pub const fn transform(&self) -> &'a CoordinateTransform {
        self.transform
    }

    /// Description row baseline for the layer at `index`.
    #[must_use]
    pub fn description_y(&self, index: usize) -> f64 {
        self.transform.graph().y_origin + (index as f64 + 0.5) * self.row_height
    }

    /// Canonical handle center for a layer at rest.
    #[must_use]
    pub fn rest_position(&self, depth: f64, hardness: Hardness) -> Point {
        Point::new(
            self.transform.hardness_to_x(hardness),
            self.transform.depth_to_y(depth),
        )
    }

    /// Geometry of `layers[index]`. Reads only the direct neighbors.
    #[must_use]
    pub fn compute(&self, layers: &[Layer], index: usize) -> LayerGeometry {
        let graph = self.transform.graph();
        let handle = layers[index].handle;
        let above_x = index
            .checked_sub(1)
            .map_or(graph.min_x(), |above| layers[above].handle.x);
        let bottom_y = layers
            .get(index + 1)
            .map_or(graph.max_y(), |below| below.handle.y);
        let description_y = self.description_y(index);
        LayerGeometry {
            handle: Rect::centered_square(handle, self.handle_size),
            top_edge: Line::horizontal(handle.y, above_x, handle.x),
            right_edge: Line::vertical(handle.x, handle.y, bottom_y),
            leader: Line::new(
                Point::new(graph.max_x(), (handle.y + bottom_y) / 2.0),
                Point::new(self.description_x, description_y),
            ),
            description_y,
        }
    }
}

/// One stratigraphic horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    id: LayerId,
    depth: f64,
    hardness: Hardness,
    features: LayerFeatures,
    touched: bool,
    handle: Point,
    geometry: LayerGeometry,
}

impl Layer {
    /// A fresh, untouched layer with no observations.
    #[must_use]
    pub fn new(id: LayerId) -> Self {
        Self {
            id,
            depth: 0.0,
            hardness: Hardness::Untouched,
            features: LayerFeatures::default(),
            touched: false,
            handle: Point::default(),
            geometry: LayerGeometry::default(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> LayerId {
        self.id
    }

    /// Top of the layer, cm below the snow surface.
    #[must_use]
    pub const fn depth(&self) -> f64 {
        self.depth
    }

    #[must_use]
    pub const fn hardness(&self) -> Hardness {
        self.hardness
    }

    #[must_use]
    pub const fn features(&self) -> &LayerFeatures {
        &self.features
    }

    /// Whether the user has pressed this layer's handle at least once.
    #[must_use]
    pub const fn is_touched(&self) -> bool {
        self.touched
    }

    /// Current handle center; fractional while a drag is in progress.
    #[must_use]
    pub const fn handle(&self) -> Point {
        self.handle
    }

    #[must_use]
    pub const fn geometry(&self) -> &LayerGeometry {
        &self.geometry
    }

    pub(crate) fn set_depth(&mut self, depth: f64) {
        self.depth = depth;
    }

    pub(crate) fn set_hardness(&mut self, hardness: Hardness) {
        self.hardness = hardness;
    }

    pub(crate) fn set_features(&mut self, features: LayerFeatures) {
        self.features = features;
    }

    pub(crate) fn touch(&mut self) -> bool {
        !std::mem::replace(&mut self.touched, true)
    }

    pub(crate) fn set_handle(&mut self, handle: Point) {
        self.handle = handle;
    }

    pub(crate) fn set_geometry(&mut self, geometry: LayerGeometry) {
        self.geometry = geometry;
    }
}
