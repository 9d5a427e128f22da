#![forbid(unsafe_code)]

//! Depth-ordered layer collection.
//!
//! # Invariants
//!
//! 1. Never empty: deleting the last remaining layer is rejected.
//! 2. Depths are non-decreasing by index.
//! 3. Index 0 is the surface layer; deleting it pins the new top to depth 0.
//! 4. Every mutation appends to the change log; hosts drain it to redraw.
//!
//! Index lookup by [`LayerId`] is a linear scan. Profiles hold tens of
//! layers, and a scan cannot go stale the way a cached index can.

use snowpit_core::{Hardness, Point};

use crate::error::{InvariantError, ValidationError};
use crate::features::LayerFeatures;
use crate::layer::{Layer, LayerId, LayerLayout};

/// One entry in the collection's change log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerChange {
    /// A layer was inserted at `index`.
    Inserted { id: LayerId, index: usize },
    /// A layer was removed from `index`.
    Removed { id: LayerId, index: usize },
    /// Depth, hardness, handle or geometry changed.
    Updated { id: LayerId },
    /// The handle was pressed for the first time.
    Touched { id: LayerId },
    /// The observation bag was replaced.
    FeaturesChanged { id: LayerId },
    /// Every layer's index-dependent geometry was recomputed.
    Reindexed,
}

/// Ordered sequence of layers, index 0 at the snow surface.
#[derive(Debug, Clone)]
pub struct LayerCollection {
    layers: Vec<Layer>,
    next_id: LayerId,
    changes: Vec<LayerChange>,
}

impl LayerCollection {
    /// Build untouched layers at the given depths.
    ///
    /// Depths must be non-empty, non-decreasing and start at 0.
    pub fn from_depths(
        depths: impl IntoIterator<Item = f64>,
        layout: &LayerLayout<'_>,
    ) -> Result<Self, InvariantError> {
        let mut collection = Self {
            layers: Vec::new(),
            next_id: LayerId::MIN,
            changes: Vec::new(),
        };
        for depth in depths {
            if collection
                .layers
                .last()
                .is_some_and(|last| depth < last.depth())
            {
                return Err(InvariantError::DepthsOutOfOrder {
                    index: collection.layers.len(),
                });
            }
            let mut layer = collection.create_layer();
            layer.set_depth(depth);
            layer.set_handle(layout.rest_position(depth, Hardness::Untouched));
            collection.layers.push(layer);
        }
        if collection.layers.is_empty() {
            return Err(InvariantError::EmptyCollection);
        }
        collection.layers[0].set_depth(0.0);
        collection.layers[0].set_handle(layout.rest_position(0.0, Hardness::Untouched));
        collection.reindex_all(layout);
        collection.changes.clear();
        Ok(collection)
    }

    /// Allocate a fresh, detached layer.
    pub fn create_layer(&mut self) -> Layer {
        let id = self.next_id;
        self.next_id = id.next();
        Layer::new(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always `false` for a constructed collection; kept for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// Layer at `index`, or an invariant error.
    pub fn layer(&self, index: usize) -> Result<&Layer, InvariantError> {
        self.layers.get(index).ok_or(InvariantError::IndexOutOfRange {
            index,
            len: self.layers.len(),
        })
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Layer] {
        &self.layers
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> + '_ {
        self.layers.iter()
    }

    /// Depths in index order.
    #[must_use]
    pub fn depths(&self) -> Vec<f64> {
        self.layers.iter().map(Layer::depth).collect()
    }

    /// Index of the layer with `id`.
    ///
    /// A missing layer means a collaborator kept a stale ID; this is a
    /// programming error and is logged as such.
    pub fn index_of(&self, id: LayerId) -> Result<usize, InvariantError> {
        self.layers
            .iter()
            .position(|layer| layer.id() == id)
            .ok_or_else(|| {
                tracing::error!(layer = id.get(), "layer lookup failed: not in collection");
                InvariantError::LayerNotFound { id }
            })
    }

    /// Insert `layer` at `depth`, above any existing layer at the same depth.
    ///
    /// Returns the new index. Geometry is not recomputed; callers follow up
    /// with [`reindex_all`](Self::reindex_all).
    pub fn insert(&mut self, mut layer: Layer, depth: f64, layout: &LayerLayout<'_>) -> usize {
        let index = self
            .layers
            .iter()
            .position(|existing| existing.depth() >= depth)
            .unwrap_or(self.layers.len());
        layer.set_depth(depth);
        layer.set_handle(layout.rest_position(depth, layer.hardness()));
        let id = layer.id();
        self.layers.insert(index, layer);
        self.changes.push(LayerChange::Inserted { id, index });
        tracing::debug!(layer = id.get(), index, depth, "layer inserted");
        index
    }

    /// Remove the layer at `index`.
    ///
    /// Removing the top layer pins the new top layer to depth 0. The old
    /// neighbors above and below are marked for redraw.
    pub fn delete(
        &mut self,
        index: usize,
        layout: &LayerLayout<'_>,
    ) -> Result<Layer, DeleteError> {
        if index >= self.layers.len() {
            return Err(DeleteError::Invariant(InvariantError::IndexOutOfRange {
                index,
                len: self.layers.len(),
            }));
        }
        if self.layers.len() == 1 {
            return Err(DeleteError::Validation(ValidationError::LastLayer));
        }

        let removed = self.layers.remove(index);
        self.changes.push(LayerChange::Removed {
            id: removed.id(),
            index,
        });

        if index == 0 {
            let top = &mut self.layers[0];
            top.set_depth(0.0);
            let rest = layout.rest_position(0.0, top.hardness());
            top.set_handle(Point::new(top.handle().x, rest.y));
        }
        if let Some(above) = index.checked_sub(1) {
            self.refresh(above, layout);
        }
        if index < self.layers.len() {
            self.refresh(index, layout);
        }
        tracing::debug!(layer = removed.id().get(), index, "layer deleted");
        Ok(removed)
    }

    /// Recompute geometry for every layer.
    pub fn reindex_all(&mut self, layout: &LayerLayout<'_>) {
        for index in 0..self.layers.len() {
            let geometry = layout.compute(&self.layers, index);
            self.layers[index].set_geometry(geometry);
        }
        self.changes.push(LayerChange::Reindexed);
    }

    /// Recompute geometry for the layer at `index` only.
    pub fn refresh(&mut self, index: usize, layout: &LayerLayout<'_>) {
        if index >= self.layers.len() {
            return;
        }
        let geometry = layout.compute(&self.layers, index);
        let layer = &mut self.layers[index];
        layer.set_geometry(geometry);
        self.changes.push(LayerChange::Updated { id: layer.id() });
    }

    /// Recompute geometry for `index` and its direct neighbors.
    pub fn refresh_around(&mut self, index: usize, layout: &LayerLayout<'_>) {
        if let Some(above) = index.checked_sub(1) {
            self.refresh(above, layout);
        }
        self.refresh(index, layout);
        self.refresh(index + 1, layout);
    }

    /// Put every handle back at its rest position (after the depth axis is
    /// rescaled) without touching depth or hardness.
    pub fn place_all_handles(&mut self, layout: &LayerLayout<'_>) {
        for layer in &mut self.layers {
            layer.set_handle(layout.rest_position(layer.depth(), layer.hardness()));
        }
    }

    /// Mark the layer touched. Returns `true` on the first touch.
    pub fn touch(&mut self, index: usize) -> Result<bool, InvariantError> {
        let len = self.layers.len();
        let layer = self
            .layers
            .get_mut(index)
            .ok_or(InvariantError::IndexOutOfRange { index, len })?;
        let first = layer.touch();
        if first {
            self.changes.push(LayerChange::Touched { id: layer.id() });
        }
        Ok(first)
    }

    /// Move a handle to an already-clamped position and derive depth and
    /// hardness from it.
    pub(crate) fn apply_handle(
        &mut self,
        index: usize,
        position: Point,
        layout: &LayerLayout<'_>,
    ) -> (f64, Hardness) {
        let transform = layout.transform();
        let layer = &mut self.layers[index];
        // An unchanged Y keeps the stored depth exactly; converting back
        // through pixels could break ties with neighbors by an ulp.
        let depth = if index == 0 {
            0.0
        } else if position.y == layer.handle().y {
            layer.depth()
        } else {
            transform.y_to_depth(position.y).min(transform.max_depth())
        };
        let hardness = Hardness::Code(transform.x_to_hardness(position.x));
        layer.set_handle(position);
        layer.set_depth(depth);
        layer.set_hardness(hardness);
        self.refresh_around(index, layout);
        (depth, hardness)
    }

    /// Snap a handle's X to the center of its hardness band.
    pub(crate) fn snap_handle(&mut self, index: usize, layout: &LayerLayout<'_>) -> Hardness {
        let layer = &mut self.layers[index];
        let hardness = Hardness::Code(layout.transform().x_to_hardness(layer.handle().x));
        layer.set_hardness(hardness);
        let snapped_x = layout.transform().hardness_to_x(hardness);
        layer.set_handle(Point::new(snapped_x, layer.handle().y));
        self.refresh_around(index, layout);
        hardness
    }

    /// Replace the observation bag of the layer at `index`.
    pub fn set_features(
        &mut self,
        index: usize,
        features: LayerFeatures,
    ) -> Result<(), InvariantError> {
        let len = self.layers.len();
        let layer = self
            .layers
            .get_mut(index)
            .ok_or(InvariantError::IndexOutOfRange { index, len })?;
        layer.set_features(features);
        self.changes.push(LayerChange::FeaturesChanged { id: layer.id() });
        Ok(())
    }

    /// Shift layers down to make room below `index - 1`.
    ///
    /// All-or-nothing: on failure no depth changes. Returns the indices
    /// that moved.
    pub fn push_down(
        &mut self,
        index: usize,
        increment: f64,
        pit_depth: f64,
        layout: &LayerLayout<'_>,
    ) -> Result<Vec<usize>, ValidationError> {
        let plan = crate::push_down::plan_push_down(&self.depths(), index, increment, pit_depth)?;
        for &(moved, depth) in plan.moves() {
            let layer = &mut self.layers[moved];
            layer.set_depth(depth);
            layer.set_handle(Point::new(
                layer.handle().x,
                layout.transform().depth_to_y(depth),
            ));
        }
        let moved: Vec<usize> = plan.moves().iter().map(|&(index, _)| index).collect();
        for &index in &moved {
            self.refresh_around(index, layout);
        }
        tracing::debug!(index, moved = moved.len(), "layers pushed down");
        Ok(moved)
    }

    /// Clamp every layer deeper than `limit` to `limit`, keeping relative
    /// order for ties. Returns how many layers were clamped.
    pub fn clamp_to(&mut self, limit: f64) -> usize {
        let mut clamped = 0;
        for layer in &mut self.layers {
            if layer.depth() > limit {
                layer.set_depth(limit);
                clamped += 1;
                self.changes.push(LayerChange::Updated { id: layer.id() });
            }
        }
        if clamped > 0 {
            // `sort_by` is stable: equal depths keep their prior order.
            self.layers
                .sort_by(|a, b| a.depth().total_cmp(&b.depth()));
        }
        clamped
    }

    /// First index where depth decreases, if any.
    #[must_use]
    pub fn first_out_of_order(&self) -> Option<usize> {
        self.layers
            .windows(2)
            .position(|pair| pair[1].depth() < pair[0].depth())
            .map(|index| index + 1)
    }

    /// Take the pending change log.
    pub fn drain_changes(&mut self) -> Vec<LayerChange> {
        std::mem::take(&mut self.changes)
    }
}

/// Failure of [`LayerCollection::delete`].
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteError {
    Validation(ValidationError),
    Invariant(InvariantError),
}

impl From<DeleteError> for crate::error::ProfileError {
    fn from(err: DeleteError) -> Self {
        match err {
            DeleteError::Validation(err) => Self::Validation(err),
            DeleteError::Invariant(err) => Self::Invariant(err),
        }
    }
}
