#![forbid(unsafe_code)]

//! The profile context object.
//!
//! [`Profile`] owns the configuration, coordinate transform, layer
//! collection, boundaries and the active handle drag. Every editing
//! operation is a method on it; nothing is global.
//!
//! # Failure semantics
//!
//! Validation failures are detected before any mutation, so on `Err` the
//! profile is exactly as it was. Invariant failures (a stale [`LayerId`], an
//! out-of-range index) are logged at error level and abort the operation.

use serde::{Deserialize, Serialize};
use snowpit_core::{ConfigError, CoordinateTransform, Hardness, Point, ProfileConfig};

use crate::boundaries::{DepthReference, ProfileBoundaries};
use crate::collection::{LayerChange, LayerCollection};
use crate::error::{InvariantError, ProfileError, ValidationError};
use crate::features::LayerFeatures;
use crate::grid::{Grid, build_grid};
use crate::handle::{
    HandleBounds, HandleDragEffect, HandleDragMachine, HandleDragState, HandleDragTransition,
};
use crate::layer::{Layer, LayerId, LayerLayout};

/// Everything that changed since the last [`Profile::drain_changes`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChangeSet {
    pub layers: Vec<LayerChange>,
    /// Grid ticks must be rebuilt (pit depth or reference changed).
    pub grid: bool,
    /// Pit depth, total depth or reference changed.
    pub boundaries: bool,
}

impl ChangeSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty() && !self.grid && !self.boundaries
    }

    /// Whether any layer changed at a position that shifts later indices.
    #[must_use]
    pub fn has_structural_change(&self) -> bool {
        self.layers.iter().any(|change| {
            matches!(
                change,
                LayerChange::Inserted { .. } | LayerChange::Removed { .. } | LayerChange::Reindexed
            )
        })
    }
}

/// Snapshot of one layer for hosts and tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSummary {
    pub id: LayerId,
    pub depth: f64,
    pub display_depth: f64,
    pub hardness: Hardness,
    pub touched: bool,
}

/// One editable snow profile.
#[derive(Debug, Clone)]
pub struct Profile {
    config: ProfileConfig,
    transform: CoordinateTransform,
    layers: LayerCollection,
    boundaries: ProfileBoundaries,
    drag: HandleDragMachine,
    grid_dirty: bool,
    boundaries_dirty: bool,
}

impl Profile {
    /// Validate `config` and create the initial, evenly spaced layers.
    pub fn new(config: ProfileConfig) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        let pit_depth = config.default_pit_depth_cm;
        let transform = CoordinateTransform::new(config.graph, pit_depth);
        let depths =
            (0..config.initial_layer_count).map(|i| i as f64 * config.initial_layer_spacing_cm);
        let layers = LayerCollection::from_depths(depths, &LayerLayout::new(&transform, &config))
            .map_err(|err| ConfigError::Validation(vec![err.to_string()]))?;
        tracing::debug!(pit_depth, layers = layers.len(), "profile created");
        Ok(Self {
            config,
            transform,
            layers,
            boundaries: ProfileBoundaries::new(pit_depth),
            drag: HandleDragMachine::new(),
            grid_dirty: true,
            boundaries_dirty: true,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &ProfileConfig {
        &self.config
    }

    #[must_use]
    pub const fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    #[must_use]
    pub const fn layers(&self) -> &LayerCollection {
        &self.layers
    }

    #[must_use]
    pub const fn boundaries(&self) -> &ProfileBoundaries {
        &self.boundaries
    }

    #[must_use]
    pub const fn drag_state(&self) -> HandleDragState {
        self.drag.state()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// A profile always holds at least one layer.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn index_of(&self, id: LayerId) -> Result<usize, InvariantError> {
        self.layers.index_of(id)
    }

    pub fn layer(&self, id: LayerId) -> Result<&Layer, InvariantError> {
        self.layers.layer(self.layers.index_of(id)?)
    }

    /// Depth under the current reference.
    #[must_use]
    pub fn display_depth(&self, depth: f64) -> f64 {
        self.boundaries.display_depth(depth)
    }

    /// Per-layer snapshot in index order.
    #[must_use]
    pub fn summary(&self) -> Vec<LayerSummary> {
        self.layers
            .iter()
            .map(|layer| LayerSummary {
                id: layer.id(),
                depth: layer.depth(),
                display_depth: self.display_depth(layer.depth()),
                hardness: layer.hardness(),
                touched: layer.is_touched(),
            })
            .collect()
    }

    /// Description row text for a layer: display depth and hardness first,
    /// then the feature lines.
    pub fn description(&self, id: LayerId) -> Result<Vec<String>, InvariantError> {
        Ok(self.describe(self.layer(id)?))
    }

    /// Description row text for a layer already in hand.
    #[must_use]
    pub fn describe(&self, layer: &Layer) -> Vec<String> {
        let hardness = layer.hardness().code().map_or("", |code| code.code());
        let mut lines = vec![
            format!("{:.0} cm {hardness}", self.display_depth(layer.depth()))
                .trim_end()
                .to_owned(),
        ];
        lines.extend(layer.features().describe());
        lines
    }

    #[must_use]
    pub fn grid(&self) -> Grid {
        build_grid(&self.transform, &self.boundaries, self.config.depth_tick_cm)
    }

    // ---- handle drag ----

    /// Start dragging the handle of `id`. Marks the layer touched.
    pub fn press_handle(
        &mut self,
        id: LayerId,
        pointer_id: u32,
        pointer: Point,
    ) -> Result<HandleDragTransition, ProfileError> {
        let index = self.layers.index_of(id)?;
        if self.drag.is_active() {
            return Ok(self.drag.press(id, pointer_id, pointer, pointer));
        }
        self.layers.touch(index)?;
        let handle = self.layers.layer(index)?.handle();
        Ok(self.drag.press(id, pointer_id, pointer, handle))
    }

    /// Move the dragged handle toward `pointer`.
    ///
    /// Out-of-bounds positions are clamped silently. An accepted move
    /// updates the layer's depth and hardness and redraws it and its direct
    /// neighbors.
    pub fn drag_handle(
        &mut self,
        pointer_id: u32,
        pointer: Point,
    ) -> Result<HandleDragTransition, ProfileError> {
        let Some(id) = self.drag.active_layer() else {
            let bounds = self.idle_bounds();
            return Ok(self.drag.drag_to(pointer_id, pointer, &bounds));
        };
        let index = self.layers.index_of(id)?;
        let bounds =
            HandleBounds::for_layer(self.layers.as_slice(), index, self.transform.graph());
        let transition = self.drag.drag_to(pointer_id, pointer, &bounds);
        if let HandleDragEffect::Moved { current, .. } = transition.effect {
            let layout = LayerLayout::new(&self.transform, &self.config);
            let (depth, hardness) = self.layers.apply_handle(index, current, &layout);
            tracing::trace!(layer = id.get(), depth, ?hardness, "handle moved");
        }
        Ok(transition)
    }

    /// Finish the drag owned by `pointer_id`, snapping the handle to its
    /// band center.
    pub fn release_handle(&mut self, pointer_id: u32) -> Result<HandleDragTransition, ProfileError> {
        let transition = self.drag.release(pointer_id);
        self.commit_release(&transition)?;
        Ok(transition)
    }

    /// Commit any active drag (pointer cancel, blur, lost capture).
    pub fn finish_drag(&mut self) -> Result<Option<HandleDragTransition>, ProfileError> {
        let Some(transition) = self.drag.force_release() else {
            return Ok(None);
        };
        self.commit_release(&transition)?;
        Ok(Some(transition))
    }

    fn commit_release(&mut self, transition: &HandleDragTransition) -> Result<(), ProfileError> {
        if let HandleDragEffect::Released { layer, .. } = transition.effect {
            let index = self.layers.index_of(layer)?;
            let layout = LayerLayout::new(&self.transform, &self.config);
            let hardness = self.layers.snap_handle(index, &layout);
            let depth = self.layers.layer(index)?.depth();
            tracing::debug!(layer = layer.get(), depth, ?hardness, "handle released");
        }
        Ok(())
    }

    fn idle_bounds(&self) -> HandleBounds {
        let graph = self.transform.graph();
        HandleBounds {
            x_min: graph.min_x(),
            x_max: graph.max_x(),
            y_min: graph.min_y(),
            y_max: graph.max_y(),
        }
    }

    // ---- insert / delete ----

    /// Push the layer at `index` (and any layers crowding it) down one
    /// insertion increment.
    pub fn push_down(&mut self, index: usize) -> Result<Vec<usize>, ProfileError> {
        self.layers.layer(index)?;
        let layout = LayerLayout::new(&self.transform, &self.config);
        self.layers
            .push_down(
                index,
                self.config.insertion_increment_cm,
                self.boundaries.pit_depth(),
                &layout,
            )
            .map_err(reject)
    }

    /// Insert a new layer in the gap below `index`.
    pub fn insert_below(&mut self, index: usize) -> Result<LayerId, ProfileError> {
        let depth = self.layers.layer(index)?.depth();
        let increment = self.config.insertion_increment_cm;
        let pit_depth = self.boundaries.pit_depth();
        let next = self.layers.get(index + 1).map(Layer::depth);

        let limit = next.unwrap_or(pit_depth);
        if limit - depth < 2.0 * increment {
            if next.is_none() {
                return Err(reject(ValidationError::NoRoomToInsert { index, pit_depth }));
            }
            self.push_down(index + 1)?;
        }
        let limit = self.layers.get(index + 1).map_or(pit_depth, Layer::depth);
        self.insert_at((depth + limit) / 2.0)
    }

    /// Insert a new layer in the gap above `index`.
    ///
    /// Above the top layer, the top layer is pushed down and the new layer
    /// takes depth 0.
    pub fn insert_above(&mut self, index: usize) -> Result<LayerId, ProfileError> {
        let depth = self.layers.layer(index)?.depth();
        let increment = self.config.insertion_increment_cm;

        let Some(above) = index.checked_sub(1) else {
            self.push_down(0)?;
            return self.insert_at(0.0);
        };
        let above_depth = self.layers.layer(above)?.depth();
        let depth = if depth - above_depth < 2.0 * increment {
            self.push_down(index)?;
            self.layers.layer(index)?.depth()
        } else {
            depth
        };
        self.insert_at((above_depth + depth) / 2.0)
    }

    fn insert_at(&mut self, depth: f64) -> Result<LayerId, ProfileError> {
        let layout = LayerLayout::new(&self.transform, &self.config);
        let layer = self.layers.create_layer();
        let id = layer.id();
        self.layers.insert(layer, depth, &layout);
        self.layers.reindex_all(&layout);
        self.check_order()?;
        Ok(id)
    }

    /// Delete the layer at `index`. The last remaining layer cannot be
    /// deleted.
    ///
    /// Deleting the layer under an active drag ends the drag.
    pub fn delete_layer(&mut self, index: usize) -> Result<Layer, ProfileError> {
        let layout = LayerLayout::new(&self.transform, &self.config);
        let removed = match self.layers.delete(index, &layout) {
            Ok(removed) => removed,
            Err(err) => {
                return Err(match ProfileError::from(err) {
                    ProfileError::Validation(err) => reject(err),
                    ProfileError::Invariant(err) => invariant(err),
                });
            }
        };
        self.layers.reindex_all(&layout);
        if self.drag.active_layer() == Some(removed.id()) {
            self.drag.force_release();
        }
        Ok(removed)
    }

    /// Delete the layer named by `id`.
    pub fn delete_layer_by_id(&mut self, id: LayerId) -> Result<Layer, ProfileError> {
        let index = self.layers.index_of(id)?;
        self.delete_layer(index)
    }

    /// Replace a layer's observation bag.
    pub fn set_features(&mut self, id: LayerId, features: LayerFeatures) -> Result<(), ProfileError> {
        features.validate().map_err(reject)?;
        let index = self.layers.index_of(id)?;
        self.layers.set_features(index, features)?;
        tracing::debug!(layer = id.get(), "layer features updated");
        Ok(())
    }

    // ---- boundaries ----

    /// Change the pit depth.
    ///
    /// Layers deeper than the new pit are clamped to it (ties keep their
    /// order), the depth axis is rescaled and every layer is redrawn.
    pub fn set_pit_depth(&mut self, depth: f64) -> Result<(), ProfileError> {
        self.boundaries
            .check_pit_depth(depth, &self.config)
            .map_err(reject)?;
        self.finish_drag()?;

        let clamped = self.layers.clamp_to(depth);
        self.boundaries.set_pit_depth(depth);
        self.transform.set_max_depth(depth);
        let layout = LayerLayout::new(&self.transform, &self.config);
        self.layers.place_all_handles(&layout);
        self.layers.reindex_all(&layout);
        self.grid_dirty = true;
        self.boundaries_dirty = true;
        tracing::debug!(pit_depth = depth, clamped, "pit depth changed");
        self.check_order()
    }

    /// Record the total snow depth. Stored layer depths never change.
    pub fn set_total_snow_depth(&mut self, depth: f64) -> Result<(), ProfileError> {
        self.boundaries
            .set_total_snow_depth(depth, &self.config)
            .map_err(reject)?;
        self.grid_dirty = true;
        self.boundaries_dirty = true;
        tracing::debug!(
            total = ?self.boundaries.total_snow_depth(),
            reference = %self.boundaries.depth_reference(),
            "total snow depth changed"
        );
        Ok(())
    }

    pub fn set_depth_reference(&mut self, reference: DepthReference) -> Result<(), ProfileError> {
        self.boundaries
            .set_depth_reference(reference)
            .map_err(reject)?;
        self.grid_dirty = true;
        self.boundaries_dirty = true;
        tracing::debug!(%reference, "depth reference changed");
        Ok(())
    }

    /// Take everything that changed since the last drain.
    pub fn drain_changes(&mut self) -> ChangeSet {
        ChangeSet {
            layers: self.layers.drain_changes(),
            grid: std::mem::take(&mut self.grid_dirty),
            boundaries: std::mem::take(&mut self.boundaries_dirty),
        }
    }

    fn check_order(&self) -> Result<(), ProfileError> {
        match self.layers.first_out_of_order() {
            None => Ok(()),
            Some(index) => Err(invariant(InvariantError::DepthsOutOfOrder { index })),
        }
    }
}

fn reject(err: ValidationError) -> ProfileError {
    tracing::warn!(error = %err, "profile operation rejected");
    ProfileError::Validation(err)
}

fn invariant(err: InvariantError) -> ProfileError {
    tracing::error!(error = %err, "profile invariant violated");
    ProfileError::Invariant(err)
}
