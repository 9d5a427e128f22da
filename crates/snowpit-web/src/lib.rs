#![forbid(unsafe_code)]

//! `snowpit-web` wires the profile engine to a browser host.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding page pushes pointer, button and form
//!   events and pulls draw commands and alerts.
//! - **Deterministic time**: the host advances a monotonic clock explicitly;
//!   blink timing never reads a wall clock.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! The crate does not bind to `wasm-bindgen`. A thin JS shim forwards DOM
//! events to [`ProfileEditor`] and replays [`DrawCommand`]s onto SVG nodes.

pub mod alert;
pub mod handle_pointer;
pub mod popup;
pub mod render;

use core::time::Duration;

use snowpit_core::animation::Blink;
use snowpit_core::{ConfigError, Point, ProfileConfig};
use snowpit_layout::{DepthReference, LayerId, Profile, ProfileError};

pub use alert::{Alert, AlertLevel, AlertQueue, AlertStats};
pub use handle_pointer::{
    CaptureCommand, HandlePointerAdapter, HandlePointerConfig, HandlePointerDispatch,
    PointerButton, PointerIgnoredReason, PointerLogEntry, PointerLogOutcome, PointerPhase,
};
pub use popup::{FeatureForm, FormOutcome, RecordingForm};
pub use render::{
    DrawCommand, HandleStroke, NodeId, RecordingSink, RenderSink, SceneSync, SyncStats,
    handle_rects,
};

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

/// One profile editor instance on a page.
///
/// Every mutating call drains the profile's change set and forwards the
/// resulting draw commands to the supplied sink before returning. Rejected
/// edits become [`Alert`]s. Invariant failures raise an error alert and are
/// also returned to the host.
#[derive(Debug)]
pub struct ProfileEditor<F> {
    profile: Profile,
    pointer: HandlePointerAdapter,
    scene: SceneSync,
    alerts: AlertQueue,
    blink: Blink,
    clock: DeterministicClock,
    form: F,
    editing: Option<LayerId>,
}

impl<F: FeatureForm> ProfileEditor<F> {
    pub fn new(config: ProfileConfig, form: F) -> Result<Self, ConfigError> {
        let blink = Blink::new(Duration::from_millis(config.blink_period_ms));
        let profile = Profile::new(config)?;
        Ok(Self {
            profile,
            pointer: HandlePointerAdapter::default(),
            scene: SceneSync::new(),
            alerts: AlertQueue::default(),
            blink,
            clock: DeterministicClock::new(),
            form,
            editing: None,
        })
    }

    #[must_use]
    pub const fn profile(&self) -> &Profile {
        &self.profile
    }

    #[must_use]
    pub const fn scene(&self) -> &SceneSync {
        &self.scene
    }

    #[must_use]
    pub const fn pointer(&self) -> &HandlePointerAdapter {
        &self.pointer
    }

    #[must_use]
    pub const fn form(&self) -> &F {
        &self.form
    }

    /// Layer whose feature form is open.
    #[must_use]
    pub const fn editing(&self) -> Option<LayerId> {
        self.editing
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Take pending alerts, oldest first.
    pub fn drain_alerts(&mut self) -> Vec<Alert> {
        self.alerts.drain()
    }

    #[must_use]
    pub const fn alert_stats(&self) -> AlertStats {
        self.alerts.stats()
    }

    /// Draw the whole profile into a fresh host drawing.
    pub fn mount(&mut self, sink: &mut dyn RenderSink) -> SyncStats {
        self.profile.drain_changes();
        let stats = self.scene.full_redraw(&self.profile, sink);
        tracing::debug!(layers = stats.layers_drawn, "profile mounted");
        stats
    }

    /// Advance host time; untouched handles blink on phase edges.
    pub fn tick(&mut self, dt: Duration, sink: &mut dyn RenderSink) {
        self.clock.advance(dt);
        if self.blink.advance(dt) {
            self.scene.set_blink(&self.profile, self.blink.phase(), sink);
        }
    }

    // ---- pointer ----

    pub fn pointer_down(
        &mut self,
        layer: LayerId,
        pointer_id: u32,
        button: PointerButton,
        position: Point,
        sink: &mut dyn RenderSink,
    ) -> Result<HandlePointerDispatch, ProfileError> {
        let result =
            self.pointer
                .pointer_down(&mut self.profile, layer, pointer_id, button, position);
        self.dispatched(result, sink)
    }

    pub fn capture_acquired(&mut self, pointer_id: u32) -> HandlePointerDispatch {
        self.pointer.capture_acquired(pointer_id)
    }

    pub fn pointer_move(
        &mut self,
        pointer_id: u32,
        position: Point,
        sink: &mut dyn RenderSink,
    ) -> Result<HandlePointerDispatch, ProfileError> {
        let result = self
            .pointer
            .pointer_move(&mut self.profile, pointer_id, position);
        self.dispatched(result, sink)
    }

    pub fn pointer_up(
        &mut self,
        pointer_id: u32,
        button: PointerButton,
        position: Point,
        sink: &mut dyn RenderSink,
    ) -> Result<HandlePointerDispatch, ProfileError> {
        let result = self
            .pointer
            .pointer_up(&mut self.profile, pointer_id, button, position);
        self.dispatched(result, sink)
    }

    pub fn pointer_cancel(
        &mut self,
        pointer_id: Option<u32>,
        sink: &mut dyn RenderSink,
    ) -> Result<HandlePointerDispatch, ProfileError> {
        let result = self.pointer.pointer_cancel(&mut self.profile, pointer_id);
        self.dispatched(result, sink)
    }

    pub fn pointer_leave(
        &mut self,
        pointer_id: u32,
        sink: &mut dyn RenderSink,
    ) -> Result<HandlePointerDispatch, ProfileError> {
        let result = self.pointer.pointer_leave(&mut self.profile, pointer_id);
        self.dispatched(result, sink)
    }

    pub fn lost_pointer_capture(
        &mut self,
        pointer_id: u32,
        sink: &mut dyn RenderSink,
    ) -> Result<HandlePointerDispatch, ProfileError> {
        let result = self
            .pointer
            .lost_pointer_capture(&mut self.profile, pointer_id);
        self.dispatched(result, sink)
    }

    pub fn blur(
        &mut self,
        sink: &mut dyn RenderSink,
    ) -> Result<HandlePointerDispatch, ProfileError> {
        let result = self.pointer.blur(&mut self.profile);
        self.dispatched(result, sink)
    }

    pub fn visibility_hidden(
        &mut self,
        sink: &mut dyn RenderSink,
    ) -> Result<HandlePointerDispatch, ProfileError> {
        let result = self.pointer.visibility_hidden(&mut self.profile);
        self.dispatched(result, sink)
    }

    /// Pointer entered (`Some`) or left (`None`) a handle.
    pub fn hover(&mut self, layer: Option<LayerId>, sink: &mut dyn RenderSink) -> bool {
        self.scene.set_hover(&self.profile, layer, sink)
    }

    // ---- description row buttons ----

    /// Insert a layer above `layer`. Returns the new id, or `None` when the
    /// edit was rejected and an alert raised.
    pub fn insert_above(
        &mut self,
        layer: LayerId,
        sink: &mut dyn RenderSink,
    ) -> Result<Option<LayerId>, ProfileError> {
        let result = self
            .profile
            .index_of(layer)
            .map_err(ProfileError::from)
            .and_then(|index| self.profile.insert_above(index));
        self.settle(result, sink)
    }

    /// Insert a layer below `layer`.
    pub fn insert_below(
        &mut self,
        layer: LayerId,
        sink: &mut dyn RenderSink,
    ) -> Result<Option<LayerId>, ProfileError> {
        let result = self
            .profile
            .index_of(layer)
            .map_err(ProfileError::from)
            .and_then(|index| self.profile.insert_below(index));
        self.settle(result, sink)
    }

    /// Delete `layer`. Returns whether it was removed.
    pub fn delete(
        &mut self,
        layer: LayerId,
        sink: &mut dyn RenderSink,
    ) -> Result<bool, ProfileError> {
        let result = self.profile.delete_layer_by_id(layer);
        let deleted = self.settle(result, sink)?.is_some();
        if deleted && self.editing == Some(layer) {
            self.editing = None;
        }
        Ok(deleted)
    }

    /// Open the feature form for `layer`.
    pub fn edit(&mut self, layer: LayerId) -> Result<(), ProfileError> {
        let features = match self.profile.layer(layer) {
            Ok(found) => found.features().clone(),
            Err(err) => return Err(self.raise(err.into())),
        };
        self.form.open(layer, &features);
        self.editing = Some(layer);
        Ok(())
    }

    /// Apply the outcome of the feature form for `layer`.
    pub fn form_closed(
        &mut self,
        layer: LayerId,
        outcome: FormOutcome,
        sink: &mut dyn RenderSink,
    ) -> Result<(), ProfileError> {
        if self.editing == Some(layer) {
            self.editing = None;
        }
        match outcome {
            FormOutcome::Cancel => Ok(()),
            FormOutcome::Save(features) => {
                let result = self.profile.set_features(layer, features);
                self.settle(result, sink).map(drop)
            }
            FormOutcome::Delete => self.delete(layer, sink).map(drop),
        }
    }

    // ---- pit header ----

    /// Returns whether the new pit depth was accepted.
    pub fn set_pit_depth(
        &mut self,
        depth: f64,
        sink: &mut dyn RenderSink,
    ) -> Result<bool, ProfileError> {
        if let Err(err) = self
            .profile
            .boundaries()
            .check_pit_depth(depth, self.profile.config())
        {
            tracing::warn!(error = %err, "pit depth rejected");
            self.alerts.push(Alert::from(&err));
            return Ok(false);
        }
        // The profile commits an active drag itself; the adapter must forget it.
        if self.pointer.active_pointer_id().is_some() {
            let result = self.pointer.pointer_cancel(&mut self.profile, None);
            self.dispatched(result, sink)?;
        }
        let result = self.profile.set_pit_depth(depth);
        Ok(self.settle(result, sink)?.is_some())
    }

    pub fn set_total_snow_depth(
        &mut self,
        depth: f64,
        sink: &mut dyn RenderSink,
    ) -> Result<bool, ProfileError> {
        let result = self.profile.set_total_snow_depth(depth);
        Ok(self.settle(result, sink)?.is_some())
    }

    pub fn set_depth_reference(
        &mut self,
        reference: DepthReference,
        sink: &mut dyn RenderSink,
    ) -> Result<bool, ProfileError> {
        let result = self.profile.set_depth_reference(reference);
        Ok(self.settle(result, sink)?.is_some())
    }

    // ---- plumbing ----

    fn flush(&mut self, sink: &mut dyn RenderSink) {
        let changes = self.profile.drain_changes();
        if !changes.is_empty() {
            self.scene.sync(&self.profile, &changes, sink);
        }
    }

    fn settle<T>(
        &mut self,
        result: Result<T, ProfileError>,
        sink: &mut dyn RenderSink,
    ) -> Result<Option<T>, ProfileError> {
        match result {
            Ok(value) => {
                self.flush(sink);
                Ok(Some(value))
            }
            Err(ProfileError::Validation(err)) => {
                self.alerts.push(Alert::from(&err));
                Ok(None)
            }
            Err(err) => {
                self.flush(sink);
                Err(self.raise(err))
            }
        }
    }

    fn dispatched(
        &mut self,
        result: Result<HandlePointerDispatch, ProfileError>,
        sink: &mut dyn RenderSink,
    ) -> Result<HandlePointerDispatch, ProfileError> {
        self.flush(sink);
        result.map_err(|err| self.raise(err))
    }

    fn raise(&mut self, err: ProfileError) -> ProfileError {
        let alert = match &err {
            ProfileError::Validation(validation) => Alert::from(validation),
            ProfileError::Invariant(_) => Alert::error(err.to_string()),
        };
        self.alerts.push(alert);
        err
    }
}
