#![forbid(unsafe_code)]

//! Handle drag lifecycle and neighbor clamping.
//!
//! ```text
//! Idle -> Dragging -> Idle
//! ```
//!
//! The machine only tracks pointer ownership and the clamped handle
//! position. Turning that position into depth and hardness, and redrawing
//! neighbors, is the caller's job ([`Profile`](crate::Profile) does both).
//!
//! There is no cancel: every way out of `Dragging` commits the last clamped
//! position.

use serde::{Deserialize, Serialize};
use snowpit_core::{GraphGeometry, Point};

use crate::layer::{Layer, LayerId};

/// Minimum vertical separation between neighboring handles, in pixels.
pub const HANDLE_GAP_PX: f64 = 1.0;

/// Allowed handle rectangle for one layer, derived from its neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandleBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl HandleBounds {
    /// Bounds for `layers[index]`.
    ///
    /// - The top layer is pinned to the surface.
    /// - Every other layer keeps [`HANDLE_GAP_PX`] from the layer above.
    /// - Interior layers keep the same gap from the layer below.
    /// - The bottom layer may reach the pit bottom.
    #[must_use]
    pub fn for_layer(layers: &[Layer], index: usize, graph: &GraphGeometry) -> Self {
        let (y_min, y_max) = if index == 0 {
            (graph.min_y(), graph.min_y())
        } else {
            let above = layers[index - 1].handle().y + HANDLE_GAP_PX;
            let below = layers
                .get(index + 1)
                .map_or(graph.max_y(), |below| below.handle().y - HANDLE_GAP_PX);
            (above, below)
        };
        Self {
            x_min: graph.min_x(),
            x_max: graph.max_x(),
            y_min,
            y_max,
        }
    }

    /// Clamp `proposed`. When neighbors are closer than the gap allows, the
    /// Y range is empty and `current.y` is kept.
    #[must_use]
    pub fn clamp(&self, proposed: Point, current: Point) -> Point {
        let x = proposed.x.clamp(self.x_min, self.x_max);
        let y = if self.y_min <= self.y_max {
            proposed.y.clamp(self.y_min, self.y_max)
        } else {
            current.y
        };
        Point::new(x, y)
    }
}

/// Drag lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum HandleDragState {
    Idle,
    Dragging {
        layer: LayerId,
        pointer_id: u32,
        /// Pointer position minus handle center at press time.
        grab_offset: Point,
        /// Last clamped handle center.
        current: Point,
    },
}

/// Why an input was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleDragNoopReason {
    IdleWithoutActiveDrag,
    ActiveDragAlreadyInProgress,
    PointerMismatch,
    PositionUnchanged,
}

/// Effect of one lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum HandleDragEffect {
    Pressed {
        layer: LayerId,
        pointer_id: u32,
        origin: Point,
    },
    Moved {
        layer: LayerId,
        pointer_id: u32,
        previous: Point,
        current: Point,
        /// Whether the proposed position was clamped.
        clamped: bool,
    },
    Released {
        layer: LayerId,
        pointer_id: u32,
        end: Point,
    },
    Noop {
        reason: HandleDragNoopReason,
    },
}

/// One state-machine transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandleDragTransition {
    pub transition_id: u64,
    pub from: HandleDragState,
    pub to: HandleDragState,
    pub effect: HandleDragEffect,
}

/// Drag lifecycle for the (single) active handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandleDragMachine {
    state: HandleDragState,
    transition_counter: u64,
}

impl Default for HandleDragMachine {
    fn default() -> Self {
        Self {
            state: HandleDragState::Idle,
            transition_counter: 0,
        }
    }
}

impl HandleDragMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> HandleDragState {
        self.state
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, HandleDragState::Dragging { .. })
    }

    /// Layer being dragged, if any.
    #[must_use]
    pub const fn active_layer(&self) -> Option<LayerId> {
        match self.state {
            HandleDragState::Dragging { layer, .. } => Some(layer),
            HandleDragState::Idle => None,
        }
    }

    /// Start dragging `layer` whose handle is centered at `handle`.
    pub fn press(
        &mut self,
        layer: LayerId,
        pointer_id: u32,
        pointer: Point,
        handle: Point,
    ) -> HandleDragTransition {
        let from = self.state;
        let effect = match self.state {
            HandleDragState::Idle => {
                self.state = HandleDragState::Dragging {
                    layer,
                    pointer_id,
                    grab_offset: Point::new(pointer.x - handle.x, pointer.y - handle.y),
                    current: handle,
                };
                HandleDragEffect::Pressed {
                    layer,
                    pointer_id,
                    origin: handle,
                }
            }
            HandleDragState::Dragging { .. } => HandleDragEffect::Noop {
                reason: HandleDragNoopReason::ActiveDragAlreadyInProgress,
            },
        };
        self.transition(from, effect)
    }

    /// Move the dragged handle toward `pointer`, clamped to `bounds`.
    pub fn drag_to(
        &mut self,
        pointer_id: u32,
        pointer: Point,
        bounds: &HandleBounds,
    ) -> HandleDragTransition {
        let from = self.state;
        let effect = match self.state {
            HandleDragState::Idle => HandleDragEffect::Noop {
                reason: HandleDragNoopReason::IdleWithoutActiveDrag,
            },
            HandleDragState::Dragging {
                pointer_id: owner, ..
            } if owner != pointer_id => HandleDragEffect::Noop {
                reason: HandleDragNoopReason::PointerMismatch,
            },
            HandleDragState::Dragging {
                layer,
                pointer_id,
                grab_offset,
                current: previous,
            } => {
                let proposed = Point::new(pointer.x - grab_offset.x, pointer.y - grab_offset.y);
                let current = bounds.clamp(proposed, previous);
                if current == previous {
                    HandleDragEffect::Noop {
                        reason: HandleDragNoopReason::PositionUnchanged,
                    }
                } else {
                    self.state = HandleDragState::Dragging {
                        layer,
                        pointer_id,
                        grab_offset,
                        current,
                    };
                    HandleDragEffect::Moved {
                        layer,
                        pointer_id,
                        previous,
                        current,
                        clamped: current != proposed,
                    }
                }
            }
        };
        self.transition(from, effect)
    }

    /// End the drag owned by `pointer_id`.
    pub fn release(&mut self, pointer_id: u32) -> HandleDragTransition {
        let from = self.state;
        let effect = match self.state {
            HandleDragState::Idle => HandleDragEffect::Noop {
                reason: HandleDragNoopReason::IdleWithoutActiveDrag,
            },
            HandleDragState::Dragging {
                pointer_id: owner, ..
            } if owner != pointer_id => HandleDragEffect::Noop {
                reason: HandleDragNoopReason::PointerMismatch,
            },
            HandleDragState::Dragging {
                layer,
                pointer_id,
                current,
                ..
            } => {
                self.state = HandleDragState::Idle;
                HandleDragEffect::Released {
                    layer,
                    pointer_id,
                    end: current,
                }
            }
        };
        self.transition(from, effect)
    }

    /// End any drag regardless of pointer, committing its last position.
    ///
    /// Returns `None` when already idle.
    pub fn force_release(&mut self) -> Option<HandleDragTransition> {
        match self.state {
            HandleDragState::Idle => None,
            HandleDragState::Dragging { pointer_id, .. } => Some(self.release(pointer_id)),
        }
    }

    fn transition(&mut self, from: HandleDragState, effect: HandleDragEffect) -> HandleDragTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        HandleDragTransition {
            transition_id: self.transition_counter,
            from,
            to: self.state,
            effect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> LayerId {
        LayerId::new(raw).expect("non-zero")
    }

    fn bounds() -> HandleBounds {
        HandleBounds {
            x_min: 40.0,
            x_max: 380.0,
            y_min: 41.0,
            y_max: 159.0,
        }
    }

    #[test]
    fn clamp_respects_all_edges() {
        let b = bounds();
        let current = Point::new(100.0, 100.0);
        assert_eq!(b.clamp(Point::new(0.0, 0.0), current), Point::new(40.0, 41.0));
        assert_eq!(b.clamp(Point::new(999.0, 999.0), current), Point::new(380.0, 159.0));
        assert_eq!(b.clamp(Point::new(200.0, 120.0), current), Point::new(200.0, 120.0));
    }

    #[test]
    fn collapsed_range_keeps_current_y() {
        let b = HandleBounds {
            y_min: 101.0,
            y_max: 99.0,
            ..bounds()
        };
        let clamped = b.clamp(Point::new(50.0, 300.0), Point::new(60.0, 100.0));
        assert_eq!(clamped, Point::new(50.0, 100.0));
    }

    #[test]
    fn press_drag_release_lifecycle() {
        let mut machine = HandleDragMachine::new();
        let handle = Point::new(100.0, 100.0);
        let pressed = machine.press(id(2), 7, Point::new(103.0, 98.0), handle);
        assert!(matches!(pressed.effect, HandleDragEffect::Pressed { .. }));
        assert_eq!(machine.active_layer(), Some(id(2)));

        // Grab offset (3, -2) is preserved while dragging.
        let moved = machine.drag_to(7, Point::new(153.0, 118.0), &bounds());
        assert_eq!(
            moved.effect,
            HandleDragEffect::Moved {
                layer: id(2),
                pointer_id: 7,
                previous: handle,
                current: Point::new(150.0, 120.0),
                clamped: false,
            }
        );

        let released = machine.release(7);
        assert_eq!(
            released.effect,
            HandleDragEffect::Released {
                layer: id(2),
                pointer_id: 7,
                end: Point::new(150.0, 120.0),
            }
        );
        assert_eq!(released.to, HandleDragState::Idle);
        assert_eq!(released.transition_id, 3);
    }

    #[test]
    fn clamped_move_is_flagged() {
        let mut machine = HandleDragMachine::new();
        machine.press(id(1), 1, Point::new(100.0, 100.0), Point::new(100.0, 100.0));
        let moved = machine.drag_to(1, Point::new(100.0, 500.0), &bounds());
        let HandleDragEffect::Moved {
            clamped, current, ..
        } = moved.effect
        else {
            panic!("expected move, got {:?}", moved.effect);
        };
        assert!(clamped);
        assert_eq!(current.y, 159.0);
    }

    #[test]
    fn foreign_pointer_is_ignored() {
        let mut machine = HandleDragMachine::new();
        machine.press(id(1), 1, Point::new(100.0, 100.0), Point::new(100.0, 100.0));
        let second = machine.press(id(2), 2, Point::new(0.0, 0.0), Point::new(0.0, 0.0));
        assert_eq!(
            second.effect,
            HandleDragEffect::Noop {
                reason: HandleDragNoopReason::ActiveDragAlreadyInProgress
            }
        );
        let moved = machine.drag_to(2, Point::new(120.0, 120.0), &bounds());
        assert_eq!(
            moved.effect,
            HandleDragEffect::Noop {
                reason: HandleDragNoopReason::PointerMismatch
            }
        );
        assert!(machine.is_active());
    }

    #[test]
    fn idle_inputs_are_noops() {
        let mut machine = HandleDragMachine::new();
        assert_eq!(
            machine.release(1).effect,
            HandleDragEffect::Noop {
                reason: HandleDragNoopReason::IdleWithoutActiveDrag
            }
        );
        assert!(machine.force_release().is_none());
    }

    #[test]
    fn force_release_commits_last_position() {
        let mut machine = HandleDragMachine::new();
        machine.press(id(4), 9, Point::new(100.0, 100.0), Point::new(100.0, 100.0));
        machine.drag_to(9, Point::new(120.0, 130.0), &bounds());
        let released = machine.force_release().expect("was dragging");
        assert_eq!(
            released.effect,
            HandleDragEffect::Released {
                layer: id(4),
                pointer_id: 9,
                end: Point::new(120.0, 130.0),
            }
        );
    }
}
