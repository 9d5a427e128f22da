#![forbid(unsafe_code)]

//! Pointer-capture adapter for handle drags.
//!
//! Bridges browser pointer lifecycle signals into [`Profile`] handle
//! operations while enforcing:
//! - one active pointer at a time,
//! - explicit capture acquire/release commands for the JS host, and
//! - commit of the last clamped position on every interruption path
//!   (pointer cancel, blur, visibility loss, lost capture).

use snowpit_core::Point;
use snowpit_layout::{HandleDragEffect, HandleDragTransition, LayerId, Profile, ProfileError};

/// Mouse button reported with pointer down/up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// Adapter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlePointerConfig {
    /// Button required to begin a drag.
    pub activation_button: PointerButton,
    /// If true, pointer leave ends the drag when capture was requested but
    /// never acknowledged.
    pub release_on_leave_without_capture: bool,
}

impl Default for HandlePointerConfig {
    fn default() -> Self {
        Self {
            activation_button: PointerButton::Primary,
            release_on_leave_without_capture: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureState {
    Requested,
    Acquired,
}

impl CaptureState {
    const fn is_acquired(self) -> bool {
        matches!(self, Self::Acquired)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActivePointer {
    pointer_id: u32,
    layer: LayerId,
    button: PointerButton,
    capture_state: CaptureState,
}

/// Host command for browser pointer-capture control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "command", rename_all = "snake_case"))]
pub enum CaptureCommand {
    Acquire { pointer_id: u32 },
    Release { pointer_id: u32 },
}

/// Lifecycle phase recorded for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    PointerDown,
    PointerMove,
    PointerUp,
    PointerCancel,
    PointerLeave,
    Blur,
    VisibilityHidden,
    LostPointerCapture,
    CaptureAcquired,
}

/// Why a lifecycle signal was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerIgnoredReason {
    InvalidPointerId,
    ButtonNotAllowed,
    ButtonMismatch,
    ActivePointerAlreadyInProgress,
    NoActivePointer,
    PointerMismatch,
    LeaveWhileCaptured,
}

/// Outcome category for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerLogOutcome {
    Forwarded,
    CaptureStateUpdated,
    Ignored(PointerIgnoredReason),
}

/// Structured log record for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerLogEntry {
    pub phase: PointerPhase,
    pub pointer_id: Option<u32>,
    pub layer: Option<LayerId>,
    pub position: Option<Point>,
    pub capture_command: Option<CaptureCommand>,
    pub outcome: PointerLogOutcome,
}

/// Result of one pointer lifecycle dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandlePointerDispatch {
    pub transition: Option<HandleDragTransition>,
    pub capture_command: Option<CaptureCommand>,
    pub log: PointerLogEntry,
}

impl HandlePointerDispatch {
    fn ignored(
        phase: PointerPhase,
        reason: PointerIgnoredReason,
        pointer_id: Option<u32>,
        layer: Option<LayerId>,
        position: Option<Point>,
    ) -> Self {
        Self {
            transition: None,
            capture_command: None,
            log: PointerLogEntry {
                phase,
                pointer_id,
                layer,
                position,
                capture_command: None,
                outcome: PointerLogOutcome::Ignored(reason),
            },
        }
    }

    fn forwarded(
        phase: PointerPhase,
        active: ActivePointer,
        position: Option<Point>,
        transition: Option<HandleDragTransition>,
        capture_command: Option<CaptureCommand>,
    ) -> Self {
        Self {
            transition,
            capture_command,
            log: PointerLogEntry {
                phase,
                pointer_id: Some(active.pointer_id),
                layer: Some(active.layer),
                position,
                capture_command,
                outcome: PointerLogOutcome::Forwarded,
            },
        }
    }

    /// Whether the dispatch ended a drag (release or interruption).
    #[must_use]
    pub fn ended_drag(&self) -> bool {
        matches!(
            self.transition.map(|t| t.effect),
            Some(HandleDragEffect::Released { .. })
        )
    }
}

/// Pointer-capture adapter for handle drags on a web host.
///
/// Capture commands map onto DOM `setPointerCapture()` /
/// `releasePointerCapture()`.
#[derive(Debug, Clone, Default)]
pub struct HandlePointerAdapter {
    config: HandlePointerConfig,
    active: Option<ActivePointer>,
}

impl HandlePointerAdapter {
    #[must_use]
    pub fn new(config: HandlePointerConfig) -> Self {
        Self {
            config,
            active: None,
        }
    }

    #[must_use]
    pub const fn config(&self) -> HandlePointerConfig {
        self.config
    }

    /// Active pointer ID, if any.
    #[must_use]
    pub fn active_pointer_id(&self) -> Option<u32> {
        self.active.map(|active| active.pointer_id)
    }

    /// Layer whose handle is being dragged, if any.
    #[must_use]
    pub fn active_layer(&self) -> Option<LayerId> {
        self.active.map(|active| active.layer)
    }

    /// Pointer down on the handle of `layer`.
    pub fn pointer_down(
        &mut self,
        profile: &mut Profile,
        layer: LayerId,
        pointer_id: u32,
        button: PointerButton,
        position: Point,
    ) -> Result<HandlePointerDispatch, ProfileError> {
        let phase = PointerPhase::PointerDown;
        if pointer_id == 0 {
            return Ok(HandlePointerDispatch::ignored(
                phase,
                PointerIgnoredReason::InvalidPointerId,
                Some(pointer_id),
                Some(layer),
                Some(position),
            ));
        }
        if button != self.config.activation_button {
            return Ok(HandlePointerDispatch::ignored(
                phase,
                PointerIgnoredReason::ButtonNotAllowed,
                Some(pointer_id),
                Some(layer),
                Some(position),
            ));
        }
        if self.active.is_some() {
            return Ok(HandlePointerDispatch::ignored(
                phase,
                PointerIgnoredReason::ActivePointerAlreadyInProgress,
                Some(pointer_id),
                Some(layer),
                Some(position),
            ));
        }

        let transition = profile.press_handle(layer, pointer_id, position)?;
        let active = ActivePointer {
            pointer_id,
            layer,
            button,
            capture_state: CaptureState::Requested,
        };
        self.active = Some(active);
        Ok(HandlePointerDispatch::forwarded(
            phase,
            active,
            Some(position),
            Some(transition),
            Some(CaptureCommand::Acquire { pointer_id }),
        ))
    }

    /// Browser pointer capture was acquired.
    pub fn capture_acquired(&mut self, pointer_id: u32) -> HandlePointerDispatch {
        let phase = PointerPhase::CaptureAcquired;
        let Some(mut active) = self.active else {
            return HandlePointerDispatch::ignored(
                phase,
                PointerIgnoredReason::NoActivePointer,
                Some(pointer_id),
                None,
                None,
            );
        };
        if active.pointer_id != pointer_id {
            return HandlePointerDispatch::ignored(
                phase,
                PointerIgnoredReason::PointerMismatch,
                Some(pointer_id),
                Some(active.layer),
                None,
            );
        }
        active.capture_state = CaptureState::Acquired;
        self.active = Some(active);
        let mut dispatch = HandlePointerDispatch::forwarded(phase, active, None, None, None);
        dispatch.log.outcome = PointerLogOutcome::CaptureStateUpdated;
        dispatch
    }

    /// Pointer move during a drag.
    pub fn pointer_move(
        &mut self,
        profile: &mut Profile,
        pointer_id: u32,
        position: Point,
    ) -> Result<HandlePointerDispatch, ProfileError> {
        let phase = PointerPhase::PointerMove;
        let Some(active) = self.active else {
            return Ok(HandlePointerDispatch::ignored(
                phase,
                PointerIgnoredReason::NoActivePointer,
                Some(pointer_id),
                None,
                Some(position),
            ));
        };
        if active.pointer_id != pointer_id {
            return Ok(HandlePointerDispatch::ignored(
                phase,
                PointerIgnoredReason::PointerMismatch,
                Some(pointer_id),
                Some(active.layer),
                Some(position),
            ));
        }
        let transition = profile.drag_handle(pointer_id, position)?;
        Ok(HandlePointerDispatch::forwarded(
            phase,
            active,
            Some(position),
            Some(transition),
            None,
        ))
    }

    /// Pointer up: commit and release capture.
    pub fn pointer_up(
        &mut self,
        profile: &mut Profile,
        pointer_id: u32,
        button: PointerButton,
        position: Point,
    ) -> Result<HandlePointerDispatch, ProfileError> {
        let phase = PointerPhase::PointerUp;
        let Some(active) = self.active else {
            return Ok(HandlePointerDispatch::ignored(
                phase,
                PointerIgnoredReason::NoActivePointer,
                Some(pointer_id),
                None,
                Some(position),
            ));
        };
        if active.pointer_id != pointer_id {
            return Ok(HandlePointerDispatch::ignored(
                phase,
                PointerIgnoredReason::PointerMismatch,
                Some(pointer_id),
                Some(active.layer),
                Some(position),
            ));
        }
        if active.button != button {
            return Ok(HandlePointerDispatch::ignored(
                phase,
                PointerIgnoredReason::ButtonMismatch,
                Some(pointer_id),
                Some(active.layer),
                Some(position),
            ));
        }
        self.active = None;
        let transition = profile.release_handle(pointer_id)?;
        Ok(HandlePointerDispatch::forwarded(
            phase,
            active,
            Some(position),
            Some(transition),
            active
                .capture_state
                .is_acquired()
                .then_some(CaptureCommand::Release { pointer_id }),
        ))
    }

    /// Browser `pointercancel`.
    pub fn pointer_cancel(
        &mut self,
        profile: &mut Profile,
        pointer_id: Option<u32>,
    ) -> Result<HandlePointerDispatch, ProfileError> {
        self.end_active(profile, PointerPhase::PointerCancel, pointer_id, true)
    }

    /// Pointer left the drawing.
    pub fn pointer_leave(
        &mut self,
        profile: &mut Profile,
        pointer_id: u32,
    ) -> Result<HandlePointerDispatch, ProfileError> {
        let phase = PointerPhase::PointerLeave;
        let Some(active) = self.active else {
            return Ok(HandlePointerDispatch::ignored(
                phase,
                PointerIgnoredReason::NoActivePointer,
                Some(pointer_id),
                None,
                None,
            ));
        };
        if active.pointer_id != pointer_id {
            return Ok(HandlePointerDispatch::ignored(
                phase,
                PointerIgnoredReason::PointerMismatch,
                Some(pointer_id),
                Some(active.layer),
                None,
            ));
        }
        if matches!(active.capture_state, CaptureState::Requested)
            && self.config.release_on_leave_without_capture
        {
            self.end_active(profile, phase, Some(pointer_id), true)
        } else {
            Ok(HandlePointerDispatch::ignored(
                phase,
                PointerIgnoredReason::LeaveWhileCaptured,
                Some(pointer_id),
                Some(active.layer),
                None,
            ))
        }
    }

    /// Window lost focus.
    pub fn blur(&mut self, profile: &mut Profile) -> Result<HandlePointerDispatch, ProfileError> {
        self.end_active(profile, PointerPhase::Blur, None, true)
    }

    /// Document became hidden.
    pub fn visibility_hidden(
        &mut self,
        profile: &mut Profile,
    ) -> Result<HandlePointerDispatch, ProfileError> {
        self.end_active(profile, PointerPhase::VisibilityHidden, None, true)
    }

    /// Browser `lostpointercapture`; capture is already gone, so no release
    /// command is emitted.
    pub fn lost_pointer_capture(
        &mut self,
        profile: &mut Profile,
        pointer_id: u32,
    ) -> Result<HandlePointerDispatch, ProfileError> {
        self.end_active(profile, PointerPhase::LostPointerCapture, Some(pointer_id), false)
    }

    fn end_active(
        &mut self,
        profile: &mut Profile,
        phase: PointerPhase,
        pointer_id: Option<u32>,
        release_capture: bool,
    ) -> Result<HandlePointerDispatch, ProfileError> {
        let Some(active) = self.active else {
            return Ok(HandlePointerDispatch::ignored(
                phase,
                PointerIgnoredReason::NoActivePointer,
                pointer_id,
                None,
                None,
            ));
        };
        if let Some(id) = pointer_id
            && id != active.pointer_id
        {
            return Ok(HandlePointerDispatch::ignored(
                phase,
                PointerIgnoredReason::PointerMismatch,
                Some(id),
                Some(active.layer),
                None,
            ));
        }

        self.active = None;
        let transition = profile.finish_drag()?;
        tracing::debug!(?phase, pointer_id = active.pointer_id, "handle drag interrupted");
        let command = (release_capture && active.capture_state.is_acquired()).then_some(
            CaptureCommand::Release {
                pointer_id: active.pointer_id,
            },
        );
        Ok(HandlePointerDispatch::forwarded(
            phase, active, None, transition, command,
        ))
    }
}
