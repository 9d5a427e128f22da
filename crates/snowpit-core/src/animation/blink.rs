#![forbid(unsafe_code)]

//! Square-wave blink for handles the user has not touched yet.
//!
//! # Invariants
//!
//! 1. The phase flips once per elapsed `half_period`; a large `dt` may flip
//!    it several times and the parity is preserved.
//! 2. A stopped blink stays in [`BlinkPhase::Off`] and ignores ticks.
//! 3. `tick` reports whether the phase changed, so hosts only redraw on
//!    edges.

use std::time::Duration;

use super::Animation;

/// Visible phase of a blinking handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlinkPhase {
    /// Normal stroke.
    #[default]
    Off,
    /// Highlighted stroke.
    On,
}

impl BlinkPhase {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Off => Self::On,
            Self::On => Self::Off,
        }
    }
}

/// Endless on/off timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blink {
    half_period: Duration,
    /// Time accumulated since the last phase flip.
    elapsed: Duration,
    phase: BlinkPhase,
    running: bool,
}

impl Blink {
    /// Create a running blink. A zero half-period is clamped to 1ms.
    #[must_use]
    pub fn new(half_period: Duration) -> Self {
        Self {
            half_period: half_period.max(Duration::from_millis(1)),
            elapsed: Duration::ZERO,
            phase: BlinkPhase::Off,
            running: true,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> BlinkPhase {
        self.phase
    }

    /// Whether the timer is still running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Stop for good and settle on [`BlinkPhase::Off`].
    pub fn stop(&mut self) {
        self.running = false;
        self.phase = BlinkPhase::Off;
        self.elapsed = Duration::ZERO;
    }

    /// Advance and report whether the phase flipped.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if !self.running {
            return false;
        }
        let before = self.phase;
        self.elapsed = self.elapsed.saturating_add(dt);
        let half = self.half_period.as_nanos();
        let flips = self.elapsed.as_nanos() / half;
        if flips % 2 == 1 {
            self.phase = self.phase.toggled();
        }
        let rest = self.elapsed.as_nanos() % half;
        self.elapsed = Duration::from_nanos(u64::try_from(rest).unwrap_or(u64::MAX));
        self.phase != before
    }
}

impl Animation for Blink {
    fn tick(&mut self, dt: Duration) {
        self.advance(dt);
    }

    fn is_complete(&self) -> bool {
        !self.running
    }

    fn value(&self) -> f32 {
        match self.phase {
            BlinkPhase::Off => 0.0,
            BlinkPhase::On => 1.0,
        }
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.phase = BlinkPhase::Off;
        self.running = true;
    }
}
