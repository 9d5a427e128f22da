#![forbid(unsafe_code)]

//! Host-clocked animations.
//!
//! Animations never read a wall clock; the host advances them with
//! [`Animation::tick`]. This keeps them deterministic under test and on
//! `wasm32-unknown-unknown`.

mod blink;

use std::time::Duration;

pub use blink::{Blink, BlinkPhase};

/// A value that evolves as host time advances.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has finished. Looping animations never finish.
    fn is_complete(&self) -> bool;

    /// Current output in `[0.0, 1.0]`.
    fn value(&self) -> f32;

    /// Return to the initial state.
    fn reset(&mut self);
}
