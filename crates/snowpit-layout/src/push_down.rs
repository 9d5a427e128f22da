#![forbid(unsafe_code)]

//! Push-down planning.
//!
//! Pushing layer `i` down one increment first pushes layer `i + 1` if the gap
//! between them is under two increments, and so on down the profile. The
//! whole cascade is computed against a snapshot of the depths before anything
//! is written, so a cascade that would reach the pit bottom changes nothing.

use crate::error::ValidationError;

/// Depth changes produced by one push-down, in index order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PushDownPlan {
    moves: Vec<(usize, f64)>,
}

impl PushDownPlan {
    /// `(index, new_depth)` pairs.
    #[must_use]
    pub fn moves(&self) -> &[(usize, f64)] {
        &self.moves
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Plan pushing `depths[index]` down by `increment`.
///
/// An `index` past the end plans nothing.
pub fn plan_push_down(
    depths: &[f64],
    index: usize,
    increment: f64,
    pit_depth: f64,
) -> Result<PushDownPlan, ValidationError> {
    if index >= depths.len() {
        return Ok(PushDownPlan::default());
    }

    // Extend the cascade while the next layer sits closer than two increments.
    let mut last = index;
    while let Some(&next) = depths.get(last + 1) {
        if next - depths[last] >= 2.0 * increment {
            break;
        }
        last += 1;
    }

    let moves: Vec<(usize, f64)> = (index..=last)
        .map(|i| (i, depths[i] + increment))
        .collect();
    if moves.iter().any(|&(_, depth)| depth >= pit_depth) {
        tracing::warn!(index, pit_depth, cascade = moves.len(), "push-down reaches pit bottom");
        return Err(ValidationError::NoRoomToInsert { index, pit_depth });
    }
    Ok(PushDownPlan { moves })
}
