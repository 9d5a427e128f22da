#![forbid(unsafe_code)]

//! Graph grid ticks.
//!
//! Depth ticks are labelled under the current depth reference. With ground
//! reference the labels are heights above ground at multiples of the tick
//! spacing, so the tick positions shift with the total snow depth.

use serde::{Deserialize, Serialize};
use snowpit_core::{CoordinateTransform, HandHardness};

use crate::boundaries::{DepthReference, ProfileBoundaries};

/// Horizontal grid line at one depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthTick {
    /// Depth from the surface (cm).
    pub depth: f64,
    pub y: f64,
    pub label: String,
}

/// Vertical grid line at one major hardness code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardnessTick {
    pub code: HandHardness,
    pub x: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Grid {
    pub depth_ticks: Vec<DepthTick>,
    pub hardness_ticks: Vec<HardnessTick>,
}

/// Build the grid for the current pit depth and reference.
#[must_use]
pub fn build_grid(
    transform: &CoordinateTransform,
    boundaries: &ProfileBoundaries,
    tick_cm: f64,
) -> Grid {
    let pit_depth = boundaries.pit_depth();
    let mut depth_ticks = Vec::new();

    match (boundaries.depth_reference(), boundaries.total_snow_depth()) {
        (DepthReference::Ground, Some(total)) => {
            // Heights above ground visible between the surface and pit bottom.
            let lowest = ((total - pit_depth) / tick_cm).ceil() as i64;
            let highest = (total / tick_cm).floor() as i64;
            for step in (lowest..=highest).rev() {
                let height = step as f64 * tick_cm;
                let depth = total - height;
                depth_ticks.push(DepthTick {
                    depth,
                    y: transform.depth_to_y(depth),
                    label: format_cm(height),
                });
            }
        }
        _ => {
            let steps = (pit_depth / tick_cm).floor() as i64;
            for step in 0..=steps {
                let depth = step as f64 * tick_cm;
                depth_ticks.push(DepthTick {
                    depth,
                    y: transform.depth_to_y(depth),
                    label: format_cm(depth),
                });
            }
        }
    }

    let scale = transform.scale();
    let hardness_ticks = scale
        .major_ticks()
        .map(|band| HardnessTick {
            code: band.code,
            x: scale.center_x(band.code),
        })
        .collect();

    Grid {
        depth_ticks,
        hardness_ticks,
    }
}

fn format_cm(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
