#![forbid(unsafe_code)]

//! Pit depth, total snow depth, and the depth reference policy.
//!
//! Layer depths are always stored from the snow surface. The reference only
//! changes how depths are displayed: from the surface, or as height above
//! ground (`total_snow_depth - depth`) once the total depth is known.

use std::fmt;

use serde::{Deserialize, Serialize};
use snowpit_core::ProfileConfig;

use crate::error::ValidationError;

/// Where displayed depths are measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthReference {
    #[default]
    Surface,
    Ground,
}

impl fmt::Display for DepthReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surface => f.write_str("surface"),
            Self::Ground => f.write_str("ground"),
        }
    }
}

/// Vertical extent of the profile and how depths are labelled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileBoundaries {
    pit_depth: f64,
    total_snow_depth: Option<f64>,
    depth_reference: DepthReference,
    reference_selector_visible: bool,
}

impl ProfileBoundaries {
    /// Surface-referenced boundaries with an unknown total depth.
    #[must_use]
    pub const fn new(pit_depth: f64) -> Self {
        Self {
            pit_depth,
            total_snow_depth: None,
            depth_reference: DepthReference::Surface,
            reference_selector_visible: false,
        }
    }

    #[must_use]
    pub const fn pit_depth(&self) -> f64 {
        self.pit_depth
    }

    /// Total snow depth, `None` while unmeasured.
    #[must_use]
    pub const fn total_snow_depth(&self) -> Option<f64> {
        self.total_snow_depth
    }

    #[must_use]
    pub const fn depth_reference(&self) -> DepthReference {
        self.depth_reference
    }

    /// Whether the surface/ground selector is offered to the user.
    #[must_use]
    pub const fn is_reference_selector_visible(&self) -> bool {
        self.reference_selector_visible
    }

    /// Depth as shown to the user under the current reference.
    #[must_use]
    pub fn display_depth(&self, depth: f64) -> f64 {
        match (self.depth_reference, self.total_snow_depth) {
            (DepthReference::Ground, Some(total)) => total - depth,
            _ => depth,
        }
    }

    /// Check a new pit depth without applying it.
    pub fn check_pit_depth(&self, depth: f64, config: &ProfileConfig) -> Result<(), ValidationError> {
        if !(depth.is_finite()
            && (config.min_pit_depth_cm..=config.max_pit_depth_cm).contains(&depth))
        {
            return Err(ValidationError::PitDepthOutOfRange {
                requested: depth,
                min: config.min_pit_depth_cm,
                max: config.max_pit_depth_cm,
            });
        }
        if let Some(total) = self.total_snow_depth
            && depth > total
        {
            return Err(ValidationError::PitDepthAboveTotal {
                requested: depth,
                total,
            });
        }
        Ok(())
    }

    pub(crate) fn set_pit_depth(&mut self, depth: f64) {
        self.pit_depth = depth;
    }

    /// Apply a new total snow depth.
    ///
    /// A value above `config.unknown_total_depth_cm` makes the total known,
    /// switches to ground reference and shows the selector. Anything at or
    /// below it clears the total, returns to surface reference and hides the
    /// selector.
    pub fn set_total_snow_depth(
        &mut self,
        depth: f64,
        config: &ProfileConfig,
    ) -> Result<(), ValidationError> {
        if !(depth.is_finite() && (0.0..=config.max_total_depth_cm).contains(&depth)) {
            return Err(ValidationError::TotalDepthOutOfRange {
                requested: depth,
                max: config.max_total_depth_cm,
            });
        }
        if depth > config.unknown_total_depth_cm {
            if depth < self.pit_depth {
                return Err(ValidationError::TotalDepthBelowPit {
                    requested: depth,
                    pit_depth: self.pit_depth,
                });
            }
            self.total_snow_depth = Some(depth);
            self.depth_reference = DepthReference::Ground;
            self.reference_selector_visible = true;
        } else {
            self.total_snow_depth = None;
            self.depth_reference = DepthReference::Surface;
            self.reference_selector_visible = false;
        }
        Ok(())
    }

    /// Explicit selector change. Ground requires a known total depth.
    pub fn set_depth_reference(&mut self, reference: DepthReference) -> Result<(), ValidationError> {
        if reference == DepthReference::Ground && self.total_snow_depth.is_none() {
            return Err(ValidationError::GroundReferenceWithoutTotal);
        }
        self.depth_reference = reference;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_total_switches_to_ground() {
        let config = ProfileConfig::default();
        let mut boundaries = ProfileBoundaries::new(200.0);
        boundaries
            .set_total_snow_depth(250.0, &config)
            .expect("valid total");
        assert_eq!(boundaries.depth_reference(), DepthReference::Ground);
        assert!(boundaries.is_reference_selector_visible());
        assert_eq!(boundaries.display_depth(20.0), 230.0);
    }

    #[test]
    fn clearing_total_returns_to_surface() {
        let config = ProfileConfig::default();
        let mut boundaries = ProfileBoundaries::new(200.0);
        boundaries.set_total_snow_depth(250.0, &config).expect("valid");
        boundaries.set_total_snow_depth(0.0, &config).expect("unknown");
        assert_eq!(boundaries.total_snow_depth(), None);
        assert_eq!(boundaries.depth_reference(), DepthReference::Surface);
        assert!(!boundaries.is_reference_selector_visible());
        assert_eq!(boundaries.display_depth(20.0), 20.0);
    }

    #[test]
    fn total_depth_rejections_leave_state() {
        let config = ProfileConfig::default();
        let mut boundaries = ProfileBoundaries::new(200.0);
        let before = boundaries;
        for bad in [f64::NAN, -1.0, config.max_total_depth_cm + 1.0] {
            assert!(matches!(
                boundaries.set_total_snow_depth(bad, &config),
                Err(ValidationError::TotalDepthOutOfRange { .. })
            ));
        }
        assert_eq!(
            boundaries.set_total_snow_depth(150.0, &config),
            Err(ValidationError::TotalDepthBelowPit {
                requested: 150.0,
                pit_depth: 200.0
            })
        );
        assert_eq!(boundaries, before);
    }

    #[test]
    fn ground_requires_total() {
        let config = ProfileConfig::default();
        let mut boundaries = ProfileBoundaries::new(200.0);
        assert_eq!(
            boundaries.set_depth_reference(DepthReference::Ground),
            Err(ValidationError::GroundReferenceWithoutTotal)
        );
        boundaries.set_total_snow_depth(300.0, &config).expect("valid");
        boundaries
            .set_depth_reference(DepthReference::Surface)
            .expect("surface always allowed");
        assert_eq!(boundaries.display_depth(50.0), 50.0);
        boundaries
            .set_depth_reference(DepthReference::Ground)
            .expect("total known");
        assert_eq!(boundaries.display_depth(50.0), 250.0);
    }

    #[test]
    fn pit_depth_checks() {
        let config = ProfileConfig::default();
        let mut boundaries = ProfileBoundaries::new(200.0);
        assert!(boundaries.check_pit_depth(5.0, &config).is_err());
        assert!(boundaries.check_pit_depth(501.0, &config).is_err());
        assert_eq!(boundaries.check_pit_depth(120.0, &config), Ok(()));
        boundaries.set_total_snow_depth(220.0, &config).expect("valid");
        assert_eq!(
            boundaries.check_pit_depth(230.0, &config),
            Err(ValidationError::PitDepthAboveTotal {
                requested: 230.0,
                total: 220.0
            })
        );
    }
}
