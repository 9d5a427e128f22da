#![forbid(unsafe_code)]

//! Per-layer observation bag edited through the popup form.
//!
//! The layer engine does not interpret these values beyond rendering the
//! description row text and rejecting combinations the code tables forbid.

use serde::{Deserialize, Serialize};
use snowpit_core::caaml::{GrainShape, WaterContent};

use crate::error::ValidationError;

/// Grain, water and comment data for one layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerFeatures {
    pub grain_shape: Option<GrainShape>,
    /// Subclass code, e.g. `FCxr`. Must belong to `grain_shape`.
    pub grain_subshape: Option<String>,
    pub grain_size_min_mm: Option<f64>,
    pub grain_size_max_mm: Option<f64>,
    pub water_content: Option<WaterContent>,
    pub comment: String,
}

impl LayerFeatures {
    /// Whether nothing has been entered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grain_shape.is_none()
            && self.grain_size_min_mm.is_none()
            && self.grain_size_max_mm.is_none()
            && self.water_content.is_none()
            && self.comment.trim().is_empty()
    }

    /// Reject combinations the code tables do not allow.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(subshape) = &self.grain_subshape {
            let Some(shape) = self.grain_shape else {
                return Err(invalid(format!(
                    "grain subshape {subshape} requires a grain shape"
                )));
            };
            if shape.subshape(subshape).is_none() {
                return Err(invalid(format!(
                    "{subshape} is not a subshape of {shape}"
                )));
            }
        }
        for size in [self.grain_size_min_mm, self.grain_size_max_mm]
            .into_iter()
            .flatten()
        {
            if !(size.is_finite() && size > 0.0) {
                return Err(invalid(format!("grain size {size} mm must be positive")));
            }
        }
        if let (Some(min), Some(max)) = (self.grain_size_min_mm, self.grain_size_max_mm)
            && min > max
        {
            return Err(invalid(format!(
                "grain size range {min}-{max} mm is inverted"
            )));
        }
        if self.grain_size_max_mm.is_some() && self.grain_size_min_mm.is_none() {
            return Err(invalid("maximum grain size given without a minimum".into()));
        }
        Ok(())
    }

    /// Lines of the description row, e.g. `["FCxr 1-2mm M", "buried SH"]`.
    ///
    /// Empty features describe as no lines at all.
    #[must_use]
    pub fn describe(&self) -> Vec<String> {
        let mut parts = Vec::new();
        match (self.grain_shape, &self.grain_subshape) {
            (_, Some(subshape)) => parts.push(subshape.clone()),
            (Some(shape), None) => parts.push(shape.code().to_owned()),
            (None, None) => {}
        }
        match (self.grain_size_min_mm, self.grain_size_max_mm) {
            (Some(min), Some(max)) if min < max => {
                parts.push(format!("{}-{}mm", format_mm(min), format_mm(max)));
            }
            (Some(min), _) => parts.push(format!("{}mm", format_mm(min))),
            (None, _) => {}
        }
        if let Some(lwc) = self.water_content {
            parts.push(lwc.code().to_owned());
        }

        let mut lines = Vec::new();
        if !parts.is_empty() {
            lines.push(parts.join(" "));
        }
        let comment = self.comment.trim();
        if !comment.is_empty() {
            lines.push(comment.to_owned());
        }
        lines
    }
}

fn invalid(reason: String) -> ValidationError {
    ValidationError::InvalidFeatures { reason }
}

fn format_mm(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}
