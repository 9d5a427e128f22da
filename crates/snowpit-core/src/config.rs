#![forbid(unsafe_code)]

//! Editor configuration supplied once at startup.
//!
//! Every field has a default matching the stock editor layout, so
//! `ProfileConfig::default()` is a complete working configuration. With the
//! `config` feature the same struct can be loaded from TOML or JSON:
//!
//! ```toml
//! insertion_increment_cm = 1.0
//! max_pit_depth_cm = 400.0
//!
//! [graph]
//! x_origin = 40.0
//! y_origin = 40.0
//! width = 340.0
//! height = 600.0
//! ```
//!
//! ```rust,ignore
//! let config = ProfileConfig::from_toml_file("snowpit.toml")?;
//! ```

#[cfg(feature = "config")]
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geometry::GraphGeometry;

/// Upper bound on `initial_layer_count`.
pub const MAX_INITIAL_LAYERS: usize = 256;

/// Geometry constants and policy limits for one editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Placement of the hardness/depth graph.
    pub graph: GraphGeometry,
    /// Side of the square drag handle, in pixels.
    pub handle_size: f64,
    /// Minimum depth step used when making room for an inserted layer (cm).
    pub insertion_increment_cm: f64,
    /// Smallest accepted pit depth (cm).
    pub min_pit_depth_cm: f64,
    /// Largest accepted pit depth (cm).
    pub max_pit_depth_cm: f64,
    /// Pit depth at startup (cm).
    pub default_pit_depth_cm: f64,
    /// Total snow depth value meaning "not measured" (cm).
    ///
    /// A total depth above this switches display to ground reference.
    pub unknown_total_depth_cm: f64,
    /// Largest accepted total snow depth (cm).
    pub max_total_depth_cm: f64,
    /// Number of layers created at startup.
    pub initial_layer_count: usize,
    /// Spacing between the initial layers (cm).
    pub initial_layer_spacing_cm: f64,
    /// Left edge of the description column, in pixels.
    pub description_x: f64,
    /// Height of one description row, in pixels.
    pub description_row_height: f64,
    /// Spacing of labelled depth ticks (cm).
    pub depth_tick_cm: f64,
    /// Idle blink half-period for untouched handles (ms).
    pub blink_period_ms: u64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            graph: GraphGeometry::default(),
            handle_size: 10.0,
            insertion_increment_cm: 1.0,
            min_pit_depth_cm: 10.0,
            max_pit_depth_cm: 500.0,
            default_pit_depth_cm: 200.0,
            unknown_total_depth_cm: 0.0,
            max_total_depth_cm: 1000.0,
            initial_layer_count: 3,
            initial_layer_spacing_cm: 20.0,
            description_x: 420.0,
            description_row_height: 40.0,
            depth_tick_cm: 10.0,
            blink_period_ms: 500,
        }
    }
}

impl ProfileConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(s)
            .map_err(ConfigError::Toml)?
            .validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(s)
            .map_err(ConfigError::Json)?
            .validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Return `self` if it passes [`validate`](Self::validate).
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            tracing::warn!(count = errors.len(), first = %errors[0], "profile config rejected");
            Err(ConfigError::Validation(errors))
        }
    }

    /// Validate all parameters.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let graph = &self.graph;
        for (name, value) in [
            ("graph.x_origin", graph.x_origin),
            ("graph.y_origin", graph.y_origin),
        ] {
            if !value.is_finite() {
                errors.push(format!("{name} must be finite, got {value}"));
            }
        }
        for (name, value) in [
            ("graph.width", graph.width),
            ("graph.height", graph.height),
            ("handle_size", self.handle_size),
            ("insertion_increment_cm", self.insertion_increment_cm),
            ("min_pit_depth_cm", self.min_pit_depth_cm),
            ("description_row_height", self.description_row_height),
            ("depth_tick_cm", self.depth_tick_cm),
        ] {
            if !(value.is_finite() && value > 0.0) {
                errors.push(format!("{name} must be > 0, got {value}"));
            }
        }

        if self.max_pit_depth_cm < self.min_pit_depth_cm {
            errors.push(format!(
                "max_pit_depth_cm ({}) must be >= min_pit_depth_cm ({})",
                self.max_pit_depth_cm, self.min_pit_depth_cm
            ));
        }
        if !(self.min_pit_depth_cm..=self.max_pit_depth_cm).contains(&self.default_pit_depth_cm) {
            errors.push(format!(
                "default_pit_depth_cm ({}) must be within [{}, {}]",
                self.default_pit_depth_cm, self.min_pit_depth_cm, self.max_pit_depth_cm
            ));
        }
        if self.unknown_total_depth_cm < 0.0 {
            errors.push(format!(
                "unknown_total_depth_cm must be >= 0, got {}",
                self.unknown_total_depth_cm
            ));
        }
        if !(self.max_total_depth_cm >= self.max_pit_depth_cm) {
            errors.push(format!(
                "max_total_depth_cm ({}) must be >= max_pit_depth_cm ({})",
                self.max_total_depth_cm, self.max_pit_depth_cm
            ));
        }

        if !(1..=MAX_INITIAL_LAYERS).contains(&self.initial_layer_count) {
            errors.push(format!(
                "initial_layer_count must be within [1, {MAX_INITIAL_LAYERS}], got {}",
                self.initial_layer_count
            ));
        }
        let deepest_initial =
            self.initial_layer_spacing_cm * self.initial_layer_count.saturating_sub(1) as f64;
        if !(self.initial_layer_spacing_cm.is_finite() && self.initial_layer_spacing_cm >= 0.0)
            || deepest_initial >= self.default_pit_depth_cm
        {
            errors.push(format!(
                "initial layers ({} x {} cm) must fit above default_pit_depth_cm ({})",
                self.initial_layer_count, self.initial_layer_spacing_cm, self.default_pit_depth_cm
            ));
        }

        // Handles must stay at least a pixel apart when the pit is deepest.
        let min_px_per_cm = graph.height / self.max_pit_depth_cm;
        if self.insertion_increment_cm * min_px_per_cm < 1.0 {
            errors.push(format!(
                "insertion_increment_cm ({}) is below one pixel at max_pit_depth_cm ({})",
                self.insertion_increment_cm, self.max_pit_depth_cm
            ));
        }

        if self.blink_period_ms == 0 {
            errors.push("blink_period_ms must be > 0".into());
        }

        errors
    }
}

/// Errors from loading or validating a [`ProfileConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let errors = ProfileConfig::default().validate();
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn inverted_pit_range_is_rejected() {
        let config = ProfileConfig {
            min_pit_depth_cm: 300.0,
            max_pit_depth_cm: 100.0,
            ..ProfileConfig::default()
        };
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("max_pit_depth_cm")));
    }

    #[test]
    fn initial_layers_must_fit_in_pit() {
        let config = ProfileConfig {
            initial_layer_count: 20,
            initial_layer_spacing_cm: 20.0,
            ..ProfileConfig::default()
        };
        assert!(
            config
                .validate()
                .iter()
                .any(|e| e.contains("initial layers"))
        );
    }

    #[test]
    fn non_finite_spacing_and_huge_counts_are_rejected() {
        let nan_spacing = ProfileConfig {
            initial_layer_spacing_cm: f64::NAN,
            ..ProfileConfig::default()
        };
        assert!(!nan_spacing.validate().is_empty());

        let too_many = ProfileConfig {
            initial_layer_count: MAX_INITIAL_LAYERS + 1,
            initial_layer_spacing_cm: 0.0,
            ..ProfileConfig::default()
        };
        assert!(
            too_many
                .validate()
                .iter()
                .any(|e| e.contains("initial_layer_count"))
        );
    }

    #[test]
    fn sub_pixel_increment_is_rejected() {
        let config = ProfileConfig {
            insertion_increment_cm: 0.1,
            ..ProfileConfig::default()
        };
        assert!(matches!(config.validated(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn zero_blink_period_is_rejected() {
        let config = ProfileConfig {
            blink_period_ms: 0,
            ..ProfileConfig::default()
        };
        let err = config.validated().expect_err("invalid");
        assert!(err.to_string().contains("blink_period_ms"));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ProfileConfig =
            serde_json::from_str(r#"{"max_pit_depth_cm": 300.0}"#).expect("parse");
        assert_eq!(config.max_pit_depth_cm, 300.0);
        assert_eq!(config.handle_size, ProfileConfig::default().handle_size);
    }
}
