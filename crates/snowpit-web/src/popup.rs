#![forbid(unsafe_code)]

//! Seam for the layer feature form.
//!
//! The form itself (grain shape pickers, size selects, comment box) is host
//! UI. The editor only opens it and applies its outcome.

use snowpit_layout::{LayerFeatures, LayerId};

/// How the user closed the form.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "outcome", content = "features", rename_all = "snake_case"))]
pub enum FormOutcome {
    Save(LayerFeatures),
    Cancel,
    /// The form's delete button.
    Delete,
}

/// Host form that edits one layer's features.
pub trait FeatureForm {
    /// Show the form for `layer`, prefilled with `features`. The host reports
    /// the result later through `ProfileEditor::form_closed`.
    fn open(&mut self, layer: LayerId, features: &LayerFeatures);
}

/// Form stub that records what was opened.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingForm {
    pub opened: Vec<(LayerId, LayerFeatures)>,
}

impl FeatureForm for RecordingForm {
    fn open(&mut self, layer: LayerId, features: &LayerFeatures) {
        self.opened.push((layer, features.clone()));
    }
}
