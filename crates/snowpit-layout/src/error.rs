#![forbid(unsafe_code)]

//! Error taxonomy for profile operations.
//!
//! - [`ValidationError`]: bad user input. The operation is rejected before
//!   any mutation and the host shows the message to the user.
//! - [`InvariantError`]: a collaborator referred to state that does not
//!   exist. Logged at error level; the operation aborts.
//!
//! Clamping a dragged handle is not an error and never produces either.

use std::fmt;

use crate::layer::LayerId;

/// User input rejected without mutating anything.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    PitDepthOutOfRange {
        requested: f64,
        min: f64,
        max: f64,
    },
    PitDepthAboveTotal {
        requested: f64,
        total: f64,
    },
    TotalDepthOutOfRange {
        requested: f64,
        max: f64,
    },
    TotalDepthBelowPit {
        requested: f64,
        pit_depth: f64,
    },
    GroundReferenceWithoutTotal,
    NoRoomToInsert {
        index: usize,
        pit_depth: f64,
    },
    LastLayer,
    InvalidFeatures {
        reason: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PitDepthOutOfRange {
                requested,
                min,
                max,
            } => write!(
                f,
                "pit depth {requested} cm is out of range; enter a depth between {min} and {max} cm"
            ),
            Self::PitDepthAboveTotal { requested, total } => write!(
                f,
                "pit depth {requested} cm cannot exceed the total snow depth of {total} cm"
            ),
            Self::TotalDepthOutOfRange { requested, max } => write!(
                f,
                "total snow depth {requested} cm is out of range; enter a depth between 0 and {max} cm"
            ),
            Self::TotalDepthBelowPit {
                requested,
                pit_depth,
            } => write!(
                f,
                "total snow depth {requested} cm cannot be less than the pit depth of {pit_depth} cm"
            ),
            Self::GroundReferenceWithoutTotal => write!(
                f,
                "depth can only be measured from the ground once the total snow depth is known"
            ),
            Self::NoRoomToInsert { index, pit_depth } => write!(
                f,
                "no room to insert a layer next to layer {}; layers cannot reach the pit depth of {pit_depth} cm",
                index + 1
            ),
            Self::LastLayer => write!(f, "the last remaining layer cannot be deleted"),
            Self::InvalidFeatures { reason } => write!(f, "invalid layer description: {reason}"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Programming error: state referenced by a caller does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantError {
    LayerNotFound { id: LayerId },
    IndexOutOfRange { index: usize, len: usize },
    EmptyCollection,
    DepthsOutOfOrder { index: usize },
    ZeroLayerId,
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LayerNotFound { id } => write!(f, "layer {} is not in the collection", id.get()),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "layer index {index} out of range (len {len})")
            }
            Self::EmptyCollection => write!(f, "layer collection cannot be empty"),
            Self::DepthsOutOfOrder { index } => {
                write!(f, "layer depths decrease at index {index}")
            }
            Self::ZeroLayerId => write!(f, "layer id 0 is reserved"),
        }
    }
}

impl std::error::Error for InvariantError {}

/// Any failure of a profile operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileError {
    Validation(ValidationError),
    Invariant(InvariantError),
}

impl ProfileError {
    /// User-facing validation failure, if this is one.
    #[must_use]
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Invariant(_) => None,
        }
    }
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Invariant(err) => write!(f, "internal error: {err}"),
        }
    }
}

impl std::error::Error for ProfileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Invariant(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ProfileError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<InvariantError> for ProfileError {
    fn from(err: InvariantError) -> Self {
        Self::Invariant(err)
    }
}
