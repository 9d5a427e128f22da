#![forbid(unsafe_code)]

//! Layer engine: ordered layers, handle constraints, and depth policy.

pub mod boundaries;
pub mod collection;
pub mod error;
pub mod features;
pub mod grid;
pub mod handle;
pub mod layer;
pub mod profile;
pub mod push_down;

pub use boundaries::{DepthReference, ProfileBoundaries};
pub use collection::{DeleteError, LayerChange, LayerCollection};
pub use error::{InvariantError, ProfileError, ValidationError};
pub use features::LayerFeatures;
pub use grid::{DepthTick, Grid, HardnessTick, build_grid};
pub use handle::{
    HANDLE_GAP_PX, HandleBounds, HandleDragEffect, HandleDragMachine, HandleDragNoopReason,
    HandleDragState, HandleDragTransition,
};
pub use layer::{Layer, LayerGeometry, LayerId, LayerLayout};
pub use profile::{ChangeSet, LayerSummary, Profile};
pub use push_down::{PushDownPlan, plan_push_down};
