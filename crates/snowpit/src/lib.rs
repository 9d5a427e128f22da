#![forbid(unsafe_code)]

//! SnowPit public facade crate.
//!
//! Re-exports the types most hosts need from the internal crates and offers
//! a prelude for day-to-day use.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use snowpit_core::caaml::{GrainShape, WaterContent};
pub use snowpit_core::{
    ConfigError, CoordinateTransform, GraphGeometry, HandHardness, Hardness, Point, ProfileConfig,
};

// --- Layout re-exports -----------------------------------------------------

pub use snowpit_layout::{
    ChangeSet, DepthReference, InvariantError, Layer, LayerFeatures, LayerId, LayerSummary,
    Profile, ProfileError, ValidationError,
};

// --- Web re-exports --------------------------------------------------------

#[cfg(feature = "web")]
pub use snowpit_web::{
    Alert, DrawCommand, FeatureForm, FormOutcome, PointerButton, ProfileEditor, RenderSink,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for SnowPit hosts.
#[derive(Debug)]
pub enum Error {
    /// The editor configuration was rejected.
    Config(ConfigError),
    /// A profile edit failed.
    Profile(ProfileError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Profile(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Profile(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<ProfileError> for Error {
    fn from(err: ProfileError) -> Self {
        Self::Profile(err)
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Self::Profile(err.into())
    }
}

impl From<InvariantError> for Error {
    fn from(err: InvariantError) -> Self {
        Self::Profile(err.into())
    }
}

/// Standard result type for SnowPit APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Load a configuration file (TOML, or JSON by `.json` extension) and build
/// a profile from it.
#[cfg(feature = "config")]
pub fn profile_from_file(path: impl AsRef<std::path::Path>) -> Result<Profile> {
    let path = path.as_ref();
    let config = if path.extension().is_some_and(|ext| ext == "json") {
        ProfileConfig::from_json_file(path)?
    } else {
        ProfileConfig::from_toml_file(path)?
    };
    Ok(Profile::new(config)?)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        DepthReference, Error, HandHardness, Hardness, LayerFeatures, LayerId, Point, Profile,
        ProfileConfig, Result,
    };

    #[cfg(feature = "web")]
    pub use crate::{DrawCommand, FormOutcome, PointerButton, ProfileEditor, RenderSink};

    pub use crate::{core, layout};

    #[cfg(feature = "web")]
    pub use crate::web;
}

pub use snowpit_core as core;
pub use snowpit_layout as layout;
#[cfg(feature = "web")]
pub use snowpit_web as web;
