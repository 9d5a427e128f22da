#![forbid(unsafe_code)]

//! Core: geometry, hardness scale, coordinate transforms, and configuration.
//!
//! # Role in SnowPit
//! `snowpit-core` holds everything the layer engine needs that does not know
//! about layers: pixel geometry, the CAAML hand hardness scale and code
//! tables, the depth/hardness coordinate transform, the session
//! configuration, and host-clocked animation.
//!
//! # How it fits in the system
//! `snowpit-layout` builds the layer collection and the handle constraint
//! engine on top of [`transform::CoordinateTransform`]. `snowpit-web` turns
//! the resulting geometry into draw commands for a browser host.

pub mod animation;
pub mod caaml;
pub mod config;
pub mod geometry;
pub mod hardness;
pub mod logging;
pub mod transform;

pub use config::{ConfigError, ProfileConfig};
pub use geometry::{GraphGeometry, Line, Point, Rect};
pub use hardness::{HandHardness, Hardness, HardnessBand, HardnessScale};
pub use transform::CoordinateTransform;
