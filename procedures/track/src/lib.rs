//! Procedural closed-loop race tracks.
//!
//! A random point cloud is ordered into a loop, joined with a piecewise curve and swept into a
//! two-rail ribbon whose height follows a Perlin field.

pub mod config;
pub mod curve;
pub mod error;
pub mod noise;
pub mod points;
pub mod ribbon;
pub mod track;
pub mod transition;

pub use crate::config::TrackConfig;
pub use crate::curve::{ClosedLoop, CurveFamily};
pub use crate::error::TrackError;
pub use crate::noise::{NoiseConfig, NoiseField};
pub use crate::points::{generate, PointGenerator, SeedPolicy, WaypointLoop};
pub use crate::ribbon::{RibbonBuilder, RibbonMesh};
pub use crate::track::{refresh, PublishedTrack, Track, TrackSnapshot};
pub use crate::transition::{FamilyTransition, TransitionKind};
