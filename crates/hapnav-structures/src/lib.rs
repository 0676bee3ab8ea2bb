// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The core crate for hapnav. Defines the data structures shared by maze
//! generation, sensing, haptic encoding and session logging.

pub mod collision;
pub mod common_macros;
mod error;
mod nav_signal;
pub mod spatial;

pub use collision::{CollisionQuery, EmptyScene, ObstacleLayer, RayHit};
pub use error::NavDataError;
pub use nav_signal::{NavSignal, NavSignalIndex};
pub use spatial::{Pose, Vec3};

pub use nalgebra;
