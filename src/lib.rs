// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # hapnav - Haptic Maze Navigation
//!
//! hapnav generates procedural mazes, senses them with a ring of cone
//! proximity sensors around a drone, turns distances into vibration
//! intensities for a wearable haptic array, and records navigation sessions
//! for offline analysis.
//!
//! ## Components
//!
//! - **`structures`**: poses, the collision-query seam, typed indices
//! - **`maze`**: maze generation, JSON/CSV interchange, grid collision world
//! - **`sensorimotor`**: sensor ring, haptic encoding, packet queue, transports
//! - **`session`**: session recording, NDJSON logs, statistics
//! - **`config`**: TOML configuration with environment and CLI overrides
//! - **`observability`**: logging initialisation and per-crate debug flags
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hapnav::prelude::*;
//!
//! let config = HapnavConfig::default();
//! let mut nav = NavigationLoop::new(config, Vec::<u8>::new())?;
//!
//! nav.start_logging(0);
//! let forward = StickInput { x: 0.0, y: -1.0, yaw: 0.0 };
//! for tick in 1..=60 {
//!     nav.tick(tick * 16, &forward, 0.016)?;
//! }
//! let session = nav.stop_logging()?.expect("logging was enabled");
//! let entries = parse_session(&session.ndjson)?;
//! println!("{:?}", SessionSummary::from_entries(&entries));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod navigation;

pub use error::{NavResult, NavigationError};
pub use navigation::{GenerationReport, NavigationLoop, PipelineStats, TickReport};

pub use hapnav_config as config;
pub use hapnav_maze as maze;
pub use hapnav_observability as observability;
pub use hapnav_sensorimotor as sensorimotor;
pub use hapnav_session as session;
pub use hapnav_structures as structures;

/// Common imports for driving a navigation loop
pub mod prelude {
    pub use crate::navigation::{GenerationReport, NavigationLoop, PipelineStats, TickReport};
    pub use crate::{NavResult, NavigationError};

    pub use crate::config::HapnavConfig;
    pub use crate::maze::{CellValue, GridWorld, MapDefinition, MazeGenerator, PhysicalGrid};
    pub use crate::sensorimotor::{
        HapticEncoder, HapticPacket, HapticTransport, LoggingTransport, SensorReading, SensorRing,
        StickInput, WriterTransport,
    };
    pub use crate::session::{parse_session, LogEntry, SessionRecorder, SessionSummary};
    pub use crate::structures::{CollisionQuery, ObstacleLayer, Pose, Vec3};
}
