// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Session logging for hapnav: a boolean-gated recorder of per-tick
//! [`LogEntry`] samples, their NDJSON form, and the offline analyzer.

pub mod analyzer;
mod codec;
mod entry;
mod error;
mod recorder;

pub use analyzer::{
    collision_duration, completion_time, heading_velocity_angle, move_distance, num_collisions,
    velocity_stats, AngleStats, SessionSummary, VelocityStats,
};
pub use codec::{parse_session, read_session_file, to_ndjson};
pub use entry::{ContactFlags, LogEntry};
pub use error::{SessionError, SessionResult};
pub use recorder::{now_ms, FinishedSession, SessionRecorder};
