// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! One tick of a navigation session.

use hapnav_structures::spatial::heading_from_euler;
use hapnav_structures::{Pose, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::SessionResult;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "LogRecord", into = "LogRecord")]
pub struct LogEntry {
    pub position: Vec3,
    /// XYZ Euler angles of the drone orientation
    pub orientation: Vec3,
    pub velocity: Vec3,
    pub angular_velocity_yaw: f64,
    pub cell_collide: bool,
    pub target_collide: bool,
    pub in_map: bool,
    pub timestamp_ms: i64,
}

/// Zone and contact flags sampled with a pose
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactFlags {
    pub cell_collide: bool,
    pub target_collide: bool,
    pub in_map: bool,
}

impl LogEntry {
    pub fn from_pose(
        pose: &Pose,
        velocity: Vec3,
        angular_velocity_yaw: f64,
        flags: ContactFlags,
        timestamp_ms: i64,
    ) -> Self {
        Self {
            position: pose.position,
            orientation: pose.euler_angles(),
            velocity,
            angular_velocity_yaw,
            cell_collide: flags.cell_collide,
            target_collide: flags.target_collide,
            in_map: flags.in_map,
            timestamp_ms,
        }
    }

    /// World forward vector rotated by the recorded orientation
    pub fn heading(&self) -> Vec3 {
        heading_from_euler(&self.orientation)
    }

    pub fn to_json_line(&self) -> SessionResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json_line(line: &str) -> SessionResult<Self> {
        Ok(serde_json::from_str(line)?)
    }
}

/// Flat on-disk layout of a log line
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogRecord {
    pos_x: f64,
    pos_y: f64,
    pos_z: f64,
    rot_x: f64,
    rot_y: f64,
    rot_z: f64,
    vel_x: f64,
    vel_y: f64,
    vel_z: f64,
    ang_vel: f64,
    is_collide: bool,
    found_target: bool,
    // Older logs predate the zone flag
    #[serde(default)]
    in_map: bool,
    time: i64,
}

impl From<LogRecord> for LogEntry {
    fn from(r: LogRecord) -> Self {
        Self {
            position: Vec3::new(r.pos_x, r.pos_y, r.pos_z),
            orientation: Vec3::new(r.rot_x, r.rot_y, r.rot_z),
            velocity: Vec3::new(r.vel_x, r.vel_y, r.vel_z),
            angular_velocity_yaw: r.ang_vel,
            cell_collide: r.is_collide,
            target_collide: r.found_target,
            in_map: r.in_map,
            timestamp_ms: r.time,
        }
    }
}

impl From<LogEntry> for LogRecord {
    fn from(e: LogEntry) -> Self {
        Self {
            pos_x: e.position.x,
            pos_y: e.position.y,
            pos_z: e.position.z,
            rot_x: e.orientation.x,
            rot_y: e.orientation.y,
            rot_z: e.orientation.z,
            vel_x: e.velocity.x,
            vel_y: e.velocity.y,
            vel_z: e.velocity.z,
            ang_vel: e.angular_velocity_yaw,
            is_collide: e.cell_collide,
            found_target: e.target_collide,
            in_map: e.in_map,
            time: e.timestamp_ms,
        }
    }
}
