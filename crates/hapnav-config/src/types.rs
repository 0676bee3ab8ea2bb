// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Each struct maps to a section of `hapnav_configuration.toml`. Every field
//! has a default, so a partial (or empty) file is valid.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HapnavConfig {
    pub drone: DroneConfig,
    pub haptic: HapticConfig,
    pub map: MapConfig,
    pub serial: SerialConfig,
    pub logging: LoggingConfig,
}

/// Drone body, sensor ring and stick response
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DroneConfig {
    /// Collision radius in world units
    pub size: f64,
    pub num_probes: u32,
    /// Distance of each probe from the drone centre
    pub sensor_distance: f64,
    pub num_sub_rays: u32,
    pub speed_gain: f64,
    pub angular_speed_gain: f64,
    pub thumbstick_deadzone: f64,
    pub sensor_poll_interval_ms: u64,
}

impl Default for DroneConfig {
    fn default() -> Self {
        Self {
            size: 0.1,
            num_probes: 8,
            sensor_distance: 0.3,
            num_sub_rays: 5,
            speed_gain: 0.3,
            angular_speed_gain: 0.5,
            thumbstick_deadzone: 0.15,
            sensor_poll_interval_ms: 100,
        }
    }
}

/// Haptic encoding and the outbound packet queue
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HapticConfig {
    pub max_sensor_distance: f64,
    pub max_haptic_intensity: u8,
    pub num_actuators: u16,
    pub queue_capacity: usize,
}

impl Default for HapticConfig {
    fn default() -> Self {
        Self {
            max_sensor_distance: 0.5,
            max_haptic_intensity: 50,
            num_actuators: 8,
            queue_capacity: 256,
        }
    }
}

/// Maze generation and world placement
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MapConfig {
    pub map_width: usize,
    pub map_height: usize,
    pub cell_size: f64,
    pub single_path: bool,
    pub min_path_area_ratio: f64,
    pub max_generation_attempts: u32,
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            map_width: 11,
            map_height: 11,
            cell_size: 0.2,
            single_path: true,
            min_path_area_ratio: 0.2,
            max_generation_attempts: 1000,
            seed: None,
        }
    }
}

/// Link to the wearable
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SerialConfig {
    pub baud_rate: u32,
    pub poll_interval_ms: u64,
    /// Log packets instead of sending them
    pub debug: bool,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            poll_interval_ms: 10,
            debug: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_level: String,
    pub session_dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            session_dir: PathBuf::from("./sessions"),
        }
    }
}
