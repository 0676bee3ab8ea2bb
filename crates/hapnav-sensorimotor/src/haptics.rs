// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Distance to intensity encoding and the sensor to actuator permutation.

use hapnav_structures::{define_nonzero_count, NavDataError};

use crate::packet::HapticPacket;
use crate::sensor::{SensorId, SensorReading};

define_nonzero_count!(ActuatorCount, u16, "Number of actuators on the wearable (must be > 0)");

/// Largest actuator ring a one-byte actuator id can address
pub const MAX_ACTUATORS: u16 = 256;

/// `round(max_intensity * (max_distance - distance) / max_distance)`, clamped
/// to `[0, max_intensity]`.
///
/// Anything at or beyond `max_distance` (including no hit) is 0, anything at
/// or below zero distance is `max_intensity`. A non-positive `max_distance`
/// or a NaN distance yields 0.
pub fn distance_to_intensity(distance: f64, max_distance: f64, max_intensity: u8) -> u8 {
    if !(max_distance > 0.0) || distance.is_nan() {
        return 0;
    }
    if distance <= 0.0 {
        return max_intensity;
    }
    if distance >= max_distance {
        return 0;
    }
    let max = f64::from(max_intensity);
    let scaled = (max * (max_distance - distance) / max_distance).round();
    scaled.clamp(0.0, max) as u8
}

/// `((n - id) + 1) mod n` with `id` first reduced modulo `n`.
///
/// Corrects for the actuator ring being mounted mirrored and rotated against
/// the sensor ring. A bijection on `[0, n)`.
pub fn sensor_id_to_actuator_id(sensor_id: SensorId, num_actuators: ActuatorCount) -> u32 {
    let n = u32::from(*num_actuators);
    let id = *sensor_id % n;
    (n - id + 1) % n
}

/// Turns sensor readings into haptic packets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HapticEncoder {
    max_distance: f64,
    max_intensity: u8,
    num_actuators: ActuatorCount,
}

impl HapticEncoder {
    pub fn new(max_distance: f64, max_intensity: u8, num_actuators: ActuatorCount) -> Result<Self, NavDataError> {
        if !(max_distance > 0.0) || !max_distance.is_finite() {
            return Err(NavDataError::BadParameters(format!(
                "Max sensor distance must be positive and finite, got {}",
                max_distance
            )));
        }
        if *num_actuators > MAX_ACTUATORS {
            return Err(NavDataError::BadParameters(format!(
                "{} actuators cannot be addressed with one-byte ids",
                num_actuators
            )));
        }
        Ok(Self {
            max_distance,
            max_intensity,
            num_actuators,
        })
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    pub fn max_intensity(&self) -> u8 {
        self.max_intensity
    }

    pub fn num_actuators(&self) -> ActuatorCount {
        self.num_actuators
    }

    pub fn intensity(&self, distance: f64) -> u8 {
        distance_to_intensity(distance, self.max_distance, self.max_intensity)
    }

    pub fn actuator_for(&self, sensor_id: SensorId) -> u8 {
        // Below MAX_ACTUATORS, so always fits
        u8::try_from(sensor_id_to_actuator_id(sensor_id, self.num_actuators)).unwrap_or(u8::MAX)
    }

    pub fn encode(&self, reading: &SensorReading) -> HapticPacket {
        HapticPacket::new(self.actuator_for(reading.sensor_id), self.intensity(reading.hit_distance))
    }
}
