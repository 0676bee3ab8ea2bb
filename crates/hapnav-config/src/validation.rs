// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Checks that values are in range and consistent with each other. All
//! problems are collected and reported together.

use crate::{ConfigError, ConfigResult, HapnavConfig};

/// Smallest maze side the generator supports
pub const MIN_MAP_DIMENSION: usize = 5;

/// Largest actuator ring addressable with one-byte ids
pub const MAX_ACTUATORS: u16 = 256;

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    OutOfRange { field: String, value: String, expected: String },
    Inconsistent { reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange {
                field,
                value,
                expected,
            } => write!(f, "{} = {} is out of range (expected {})", field, value, expected),
            Self::Inconsistent { reason } => write!(f, "Inconsistent configuration: {}", reason),
        }
    }
}

fn out_of_range(field: &str, value: impl ToString, expected: &str) -> ConfigValidationError {
    ConfigValidationError::OutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &HapnavConfig) -> ConfigResult<()> {
    let errors = collect_validation_errors(config);
    if errors.is_empty() {
        return Ok(());
    }
    let error_messages = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");
    Err(ConfigError::ValidationError(format!(
        "Configuration validation failed:\n{}",
        error_messages
    )))
}

/// Every validation problem, in section order
pub fn collect_validation_errors(config: &HapnavConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();
    validate_drone(config, &mut errors);
    validate_haptic(config, &mut errors);
    validate_map(config, &mut errors);
    validate_serial(config, &mut errors);
    errors
}

fn validate_drone(config: &HapnavConfig, errors: &mut Vec<ConfigValidationError>) {
    let drone = &config.drone;
    if drone.num_probes < 1 {
        errors.push(out_of_range("drone.num_probes", drone.num_probes, ">= 1"));
    }
    if drone.num_sub_rays < 1 {
        errors.push(out_of_range("drone.num_sub_rays", drone.num_sub_rays, ">= 1"));
    }
    if !(drone.sensor_distance > 0.0 && drone.sensor_distance.is_finite()) {
        errors.push(out_of_range("drone.sensor_distance", drone.sensor_distance, "> 0"));
    }
    if !(drone.size >= 0.0 && drone.size.is_finite()) {
        errors.push(out_of_range("drone.size", drone.size, ">= 0"));
    }
    if !(0.0..1.0).contains(&drone.thumbstick_deadzone) {
        errors.push(out_of_range(
            "drone.thumbstick_deadzone",
            drone.thumbstick_deadzone,
            "[0, 1)",
        ));
    }
    if drone.sensor_poll_interval_ms < 1 {
        errors.push(out_of_range(
            "drone.sensor_poll_interval_ms",
            drone.sensor_poll_interval_ms,
            ">= 1",
        ));
    }
}

fn validate_haptic(config: &HapnavConfig, errors: &mut Vec<ConfigValidationError>) {
    let haptic = &config.haptic;
    if !(haptic.max_sensor_distance > 0.0 && haptic.max_sensor_distance.is_finite()) {
        errors.push(out_of_range(
            "haptic.max_sensor_distance",
            haptic.max_sensor_distance,
            "> 0",
        ));
    }
    if haptic.max_haptic_intensity < 1 {
        errors.push(out_of_range(
            "haptic.max_haptic_intensity",
            haptic.max_haptic_intensity,
            ">= 1",
        ));
    }
    if haptic.num_actuators < 1 || haptic.num_actuators > MAX_ACTUATORS {
        errors.push(out_of_range(
            "haptic.num_actuators",
            haptic.num_actuators,
            "1..=256",
        ));
    }
    if u32::from(haptic.num_actuators) < config.drone.num_probes {
        errors.push(ConfigValidationError::Inconsistent {
            reason: format!(
                "{} probes cannot map onto {} actuators",
                config.drone.num_probes, haptic.num_actuators
            ),
        });
    }
    if haptic.queue_capacity < 1 {
        errors.push(out_of_range(
            "haptic.queue_capacity",
            haptic.queue_capacity,
            ">= 1",
        ));
    }
}

fn validate_map(config: &HapnavConfig, errors: &mut Vec<ConfigValidationError>) {
    let map = &config.map;
    if map.map_width < MIN_MAP_DIMENSION {
        errors.push(out_of_range("map.map_width", map.map_width, ">= 5"));
    }
    if map.map_height < MIN_MAP_DIMENSION {
        errors.push(out_of_range("map.map_height", map.map_height, ">= 5"));
    }
    if !(map.cell_size > 0.0 && map.cell_size.is_finite()) {
        errors.push(out_of_range("map.cell_size", map.cell_size, "> 0"));
    }
    if !(0.0..=1.0).contains(&map.min_path_area_ratio) {
        errors.push(out_of_range(
            "map.min_path_area_ratio",
            map.min_path_area_ratio,
            "[0, 1]",
        ));
    }
    if map.max_generation_attempts < 1 {
        errors.push(out_of_range(
            "map.max_generation_attempts",
            map.max_generation_attempts,
            ">= 1",
        ));
    }
}

fn validate_serial(config: &HapnavConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.serial.baud_rate == 0 {
        errors.push(out_of_range("serial.baud_rate", config.serial.baud_rate, "> 0"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&HapnavConfig::default()).is_ok());
    }

    #[test]
    fn test_all_problems_are_reported() {
        let mut config = HapnavConfig::default();
        config.drone.num_probes = 0;
        config.map.map_width = 3;
        config.map.min_path_area_ratio = 1.5;
        config.haptic.max_sensor_distance = 0.0;

        let errors = collect_validation_errors(&config);
        assert_eq!(errors.len(), 4);

        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("drone.num_probes"));
        assert!(message.contains("map.map_width"));
        assert!(message.contains("map.min_path_area_ratio"));
        assert!(message.contains("haptic.max_sensor_distance"));
    }

    #[test]
    fn test_more_probes_than_actuators() {
        let mut config = HapnavConfig::default();
        config.drone.num_probes = 12;
        let errors = collect_validation_errors(&config);
        assert!(matches!(errors.as_slice(), [ConfigValidationError::Inconsistent { .. }]));
    }

    #[test]
    fn test_deadzone_range() {
        let mut config = HapnavConfig::default();
        config.drone.thumbstick_deadzone = 1.0;
        assert!(validate_config(&config).is_err());
        config.drone.thumbstick_deadzone = 0.0;
        assert!(validate_config(&config).is_ok());
    }
}
