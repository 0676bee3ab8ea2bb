// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Three tiers, later ones winning:
//! 1. TOML file (base values, missing keys take defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::{validate_config, ConfigError, ConfigResult, HapnavConfig};

pub const CONFIG_FILE_NAME: &str = "hapnav_configuration.toml";
pub const CONFIG_PATH_ENV: &str = "HAPNAV_CONFIG_PATH";

/// Find the hapnav configuration file
///
/// Search order:
/// 1. `HAPNAV_CONFIG_PATH` environment variable
/// 2. Current working directory
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by {} not found: {}",
            CONFIG_PATH_ENV,
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd.as_path();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent;
                }
                None => break,
            }
        }
    }

    if let Some(path) = search_paths.iter().find(|p| p.exists()) {
        return Ok(path.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");
    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet {} to specify a custom location.",
        CONFIG_FILE_NAME, search_list, CONFIG_PATH_ENV
    )))
}

/// Load configuration from a TOML file, apply overrides and validate.
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if the file is not found, contains invalid TOML, or the
/// result fails validation
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<HapnavConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };
    let content = fs::read_to_string(&config_file)?;
    let mut config: HapnavConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli)?;
    }

    validate_config(&config)?;
    Ok(config)
}

/// Like [`load_config`], falling back to defaults when no file exists.
pub fn load_config_or_default(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<HapnavConfig> {
    match load_config(config_path, cli_args) {
        Err(ConfigError::FileNotFound(_)) if config_path.is_none() => {
            let mut config = HapnavConfig::default();
            apply_environment_overrides(&mut config);
            if let Some(cli) = cli_args {
                apply_cli_overrides(&mut config, cli)?;
            }
            validate_config(&config)?;
            Ok(config)
        }
        other => other,
    }
}

fn env_parsed<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Apply environment variable overrides to configuration
///
/// Unparseable values are ignored. Supported variables:
/// `HAPNAV_NUM_PROBES`, `HAPNAV_NUM_SUB_RAYS`, `HAPNAV_SENSOR_DISTANCE`,
/// `HAPNAV_MAX_SENSOR_DISTANCE`, `HAPNAV_MAX_HAPTIC_INTENSITY`,
/// `HAPNAV_SENSOR_POLL_INTERVAL_MS`, `HAPNAV_MAP_WIDTH`, `HAPNAV_MAP_HEIGHT`,
/// `HAPNAV_CELL_SIZE`, `HAPNAV_MIN_PATH_AREA_RATIO`, `HAPNAV_SEED`,
/// `HAPNAV_BAUD_RATE`, `HAPNAV_LOG_LEVEL`, `HAPNAV_SESSION_DIR`.
pub fn apply_environment_overrides(config: &mut HapnavConfig) {
    if let Some(v) = env_parsed("HAPNAV_NUM_PROBES") {
        config.drone.num_probes = v;
    }
    if let Some(v) = env_parsed("HAPNAV_NUM_SUB_RAYS") {
        config.drone.num_sub_rays = v;
    }
    if let Some(v) = env_parsed("HAPNAV_SENSOR_DISTANCE") {
        config.drone.sensor_distance = v;
    }
    if let Some(v) = env_parsed("HAPNAV_SENSOR_POLL_INTERVAL_MS") {
        config.drone.sensor_poll_interval_ms = v;
    }
    if let Some(v) = env_parsed("HAPNAV_MAX_SENSOR_DISTANCE") {
        config.haptic.max_sensor_distance = v;
    }
    if let Some(v) = env_parsed("HAPNAV_MAX_HAPTIC_INTENSITY") {
        config.haptic.max_haptic_intensity = v;
    }
    if let Some(v) = env_parsed("HAPNAV_MAP_WIDTH") {
        config.map.map_width = v;
    }
    if let Some(v) = env_parsed("HAPNAV_MAP_HEIGHT") {
        config.map.map_height = v;
    }
    if let Some(v) = env_parsed("HAPNAV_CELL_SIZE") {
        config.map.cell_size = v;
    }
    if let Some(v) = env_parsed("HAPNAV_MIN_PATH_AREA_RATIO") {
        config.map.min_path_area_ratio = v;
    }
    if let Some(v) = env_parsed("HAPNAV_SEED") {
        config.map.seed = Some(v);
    }
    if let Some(v) = env_parsed("HAPNAV_BAUD_RATE") {
        config.serial.baud_rate = v;
    }
    if let Ok(value) = env::var("HAPNAV_LOG_LEVEL") {
        config.logging.log_level = value;
    }
    if let Ok(value) = env::var("HAPNAV_SESSION_DIR") {
        config.logging.session_dir = PathBuf::from(value);
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn cli_value<T: FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| {
        ConfigError::InvalidValue(format!("--{} cannot be '{}'", key, value))
    })
}

/// Apply CLI argument overrides to configuration
///
/// Keys are field names without their section, e.g.
/// `{"map_width": "15", "seed": "7"}`.
///
/// # Errors
///
/// `ConfigError::InvalidValue` for a value that does not parse or an
/// unknown key.
pub fn apply_cli_overrides(
    config: &mut HapnavConfig,
    cli_args: &HashMap<String, String>,
) -> ConfigResult<()> {
    for (key, value) in cli_args {
        match key.as_str() {
            "size" => config.drone.size = cli_value(key, value)?,
            "num_probes" => config.drone.num_probes = cli_value(key, value)?,
            "sensor_distance" => config.drone.sensor_distance = cli_value(key, value)?,
            "num_sub_rays" => config.drone.num_sub_rays = cli_value(key, value)?,
            "speed_gain" => config.drone.speed_gain = cli_value(key, value)?,
            "angular_speed_gain" => config.drone.angular_speed_gain = cli_value(key, value)?,
            "thumbstick_deadzone" => config.drone.thumbstick_deadzone = cli_value(key, value)?,
            "sensor_poll_interval_ms" => {
                config.drone.sensor_poll_interval_ms = cli_value(key, value)?
            }
            "max_sensor_distance" => config.haptic.max_sensor_distance = cli_value(key, value)?,
            "max_haptic_intensity" => config.haptic.max_haptic_intensity = cli_value(key, value)?,
            "num_actuators" => config.haptic.num_actuators = cli_value(key, value)?,
            "queue_capacity" => config.haptic.queue_capacity = cli_value(key, value)?,
            "map_width" => config.map.map_width = cli_value(key, value)?,
            "map_height" => config.map.map_height = cli_value(key, value)?,
            "cell_size" => config.map.cell_size = cli_value(key, value)?,
            "min_path_area_ratio" => config.map.min_path_area_ratio = cli_value(key, value)?,
            "max_generation_attempts" => {
                config.map.max_generation_attempts = cli_value(key, value)?
            }
            "seed" => config.map.seed = Some(cli_value(key, value)?),
            "single_path" => {
                config.map.single_path = parse_flag(value).ok_or_else(|| {
                    ConfigError::InvalidValue(format!("--{} cannot be '{}'", key, value))
                })?
            }
            "baud_rate" => config.serial.baud_rate = cli_value(key, value)?,
            "serial_poll_interval_ms" => config.serial.poll_interval_ms = cli_value(key, value)?,
            "serial_debug" => {
                config.serial.debug = parse_flag(value).ok_or_else(|| {
                    ConfigError::InvalidValue(format!("--{} cannot be '{}'", key, value))
                })?
            }
            "log_level" => config.logging.log_level = value.clone(),
            "session_dir" => config.logging.session_dir = PathBuf::from(value),
            other => {
                return Err(ConfigError::InvalidValue(format!(
                    "Unknown configuration key '{}'",
                    other
                )))
            }
        }
    }
    Ok(())
}
