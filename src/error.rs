// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use hapnav_config::ConfigError;
use hapnav_maze::MazeError;
use hapnav_sensorimotor::HapticError;
use hapnav_session::SessionError;
use hapnav_structures::NavDataError;

pub type NavResult<T> = Result<T, NavigationError>;

/// Errors surfaced by the navigation loop.
#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Maze error: {0}")]
    Maze(#[from] MazeError),

    #[error("Haptic error: {0}")]
    Haptic(#[from] HapticError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Invalid parameters: {0}")]
    Data(#[from] NavDataError),
}
