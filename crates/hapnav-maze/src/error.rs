// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use hapnav_structures::NavDataError;

use crate::logical::LogicalCoord;

/// Result type for maze operations
pub type MazeResult<T> = Result<T, MazeError>;

/// Errors raised while generating, importing or exporting maze grids
#[derive(Debug, thiserror::Error)]
pub enum MazeError {
    /// Two nodes that are not grid neighbours were joined by an edge.
    /// Neighbour selection never produces this; seeing it means a bug.
    #[error("Invalid edge between non-adjacent nodes {from} and {to}")]
    InvalidEdge { from: LogicalCoord, to: LogicalCoord },

    #[error("Bad grid dimensions: {width}x{height}")]
    BadDimensions { width: usize, height: usize },

    #[error("CSV parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Grid interchange JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Data(#[from] NavDataError),
}

impl MazeError {
    /// True for errors that indicate a logic defect rather than bad input
    pub fn is_internal(&self) -> bool {
        matches!(self, MazeError::InvalidEdge { .. })
    }
}
