// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Maze generation: logical walk, physical rendering, density retries.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::error::{MazeError, MazeResult};
use crate::grid::{CellValue, PhysicalGrid};
use crate::walk::{MazeWalk, WalkOutcome};

/// Logical grid size for a physical grid: `floor((dim - 2) / 2)` per axis.
///
/// Returns `(rows, cols)`.
pub fn logical_dimensions(width: usize, height: usize) -> (usize, usize) {
    (height.saturating_sub(2) / 2, width.saturating_sub(2) / 2)
}

/// Renders a finished walk into a `width x height` physical grid.
///
/// Every cell starts as Wall; each edge clears both rooms and the connector
/// between them, the target room becomes Target and the entrance is forced
/// to Path.
pub fn render(walk: &WalkOutcome, width: usize, height: usize) -> PhysicalGrid {
    let mut grid = PhysicalGrid::filled(width, height, CellValue::Wall);
    for edge in &walk.edges {
        let (from_row, from_col) = edge.from().physical();
        let (to_row, to_col) = edge.to().physical();
        let (wall_row, wall_col) = edge.connector();
        grid.set(from_row, from_col, CellValue::Path);
        grid.set(wall_row, wall_col, CellValue::Path);
        grid.set(to_row, to_col, CellValue::Path);
    }
    if let Some(target) = walk.target {
        let (row, col) = target.physical();
        grid.set(row, col, CellValue::Target);
    }
    let (row, col) = PhysicalGrid::ENTRANCE;
    grid.set(row, col, CellValue::Path);
    grid
}

/// A generated grid together with how it was obtained
#[derive(Debug, Clone)]
pub struct MazeOutcome {
    pub grid: PhysicalGrid,
    /// Number of complete generations run, including the returned one
    pub attempts: u32,
    pub path_area_ratio: f64,
    /// False when the density threshold could not be met within the attempt cap
    pub satisfied: bool,
}

/// Seedable maze generator with a bounded density-retry loop.
#[derive(Debug)]
pub struct MazeGenerator {
    rng: StdRng,
    max_attempts: u32,
}

impl MazeGenerator {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Same seed, same sequence of grids.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Caps the density-retry loop. Zero is treated as one attempt.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Generates a maze and returns only the grid.
    pub fn generate_grid(
        &mut self,
        width: usize,
        height: usize,
        single_path: bool,
        min_path_area_ratio: f64,
    ) -> MazeResult<PhysicalGrid> {
        Ok(self
            .generate(width, height, single_path, min_path_area_ratio)?
            .grid)
    }

    /// Generates a `width x height` maze.
    ///
    /// With `min_path_area_ratio > 0` whole generations are repeated until the
    /// passable-cell ratio reaches the threshold. If the attempt cap is hit
    /// first, the densest grid seen is returned with `satisfied == false`.
    ///
    /// # Errors
    ///
    /// `BadDimensions` for a zero-sized grid; `InvalidEdge` only on a logic
    /// defect in neighbour selection.
    pub fn generate(
        &mut self,
        width: usize,
        height: usize,
        single_path: bool,
        min_path_area_ratio: f64,
    ) -> MazeResult<MazeOutcome> {
        if width == 0 || height == 0 {
            return Err(MazeError::BadDimensions { width, height });
        }
        if width % 2 == 0 || height % 2 == 0 {
            debug!(width, height, "even maze dimensions, last row/column stays wall");
        }

        let (rows, cols) = logical_dimensions(width, height);
        if rows == 0 || cols == 0 {
            warn!(width, height, "logical grid is empty, returning an all-wall grid");
            return Ok(MazeOutcome {
                grid: PhysicalGrid::filled(width, height, CellValue::Wall),
                attempts: 1,
                path_area_ratio: 0.0,
                satisfied: !(min_path_area_ratio > 0.0),
            });
        }

        let mut best: Option<(PhysicalGrid, f64)> = None;
        for attempt in 1..=self.max_attempts {
            let walk = MazeWalk::new(rows, cols, single_path).run(&mut self.rng)?;
            let grid = render(&walk, width, height);
            let ratio = grid.path_area_ratio();
            debug!(attempt, ratio, "maze generation attempt");

            if !(min_path_area_ratio > 0.0) || ratio >= min_path_area_ratio {
                info!(width, height, single_path, attempt, ratio, "maze generated");
                return Ok(MazeOutcome {
                    grid,
                    attempts: attempt,
                    path_area_ratio: ratio,
                    satisfied: true,
                });
            }
            if best.as_ref().map_or(true, |(_, best_ratio)| ratio > *best_ratio) {
                best = Some((grid, ratio));
            }
        }

        let (grid, ratio) = best.ok_or_else(|| {
            MazeError::Data(hapnav_structures::NavDataError::InternalError(
                "density retry loop produced no grid".into(),
            ))
        })?;
        warn!(
            attempts = self.max_attempts,
            best_ratio = ratio,
            required_ratio = min_path_area_ratio,
            "path-area ratio not reached, returning best effort grid"
        );
        Ok(MazeOutcome {
            grid,
            attempts: self.max_attempts,
            path_area_ratio: ratio,
            satisfied: false,
        })
    }
}

impl Default for MazeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_dimensions() {
        assert_eq!(logical_dimensions(11, 11), (4, 4));
        assert_eq!(logical_dimensions(5, 9), (3, 1));
        assert_eq!(logical_dimensions(3, 3), (0, 0));
    }

    #[test]
    fn test_degenerate_grid_is_all_wall() {
        let outcome = MazeGenerator::with_seed(1).generate(3, 4, true, 0.0).unwrap();
        assert_eq!(outcome.grid.width(), 3);
        assert_eq!(outcome.grid.height(), 4);
        assert_eq!(outcome.grid.count(CellValue::Wall), 12);
        assert!(outcome.satisfied);
    }

    #[test]
    fn test_zero_dimension_is_an_error() {
        let result = MazeGenerator::with_seed(1).generate(0, 7, true, 0.0);
        assert!(matches!(result, Err(MazeError::BadDimensions { .. })));
    }

    #[test]
    fn test_unreachable_ratio_returns_best_effort() {
        // 11x11 has at most 32 passable cells out of 121
        let outcome = MazeGenerator::with_seed(5)
            .with_max_attempts(20)
            .generate(11, 11, true, 0.3)
            .unwrap();
        assert!(!outcome.satisfied);
        assert_eq!(outcome.attempts, 20);
        assert_eq!(outcome.grid.count(CellValue::Target), 1);
        assert!(outcome.path_area_ratio < 0.3);
        assert!((outcome.grid.path_area_ratio() - outcome.path_area_ratio).abs() < 1e-12);
    }

    #[test]
    fn test_full_maze_meets_reachable_ratio_first_try() {
        let outcome = MazeGenerator::with_seed(9).generate(11, 11, false, 0.25).unwrap();
        assert!(outcome.satisfied);
        assert_eq!(outcome.attempts, 1);
        assert_eq!(outcome.grid.passable_count(), 32);
    }
}
