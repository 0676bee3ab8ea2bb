// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Procedural maze generation for hapnav.
//!
//! A randomized depth-first walk over a logical grid of rooms is rendered
//! into a physical occupancy grid where walls sit between rooms. Generation
//! can be repeated until enough of the grid is passable.
//!
//! ```
//! use hapnav_maze::{CellValue, MazeGenerator, PhysicalGrid};
//!
//! let outcome = MazeGenerator::with_seed(7).generate(11, 11, true, 0.1).unwrap();
//! let (row, col) = PhysicalGrid::ENTRANCE;
//! assert_eq!(outcome.grid.get(row, col), Some(CellValue::Path));
//! assert_eq!(outcome.grid.count(CellValue::Target), 1);
//! ```

mod error;
pub mod generator;
pub mod grid;
pub mod interchange;
pub mod logical;
mod slot;
pub mod walk;
pub mod world;

pub use error::{MazeError, MazeResult};
pub use generator::{MazeGenerator, MazeOutcome};
pub use grid::{CellValue, PhysicalGrid};
pub use interchange::{parse_csv, to_csv, MapDefinition};
pub use logical::{Direction, Edge, LogicalCoord, LogicalGrid, LogicalNode};
pub use slot::SharedGrid;
pub use walk::{MazeWalk, WalkOutcome, WalkState};
pub use world::{Bounds2, GridWorld};
