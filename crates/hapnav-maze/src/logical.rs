// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The coarse graph of maze rooms.
//!
//! Nodes live in a dense array and are always addressed by coordinate;
//! neighbours are recomputed from `(row, col)` and never cached.

use std::fmt::{Display, Formatter};

use crate::error::{MazeError, MazeResult};

/// Coordinate of a room in the logical grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogicalCoord {
    pub row: usize,
    pub col: usize,
}

impl LogicalCoord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Physical cell of this room: `logical * 2 + 1` on both axes
    pub const fn physical(&self) -> (usize, usize) {
        (self.row * 2 + 1, self.col * 2 + 1)
    }
}

impl Display for LogicalCoord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// `(row, col)` step of this direction
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Direction from `from` to `to`, if they are grid-adjacent
    pub fn between(from: LogicalCoord, to: LogicalCoord) -> Option<Direction> {
        let d_row = to.row as isize - from.row as isize;
        let d_col = to.col as isize - from.col as isize;
        Direction::ALL
            .into_iter()
            .find(|dir| dir.delta() == (d_row, d_col))
    }
}

/// A room in the logical grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalNode {
    pub row: usize,
    pub col: usize,
    pub visited: bool,
    pub is_target: bool,
}

impl LogicalNode {
    pub fn coord(&self) -> LogicalCoord {
        LogicalCoord::new(self.row, self.col)
    }
}

/// Passage carved between two adjacent rooms. The direction is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    from: LogicalCoord,
    to: LogicalCoord,
    direction: Direction,
}

impl Edge {
    pub fn new(from: LogicalCoord, to: LogicalCoord) -> MazeResult<Self> {
        match Direction::between(from, to) {
            Some(direction) => Ok(Self {
                from,
                to,
                direction,
            }),
            None => Err(MazeError::InvalidEdge { from, to }),
        }
    }

    pub fn from(&self) -> LogicalCoord {
        self.from
    }

    pub fn to(&self) -> LogicalCoord {
        self.to
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Physical wall cell between the two rooms, one unit from `from`
    pub fn connector(&self) -> (usize, usize) {
        let (row, col) = self.from.physical();
        let (d_row, d_col) = self.direction.delta();
        (
            (row as isize + d_row) as usize,
            (col as isize + d_col) as usize,
        )
    }
}

/// Dense `rows x cols` array of rooms
#[derive(Debug, Clone)]
pub struct LogicalGrid {
    rows: usize,
    cols: usize,
    nodes: Vec<LogicalNode>,
}

impl LogicalGrid {
    pub fn new(rows: usize, cols: usize) -> Self {
        let nodes = (0..rows)
            .flat_map(|row| {
                (0..cols).map(move |col| LogicalNode {
                    row,
                    col,
                    visited: false,
                    is_target: false,
                })
            })
            .collect();
        Self { rows, cols, nodes }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, coord: LogicalCoord) -> Option<&LogicalNode> {
        self.index(coord).map(|i| &self.nodes[i])
    }

    pub fn node_mut(&mut self, coord: LogicalCoord) -> Option<&mut LogicalNode> {
        self.index(coord).map(move |i| &mut self.nodes[i])
    }

    pub fn is_visited(&self, coord: LogicalCoord) -> bool {
        self.node(coord).is_some_and(|n| n.visited)
    }

    /// In-bounds neighbours of `coord`, in `Direction::ALL` order
    pub fn neighbors(&self, coord: LogicalCoord) -> impl Iterator<Item = LogicalCoord> + '_ {
        Direction::ALL.into_iter().filter_map(move |dir| {
            let (d_row, d_col) = dir.delta();
            let row = coord.row.checked_add_signed(d_row)?;
            let col = coord.col.checked_add_signed(d_col)?;
            (row < self.rows && col < self.cols).then_some(LogicalCoord::new(row, col))
        })
    }

    pub fn unvisited_neighbors(&self, coord: LogicalCoord) -> Vec<LogicalCoord> {
        self.neighbors(coord)
            .filter(|n| !self.is_visited(*n))
            .collect()
    }

    fn index(&self, coord: LogicalCoord) -> Option<usize> {
        (coord.row < self.rows && coord.col < self.cols).then(|| coord.row * self.cols + coord.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_rejects_non_adjacent_nodes() {
        let err = Edge::new(LogicalCoord::new(0, 0), LogicalCoord::new(1, 1)).unwrap_err();
        assert!(err.is_internal());
        assert!(Edge::new(LogicalCoord::new(2, 2), LogicalCoord::new(2, 2)).is_err());
    }

    #[test]
    fn test_edge_connector_lies_between_rooms() {
        let edge = Edge::new(LogicalCoord::new(1, 1), LogicalCoord::new(1, 2)).unwrap();
        assert_eq!(edge.direction(), Direction::Right);
        assert_eq!(edge.connector(), (3, 4));

        let edge = Edge::new(LogicalCoord::new(1, 1), LogicalCoord::new(0, 1)).unwrap();
        assert_eq!(edge.direction(), Direction::Up);
        assert_eq!(edge.connector(), (2, 3));
    }

    #[test]
    fn test_corner_has_two_neighbors() {
        let grid = LogicalGrid::new(3, 4);
        let corner: Vec<_> = grid.neighbors(LogicalCoord::new(0, 0)).collect();
        assert_eq!(corner, vec![LogicalCoord::new(1, 0), LogicalCoord::new(0, 1)]);
        assert_eq!(grid.neighbors(LogicalCoord::new(1, 1)).count(), 4);
    }

    #[test]
    fn test_physical_mapping_is_odd() {
        assert_eq!(LogicalCoord::new(0, 0).physical(), (1, 1));
        assert_eq!(LogicalCoord::new(3, 2).physical(), (7, 5));
    }
}
