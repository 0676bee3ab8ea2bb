// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Randomized depth-first backtracking over the logical grid.
//!
//! The walk keeps an explicit stack and an explicit state instead of
//! recursing, so it can be driven one step at a time.

use rand::Rng;
use tracing::trace;

use crate::error::MazeResult;
use crate::logical::{Edge, LogicalCoord, LogicalGrid};

/// Where the walk currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    /// Last step carved a passage into a fresh room
    Visiting,
    /// Last step popped a dead end off the stack
    Backtracking,
    /// Nothing left to do
    Done,
}

/// Result of a finished walk
#[derive(Debug, Clone)]
pub struct WalkOutcome {
    pub grid: LogicalGrid,
    pub edges: Vec<Edge>,
    pub target: Option<LogicalCoord>,
}

#[derive(Debug, Clone)]
pub struct MazeWalk {
    grid: LogicalGrid,
    stack: Vec<LogicalCoord>,
    edges: Vec<Edge>,
    target: Option<LogicalCoord>,
    single_path: bool,
    state: WalkState,
}

impl MazeWalk {
    /// Starts a walk at logical `(0, 0)`. An empty grid starts out `Done`.
    pub fn new(rows: usize, cols: usize, single_path: bool) -> Self {
        let mut grid = LogicalGrid::new(rows, cols);
        let start = LogicalCoord::new(0, 0);
        let mut stack = Vec::with_capacity(rows * cols);
        let state = match grid.node_mut(start) {
            Some(node) => {
                node.visited = true;
                stack.push(start);
                WalkState::Visiting
            }
            None => WalkState::Done,
        };
        Self {
            grid,
            stack,
            edges: Vec::new(),
            target: None,
            single_path,
            state,
        }
    }

    pub fn state(&self) -> WalkState {
        self.state
    }

    pub fn grid(&self) -> &LogicalGrid {
        &self.grid
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn target(&self) -> Option<LogicalCoord> {
        self.target
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Advances the walk by one push or one pop.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> MazeResult<WalkState> {
        if self.state == WalkState::Done {
            return Ok(WalkState::Done);
        }
        let Some(&top) = self.stack.last() else {
            self.state = WalkState::Done;
            return Ok(self.state);
        };

        let candidates = self.grid.unvisited_neighbors(top);
        if !candidates.is_empty() {
            let next = candidates[rng.gen_range(0..candidates.len())];
            let edge = Edge::new(top, next)?;
            if let Some(node) = self.grid.node_mut(next) {
                node.visited = true;
            }
            self.stack.push(next);
            self.edges.push(edge);
            self.state = WalkState::Visiting;
            return Ok(self.state);
        }

        self.stack.pop();
        if self.target.is_none() {
            trace!(row = top.row, col = top.col, "first dead end marked as target");
            self.target = Some(top);
            if let Some(node) = self.grid.node_mut(top) {
                node.is_target = true;
            }
            if self.single_path {
                self.state = WalkState::Done;
                return Ok(self.state);
            }
        }
        self.state = if self.stack.is_empty() {
            WalkState::Done
        } else {
            WalkState::Backtracking
        };
        Ok(self.state)
    }

    /// Steps until `Done`.
    pub fn run<R: Rng + ?Sized>(mut self, rng: &mut R) -> MazeResult<WalkOutcome> {
        while self.step(rng)? != WalkState::Done {}
        Ok(WalkOutcome {
            grid: self.grid,
            edges: self.edges,
            target: self.target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_single_path_stops_at_first_dead_end() {
        let mut rng = StdRng::seed_from_u64(7);
        let outcome = MazeWalk::new(4, 4, true).run(&mut rng).unwrap();
        let target = outcome.target.unwrap();

        // A simple path: every edge continues from the previous edge's end
        for pair in outcome.edges.windows(2) {
            assert_eq!(pair[0].to(), pair[1].from());
        }
        assert_eq!(outcome.edges.last().unwrap().to(), target);
        assert!(outcome.grid.node(target).unwrap().is_target);
    }

    #[test]
    fn test_full_walk_is_spanning_tree() {
        let mut rng = StdRng::seed_from_u64(11);
        let outcome = MazeWalk::new(5, 3, false).run(&mut rng).unwrap();
        assert_eq!(outcome.edges.len(), 5 * 3 - 1);
        for row in 0..5 {
            for col in 0..3 {
                assert!(outcome.grid.is_visited(LogicalCoord::new(row, col)));
            }
        }
        assert!(outcome.target.is_some());
    }

    #[test]
    fn test_step_by_step_states() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut walk = MazeWalk::new(1, 2, false);
        assert_eq!(walk.state(), WalkState::Visiting);
        assert_eq!(walk.step(&mut rng).unwrap(), WalkState::Visiting);
        assert_eq!(walk.stack_depth(), 2);
        assert_eq!(walk.step(&mut rng).unwrap(), WalkState::Backtracking);
        assert_eq!(walk.target(), Some(LogicalCoord::new(0, 1)));
        assert_eq!(walk.step(&mut rng).unwrap(), WalkState::Done);
        assert_eq!(walk.step(&mut rng).unwrap(), WalkState::Done);
    }

    #[test]
    fn test_single_room_is_its_own_target() {
        let mut rng = StdRng::seed_from_u64(0);
        let outcome = MazeWalk::new(1, 1, true).run(&mut rng).unwrap();
        assert!(outcome.edges.is_empty());
        assert_eq!(outcome.target, Some(LogicalCoord::new(0, 0)));
    }

    #[test]
    fn test_empty_grid_is_done() {
        let walk = MazeWalk::new(0, 3, false);
        assert_eq!(walk.state(), WalkState::Done);
    }
}
