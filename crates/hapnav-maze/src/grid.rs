// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The physical occupancy grid that gets rendered and collided with.

use std::fmt::{Display, Formatter};

use hapnav_structures::NavDataError;

/// Value of a single physical cell
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellValue {
    Path = 0,
    Wall = 1,
    Target = 2,
}

impl CellValue {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Path and Target cells can be flown through
    pub const fn is_passable(self) -> bool {
        !matches!(self, CellValue::Wall)
    }
}

impl TryFrom<i64> for CellValue {
    type Error = NavDataError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CellValue::Path),
            1 => Ok(CellValue::Wall),
            2 => Ok(CellValue::Target),
            other => Err(NavDataError::BadParameters(format!(
                "{} is not a valid cell value (expected 0, 1 or 2)",
                other
            ))),
        }
    }
}

/// Row-major grid of cell values, `width` columns by `height` rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalGrid {
    width: usize,
    height: usize,
    cells: Vec<CellValue>,
}

impl PhysicalGrid {
    /// Entrance coordinate `(row, col)`, always forced passable on generated grids
    pub const ENTRANCE: (usize, usize) = (1, 0);

    pub fn filled(width: usize, height: usize, value: CellValue) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }

    /// Builds a grid from rows of equal length.
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Result<Self, NavDataError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(NavDataError::BadParameters(format!(
                "Row {} has {} cells, expected {}",
                index,
                row.len(),
                width
            )));
        }
        Ok(Self {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<CellValue> {
        if row < self.height && col < self.width {
            Some(self.cells[row * self.width + col])
        } else {
            None
        }
    }

    /// Sets a cell. Out-of-bounds writes are ignored and reported as `false`.
    pub fn set(&mut self, row: usize, col: usize, value: CellValue) -> bool {
        if row < self.height && col < self.width {
            self.cells[row * self.width + col] = value;
            true
        } else {
            false
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        // chunks() panics on 0, an empty grid simply has no rows
        self.cells.chunks(self.width.max(1))
    }

    pub fn count(&self, value: CellValue) -> usize {
        self.cells.iter().filter(|c| **c == value).count()
    }

    pub fn passable_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_passable()).count()
    }

    /// Fraction of passable cells over all cells, 0 for an empty grid.
    pub fn path_area_ratio(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        self.passable_count() as f64 / self.cells.len() as f64
    }

    /// Coordinates `(row, col)` of every Target cell
    pub fn targets(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == CellValue::Target)
            .map(|(i, _)| (i / self.width, i % self.width))
            .collect()
    }
}

impl Display for PhysicalGrid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            let line: String = row
                .iter()
                .map(|c| match c {
                    CellValue::Path => ' ',
                    CellValue::Wall => '#',
                    CellValue::Target => 'T',
                })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
