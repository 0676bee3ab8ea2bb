// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Grid import/export: the JSON map definition and plain CSV rows.

use serde::{Deserialize, Serialize};

use crate::error::{MazeError, MazeResult};
use crate::grid::{CellValue, PhysicalGrid};

/// JSON map definition consumed by world builders.
///
/// `map` is indexed `map[x][y]`, i.e. the outer dimension walks columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDefinition {
    pub map: Vec<Vec<u8>>,
    pub width: usize,
    pub height: usize,
    #[serde(rename = "cellSize")]
    pub cell_size: f64,
}

impl MapDefinition {
    pub fn from_grid(grid: &PhysicalGrid, cell_size: f64) -> Self {
        let map = (0..grid.width())
            .map(|col| {
                (0..grid.height())
                    .map(|row| grid.get(row, col).map_or(CellValue::Wall.as_u8(), CellValue::as_u8))
                    .collect()
            })
            .collect();
        Self {
            map,
            width: grid.width(),
            height: grid.height(),
            cell_size,
        }
    }

    /// Rebuilds the grid, checking `map` against the declared dimensions.
    pub fn to_grid(&self) -> MazeResult<PhysicalGrid> {
        if self.map.len() != self.width {
            return Err(MazeError::BadDimensions {
                width: self.map.len(),
                height: self.height,
            });
        }
        let mut grid = PhysicalGrid::filled(self.width, self.height, CellValue::Wall);
        for (col, column) in self.map.iter().enumerate() {
            if column.len() != self.height {
                return Err(MazeError::BadDimensions {
                    width: self.width,
                    height: column.len(),
                });
            }
            for (row, &value) in column.iter().enumerate() {
                grid.set(row, col, CellValue::try_from(i64::from(value))?);
            }
        }
        Ok(grid)
    }

    pub fn to_json(&self) -> MazeResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> MazeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> MazeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Parses a CSV grid, one line per row.
///
/// Blank lines are skipped. Every row must have as many values as the
/// first one and every value must be 0, 1 or 2.
pub fn parse_csv(text: &str) -> MazeResult<PhysicalGrid> {
    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let row = trimmed
            .split(',')
            .map(|field| {
                let field = field.trim();
                let value: i64 = field.parse().map_err(|_| MazeError::Parse {
                    line: line_number,
                    reason: format!("'{}' is not an integer", field),
                })?;
                CellValue::try_from(value).map_err(|e| MazeError::Parse {
                    line: line_number,
                    reason: e.to_string(),
                })
            })
            .collect::<MazeResult<Vec<_>>>()?;
        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(MazeError::Parse {
                    line: line_number,
                    reason: format!("expected {} values, found {}", first.len(), row.len()),
                });
            }
        }
        rows.push(row);
    }
    Ok(PhysicalGrid::from_rows(rows)?)
}

/// Writes a grid as CSV, one line per row, newline terminated.
pub fn to_csv(grid: &PhysicalGrid) -> String {
    let mut out = String::with_capacity(grid.total_cells() * 2);
    for row in grid.rows() {
        let line: Vec<String> = row.iter().map(|cell| cell.as_u8().to_string()).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "1,1,1\n0,2,1\n1,1,1\n";

    #[test]
    fn test_parse_csv() {
        let grid = parse_csv(SAMPLE).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.get(1, 0), Some(CellValue::Path));
        assert_eq!(grid.get(1, 1), Some(CellValue::Target));
        assert_eq!(to_csv(&grid), SAMPLE);
    }

    #[test]
    fn test_parse_csv_skips_blank_lines_and_spaces() {
        let grid = parse_csv("1, 0\n\n0 ,1\n\n").unwrap();
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.get(1, 0), Some(CellValue::Path));
    }

    #[test]
    fn test_parse_csv_errors_carry_line_numbers() {
        match parse_csv("1,1\n1,x\n") {
            Err(MazeError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {:?}", other),
        }
        match parse_csv("1,1\n1,1,1\n") {
            Err(MazeError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {:?}", other),
        }
        match parse_csv("1,3\n") {
            Err(MazeError::Parse { line, .. }) => assert_eq!(line, 1),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_map_definition_is_column_major() {
        let grid = parse_csv("1,0,0\n1,1,2\n").unwrap();
        let def = MapDefinition::from_grid(&grid, 0.2);
        assert_eq!(def.width, 3);
        assert_eq!(def.height, 2);
        assert_eq!(def.map.len(), 3);
        assert_eq!(def.map[2], vec![0, 2]);
        assert_eq!(def.to_grid().unwrap(), grid);
    }

    #[test]
    fn test_map_definition_json_field_names() {
        let grid = parse_csv("1,0\n").unwrap();
        let json = MapDefinition::from_grid(&grid, 0.5).to_json().unwrap();
        assert_eq!(json, r#"{"map":[[1],[0]],"width":2,"height":1,"cellSize":0.5}"#);
        let back = MapDefinition::from_json(&json).unwrap();
        assert_eq!(back.cell_size, 0.5);
    }

    #[test]
    fn test_map_definition_rejects_mismatched_dimensions() {
        let def = MapDefinition {
            map: vec![vec![1, 1], vec![1]],
            width: 2,
            height: 2,
            cell_size: 0.2,
        };
        assert!(matches!(def.to_grid(), Err(MazeError::BadDimensions { .. })));
    }
}
