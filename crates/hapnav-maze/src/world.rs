// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Grid-backed world geometry: every cell is an axis-aligned square of side
//! `cell_size` centred at `(col * cell_size, row * cell_size) + offset`.
//! Walls are unbounded along the up axis.

use std::sync::Arc;

use hapnav_structures::{CollisionQuery, ObstacleLayer, RayHit, Vec3};

use crate::grid::{CellValue, PhysicalGrid};

/// Axis-aligned bounds in the XY plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2 {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds2 {
    pub fn contains(&self, point: &Vec3) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.y >= self.min_y && point.y <= self.max_y
    }
}

#[derive(Debug, Clone)]
pub struct GridWorld {
    grid: Arc<PhysicalGrid>,
    cell_size: f64,
    offset: Vec3,
}

impl GridWorld {
    pub fn new(grid: Arc<PhysicalGrid>, cell_size: f64) -> Self {
        Self::with_offset(grid, cell_size, Vec3::zeros())
    }

    pub fn with_offset(grid: Arc<PhysicalGrid>, cell_size: f64, offset: Vec3) -> Self {
        Self {
            grid,
            cell_size,
            offset,
        }
    }

    pub fn grid(&self) -> &PhysicalGrid {
        &self.grid
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn cell_center(&self, row: usize, col: usize) -> Vec3 {
        self.offset + Vec3::new(col as f64 * self.cell_size, row as f64 * self.cell_size, 0.0)
    }

    /// Cell under a world point, `(row, col)`
    pub fn cell_at(&self, point: &Vec3) -> Option<(usize, usize)> {
        if self.cell_size <= 0.0 {
            return None;
        }
        let local = point - self.offset;
        let col = (local.x / self.cell_size + 0.5).floor();
        let row = (local.y / self.cell_size + 0.5).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        (row < self.grid.height() && col < self.grid.width()).then_some((row, col))
    }

    pub fn bounds(&self) -> Bounds2 {
        let half = self.cell_size / 2.0;
        Bounds2 {
            min_x: self.offset.x - half,
            min_y: self.offset.y - half,
            max_x: self.offset.x + self.grid.width() as f64 * self.cell_size - half,
            max_y: self.offset.y + self.grid.height() as f64 * self.cell_size - half,
        }
    }

    /// The `inMap` zone flag
    pub fn contains(&self, point: &Vec3) -> bool {
        self.grid.total_cells() > 0 && self.bounds().contains(point)
    }

    /// Whether a disc of `radius` around `center` touches any cell holding `value`.
    pub fn overlaps(&self, center: &Vec3, radius: f64, value: CellValue) -> bool {
        self.cells_with(value).any(|(row, col)| {
            let (min, max) = self.cell_box(row, col);
            let dx = center.x - center.x.clamp(min.0, max.0);
            let dy = center.y - center.y.clamp(min.1, max.1);
            dx * dx + dy * dy < radius * radius
        })
    }

    /// `cellCollide`: the drone disc touches a wall
    pub fn collides_with_wall(&self, center: &Vec3, radius: f64) -> bool {
        self.overlaps(center, radius, CellValue::Wall)
    }

    /// `targetCollide`: the drone disc touches the target
    pub fn reached_target(&self, center: &Vec3, radius: f64) -> bool {
        self.overlaps(center, radius, CellValue::Target)
    }

    pub fn entrance_position(&self) -> Vec3 {
        let (row, col) = PhysicalGrid::ENTRANCE;
        self.cell_center(row, col)
    }

    fn cells_with(&self, value: CellValue) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.grid.rows().enumerate().flat_map(move |(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(move |(_, cell)| **cell == value)
                .map(move |(col, _)| (row, col))
        })
    }

    fn cell_box(&self, row: usize, col: usize) -> ((f64, f64), (f64, f64)) {
        let center = self.cell_center(row, col);
        let half = self.cell_size / 2.0;
        ((center.x - half, center.y - half), (center.x + half, center.y + half))
    }

    fn layer_value(layer: ObstacleLayer) -> Option<CellValue> {
        match layer {
            ObstacleLayer::WALLS => Some(CellValue::Wall),
            ObstacleLayer::TARGETS => Some(CellValue::Target),
            _ => None,
        }
    }
}

/// Slab intersection of a ray with an XY box; returns the entry distance.
fn ray_box(origin: &Vec3, direction: &Vec3, min: (f64, f64), max: (f64, f64)) -> Option<f64> {
    let mut t_near = f64::NEG_INFINITY;
    let mut t_far = f64::INFINITY;
    for (o, d, lo, hi) in [(origin.x, direction.x, min.0, max.0), (origin.y, direction.y, min.1, max.1)] {
        if d.abs() < 1e-12 {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let (t0, t1) = {
            let a = (lo - o) / d;
            let b = (hi - o) / d;
            if a < b {
                (a, b)
            } else {
                (b, a)
            }
        };
        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
        if t_near > t_far {
            return None;
        }
    }
    if t_far < 0.0 {
        return None;
    }
    // Origin inside the box counts as a hit at distance zero
    Some(t_near.max(0.0))
}

impl CollisionQuery for GridWorld {
    fn cast_ray(&self, origin: &Vec3, direction: &Vec3, layer: ObstacleLayer) -> Option<RayHit> {
        let value = Self::layer_value(layer)?;
        if direction.x.abs() < 1e-12 && direction.y.abs() < 1e-12 {
            return None;
        }
        self.cells_with(value)
            .filter_map(|(row, col)| {
                let (min, max) = self.cell_box(row, col);
                ray_box(origin, direction, min, max)
            })
            .min_by(|a, b| a.total_cmp(b))
            .map(|distance| RayHit {
                distance,
                point: origin + direction * distance,
            })
    }
}
