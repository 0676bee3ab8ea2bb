// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::grid::PhysicalGrid;

/// Holds the current grid. Replacement swaps a whole `Arc`, so readers see
/// either the previous grid or the new one and never a partial update.
#[derive(Debug)]
pub struct SharedGrid {
    current: RwLock<Arc<PhysicalGrid>>,
    version: AtomicU64,
}

impl SharedGrid {
    pub fn new(grid: PhysicalGrid) -> Self {
        Self {
            current: RwLock::new(Arc::new(grid)),
            version: AtomicU64::new(0),
        }
    }

    /// Cheap handle to the grid as it is right now.
    pub fn snapshot(&self) -> Arc<PhysicalGrid> {
        Arc::clone(&self.current.read())
    }

    /// Installs `grid` and returns the one it replaced.
    pub fn replace(&self, grid: PhysicalGrid) -> Arc<PhysicalGrid> {
        let next = Arc::new(grid);
        let previous = std::mem::replace(&mut *self.current.write(), next);
        let version = self.version.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(version, "grid replaced");
        previous
    }

    /// Number of replacements since construction
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }
}

impl Default for SharedGrid {
    fn default() -> Self {
        Self::new(PhysicalGrid::filled(0, 0, crate::grid::CellValue::Wall))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellValue;

    #[test]
    fn test_snapshot_survives_replace() {
        let slot = SharedGrid::new(PhysicalGrid::filled(3, 3, CellValue::Wall));
        let before = slot.snapshot();
        let previous = slot.replace(PhysicalGrid::filled(5, 5, CellValue::Path));

        assert_eq!(slot.version(), 1);
        assert_eq!(before.width(), 3);
        assert!(Arc::ptr_eq(&before, &previous));
        assert_eq!(slot.snapshot().width(), 5);
        assert_eq!(slot.snapshot().count(CellValue::Path), 25);
    }

    #[test]
    fn test_concurrent_readers_see_whole_grids() {
        let slot = Arc::new(SharedGrid::new(PhysicalGrid::filled(5, 5, CellValue::Wall)));
        let reader = {
            let slot = Arc::clone(&slot);
            std::thread::spawn(move || {
                for _ in 0..1000 {
                    let grid = slot.snapshot();
                    let walls = grid.count(CellValue::Wall);
                    assert!(walls == 0 || walls == grid.total_cells());
                }
            })
        };
        for i in 0..100 {
            let value = if i % 2 == 0 { CellValue::Path } else { CellValue::Wall };
            slot.replace(PhysicalGrid::filled(5, 5, value));
        }
        reader.join().unwrap();
        assert_eq!(slot.version(), 100);
    }
}
