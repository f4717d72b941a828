//! Cell-level access to the world by world coordinate.
//!
//! Reads never materialize chunks. Writes create the owning chunk, keep the
//! global population in step with the chunk counters, and append to the
//! dirty list only when the cell actually changes.

use super::coord::{ChunkCoord, in_safe_range, local_coord};
use super::error::{LifeError, LifeResult};
use super::world::World;

impl World {
    /// Whether the cell at `(x, y)` is alive.
    ///
    /// Coordinates outside the safe range and cells in never-written chunks
    /// read as dead.
    #[inline]
    pub fn peek_cell(&self, x: i64, y: i64) -> bool {
        if !in_safe_range(x, y) {
            return false;
        }
        let (local_x, local_y) = local_coord(x, y);
        self.get_chunk_if_exists(ChunkCoord::containing(x, y))
            .is_some_and(|chunk| chunk.get_bit(local_x, local_y))
    }

    /// Set the cell at `(x, y)` to `alive`.
    ///
    /// Returns `Ok(true)` if the cell changed. Unsafe extreme coordinates are
    /// ignored (`Ok(false)`). On allocation failure nothing is modified.
    pub fn set_cell(&mut self, x: i64, y: i64, alive: bool) -> LifeResult<bool> {
        if !in_safe_range(x, y) {
            return Ok(false);
        }
        let coord = ChunkCoord::containing(x, y);
        let (local_x, local_y) = local_coord(x, y);

        if let Some(chunk) = self.chunks.get(&coord) {
            if chunk.get_bit(local_x, local_y) == alive {
                return Ok(false);
            }
        }
        self.dirty
            .try_reserve(1)
            .map_err(|source| LifeError::ChunkAllocation { coord, source })?;

        let chunk = self.get_chunk(coord)?;
        if !chunk.set_bit(local_x, local_y, alive) {
            // Dead write into a freshly created chunk.
            return Ok(false);
        }

        if alive {
            self.live_cells += 1;
        } else {
            self.live_cells -= 1;
        }
        self.dirty.record(coord);
        Ok(true)
    }

    /// Apply many writes. Returns the number of cells that changed.
    pub fn set_cells<I>(&mut self, cells: I) -> LifeResult<u64>
    where
        I: IntoIterator<Item = (i64, i64, bool)>,
    {
        let mut changed = 0u64;
        for (x, y, alive) in cells {
            if self.set_cell(x, y, alive)? {
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Batch-set many live cells.
    pub fn set_cells_alive<I>(&mut self, cells: I) -> LifeResult<u64>
    where
        I: IntoIterator<Item = (i64, i64)>,
    {
        self.set_cells(cells.into_iter().map(|(x, y)| (x, y, true)))
    }
}
