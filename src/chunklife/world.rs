//! Sparse chunk index over the unbounded plane.
//!
//! The world owns every chunk outright in one flat map keyed by
//! `ChunkCoord`. Chunks appear on the first write that touches them and are
//! never dropped implicitly; `compact` is the only eviction path.

use std::collections::HashMap;

use rand::Rng;
use tracing::{info, warn};

use super::chunk::Chunk;
use super::coord::{BuildChunkHasher, ChunkCoord};
use super::dirty::DirtyTracker;
use super::error::{LifeError, LifeResult};

const INITIAL_CHUNK_CAPACITY: usize = 64;

pub struct World {
    pub(super) chunks: HashMap<ChunkCoord, Chunk, BuildChunkHasher>,
    /// Sum of every chunk's `live_count`. Only the cell write path moves it.
    pub(super) live_cells: u64,
    pub(super) dirty: DirtyTracker,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            chunks: HashMap::with_capacity_and_hasher(INITIAL_CHUNK_CAPACITY, BuildChunkHasher),
            live_cells: 0,
            dirty: DirtyTracker::new(),
        }
    }

    /// Number of live cells on the whole plane.
    #[inline]
    pub fn population(&self) -> u64 {
        self.live_cells
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live_cells == 0
    }

    /// Number of materialized chunks, including empty ones.
    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Read-only lookup. Never allocates.
    #[inline]
    pub fn get_chunk_if_exists(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Lookup-or-create. A missing chunk is inserted zeroed.
    ///
    /// Map growth goes through `try_reserve`, so running out of memory is
    /// reported and the world is left as it was.
    pub fn get_chunk(&mut self, coord: ChunkCoord) -> LifeResult<&mut Chunk> {
        if !self.chunks.contains_key(&coord) {
            self.reserve_chunks(coord, 1)?;
        }
        Ok(self.chunks.entry(coord).or_insert_with(Chunk::empty))
    }

    /// Reserve room for `additional` new chunks. `near` is only used for
    /// error reporting.
    pub(crate) fn reserve_chunks(&mut self, near: ChunkCoord, additional: usize) -> LifeResult<()> {
        self.chunks.try_reserve(additional).map_err(|source| {
            warn!(chunk_x = near.x, chunk_y = near.y, additional, "chunk allocation failed");
            LifeError::ChunkAllocation { coord: near, source }
        })
    }

    /// Iterate all materialized chunks in map order.
    pub fn chunks(&self) -> impl Iterator<Item = (ChunkCoord, &Chunk)> {
        self.chunks.iter().map(|(&coord, chunk)| (coord, chunk))
    }

    /// Coordinates of chunks holding at least one live cell, sorted.
    pub fn live_chunk_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = self
            .chunks
            .iter()
            .filter(|(_, chunk)| !chunk.is_empty())
            .map(|(&coord, _)| coord)
            .collect();
        coords.sort_unstable();
        coords
    }

    /// Existing chunks intersecting the inclusive world rectangle, sorted by
    /// chunk coordinate. Never allocates chunks.
    pub fn chunks_in_rect(
        &self,
        min_x: i64,
        min_y: i64,
        max_x: i64,
        max_y: i64,
    ) -> Vec<(ChunkCoord, &Chunk)> {
        if min_x > max_x || min_y > max_y {
            return Vec::new();
        }
        let lo = ChunkCoord::containing(min_x, min_y);
        let hi = ChunkCoord::containing(max_x, max_y);
        let span = (hi.x - lo.x + 1) as u128 * (hi.y - lo.y + 1) as u128;

        let mut out: Vec<(ChunkCoord, &Chunk)> = if span <= self.chunks.len() as u128 {
            (lo.y..=hi.y)
                .flat_map(|cy| (lo.x..=hi.x).map(move |cx| ChunkCoord::new(cx, cy)))
                .filter_map(|coord| self.chunks.get(&coord).map(|chunk| (coord, chunk)))
                .collect()
        } else {
            self.chunks
                .iter()
                .filter(|(c, _)| c.x >= lo.x && c.x <= hi.x && c.y >= lo.y && c.y <= hi.y)
                .map(|(&coord, chunk)| (coord, chunk))
                .collect()
        };
        out.sort_unstable_by_key(|&(coord, _)| coord);
        out
    }

    /// Visit every live cell: chunks in sorted coordinate order, then rows,
    /// then columns inside each chunk.
    pub fn for_each_live<F: FnMut(i64, i64)>(&self, mut f: F) {
        for coord in self.live_chunk_coords() {
            let chunk = &self.chunks[&coord];
            let (base_x, base_y) = coord.world_base();
            chunk.for_each_live(|x, y| f(base_x + x as i64, base_y + y as i64));
        }
    }

    pub fn live_cells(&self) -> Vec<(i64, i64)> {
        let mut out = Vec::with_capacity(self.live_cells as usize);
        self.for_each_live(|x, y| out.push((x, y)));
        out
    }

    pub fn bounds(&self) -> Option<(i64, i64, i64, i64)> {
        let mut min_x = i64::MAX;
        let mut min_y = i64::MAX;
        let mut max_x = i64::MIN;
        let mut max_y = i64::MIN;
        let mut seen = false;

        self.for_each_live(|x, y| {
            seen = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        });

        seen.then_some((min_x, min_y, max_x, max_y))
    }

    /// Integer mean of all live cells, truncated toward zero.
    pub fn centroid(&self) -> Option<(i64, i64)> {
        let mut sum_x = 0i128;
        let mut sum_y = 0i128;
        let mut count = 0i128;
        self.for_each_live(|x, y| {
            sum_x += x as i128;
            sum_y += y as i128;
            count += 1;
        });
        (count > 0).then(|| ((sum_x / count) as i64, (sum_y / count) as i64))
    }

    /// Pending dirty chunk coordinates, oldest first.
    #[inline]
    pub fn dirty_chunks(&self) -> &[ChunkCoord] {
        self.dirty.as_slice()
    }

    /// Drain the dirty list for a redraw and clear the `dirty` flag on every
    /// drained chunk that still exists.
    pub fn take_dirty(&mut self) -> Vec<ChunkCoord> {
        let drained = self.dirty.take();
        for coord in &drained {
            if let Some(chunk) = self.chunks.get_mut(coord) {
                chunk.clear_dirty();
            }
        }
        drained
    }

    /// Drop every chunk and reset the population.
    pub fn clear(&mut self) {
        let dropped = self.chunks.len();
        self.chunks.clear();
        self.live_cells = 0;
        self.dirty.clear();
        info!(chunks = dropped, "world cleared");
    }

    /// Evict chunks with no live cells that are not awaiting a redraw.
    /// Returns the number of chunks removed.
    pub fn compact(&mut self) -> usize {
        let before = self.chunks.len();
        self.chunks.retain(|_, chunk| !chunk.is_empty() || chunk.is_dirty());
        before - self.chunks.len()
    }

    /// Set each cell of the `width`×`height` rectangle at `(x, y)` alive with
    /// probability 1/3. Returns the number of cells that became alive.
    pub fn randomize_region<R: Rng + ?Sized>(
        &mut self,
        x: i64,
        y: i64,
        width: u32,
        height: u32,
        rng: &mut R,
    ) -> LifeResult<u64> {
        let mut born = 0u64;
        for row in y..y.saturating_add(height as i64) {
            for col in x..x.saturating_add(width as i64) {
                if rng.random_ratio(1, 3) && self.set_cell(col, row, true)? {
                    born += 1;
                }
            }
        }
        Ok(born)
    }

    #[cfg(test)]
    pub(crate) fn recount(&self) -> u64 {
        self.chunks
            .values()
            .map(|chunk| chunk.compute_population() as u64)
            .sum()
    }
}
