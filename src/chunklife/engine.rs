//! Generation engine: advance a `World` by one B3/S23 generation.
//!
//! One step runs four strict phases over the world:
//! 1. collect: every live cell contributes itself and its 8 neighbors,
//! 2. dedup: sort candidates by `(x, y)` and collapse duplicates,
//! 3. evaluate: count neighbors with read-only `peek_cell`, keep only
//!    transitions,
//! 4. commit: apply the transitions through `set_cell`.
//!
//! Phases 1-3 never mutate the world, so every rule sees the same snapshot.
//! Work is proportional to live population, not to the area covered.

use tracing::debug;

use super::coord::{ChunkCoord, NEIGHBOR_OFFSETS, in_safe_range};
use super::error::{LifeError, LifeResult};
use super::world::World;

/// Each live cell yields itself plus its Moore neighborhood.
const CANDIDATES_PER_CELL: usize = 9;

/// Counters from a single generation step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Candidate positions before dedup.
    pub candidates: usize,
    /// Distinct positions evaluated.
    pub unique: usize,
    pub births: usize,
    pub deaths: usize,
}

impl StepStats {
    #[inline]
    pub fn transitions(&self) -> usize {
        self.births + self.deaths
    }
}

/// B3/S23.
#[inline(always)]
pub const fn next_state(alive: bool, neighbors: u8) -> bool {
    matches!((alive, neighbors), (true, 2) | (true, 3) | (false, 3))
}

/// Steps a `World`. Holds only reusable scratch buffers and a generation
/// counter; no cell state survives between calls.
#[derive(Debug, Default)]
pub struct GenerationEngine {
    candidates: Vec<(i64, i64)>,
    updates: Vec<(i64, i64, bool)>,
    new_chunks: Vec<ChunkCoord>,
    generation: u64,
}

impl GenerationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Advance `world` by one generation.
    ///
    /// If buffer or chunk allocation fails the error is returned before the
    /// commit phase starts and the world is left unchanged.
    pub fn step(&mut self, world: &mut World) -> LifeResult<StepStats> {
        self.generation += 1;
        if world.is_empty() {
            return Ok(StepStats::default());
        }

        let mut stats = StepStats::default();
        self.collect_candidates(world)?;
        stats.candidates = self.candidates.len();

        self.candidates.sort_unstable();
        self.candidates.dedup();
        stats.unique = self.candidates.len();

        self.evaluate(world, &mut stats)?;
        self.reserve_commit(world)?;

        for &(x, y, alive) in &self.updates {
            world.set_cell(x, y, alive)?;
        }

        debug!(
            generation = self.generation,
            candidates = stats.candidates,
            unique = stats.unique,
            births = stats.births,
            deaths = stats.deaths,
            population = world.population(),
            "generation advanced"
        );
        Ok(stats)
    }

    /// Run `n` generations, stopping at the first error.
    pub fn step_n(&mut self, world: &mut World, n: u64) -> LifeResult<()> {
        for _ in 0..n {
            self.step(world)?;
        }
        Ok(())
    }

    fn collect_candidates(&mut self, world: &World) -> LifeResult<()> {
        self.candidates.clear();
        let wanted = (world.population() as usize).saturating_mul(CANDIDATES_PER_CELL);
        self.candidates
            .try_reserve(wanted)
            .map_err(LifeError::ScratchAllocation)?;

        let candidates = &mut self.candidates;
        for (coord, chunk) in world.chunks() {
            if chunk.is_empty() {
                continue;
            }
            let (base_x, base_y) = coord.world_base();
            chunk.for_each_live(|lx, ly| {
                let x = base_x + lx as i64;
                let y = base_y + ly as i64;
                for (dx, dy) in NEIGHBOR_OFFSETS {
                    candidates.push((x + dx, y + dy));
                }
                candidates.push((x, y));
            });
        }
        Ok(())
    }

    fn evaluate(&mut self, world: &World, stats: &mut StepStats) -> LifeResult<()> {
        self.updates.clear();
        for &(x, y) in &self.candidates {
            if !in_safe_range(x, y) {
                continue;
            }
            let neighbors = NEIGHBOR_OFFSETS
                .iter()
                .filter(|&&(dx, dy)| world.peek_cell(x + dx, y + dy))
                .count() as u8;
            let alive = world.peek_cell(x, y);
            let next = next_state(alive, neighbors);
            if next == alive {
                continue;
            }
            self.updates
                .try_reserve(1)
                .map_err(LifeError::ScratchAllocation)?;
            self.updates.push((x, y, next));
            if next {
                stats.births += 1;
            } else {
                stats.deaths += 1;
            }
        }
        Ok(())
    }

    /// Pre-allocate every chunk slot and dirty-list entry the commit needs,
    /// so the commit itself cannot fail halfway through.
    fn reserve_commit(&mut self, world: &mut World) -> LifeResult<()> {
        self.new_chunks.clear();
        for &(x, y, alive) in &self.updates {
            if !alive {
                continue;
            }
            let coord = ChunkCoord::containing(x, y);
            if world.get_chunk_if_exists(coord).is_none() {
                self.new_chunks
                    .try_reserve(1)
                    .map_err(LifeError::ScratchAllocation)?;
                self.new_chunks.push(coord);
            }
        }
        self.new_chunks.sort_unstable();
        self.new_chunks.dedup();

        if let Some(&first) = self.new_chunks.first() {
            world.reserve_chunks(first, self.new_chunks.len())?;
        }
        world
            .dirty
            .try_reserve(self.updates.len())
            .map_err(LifeError::ScratchAllocation)
    }
}
