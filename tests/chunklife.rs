use std::collections::HashSet;

use chunk_life::chunklife::coord::local_coord;
use chunk_life::chunklife::{
    COORD_LIMIT, ChunkCoord, GenerationEngine, World, div_floor, mod_floor,
};
use proptest::prelude::*;
use rand::Rng;
use rand::SeedableRng;

fn world_with(cells: &[(i64, i64)]) -> World {
    let mut world = World::new();
    world.set_cells_alive(cells.iter().copied()).unwrap();
    world
}

fn collect_live(world: &World) -> HashSet<(i64, i64)> {
    world.live_cells().into_iter().collect()
}

fn assert_alive(world: &World, cells: &[(i64, i64)]) {
    for &(x, y) in cells {
        assert!(world.peek_cell(x, y), "expected alive at ({x},{y})");
    }
}

fn assert_dead(world: &World, cells: &[(i64, i64)]) {
    for &(x, y) in cells {
        assert!(!world.peek_cell(x, y), "expected dead at ({x},{y})");
    }
}

fn step_naive(cells: &HashSet<(i64, i64)>) -> HashSet<(i64, i64)> {
    let mut next = HashSet::new();
    let mut candidates = HashSet::new();
    for &(x, y) in cells {
        for dy in -1..=1 {
            for dx in -1..=1 {
                candidates.insert((x + dx, y + dy));
            }
        }
    }

    for (x, y) in candidates {
        let mut neighbors = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if cells.contains(&(x + dx, y + dy)) {
                    neighbors += 1;
                }
            }
        }
        let alive = cells.contains(&(x, y));
        let next_alive = if alive {
            neighbors == 2 || neighbors == 3
        } else {
            neighbors == 3
        };
        if next_alive {
            next.insert((x, y));
        }
    }

    next
}

#[test]
fn block_is_stable() {
    let block = [(0, 0), (1, 0), (0, 1), (1, 1)];
    let mut world = world_with(&block);
    let mut engine = GenerationEngine::new();
    world.take_dirty();

    let stats = engine.step(&mut world).unwrap();

    assert_alive(&world, &block);
    assert_dead(&world, &[(2, 0), (2, 1), (-1, 0), (-1, 1)]);
    assert_eq!(stats.transitions(), 0);
    assert!(world.dirty_chunks().is_empty());
}

#[test]
fn blinker_has_period_two() {
    let vertical = [(1, 0), (1, 1), (1, 2)];
    let horizontal = [(0, 1), (1, 1), (2, 1)];
    let mut world = world_with(&vertical);
    let mut engine = GenerationEngine::new();

    engine.step(&mut world).unwrap();
    assert_eq!(collect_live(&world), horizontal.into_iter().collect());

    engine.step(&mut world).unwrap();
    assert_eq!(collect_live(&world), vertical.into_iter().collect());
    assert_eq!(world.population(), 3);
}

#[test]
fn underpopulation_kills_pair() {
    let mut world = world_with(&[(5, 5), (6, 5)]);
    GenerationEngine::new().step(&mut world).unwrap();
    assert!(world.is_empty());
    assert_eq!(world.population(), 0);
    assert_eq!(world.bounds(), None);
}

#[test]
fn glider_moves_one_diagonal_every_four_steps() {
    let glider = [(1, 0), (2, -1), (0, -2), (1, -2), (2, -2)];
    let mut world = world_with(&glider);
    let mut engine = GenerationEngine::new();

    engine.step_n(&mut world, 4).unwrap();

    let shifted = [(2, -1), (3, -2), (1, -3), (2, -3), (3, -3)];
    assert_eq!(collect_live(&world), shifted.into_iter().collect());
    assert_eq!(engine.generation(), 4);
}

#[test]
fn glider_crosses_negative_chunk_border() {
    // Starts in chunk (0, 0) and travels into negative chunk space.
    let glider = [(1, 0), (2, -1), (0, -2), (1, -2), (2, -2)];
    let mut world = World::new();
    world
        .set_cells_alive(glider.iter().map(|&(x, y)| (x - 4, y + 4)))
        .unwrap();
    let mut engine = GenerationEngine::new();
    let mut naive = collect_live(&world);

    for _ in 0..40 {
        engine.step(&mut world).unwrap();
        naive = step_naive(&naive);
        assert_eq!(collect_live(&world), naive);
    }
    assert!(world.get_chunk_if_exists(ChunkCoord::new(0, -1)).is_some());
}

#[test]
fn matches_naive_on_random_seed() {
    let mut world = World::new();
    let mut rng = rand::rngs::StdRng::seed_from_u64(0xBADC0FFEE);

    let mut naive = HashSet::new();
    for y in -70..=70 {
        for x in -70..=70 {
            if rng.random::<f64>() < 0.33 {
                world.set_cell(x, y, true).unwrap();
                naive.insert((x, y));
            }
        }
    }

    let mut engine = GenerationEngine::new();
    for _ in 0..16 {
        assert_eq!(collect_live(&world), naive);
        assert_eq!(world.population(), naive.len() as u64);
        engine.step(&mut world).unwrap();
        naive = step_naive(&naive);
    }
}

#[test]
fn far_away_pattern_only_touches_its_own_chunk() {
    // (1_000_010, -999_990) sits at local (10, 10).
    let (bx, by) = (1_000_010, -999_990);
    let mut world = world_with(&[(bx, by - 1), (bx, by), (bx, by + 1)]);
    let mut engine = GenerationEngine::new();

    engine.step_n(&mut world, 10).unwrap();

    assert_eq!(world.chunk_count(), 1);
    assert_eq!(world.population(), 3);
    assert_alive(&world, &[(bx, by - 1), (bx, by), (bx, by + 1)]);
    assert_eq!(
        world.live_chunk_coords(),
        vec![ChunkCoord::containing(bx, by)]
    );
}

#[test]
fn lone_cell_dies_without_allocating_neighbors() {
    let mut world = world_with(&[(1_000_000, -1_000_000)]);
    GenerationEngine::new().step(&mut world).unwrap();
    assert_eq!(world.population(), 0);
    assert_eq!(world.chunk_count(), 1);
}

#[test]
fn extreme_coordinates_are_safe() {
    let y = COORD_LIMIT - 5;
    let mut world = world_with(&[
        (COORD_LIMIT - 2, y),
        (COORD_LIMIT - 1, y),
        (COORD_LIMIT, y),
    ]);
    let mut engine = GenerationEngine::new();
    engine.step(&mut world).unwrap();
    assert_eq!(
        collect_live(&world),
        [(COORD_LIMIT - 1, y - 1), (COORD_LIMIT - 1, y), (COORD_LIMIT - 1, y + 1)]
            .into_iter()
            .collect()
    );

    let mut low = world_with(&[(-COORD_LIMIT, -COORD_LIMIT), (-COORD_LIMIT + 1, -COORD_LIMIT)]);
    engine.step(&mut low).unwrap();
    assert!(low.is_empty());

    assert!(!world.set_cell(i64::MAX, 0, true).unwrap());
    assert!(!world.set_cell(0, i64::MIN, true).unwrap());
    assert!(!world.peek_cell(i64::MAX, i64::MIN));
}

#[test]
fn population_matches_live_cells_after_random_edits() {
    let mut world = World::new();
    let mut rng = rand::rngs::StdRng::seed_from_u64(0xD37E_A515);
    for _ in 0..5000 {
        let x = rng.random_range(-300..300);
        let y = rng.random_range(-300..300);
        world.set_cell(x, y, rng.random_bool(0.6)).unwrap();
    }
    assert_eq!(world.population(), world.live_cells().len() as u64);

    let mut engine = GenerationEngine::new();
    engine.step_n(&mut world, 5).unwrap();
    assert_eq!(world.population(), world.live_cells().len() as u64);
    let chunk_total: u64 = world.chunks().map(|(_, c)| c.live_count() as u64).sum();
    assert_eq!(chunk_total, world.population());
}

#[test]
fn stepping_is_deterministic() {
    let mut initial = Vec::new();
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x5EED_1234_ABCD_EF01);
    for y in -40..=40 {
        for x in -40..=40 {
            if rng.random::<f64>() < 0.3 {
                initial.push((x, y));
            }
        }
    }

    let run = || {
        let mut world = world_with(&initial);
        GenerationEngine::new().step_n(&mut world, 12).unwrap();
        (world.population(), world.live_cells())
    };
    assert_eq!(run(), run());
}

#[test]
fn dirty_list_tracks_changing_writes_only() {
    let mut world = World::new();
    assert!(world.set_cell(3, 3, true).unwrap());
    assert!(!world.set_cell(3, 3, true).unwrap());
    assert!(world.set_cell(70, 3, true).unwrap());
    assert!(world.set_cell(3, 4, true).unwrap());
    assert_eq!(
        world.dirty_chunks(),
        &[ChunkCoord::new(0, 0), ChunkCoord::new(1, 0), ChunkCoord::new(0, 0)]
    );

    let drained = world.take_dirty();
    assert_eq!(drained.len(), 3);
    assert!(world.dirty_chunks().is_empty());
    assert!(world.chunks().all(|(_, chunk)| !chunk.is_dirty()));

    // A dead write into an untouched chunk changes nothing.
    assert!(!world.set_cell(-500, -500, false).unwrap());
    assert!(world.dirty_chunks().is_empty());
}

#[test]
fn mid_simulation_edit_is_picked_up() {
    let mut world = world_with(&[(0, 0), (1, 0), (2, 0)]);
    let mut engine = GenerationEngine::new();

    engine.step(&mut world).unwrap();
    world.set_cell(5, 5, true).unwrap();
    assert!(world.peek_cell(5, 5));
    engine.step(&mut world).unwrap();
    assert!(!world.peek_cell(5, 5));
    assert_eq!(world.population(), 3);
}

#[test]
fn compact_drops_only_clean_empty_chunks() {
    let mut world = world_with(&[(0, 0), (100, 100)]);
    world.set_cell(100, 100, false).unwrap();
    assert_eq!(world.compact(), 0);
    world.take_dirty();
    assert_eq!(world.compact(), 1);
    assert_eq!(world.chunk_count(), 1);
    assert!(world.peek_cell(0, 0));
}

proptest! {
    #[test]
    fn floor_division_is_consistent(v in -COORD_LIMIT..=COORD_LIMIT) {
        let q = div_floor(v, 64);
        let r = mod_floor(v, 64);
        prop_assert!((0..64).contains(&r));
        prop_assert_eq!(q * 64 + r, v);
    }

    #[test]
    fn world_coordinate_maps_back(
        x in -COORD_LIMIT..=COORD_LIMIT,
        y in -COORD_LIMIT..=COORD_LIMIT,
    ) {
        let (base_x, base_y) = ChunkCoord::containing(x, y).world_base();
        let (lx, ly) = local_coord(x, y);
        prop_assert_eq!(base_x + lx as i64, x);
        prop_assert_eq!(base_y + ly as i64, y);
    }

    #[test]
    fn set_then_peek_round_trips(
        x in -COORD_LIMIT..=COORD_LIMIT,
        y in -COORD_LIMIT..=COORD_LIMIT,
    ) {
        let mut world = World::new();
        prop_assert!(world.set_cell(x, y, true).unwrap());
        prop_assert!(world.peek_cell(x, y));
        prop_assert_eq!(world.population(), 1);
        prop_assert!(world.set_cell(x, y, false).unwrap());
        prop_assert!(!world.peek_cell(x, y));
        prop_assert_eq!(world.population(), 0);
    }
}
