//! Gliders scattered over a huge area: cost should depend on live cells only,
//! not on the span they cover.
//! Run with: cargo run --release --bin bench_sparse

use rand::Rng;
use rand::SeedableRng;
use std::time::Instant;
use chunk_life::chunklife::{GenerationEngine, World};

const GLIDER: [(i64, i64); 5] = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];
const STEPS: u64 = 200;
const RUNS: usize = 3;

fn bench_gliders(label: &str, count: usize, spread: i64) {
    let mut best_ms = f64::MAX;
    let mut final_pop = 0;
    let mut final_chunks = 0;

    for _ in 0..RUNS {
        let mut world = World::new();
        let mut engine = GenerationEngine::new();
        let mut rng = rand::rngs::StdRng::seed_from_u64(0xC0FF_EE00_D15C_0B00);
        for _ in 0..count {
            let ox = rng.random_range(-spread..=spread);
            let oy = rng.random_range(-spread..=spread);
            world
                .set_cells_alive(GLIDER.iter().map(|&(x, y)| (ox + x, oy + y)))
                .expect("seed allocation");
        }

        let start = Instant::now();
        for _ in 0..STEPS {
            engine.step(&mut world).expect("step allocation");
            world.take_dirty();
        }
        let ms = start.elapsed().as_secs_f64() * 1000.0;
        if ms < best_ms {
            best_ms = ms;
        }
        final_pop = world.population();
        final_chunks = world.chunk_count();
    }

    println!(
        "{:<28} best={:.3} ms ({:.5} ms/step)  pop={}  chunks={}",
        label,
        best_ms,
        best_ms / STEPS as f64,
        final_pop,
        final_chunks
    );
}

fn main() {
    bench_gliders("100 gliders, span 1e4", 100, 10_000);
    bench_gliders("100 gliders, span 1e12", 100, 1_000_000_000_000);
    bench_gliders("1000 gliders, span 1e6", 1000, 1_000_000);
    bench_gliders("1000 gliders, span 1e15", 1000, 1_000_000_000_000_000);
}
