//! Dense random fills of growing size; step cost should track population.
//! Run with: cargo run --release --bin bench_scale

use rand::RngCore;
use rand::SeedableRng;
use std::time::Instant;
use chunk_life::chunklife::{CHUNK_SIZE, GenerationEngine, World};

fn bench_world(size: i64, density: f64, iterations: u64) -> (f64, u64, usize) {
    let mut world = World::new();
    let mut engine = GenerationEngine::new();
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x5EED_1234_ABCD_EF01);
    let threshold = (u64::MAX as f64 * density) as u64;

    for y in 0..size {
        for x in 0..size {
            if rng.next_u64() <= threshold {
                world.set_cell(x, y, true).expect("seed allocation");
            }
        }
    }
    world.take_dirty();

    let start = Instant::now();
    for _ in 0..iterations {
        engine.step(&mut world).expect("step allocation");
        world.take_dirty();
    }
    let duration = start.elapsed();

    (duration.as_secs_f64() * 1000.0, world.population(), world.chunk_count())
}

fn main() {
    let scales: &[(i64, u64)] = &[(128, 100), (256, 50), (512, 20), (1024, 10)];

    println!(
        "{:<10} {:>8} {:>8} {:>12} {:>10} {:>10}",
        "Grid", "Chunks", "Iters", "Total(ms)", "Avg(ms)", "Pop"
    );
    println!("{}", "-".repeat(64));

    for &(size, iters) in scales {
        let (total_ms, pop, chunks) = bench_world(size, 0.42, iters);
        let avg_ms = total_ms / iters as f64;
        println!(
            "{:<10} {:>8} {:>8} {:>12.1} {:>10.4} {:>10}",
            format!("{}x{}", size, size),
            chunks,
            iters,
            total_ms,
            avg_ms,
            pop
        );
    }
    println!("chunk side = {CHUNK_SIZE}");
}
