//! Sparse chunked Conway's Game of Life engine (B3/S23) on an unbounded plane.

pub mod chunklife;
pub use chunklife::{
    GenerationEngine, LifeConfig, LifeError, LifeSession, SpeedLevel, Viewport, World,
};
