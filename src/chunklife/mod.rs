//! Chunked sparse Life engine and the session state around it.

mod cells;
pub mod chunk;
pub mod coord;
mod dirty;
pub mod engine;
pub mod error;
pub mod pattern;
pub mod session;
pub mod viewport;
pub mod world;

pub use chunk::{CHUNK_SIZE, Chunk};
pub use coord::{COORD_LIMIT, ChunkCoord, div_floor, mod_floor};
pub use dirty::DirtyTracker;
pub use engine::{GenerationEngine, StepStats};
pub use error::{LifeError, LifeResult};
pub use pattern::{Pattern, PatternMeta, load_pattern, save_pattern, write_pattern};
pub use session::{LifeConfig, LifeSession};
pub use viewport::{SpeedLevel, Viewport};
pub use world::World;
