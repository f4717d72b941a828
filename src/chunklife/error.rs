//! Error types for the chunked Life engine.

use std::collections::TryReserveError;
use std::path::PathBuf;

use thiserror::Error;

use super::coord::ChunkCoord;

#[derive(Debug, Error)]
pub enum LifeError {
    /// A pattern file could not be opened, read, or written.
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A non-comment pattern line is not two whitespace-separated integers.
    #[error("malformed pattern line {line}: {content:?}")]
    Malformed { line: usize, content: String },

    /// Growing the chunk map or the dirty list failed.
    #[error("allocation failed near chunk ({}, {})", coord.x, coord.y)]
    ChunkAllocation {
        coord: ChunkCoord,
        #[source]
        source: TryReserveError,
    },

    /// Growing the generation engine's candidate or update buffers failed.
    #[error("generation scratch allocation failed: {0}")]
    ScratchAllocation(#[source] TryReserveError),

    #[error("speed level {0} outside 1..=10")]
    InvalidSpeed(i64),

    #[error("precompute rounds {0} outside 1..=1000")]
    InvalidRounds(u64),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
}

pub type LifeResult<T> = Result<T, LifeError>;
