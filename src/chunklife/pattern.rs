//! Life 1.06 plain-text pattern files.
//!
//! ```text
//! #Life 1.06
//! # Generated by chunk-life
//! # Viewport: <x> <y>
//! # Speed: <1..10>
//! <x> <y>
//! ```
//!
//! `#` lines are comments; the viewport and speed comments carry optional
//! metadata. Every other non-blank line is one live cell.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{info, warn};

use super::coord::in_safe_range;
use super::error::{LifeError, LifeResult};
use super::world::World;

pub const PATTERN_HEADER: &str = "#Life 1.06";
pub const GENERATOR_NAME: &str = "chunk-life";

const VIEWPORT_TAG: &str = "Viewport:";
const SPEED_TAG: &str = "Speed:";

/// Metadata carried in pattern comments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PatternMeta {
    pub viewport: Option<(i64, i64)>,
    /// Raw speed value as written; range checks belong to the caller.
    pub speed: Option<i64>,
}

/// A fully parsed pattern file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pattern {
    pub meta: PatternMeta,
    pub cells: Vec<(i64, i64)>,
}

fn parse_ints<const N: usize>(text: &str) -> Option<[i64; N]> {
    let mut out = [0i64; N];
    let mut tokens = text.split_whitespace();
    for slot in &mut out {
        *slot = tokens.next()?.parse().ok()?;
    }
    tokens.next().is_none().then_some(out)
}

impl Pattern {
    /// Parse pattern text. The first malformed cell line aborts the parse.
    pub fn parse(text: &str) -> LifeResult<Self> {
        let mut pattern = Pattern::default();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(comment) = line.strip_prefix('#') {
                let comment = comment.trim_start();
                if let Some(rest) = comment.strip_prefix(VIEWPORT_TAG) {
                    if let Some([x, y]) = parse_ints::<2>(rest) {
                        pattern.meta.viewport = Some((x, y));
                    }
                } else if let Some(rest) = comment.strip_prefix(SPEED_TAG) {
                    if let Some([speed]) = parse_ints::<1>(rest) {
                        pattern.meta.speed = Some(speed);
                    }
                }
                continue;
            }
            match parse_ints::<2>(line) {
                Some([x, y]) => pattern.cells.push((x, y)),
                None => {
                    return Err(LifeError::Malformed {
                        line: index + 1,
                        content: raw.to_owned(),
                    });
                }
            }
        }
        Ok(pattern)
    }

    /// Replace the contents of `world` with this pattern.
    /// Returns the number of live cells written.
    pub fn apply(&self, world: &mut World) -> LifeResult<u64> {
        let rejected = self
            .cells
            .iter()
            .filter(|&&(x, y)| !in_safe_range(x, y))
            .count();
        if rejected > 0 {
            warn!(rejected, "ignoring cells outside the addressable range");
        }
        world.clear();
        world.set_cells_alive(self.cells.iter().copied())
    }
}

/// Read and parse a pattern file.
///
/// Nothing is applied to any world here; a malformed file yields an error
/// and no cells, so loads are all-or-nothing.
pub fn load_pattern(path: impl AsRef<Path>) -> LifeResult<Pattern> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| LifeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let pattern = Pattern::parse(&text)?;
    info!(path = %path.display(), cells = pattern.cells.len(), "pattern loaded");
    Ok(pattern)
}

/// Write `world` in Life 1.06 form. Cells come out chunk-then-row-then-column.
pub fn write_pattern<W: Write>(world: &World, meta: &PatternMeta, mut out: W) -> std::io::Result<()> {
    writeln!(out, "{PATTERN_HEADER}")?;
    writeln!(out, "# Generated by {GENERATOR_NAME}")?;
    if let Some((x, y)) = meta.viewport {
        writeln!(out, "# {VIEWPORT_TAG} {x} {y}")?;
    }
    if let Some(speed) = meta.speed {
        writeln!(out, "# {SPEED_TAG} {speed}")?;
    }

    let mut result = Ok(());
    world.for_each_live(|x, y| {
        if result.is_ok() {
            result = writeln!(out, "{x} {y}");
        }
    });
    result?;
    out.flush()
}

/// Save `world` to `path`. The world is never modified.
pub fn save_pattern(world: &World, meta: &PatternMeta, path: impl AsRef<Path>) -> LifeResult<()> {
    let path = path.as_ref();
    let io_err = |source| LifeError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    write_pattern(world, meta, BufWriter::new(file)).map_err(io_err)?;
    info!(path = %path.display(), cells = world.population(), "pattern saved");
    Ok(())
}
