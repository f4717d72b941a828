//! Coordinate mapping between the unbounded world plane and chunk space.
//!
//! World coordinates are `i64`. A chunk coordinate is the floor division of a
//! world coordinate by `CHUNK_SIZE`; the local coordinate is the floored
//! modulo, always in `[0, CHUNK_SIZE)`.

use std::hash::{BuildHasher, Hasher};

use super::chunk::CHUNK_SIZE;

pub(crate) const CHUNK_SIZE_I64: i64 = CHUNK_SIZE as i64;

/// Largest magnitude accepted for a world coordinate.
///
/// Two chunk widths of headroom keep `v ± 2` (a neighbor of a candidate of a
/// live cell) and the chunk base computation clear of overflow.
pub const COORD_LIMIT: i64 = i64::MAX - 2 * CHUNK_SIZE_I64;

/// The 8 Moore-neighborhood offsets, row-major from the upper left.
pub const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1,  0),          (1,  0),
    (-1,  1), (0,  1), (1,  1),
];

#[inline(always)]
pub const fn in_safe_range(x: i64, y: i64) -> bool {
    x >= -COORD_LIMIT && x <= COORD_LIMIT && y >= -COORD_LIMIT && y <= COORD_LIMIT
}

/// Floor division. `i64::div` truncates toward zero, so a negative remainder
/// moves the quotient down by one.
#[inline(always)]
pub const fn div_floor(v: i64, n: i64) -> i64 {
    let q = v / n;
    if (v % n != 0) && ((v < 0) != (n < 0)) { q - 1 } else { q }
}

/// Floored modulo in `[0, n)` for positive `n`.
#[inline(always)]
pub const fn mod_floor(v: i64, n: i64) -> i64 {
    let r = v % n;
    if r < 0 { r + n } else { r }
}

/// Position of a chunk in chunk space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkCoord {
    pub x: i64,
    pub y: i64,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Chunk containing the world cell `(world_x, world_y)`.
    #[inline]
    pub const fn containing(world_x: i64, world_y: i64) -> Self {
        Self {
            x: div_floor(world_x, CHUNK_SIZE_I64),
            y: div_floor(world_y, CHUNK_SIZE_I64),
        }
    }

    /// World coordinate of local cell `(0, 0)`.
    #[inline]
    pub const fn world_base(self) -> (i64, i64) {
        (self.x * CHUNK_SIZE_I64, self.y * CHUNK_SIZE_I64)
    }

    #[inline]
    pub const fn offset(self, dx: i64, dy: i64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Local offset of a world cell inside its chunk.
#[inline]
pub const fn local_coord(world_x: i64, world_y: i64) -> (usize, usize) {
    (
        mod_floor(world_x, CHUNK_SIZE_I64) as usize,
        mod_floor(world_y, CHUNK_SIZE_I64) as usize,
    )
}

// ── Chunk-key hashing ───────────────────────────────────────────────────

/// Two distinct Fibonacci-derived constants so x and y are mixed
/// independently; a single-constant hash collides on grid-aligned keys.
const MX: u64 = 0x517c_c1b7_2722_0a95;
const MY: u64 = 0x6c62_272e_07bb_0142;

/// Hasher for `ChunkCoord` keys. The derived `Hash` feeds `x` then `y`
/// through `write_i64`; each lane gets its own multiplier.
#[derive(Default)]
pub struct ChunkHasher {
    hash: u64,
    lane: u8,
}

impl Hasher for ChunkHasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.hash = (self.hash ^ b as u64).wrapping_mul(MX);
        }
    }

    #[inline(always)]
    fn write_i64(&mut self, v: i64) {
        if self.lane == 0 {
            self.hash ^= (v as u64).wrapping_mul(MX);
        } else {
            self.hash ^= (v as u64).wrapping_mul(MY).rotate_right(31);
        }
        self.lane = self.lane.wrapping_add(1);
    }

    #[inline(always)]
    fn finish(&self) -> u64 {
        self.hash
    }
}

#[derive(Clone, Copy, Default)]
pub struct BuildChunkHasher;

impl BuildHasher for BuildChunkHasher {
    type Hasher = ChunkHasher;

    #[inline]
    fn build_hasher(&self) -> ChunkHasher {
        ChunkHasher::default()
    }
}
