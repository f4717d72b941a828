//! Bit-packed chunk storage.
//!
//! A chunk is a `CHUNK_SIZE`×`CHUNK_SIZE` block of cells. Local position
//! `pos = y * CHUNK_SIZE + x` lives in word `pos / 64` at bit `pos % 64`;
//! with a 64-cell side that is one `u64` per row, bit `x` of row `y`.

pub const CHUNK_SIZE: usize = 64;

const WORD_BITS: usize = u64::BITS as usize;
const WORDS: usize = CHUNK_SIZE * CHUNK_SIZE / WORD_BITS;

/// One block of cells with its cached population and redraw flag.
///
/// `live_count` always equals the population count of `bitmap`; only
/// `set_bit` mutates either.
#[derive(Clone, Debug)]
#[repr(C, align(64))]
pub struct Chunk {
    bitmap: [u64; WORDS],
    live_count: u32,
    dirty: bool,
}

impl Default for Chunk {
    fn default() -> Self {
        Self::empty()
    }
}

impl Chunk {
    pub const fn empty() -> Self {
        Self {
            bitmap: [0; WORDS],
            live_count: 0,
            dirty: false,
        }
    }

    #[inline(always)]
    fn locate(x: usize, y: usize) -> Option<(usize, u64)> {
        if x >= CHUNK_SIZE || y >= CHUNK_SIZE {
            return None;
        }
        let pos = y * CHUNK_SIZE + x;
        Some((pos / WORD_BITS, 1u64 << (pos % WORD_BITS)))
    }

    /// Read local cell `(x, y)`. Out-of-range input reads as dead.
    #[inline]
    pub fn get_bit(&self, x: usize, y: usize) -> bool {
        match Self::locate(x, y) {
            Some((word, mask)) => self.bitmap[word] & mask != 0,
            None => false,
        }
    }

    /// Write local cell `(x, y)`.
    ///
    /// Returns `true` if the bit changed. An unchanged bit leaves
    /// `live_count` and `dirty` untouched, as does out-of-range input.
    #[inline]
    pub fn set_bit(&mut self, x: usize, y: usize, value: bool) -> bool {
        let Some((word, mask)) = Self::locate(x, y) else {
            return false;
        };
        let row = &mut self.bitmap[word];
        if (*row & mask != 0) == value {
            return false;
        }
        if value {
            *row |= mask;
            self.live_count += 1;
        } else {
            *row &= !mask;
            self.live_count -= 1;
        }
        self.dirty = true;
        true
    }

    #[inline]
    pub fn live_count(&self) -> u32 {
        self.live_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Called by the renderer once the chunk has been redrawn.
    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Raw row words, row `y` at index `y`.
    #[inline]
    pub fn rows(&self) -> &[u64; WORDS] {
        &self.bitmap
    }

    pub fn compute_population(&self) -> u32 {
        self.bitmap.iter().map(|row| row.count_ones()).sum()
    }

    /// Visit every live local cell in row-then-column order.
    pub fn for_each_live<F: FnMut(usize, usize)>(&self, mut f: F) {
        if self.live_count == 0 {
            return;
        }
        for (y, &row) in self.bitmap.iter().enumerate() {
            let mut bits = row;
            while bits != 0 {
                let x = bits.trailing_zeros() as usize;
                f(x, y);
                bits &= bits - 1;
            }
        }
    }
}
