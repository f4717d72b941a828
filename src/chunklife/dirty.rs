//! Dirty-chunk tracking for incremental redraw.

use std::collections::TryReserveError;

use super::coord::ChunkCoord;

/// Ordered record of chunk coordinates touched by changing writes.
///
/// One entry is appended per changing write, so a chunk may appear more than
/// once between drains. Draining is the renderer's job and must not overlap
/// with new writes.
#[derive(Clone, Debug, Default)]
pub struct DirtyTracker {
    list: Vec<ChunkCoord>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make room for `additional` entries so the following records cannot
    /// fail.
    #[inline]
    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.list.try_reserve(additional)
    }

    #[inline]
    pub(crate) fn record(&mut self, coord: ChunkCoord) {
        self.list.push(coord);
    }

    #[inline]
    pub fn as_slice(&self) -> &[ChunkCoord] {
        &self.list
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Hand the pending list to the caller, leaving this tracker empty.
    pub fn take(&mut self) -> Vec<ChunkCoord> {
        std::mem::take(&mut self.list)
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::DirtyTracker;
    use crate::chunklife::coord::ChunkCoord;

    #[test]
    fn keeps_order_and_duplicates_until_taken() {
        let mut dirty = DirtyTracker::new();
        dirty.record(ChunkCoord::new(1, 0));
        dirty.record(ChunkCoord::new(-1, 2));
        dirty.record(ChunkCoord::new(1, 0));
        assert_eq!(dirty.len(), 3);

        let drained = dirty.take();
        assert_eq!(
            drained,
            vec![ChunkCoord::new(1, 0), ChunkCoord::new(-1, 2), ChunkCoord::new(1, 0)]
        );
        assert!(dirty.is_empty());
    }
}
