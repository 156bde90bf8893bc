use std::ops::RangeInclusive;

use alloy::primitives::BlockNumber;
use tracing::debug;

/// Maximum number of blocks per historical log query, sized for the stricter
/// public provider limits on `eth_getLogs`.
pub const DEFAULT_CHUNK_SIZE: u64 = 500;

/// A lazy plan of inclusive block windows covering `[from, to]`.
///
/// Every window spans at most `chunk_size` blocks; the last window is
/// truncated to `to`. Windows are consecutive and non-overlapping, so each
/// boundary block belongs to exactly one window. The plan is `Clone`, which
/// restarts iteration from the beginning. An inverted range yields no windows.
#[derive(Debug, Clone)]
pub struct ChunkPlan {
    current: BlockNumber,
    end: BlockNumber,
    chunk_size: u64,
    yielded: u64,
    total_chunks: u64,
}

impl ChunkPlan {
    /// Creates a plan over `[from, to]` with windows of at most `chunk_size`
    /// blocks.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is 0. Builder validation upstream makes this
    /// unreachable through the public API.
    #[must_use]
    pub const fn new(from: BlockNumber, to: BlockNumber, chunk_size: u64) -> Self {
        assert!(chunk_size >= 1, "chunk_size must be at least 1");
        let total_chunks = if from > to { 0 } else { (to - from) / chunk_size + 1 };
        Self { current: from, end: to, chunk_size, yielded: 0, total_chunks }
    }

    /// Total number of windows this plan yields.
    #[must_use]
    pub fn total_chunks(&self) -> u64 {
        self.total_chunks
    }
}

impl Iterator for ChunkPlan {
    type Item = RangeInclusive<BlockNumber>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.yielded >= self.total_chunks {
            return None;
        }

        self.yielded += 1;
        if self.yielded % 10 == 0 {
            debug!(yielded = self.yielded, total = self.total_chunks, "chunk plan progress");
        }

        let start = self.current;
        let end = start.saturating_add(self.chunk_size - 1).min(self.end);
        self.current = end.saturating_add(1);

        Some(start..=end)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.total_chunks - self.yielded) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }
}
