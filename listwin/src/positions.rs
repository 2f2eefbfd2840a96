use alloc::vec::Vec;

/// Dense, lazily extended height/position table for one list generation.
///
/// Entries are appended in index order only. `ends[i]` is the trailing edge of item `i`, so
/// the leading edge of item `i` is `ends[i - 1]` (or `0` for the first item).
#[derive(Clone, Debug, Default)]
pub(crate) struct PositionCache {
    heights: Vec<u32>,
    ends: Vec<u64>,
}

impl PositionCache {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            heights: Vec::with_capacity(n),
            ends: Vec::with_capacity(n),
        }
    }

    /// Number of leading items whose height has been resolved.
    pub(crate) fn resolved(&self) -> usize {
        self.heights.len()
    }

    /// Trailing edge of the last resolved item.
    pub(crate) fn resolved_end(&self) -> u64 {
        self.ends.last().copied().unwrap_or(0)
    }

    pub(crate) fn push(&mut self, height: u32) {
        let end = self.resolved_end().saturating_add(height as u64);
        self.heights.push(height);
        self.ends.push(end);
    }

    /// Height of a resolved item.
    pub(crate) fn height(&self, index: usize) -> u32 {
        self.heights[index]
    }

    /// Leading edge of item `index`. Valid for `index <= resolved()`.
    pub(crate) fn position(&self, index: usize) -> u64 {
        if index == 0 {
            0
        } else {
            self.ends[index - 1]
        }
    }

    /// Returns the first resolved item whose trailing edge is past `offset`, i.e. the item
    /// containing `offset`. Returns `resolved()` when `offset` lies past every resolved item.
    pub(crate) fn index_containing(&self, offset: u64) -> usize {
        self.ends.partition_point(|&end| end <= offset)
    }
}
