use core::cmp;

use crate::VisibleRange;
use crate::geometry::Geometry;

/// The items intersecting `[scroll_offset, scroll_offset + viewport_extent)`, without overscan.
///
/// Offsets past the end of the content clamp to the last item.
pub(crate) fn tight<T>(
    geometry: &Geometry<T>,
    scroll_offset: u64,
    viewport_extent: u32,
) -> Option<VisibleRange> {
    let count = geometry.len();
    if count == 0 || viewport_extent == 0 {
        return None;
    }
    let last = count - 1;
    let view = viewport_extent as u64;

    if let Some(height) = geometry.uniform_height() {
        let h = height as u64;
        let start = scroll_offset / h;
        let end_exclusive = scroll_offset.saturating_add(view).div_ceil(h);
        let start = clamp_index(start, last);
        let end = clamp_index(end_exclusive.saturating_sub(1), last);
        return Some(VisibleRange {
            start_index: start,
            end_index: cmp::max(start, end),
        });
    }

    let start = geometry.index_at(scroll_offset)?;
    let end = geometry.index_at(scroll_offset.saturating_add(view - 1))?;
    Some(VisibleRange {
        start_index: start,
        end_index: cmp::max(start, end),
    })
}

/// Expands `range` by `overscan` items on both sides, clamped to `[0, count - 1]`.
pub(crate) fn overscan(range: VisibleRange, overscan: usize, count: usize) -> VisibleRange {
    VisibleRange {
        start_index: range.start_index.saturating_sub(overscan),
        end_index: cmp::min(
            count.saturating_sub(1),
            range.end_index.saturating_add(overscan),
        ),
    }
}

fn clamp_index(index: u64, last: usize) -> usize {
    usize::try_from(index).map_or(last, |i| cmp::min(i, last))
}
