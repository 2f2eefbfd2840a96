use listwin::{ItemId, ListWindow};

/// A scroll anchor that preserves visual position across list replacements.
///
/// Typical use cases:
/// - chat/timeline "prepend" (load older messages above) without content jumping
/// - any reorder/replace where the viewport should stay pinned to an item identity
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollAnchor {
    pub id: ItemId,
    /// Distance from the anchor item's leading edge to the scroll offset.
    pub offset_in_viewport: u64,
}

/// Captures an anchor for the first item intersecting the viewport (overscan excluded).
///
/// Returns `None` if nothing is visible.
pub fn capture_first_visible_anchor<T>(w: &ListWindow<T>) -> Option<ScrollAnchor> {
    let tight = w.compute_tight_range(w.scroll_offset(), w.viewport_extent())?;
    anchor_for(w, tight.start_index)
}

/// Captures an anchor for the item found `offset_in_viewport` past the scroll offset.
///
/// `offset_in_viewport = 0` anchors the item at the leading edge of the viewport.
pub fn capture_anchor_at<T>(w: &ListWindow<T>, offset_in_viewport: u64) -> Option<ScrollAnchor> {
    let index = w.index_at_offset(w.scroll_offset().saturating_add(offset_in_viewport))?;
    anchor_for(w, index)
}

fn anchor_for<T>(w: &ListWindow<T>, index: usize) -> Option<ScrollAnchor> {
    let start = w.item_position(index)?;
    let id = w.item(index)?.id.clone();
    Some(ScrollAnchor {
        id,
        offset_in_viewport: w.scroll_offset().saturating_sub(start),
    })
}

/// Re-applies `anchor` to the current list by moving the scroll offset (clamped).
///
/// Returns `false` when the anchored item no longer exists.
pub fn apply_anchor<T>(w: &mut ListWindow<T>, anchor: &ScrollAnchor) -> bool {
    let Some(index) = w.index_of(&anchor.id) else {
        return false;
    };
    let Some(start) = w.item_position(index) else {
        return false;
    };
    w.set_scroll_offset_clamped(start.saturating_add(anchor.offset_in_viewport));
    true
}
