use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::Cell;
use core::cmp;

use crate::geometry::Geometry;
use crate::metrics::{MetricEvent, MetricsSink};
use crate::options::sanitize_threshold;
use crate::range;
use crate::{
    Align, AriaPosition, Axis, FocusState, HeightDescriptor, Item, ItemId, ItemStyle,
    ListWindowOptions, NavKey, ScrollDirection, ScrollEvent, ScrollState, VisibleRange,
    WindowState,
};

/// A headless list-windowing engine.
///
/// This type is intentionally UI-agnostic:
/// - It does not hold any UI objects.
/// - Your adapter drives it with scroll events, viewport resizes, focus changes and keys.
/// - Rendering is exposed via [`Self::for_each_visible_item`] / [`Self::render_items`], which
///   hand each item its placement along the scroll axis.
///
/// Heights and positions are memoized per item-list generation. Replacing the list (a new
/// `Arc`) or the height descriptor drops every cache at once.
///
/// For viewport subscriptions, smooth scrolling and anchoring, see the `listwin-adapter` crate.
#[derive(Clone, Debug)]
pub struct ListWindow<T> {
    options: ListWindowOptions<T>,
    geometry: Geometry<T>,
    scroll_offset: u64,
    is_scrolling: bool,
    scroll_direction: Option<ScrollDirection>,
    last_scroll_event_ms: Option<u64>,

    focused_index: Option<usize>,
    has_focus: bool,

    rendered: Cell<Option<VisibleRange>>,
    notify_depth: Cell<usize>,
    notify_pending: Cell<bool>,
}

impl<T> ListWindow<T> {
    /// Creates an engine over `items`.
    ///
    /// If a range is visible right away, `on_items_rendered` fires before this returns.
    pub fn new(items: impl Into<Arc<[Item<T>]>>, mut options: ListWindowOptions<T>) -> Self {
        let items = items.into();
        options.end_reached_threshold = sanitize_threshold(options.end_reached_threshold);
        ldebug!(
            items = items.len(),
            viewport_extent = options.viewport_extent,
            overscan = options.overscan,
            "ListWindow::new"
        );
        let geometry = Geometry::new(items, &options.height, options.metrics.clone());
        let w = Self {
            scroll_offset: options.initial_offset,
            geometry,
            options,
            is_scrolling: false,
            scroll_direction: None,
            last_scroll_event_ms: None,
            focused_index: None,
            has_focus: false,
            rendered: Cell::new(None),
            notify_depth: Cell::new(0),
            notify_pending: Cell::new(false),
        };
        w.notify();
        w
    }

    pub fn options(&self) -> &ListWindowOptions<T> {
        &self.options
    }

    /// Replaces the configuration.
    ///
    /// Geometry caches are only dropped when the height descriptor (or the metrics sink) is
    /// not the same as before.
    pub fn set_options(&mut self, mut options: ListWindowOptions<T>) {
        options.end_reached_threshold = sanitize_threshold(options.end_reached_threshold);
        let rebuild = !self.options.height.same_as(&options.height)
            || !same_sink(&self.options.metrics, &options.metrics);
        self.options = options;
        ltrace!(
            viewport_extent = self.options.viewport_extent,
            overscan = self.options.overscan,
            rebuild,
            "ListWindow::set_options"
        );
        if rebuild {
            self.rebuild_geometry(Arc::clone(self.geometry.items()));
        }
        self.notify();
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut ListWindowOptions<T>)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    fn notify_now(&self) {
        let range = self.visible_range();
        if range == self.rendered.get() {
            return;
        }
        self.rendered.set(range);
        let Some(range) = range else {
            return;
        };
        self.record(MetricEvent::RangeChanged {
            start_index: range.start_index,
            end_index: range.end_index,
        });
        if let Some(cb) = &self.options.on_items_rendered {
            let items = &self.geometry.items()[range.indexes()];
            cb(range.start_index, range.end_index, items);
        }
    }

    fn notify(&self) {
        if self.notify_depth.get() > 0 {
            self.notify_pending.set(true);
            return;
        }
        self.notify_now();
    }

    /// Batches multiple updates into a single `on_items_rendered` notification.
    ///
    /// Use this when a list replacement and a scroll arrive together: the list is applied
    /// first, and the range is computed once from the resulting state.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        let depth = self.notify_depth.get();
        self.notify_depth.set(depth.saturating_add(1));

        f(self);

        let depth = self.notify_depth.get();
        debug_assert!(depth > 0, "notify_depth underflow");
        let next = depth.saturating_sub(1);
        self.notify_depth.set(next);

        if next == 0 && self.notify_pending.replace(false) {
            self.notify_now();
        }
    }

    fn record(&self, event: MetricEvent) {
        if let Some(m) = &self.options.metrics {
            m.record(&event);
        }
    }

    // --- items & geometry ---

    pub fn items(&self) -> &Arc<[Item<T>]> {
        self.geometry.items()
    }

    pub fn len(&self) -> usize {
        self.geometry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn item(&self, index: usize) -> Option<&Item<T>> {
        self.geometry.items().get(index)
    }

    pub fn axis(&self) -> Axis {
        self.options.axis
    }

    /// Replaces the item list.
    ///
    /// Lists are compared by identity: passing the same `Arc` is a no-op and returns `false`.
    /// A new list drops all geometry caches, keeps the current scroll offset, and clears the
    /// focused index only if it no longer exists.
    pub fn set_items(&mut self, items: Arc<[Item<T>]>) -> bool {
        if Arc::ptr_eq(self.geometry.items(), &items) {
            return false;
        }
        ldebug!(prev = self.len(), next = items.len(), "ListWindow::set_items");
        self.rebuild_geometry(items);
        if self.focused_index.is_some_and(|i| i >= self.len()) {
            self.focused_index = None;
        }
        self.notify();
        true
    }

    pub fn set_height(&mut self, height: HeightDescriptor<T>) {
        if self.options.height.same_as(&height) {
            return;
        }
        self.options.height = height;
        self.rebuild_geometry(Arc::clone(self.geometry.items()));
        self.notify();
    }

    fn rebuild_geometry(&mut self, items: Arc<[Item<T>]>) {
        self.geometry = Geometry::new(items, &self.options.height, self.options.metrics.clone());
        // Same indexes may now hold different items, so the next range is always reported.
        self.rendered.set(None);
    }

    pub fn item_height(&self, index: usize) -> Option<u32> {
        self.geometry.height(index)
    }

    /// Leading edge of item `index` along the scroll axis.
    pub fn item_position(&self, index: usize) -> Option<u64> {
        self.geometry.position(index)
    }

    pub fn item_end(&self, index: usize) -> Option<u64> {
        let start = self.item_position(index)?;
        let size = self.item_height(index)? as u64;
        Some(start.saturating_add(size))
    }

    pub fn total_extent(&self) -> u64 {
        self.geometry.total_extent()
    }

    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        self.geometry.index_at(offset)
    }

    /// Looks up the current index of an item by id.
    pub fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.geometry.index_of(id)
    }

    pub fn item_style(&self, index: usize) -> Option<ItemStyle> {
        Some(ItemStyle {
            axis: self.options.axis,
            start: self.item_position(index)?,
            size: self.item_height(index)?,
            aria: self.aria_position(index),
        })
    }

    // --- viewport & ranges ---

    pub fn viewport_extent(&self) -> u32 {
        self.options.viewport_extent
    }

    pub fn set_viewport_extent(&mut self, extent: u32) {
        if self.options.viewport_extent == extent {
            return;
        }
        self.options.viewport_extent = extent;
        self.notify();
    }

    pub fn overscan(&self) -> usize {
        self.options.overscan
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.options.overscan = overscan;
        self.notify();
    }

    pub fn set_end_reached_threshold(&mut self, threshold: f64) {
        self.options.end_reached_threshold = sanitize_threshold(threshold);
    }

    /// The range to render at the current scroll offset, including overscan.
    pub fn visible_range(&self) -> Option<VisibleRange> {
        self.compute_visible_range(self.scroll_offset, self.options.viewport_extent)
    }

    /// The range to render for an arbitrary offset/extent, including overscan.
    pub fn compute_visible_range(
        &self,
        scroll_offset: u64,
        viewport_extent: u32,
    ) -> Option<VisibleRange> {
        let tight = range::tight(&self.geometry, scroll_offset, viewport_extent)?;
        Some(range::overscan(tight, self.options.overscan, self.len()))
    }

    /// The items actually intersecting the viewport, without overscan.
    pub fn compute_tight_range(
        &self,
        scroll_offset: u64,
        viewport_extent: u32,
    ) -> Option<VisibleRange> {
        range::tight(&self.geometry, scroll_offset, viewport_extent)
    }

    /// Calls `f` for every item in [`Self::visible_range`], in index order.
    pub fn for_each_visible_item(&self, mut f: impl FnMut(&Item<T>, usize, ItemStyle)) {
        let Some(range) = self.visible_range() else {
            return;
        };
        for index in range.indexes() {
            if let (Some(item), Some(style)) = (self.item(index), self.item_style(index)) {
                f(item, index, style);
            }
        }
    }

    /// Maps every visible item through `render_item` and collects the results.
    pub fn render_items<R>(
        &self,
        mut render_item: impl FnMut(&Item<T>, usize, ItemStyle) -> R,
    ) -> Vec<R> {
        let mut out = Vec::with_capacity(self.visible_range().map_or(0, |r| r.count()));
        self.for_each_visible_item(|item, index, style| out.push(render_item(item, index, style)));
        out
    }

    /// Collects visible indexes into `out` (clears `out` first).
    pub fn collect_visible_indexes(&self, out: &mut Vec<usize>) {
        out.clear();
        if let Some(range) = self.visible_range() {
            out.extend(range.indexes());
        }
    }

    // --- scrolling ---

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    pub fn scroll_direction(&self) -> Option<ScrollDirection> {
        self.scroll_direction
    }

    pub fn max_scroll_offset(&self) -> u64 {
        self.total_extent()
            .saturating_sub(self.options.viewport_extent as u64)
    }

    pub fn clamp_scroll_offset(&self, offset: u64) -> u64 {
        offset.min(self.max_scroll_offset())
    }

    /// Moves the scroll offset without marking the list as scrolling.
    pub fn set_scroll_offset(&mut self, offset: u64) {
        if self.scroll_offset == offset {
            return;
        }
        let prev = self.scroll_offset;
        self.scroll_offset = offset;
        self.scroll_direction = match offset.cmp(&prev) {
            cmp::Ordering::Greater => Some(ScrollDirection::Forward),
            cmp::Ordering::Less => Some(ScrollDirection::Backward),
            cmp::Ordering::Equal => self.scroll_direction,
        };
        self.notify();
    }

    pub fn set_scroll_offset_clamped(&mut self, offset: u64) {
        let clamped = self.clamp_scroll_offset(offset);
        self.set_scroll_offset(clamped);
    }

    /// Handles a raw scroll event from the host.
    ///
    /// Picks the offset along the configured axis and delegates to
    /// [`Self::apply_scroll_offset`].
    pub fn on_scroll(&mut self, event: ScrollEvent, now_ms: u64) {
        let offset = event.offset_along(self.options.axis);
        self.apply_scroll_offset(offset, now_ms);
    }

    /// Applies a user scroll: updates the offset, marks the list as scrolling, reports the raw
    /// offset and any range change, then runs end-reached detection.
    pub fn apply_scroll_offset(&mut self, offset: u64, now_ms: u64) {
        ltrace!(offset, now_ms, "apply_scroll_offset");
        self.batch_update(|w| {
            w.set_scroll_offset(offset);
            w.notify_scroll_event(now_ms);
            if let Some(cb) = &w.options.on_scroll {
                cb(offset);
            }
        });
        self.check_end_reached();
    }

    pub fn set_is_scrolling(&mut self, is_scrolling: bool) {
        if self.is_scrolling == is_scrolling {
            return;
        }
        self.is_scrolling = is_scrolling;
        if !is_scrolling {
            self.scroll_direction = None;
            self.last_scroll_event_ms = None;
        }
    }

    pub fn notify_scroll_event(&mut self, now_ms: u64) {
        self.last_scroll_event_ms = Some(now_ms);
        self.set_is_scrolling(true);
    }

    /// Clears `is_scrolling` once no scroll event has arrived for
    /// `is_scrolling_reset_delay_ms`.
    ///
    /// Call this from your frame/timer tick.
    pub fn update_scrolling(&mut self, now_ms: u64) {
        if !self.is_scrolling {
            return;
        }
        let Some(last) = self.last_scroll_event_ms else {
            return;
        };
        if now_ms.saturating_sub(last) >= self.options.is_scrolling_reset_delay_ms {
            self.set_is_scrolling(false);
        }
    }

    /// Current offset as a fraction of the scrollable extent.
    ///
    /// `None` when the content fits in the viewport (nothing to scroll).
    pub fn scroll_fraction(&self) -> Option<f64> {
        let max = self.max_scroll_offset();
        if max == 0 {
            return None;
        }
        Some(self.scroll_offset as f64 / max as f64)
    }

    fn check_end_reached(&self) -> bool {
        let Some(cb) = &self.options.on_end_reached else {
            return false;
        };
        let Some(fraction) = self.scroll_fraction() else {
            return false;
        };
        if fraction < self.options.end_reached_threshold {
            return false;
        }
        ltrace!(fraction, "end reached");
        self.record(MetricEvent::EndReached {
            scroll_fraction: fraction,
        });
        cb();
        true
    }

    /// Computes the clamped offset that brings item `index` into view with `align`.
    ///
    /// Returns `None` for out-of-range indexes.
    pub fn scroll_to_item_offset(&self, index: usize, align: Align) -> Option<u64> {
        let start = self.item_position(index)?;
        let size = self.item_height(index)? as u64;
        let end = start.saturating_add(size);
        let view = self.options.viewport_extent as u64;

        let target = match align {
            Align::Start => start,
            Align::End => end.saturating_sub(view),
            Align::Center => {
                if view >= size {
                    start.saturating_sub((view - size) / 2)
                } else {
                    start.saturating_add((size - view) / 2)
                }
            }
            Align::Auto => {
                let cur = self.scroll_offset;
                let cur_end = cur.saturating_add(view);
                if start >= cur && end <= cur_end {
                    return Some(cur);
                } else if start < cur {
                    start
                } else {
                    end.saturating_sub(view)
                }
            }
        };

        Some(self.clamp_scroll_offset(target))
    }

    /// Programmatically scrolls to an item (no animation).
    ///
    /// This sets the internal offset to the computed (clamped) target. It does **not** mark the
    /// list as scrolling; the host container is expected to echo a scroll event once it has
    /// applied the returned offset.
    ///
    /// Out-of-range indexes are ignored and return `None`.
    pub fn scroll_to_item(&mut self, index: usize, align: Align) -> Option<u64> {
        let offset = self.scroll_to_item_offset(index, align)?;
        ltrace!(index, offset, "scroll_to_item");
        self.record(MetricEvent::ScrollToItem {
            index,
            align,
            offset,
        });
        self.set_scroll_offset(offset);
        Some(offset)
    }

    // --- focus & keyboard ---

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    /// Records whether the list container holds focus. Keys are ignored while it does not.
    pub fn set_has_focus(&mut self, has_focus: bool) {
        self.has_focus = has_focus;
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focused_index
    }

    /// Moves keyboard focus to `index` and scrolls it into view.
    ///
    /// Returns `false` (and changes nothing) for out-of-range indexes.
    pub fn focus_item(&mut self, index: usize) -> bool {
        if index >= self.len() {
            return false;
        }
        self.focused_index = Some(index);
        self.scroll_to_item(index, Align::Auto);
        true
    }

    pub fn clear_focused_item(&mut self) {
        self.focused_index = None;
    }

    /// Number of items a PageUp/PageDown moves by: how many average-sized items fit in the
    /// viewport, at least one.
    pub fn page_size(&self) -> usize {
        let count = self.len();
        let total = self.total_extent();
        if count == 0 || total == 0 {
            return 1;
        }
        // viewport / (total / count), without rounding the average first.
        let page = self.options.viewport_extent as u128 * count as u128 / total as u128;
        usize::try_from(page).unwrap_or(usize::MAX).max(1)
    }

    /// Handles a navigation key. Returns `true` when the key was consumed.
    pub fn handle_key(&mut self, key: NavKey) -> bool {
        if !self.has_focus || self.is_empty() {
            return false;
        }
        let last = (self.len() - 1) as i64;
        let cur = self.focused_index.map_or(-1, |i| i as i64);
        let page = self.page_size() as i64;
        let next = match key {
            NavKey::ArrowDown | NavKey::ArrowRight => cmp::min(last, cur + 1),
            NavKey::ArrowUp | NavKey::ArrowLeft => cmp::max(0, cur - 1),
            NavKey::Home => 0,
            NavKey::End => last,
            NavKey::PageDown => cmp::min(last, cur.saturating_add(page)),
            NavKey::PageUp => cmp::max(0, cur.saturating_sub(page)),
            NavKey::Other => return false,
        };
        ltrace!(?key, next, "handle_key");
        self.focus_item(next.clamp(0, last) as usize)
    }

    /// "Item N of M" metadata. Only the focused item carries it.
    pub fn aria_position(&self, index: usize) -> Option<AriaPosition> {
        (self.focused_index == Some(index)).then(|| AriaPosition {
            posinset: index + 1,
            setsize: self.len(),
        })
    }

    pub fn focused_aria(&self) -> Option<AriaPosition> {
        self.aria_position(self.focused_index?)
    }

    // --- snapshots ---

    /// Returns a lightweight snapshot of the current scroll state.
    pub fn scroll_state(&self) -> ScrollState {
        ScrollState {
            offset: self.scroll_offset,
            is_scrolling: self.is_scrolling,
        }
    }

    pub fn focus_state(&self) -> FocusState {
        FocusState {
            focused_index: self.focused_index,
            has_focus: self.has_focus,
        }
    }

    /// Returns a combined snapshot of viewport, scroll and focus state.
    pub fn window_state(&self) -> WindowState {
        WindowState {
            viewport_extent: self.options.viewport_extent,
            scroll: self.scroll_state(),
            focus: self.focus_state(),
        }
    }

    /// Restores a previously captured snapshot.
    ///
    /// When `state.scroll.is_scrolling` is `true`, the scrolling timers restart as if a scroll
    /// event happened at `now_ms`. A focused index that no longer exists is dropped.
    pub fn restore_window_state(&mut self, state: WindowState, now_ms: u64) {
        self.batch_update(|w| {
            w.set_viewport_extent(state.viewport_extent);
            w.set_scroll_offset_clamped(state.scroll.offset);
            if state.scroll.is_scrolling {
                w.notify_scroll_event(now_ms);
            } else {
                w.set_is_scrolling(false);
            }
            w.has_focus = state.focus.has_focus;
            w.focused_index = state.focus.focused_index.filter(|&i| i < w.len());
        });
    }
}

fn same_sink(a: &Option<Arc<dyn MetricsSink>>, b: &Option<Arc<dyn MetricsSink>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}
