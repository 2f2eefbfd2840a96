use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use listwin::{Align, Axis, Item, ItemStyle, ListWindow, ListWindowOptions};

use crate::{
    Easing, ScrollAnchor, SubscriptionId, Tween, ViewportAdapter, ViewportEvent, apply_anchor,
    capture_first_visible_anchor,
};

type Inbox = Arc<Mutex<VecDeque<ViewportEvent>>>;

/// A [`ListWindow`] bound to a scroll container.
///
/// Container events are queued as they arrive and processed strictly in delivery order by
/// [`Self::pump`] (also called at the start of every [`Self::tick`]). Programmatic scrolls are
/// pushed to the container, and the container's echo of them is told apart from user
/// scrolling so it does not cancel an in-flight smooth scroll.
///
/// The host calls `tick(now_ms)` from its frame/timer loop; it advances smooth scrolling and
/// the `is_scrolling` debounce.
pub struct ListView<T, V: ViewportAdapter> {
    window: ListWindow<T>,
    viewport: V,
    inbox: Inbox,
    subscription: SubscriptionId,
    tween: Option<Tween>,
    echoes: VecDeque<u64>,
}

impl<T, V: ViewportAdapter> ListView<T, V> {
    /// Subscribes to `viewport` and sizes the window from it.
    ///
    /// `options.viewport_extent` is replaced by the container's extent along `options.axis`.
    pub fn new(
        items: impl Into<Arc<[Item<T>]>>,
        mut options: ListWindowOptions<T>,
        mut viewport: V,
    ) -> Self {
        let inbox: Inbox = Arc::new(Mutex::new(VecDeque::new()));
        let subscription = viewport.subscribe(Box::new({
            let inbox = Arc::clone(&inbox);
            move |event: &ViewportEvent| lock(&inbox).push_back(*event)
        }));
        options.viewport_extent = viewport.extent(options.axis);
        adebug!(
            axis = ?options.axis,
            viewport_extent = options.viewport_extent,
            "ListView::new"
        );

        let mut view = Self {
            window: ListWindow::new(items, options),
            viewport,
            inbox,
            subscription,
            tween: None,
            echoes: VecDeque::new(),
        };
        view.sync_viewport();
        view
    }

    pub fn window(&self) -> &ListWindow<T> {
        &self.window
    }

    /// Direct access to the engine. Call [`Self::sync_viewport`] after changing the scroll
    /// offset or the geometry through it.
    pub fn window_mut(&mut self) -> &mut ListWindow<T> {
        &mut self.window
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    /// Direct access to the container. Events it emits are queued for the next `pump`.
    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    fn axis(&self) -> Axis {
        self.window.axis()
    }

    /// Pushes the content size and the window's scroll offset to the container.
    pub fn sync_viewport(&mut self) {
        let axis = self.axis();
        let before = self.viewport.scroll_offset(axis);
        self.viewport
            .set_content_extent(axis, self.window.total_extent());
        // Shrinking content makes the container re-clamp and report a scroll of its own.
        let after = self.viewport.scroll_offset(axis);
        if after != before {
            self.echoes.push_back(after);
        }
        self.push_offset();
    }

    fn push_offset(&mut self) {
        let axis = self.axis();
        let offset = self.window.scroll_offset();
        let before = self.viewport.scroll_offset(axis);
        if before == offset {
            return;
        }
        self.viewport.set_scroll_offset(axis, offset);
        let applied = self.viewport.scroll_offset(axis);
        if applied != before {
            self.echoes.push_back(applied);
        }
    }

    fn take_echo(&mut self, offset: u64) -> bool {
        let Some(pos) = self.echoes.iter().position(|&e| e == offset) else {
            return false;
        };
        self.echoes.drain(..=pos);
        true
    }

    fn next_event(&self) -> Option<ViewportEvent> {
        lock(&self.inbox).pop_front()
    }

    /// Processes every queued container event, in delivery order. Returns how many were
    /// handled.
    pub fn pump(&mut self, now_ms: u64) -> usize {
        let mut handled = 0;
        while let Some(event) = self.next_event() {
            self.handle_event(event, now_ms);
            handled += 1;
        }
        handled
    }

    fn handle_event(&mut self, event: ViewportEvent, now_ms: u64) {
        atrace!(?event, now_ms, "ListView::handle_event");
        match event {
            ViewportEvent::Scroll(scroll) => {
                let offset = scroll.offset_along(self.axis());
                if !self.take_echo(offset) {
                    // User scrolling wins over any animation or pending echo.
                    self.echoes.clear();
                    self.cancel_animation();
                }
                self.window.on_scroll(scroll, now_ms);
            }
            ViewportEvent::Resize { width, height } => {
                let extent = match self.axis() {
                    Axis::Vertical => height,
                    Axis::Horizontal => width,
                };
                self.window.set_viewport_extent(extent);
            }
            ViewportEvent::Focus(focused) => self.window.set_has_focus(focused),
            ViewportEvent::Key(key) => {
                if self.window.handle_key(key) {
                    self.cancel_animation();
                    self.push_offset();
                }
            }
        }
    }

    /// Advances the view.
    ///
    /// - Pumps queued container events.
    /// - If a smooth scroll is active, moves to its current offset and returns it.
    /// - Otherwise, runs `is_scrolling` debouncing and returns `None`.
    pub fn tick(&mut self, now_ms: u64) -> Option<u64> {
        self.pump(now_ms);

        let Some(tween) = self.tween else {
            self.window.update_scrolling(now_ms);
            return None;
        };

        let offset = self.window.clamp_scroll_offset(tween.sample(now_ms));
        self.window.set_scroll_offset(offset);
        if tween.is_done(now_ms) {
            self.tween = None;
        }
        self.push_offset();
        Some(offset)
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn cancel_animation(&mut self) {
        if self.tween.take().is_some() {
            atrace!("smooth scroll cancelled");
        }
    }

    /// Jumps to an item (no animation) and scrolls the container there.
    ///
    /// Out-of-range indexes are ignored and return `None`.
    pub fn scroll_to_item(&mut self, index: usize, align: Align) -> Option<u64> {
        let offset = self.window.scroll_to_item(index, align)?;
        self.cancel_animation();
        self.push_offset();
        Some(offset)
    }

    /// Starts (or retargets) a smooth scroll to an item.
    ///
    /// A call made while another smooth scroll is in flight continues from the current
    /// animated offset towards the new target. Returns the clamped target offset, or `None`
    /// for out-of-range indexes.
    pub fn scroll_to_item_smooth(
        &mut self,
        index: usize,
        align: Align,
        now_ms: u64,
        duration_ms: u64,
        easing: Easing,
    ) -> Option<u64> {
        let to = self.window.scroll_to_item_offset(index, align)?;
        match &mut self.tween {
            Some(tween) => {
                tween.retarget(now_ms, to, duration_ms);
                tween.easing = easing;
            }
            None => {
                let from = self.window.scroll_offset();
                self.tween = Some(Tween::new(from, to, now_ms, duration_ms, easing));
            }
        }
        atrace!(index, to, duration_ms, "scroll_to_item_smooth");
        Some(to)
    }

    /// Moves keyboard focus to an item and scrolls the container to keep it in view.
    pub fn focus_item(&mut self, index: usize) -> bool {
        if !self.window.focus_item(index) {
            return false;
        }
        self.cancel_animation();
        self.push_offset();
        true
    }

    /// Replaces the item list, keeping the scroll offset (clamped to the new content).
    ///
    /// Returns `false` when `items` is the list already shown.
    pub fn set_items(&mut self, items: Arc<[Item<T>]>) -> bool {
        let mut changed = false;
        self.window.batch_update(|w| {
            changed = w.set_items(items);
            if changed {
                let offset = w.scroll_offset();
                w.set_scroll_offset_clamped(offset);
            }
        });
        if changed {
            self.sync_viewport();
        }
        changed
    }

    /// Replaces the item list while keeping the first visible item at the same place in the
    /// viewport, e.g. when older messages are prepended to a chat.
    ///
    /// Falls back to [`Self::set_items`] behaviour when the anchored item is gone.
    pub fn set_items_anchored(&mut self, items: Arc<[Item<T>]>) -> bool {
        let anchor = capture_first_visible_anchor(&self.window);
        let mut changed = false;
        self.window.batch_update(|w| {
            changed = w.set_items(items);
            if !changed {
                return;
            }
            let anchored = anchor.as_ref().is_some_and(|a| apply_anchor(w, a));
            if !anchored {
                let offset = w.scroll_offset();
                w.set_scroll_offset_clamped(offset);
            }
        });
        if changed {
            adebug!(?anchor, "ListView::set_items_anchored");
            self.cancel_animation();
            self.sync_viewport();
        }
        changed
    }

    pub fn capture_first_visible_anchor(&self) -> Option<ScrollAnchor> {
        capture_first_visible_anchor(&self.window)
    }

    /// Re-applies an anchor captured earlier and scrolls the container to match.
    pub fn apply_anchor(&mut self, anchor: &ScrollAnchor) -> bool {
        self.cancel_animation();
        let applied = apply_anchor(&mut self.window, anchor);
        if applied {
            self.push_offset();
        }
        applied
    }

    /// Maps every item in the current visible range through `render_item`.
    pub fn render<R>(&self, render_item: impl FnMut(&Item<T>, usize, ItemStyle) -> R) -> Vec<R> {
        self.window.render_items(render_item)
    }
}

impl<T, V: ViewportAdapter> Drop for ListView<T, V> {
    fn drop(&mut self) {
        self.viewport.unsubscribe(self.subscription);
    }
}

impl<T: fmt::Debug, V: ViewportAdapter + fmt::Debug> fmt::Debug for ListView<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListView")
            .field("window", &self.window)
            .field("viewport", &self.viewport)
            .field("tween", &self.tween)
            .field("queued", &lock(&self.inbox).len())
            .finish_non_exhaustive()
    }
}

fn lock(inbox: &Mutex<VecDeque<ViewportEvent>>) -> MutexGuard<'_, VecDeque<ViewportEvent>> {
    inbox.lock().unwrap_or_else(PoisonError::into_inner)
}
