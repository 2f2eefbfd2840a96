use listwin::{Axis, NavKey, ScrollEvent};

/// Something the scroll container reports to its subscribers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportEvent {
    /// The scroll position changed (by the user or as an echo of a programmatic scroll).
    Scroll(ScrollEvent),
    Resize { width: u32, height: u32 },
    Focus(bool),
    Key(NavKey),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

pub type ViewportListener = Box<dyn FnMut(&ViewportEvent) + Send>;

/// The host's scroll container.
///
/// Implementations deliver events to every listener, in the order they happen.
pub trait ViewportAdapter {
    fn scroll_offset(&self, axis: Axis) -> u64;

    /// Programmatically scrolls the container. Like a real container, an implementation
    /// reports the resulting position back as a [`ViewportEvent::Scroll`] when it changed.
    fn set_scroll_offset(&mut self, axis: Axis, offset: u64);

    /// Visible size along `axis`.
    fn extent(&self, axis: Axis) -> u32;

    /// Size of the scrollable content along `axis`.
    fn set_content_extent(&mut self, axis: Axis, extent: u64);

    fn subscribe(&mut self, listener: ViewportListener) -> SubscriptionId;

    /// Returns `false` if `id` was not subscribed.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}

/// An in-memory scroll container.
///
/// Offsets are clamped to `content - viewport` on each axis, and events are delivered to
/// listeners synchronously.
pub struct MemoryViewport {
    width: u32,
    height: u32,
    content_width: u64,
    content_height: u64,
    scroll_left: u64,
    scroll_top: u64,
    listeners: Vec<(SubscriptionId, ViewportListener)>,
    next_id: u64,
}

impl MemoryViewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            content_width: 0,
            content_height: 0,
            scroll_left: 0,
            scroll_top: 0,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn content_extent(&self, axis: Axis) -> u64 {
        match axis {
            Axis::Vertical => self.content_height,
            Axis::Horizontal => self.content_width,
        }
    }

    pub fn max_scroll_offset(&self, axis: Axis) -> u64 {
        self.content_extent(axis)
            .saturating_sub(self.extent(axis) as u64)
    }

    /// A user scroll (wheel, drag, scrollbar).
    pub fn user_scroll(&mut self, axis: Axis, offset: u64) {
        self.scroll_along(axis, offset);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if (self.width, self.height) == (width, height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.emit(ViewportEvent::Resize { width, height });
        self.reclamp();
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.emit(ViewportEvent::Focus(focused));
    }

    pub fn press(&mut self, key: NavKey) {
        self.emit(ViewportEvent::Key(key));
    }

    fn scroll_along(&mut self, axis: Axis, offset: u64) {
        let offset = offset.min(self.max_scroll_offset(axis));
        let slot = match axis {
            Axis::Vertical => &mut self.scroll_top,
            Axis::Horizontal => &mut self.scroll_left,
        };
        if *slot == offset {
            return;
        }
        *slot = offset;
        self.emit(ViewportEvent::Scroll(ScrollEvent {
            scroll_left: self.scroll_left,
            scroll_top: self.scroll_top,
        }));
    }

    fn reclamp(&mut self) {
        for axis in [Axis::Vertical, Axis::Horizontal] {
            let cur = self.scroll_offset(axis);
            self.scroll_along(axis, cur);
        }
    }

    fn emit(&mut self, event: ViewportEvent) {
        atrace!(?event, listeners = self.listeners.len(), "viewport event");
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }
}

impl ViewportAdapter for MemoryViewport {
    fn scroll_offset(&self, axis: Axis) -> u64 {
        match axis {
            Axis::Vertical => self.scroll_top,
            Axis::Horizontal => self.scroll_left,
        }
    }

    fn set_scroll_offset(&mut self, axis: Axis, offset: u64) {
        self.scroll_along(axis, offset);
    }

    fn extent(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Vertical => self.height,
            Axis::Horizontal => self.width,
        }
    }

    fn set_content_extent(&mut self, axis: Axis, extent: u64) {
        match axis {
            Axis::Vertical => self.content_height = extent,
            Axis::Horizontal => self.content_width = extent,
        }
        self.reclamp();
    }

    fn subscribe(&mut self, listener: ViewportListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }
}

impl core::fmt::Debug for MemoryViewport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MemoryViewport")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("content_width", &self.content_width)
            .field("content_height", &self.content_height)
            .field("scroll_left", &self.scroll_left)
            .field("scroll_top", &self.scroll_top)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
