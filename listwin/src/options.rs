use alloc::sync::Arc;

use crate::metrics::MetricsSink;
use crate::{Axis, HeightDescriptor, Item};

/// Raw scroll offset notifications (offset along the active axis).
pub type OnScrollCallback = Arc<dyn Fn(u64) + Send + Sync>;

/// Fired whenever the rendered range changes: `(start_index, end_index, visible_items)`, with
/// an inclusive `end_index` and `visible_items == &items[start_index..=end_index]`.
pub type OnItemsRenderedCallback<T> = Arc<dyn Fn(usize, usize, &[Item<T>]) + Send + Sync>;

/// Fired after a scroll whose offset is at or past `end_reached_threshold` of the scrollable
/// extent.
///
/// This is level-triggered: it fires on every qualifying scroll, not once per crossing. The
/// receiving loader is expected to de-duplicate its own requests.
pub type OnEndReachedCallback = Arc<dyn Fn() + Send + Sync>;

pub const DEFAULT_OVERSCAN: usize = 5;
pub const DEFAULT_END_REACHED_THRESHOLD: f64 = 0.8;
pub const DEFAULT_IS_SCROLLING_RESET_DELAY_MS: u64 = 150;

/// Configuration for [`crate::ListWindow`].
///
/// This type is designed to be cheap to clone: callbacks are stored in `Arc`s so adapters can
/// update a few fields and call `ListWindow::set_options` without reallocating closures.
pub struct ListWindowOptions<T> {
    pub height: HeightDescriptor<T>,
    pub axis: Axis,
    /// Size of the viewport along `axis`.
    pub viewport_extent: u32,
    pub overscan: usize,
    /// Fraction of the scrollable extent, in `(0, 1]`, at which `on_end_reached` fires.
    pub end_reached_threshold: f64,
    /// Quiescence window after the last scroll event before `is_scrolling` resets.
    pub is_scrolling_reset_delay_ms: u64,
    pub initial_offset: u64,

    pub on_scroll: Option<OnScrollCallback>,
    pub on_items_rendered: Option<OnItemsRenderedCallback<T>>,
    pub on_end_reached: Option<OnEndReachedCallback>,

    pub metrics: Option<Arc<dyn MetricsSink>>,
}

impl<T> Clone for ListWindowOptions<T> {
    fn clone(&self) -> Self {
        Self {
            height: self.height.clone(),
            axis: self.axis,
            viewport_extent: self.viewport_extent,
            overscan: self.overscan,
            end_reached_threshold: self.end_reached_threshold,
            is_scrolling_reset_delay_ms: self.is_scrolling_reset_delay_ms,
            initial_offset: self.initial_offset,
            on_scroll: self.on_scroll.clone(),
            on_items_rendered: self.on_items_rendered.clone(),
            on_end_reached: self.on_end_reached.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

impl<T> ListWindowOptions<T> {
    pub fn new(height: HeightDescriptor<T>) -> Self {
        Self {
            height,
            axis: Axis::Vertical,
            viewport_extent: 0,
            overscan: DEFAULT_OVERSCAN,
            end_reached_threshold: DEFAULT_END_REACHED_THRESHOLD,
            is_scrolling_reset_delay_ms: DEFAULT_IS_SCROLLING_RESET_DELAY_MS,
            initial_offset: 0,
            on_scroll: None,
            on_items_rendered: None,
            on_end_reached: None,
            metrics: None,
        }
    }

    /// Options for a list where every item has the same height.
    pub fn fixed(height: u32) -> Self {
        Self::new(HeightDescriptor::Fixed(height))
    }

    /// Options for a list whose heights are computed per item.
    pub fn dynamic(height: impl Fn(&Item<T>, usize) -> u32 + Send + Sync + 'static) -> Self {
        Self::new(HeightDescriptor::dynamic(height))
    }

    pub fn with_height(mut self, height: HeightDescriptor<T>) -> Self {
        self.height = height;
        self
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_viewport_extent(mut self, viewport_extent: u32) -> Self {
        self.viewport_extent = viewport_extent;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_end_reached_threshold(mut self, threshold: f64) -> Self {
        self.end_reached_threshold = threshold;
        self
    }

    pub fn with_is_scrolling_reset_delay_ms(mut self, delay_ms: u64) -> Self {
        self.is_scrolling_reset_delay_ms = delay_ms;
        self
    }

    pub fn with_initial_offset(mut self, initial_offset: u64) -> Self {
        self.initial_offset = initial_offset;
        self
    }

    pub fn with_on_scroll(mut self, on_scroll: Option<impl Fn(u64) + Send + Sync + 'static>) -> Self {
        self.on_scroll = on_scroll.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_items_rendered(
        mut self,
        on_items_rendered: Option<impl Fn(usize, usize, &[Item<T>]) + Send + Sync + 'static>,
    ) -> Self {
        self.on_items_rendered = on_items_rendered.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_on_end_reached(
        mut self,
        on_end_reached: Option<impl Fn() + Send + Sync + 'static>,
    ) -> Self {
        self.on_end_reached = on_end_reached.map(|f| Arc::new(f) as _);
        self
    }

    pub fn with_metrics(mut self, metrics: Option<Arc<dyn MetricsSink>>) -> Self {
        self.metrics = metrics;
        self
    }
}

/// Returns `threshold` when it lies in `(0, 1]`, the default otherwise.
pub(crate) fn sanitize_threshold(threshold: f64) -> f64 {
    if threshold > 0.0 && threshold <= 1.0 {
        threshold
    } else {
        lwarn!(threshold, "end_reached_threshold must be in (0, 1], using default");
        DEFAULT_END_REACHED_THRESHOLD
    }
}

impl<T> core::fmt::Debug for ListWindowOptions<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListWindowOptions")
            .field("height", &self.height)
            .field("axis", &self.axis)
            .field("viewport_extent", &self.viewport_extent)
            .field("overscan", &self.overscan)
            .field("end_reached_threshold", &self.end_reached_threshold)
            .field(
                "is_scrolling_reset_delay_ms",
                &self.is_scrolling_reset_delay_ms,
            )
            .field("initial_offset", &self.initial_offset)
            .finish_non_exhaustive()
    }
}
