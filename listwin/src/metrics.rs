//! Injectable instrumentation.
//!
//! The engine never reports to global state. Pass a [`MetricsSink`] through
//! [`crate::ListWindowOptions::metrics`] to observe cache and range activity.

use crate::Align;

/// Events reported to a [`MetricsSink`].
#[derive(Clone, Debug, PartialEq)]
pub enum MetricEvent {
    /// Geometry caches were dropped for a new list generation.
    GeometryInvalidated { item_count: usize },
    /// Heights for `start_index..end_index` were resolved and memoized.
    HeightsResolved { start_index: usize, end_index: usize },
    /// The rendered (overscanned) range changed.
    RangeChanged { start_index: usize, end_index: usize },
    ScrollToItem {
        index: usize,
        align: Align,
        offset: u64,
    },
    EndReached { scroll_fraction: f64 },
}

pub trait MetricsSink: Send + Sync {
    fn record(&self, event: &MetricEvent);
}

/// A sink that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn record(&self, _event: &MetricEvent) {}
}

/// A sink that keeps every event in memory, in arrival order.
#[cfg(feature = "std")]
#[derive(Debug, Default)]
pub struct RecordingMetrics {
    events: std::sync::Mutex<alloc::vec::Vec<MetricEvent>>,
}

#[cfg(feature = "std")]
impl RecordingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> alloc::vec::Vec<MetricEvent> {
        self.lock().clone()
    }

    /// Removes and returns the recorded events.
    pub fn take(&self) -> alloc::vec::Vec<MetricEvent> {
        core::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, alloc::vec::Vec<MetricEvent>> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(feature = "std")]
impl MetricsSink for RecordingMetrics {
    fn record(&self, event: &MetricEvent) {
        self.lock().push(event.clone());
    }
}
