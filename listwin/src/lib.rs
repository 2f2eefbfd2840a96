//! A headless list-windowing engine.
//!
//! For viewport subscriptions, smooth scrolling and anchoring, see the `listwin-adapter` crate.
//!
//! This crate focuses on the algorithms needed to show huge lists inside a fixed-size viewport:
//! memoized height/position bookkeeping for variable-size items, offset → index lookup,
//! overscanned visible ranges, scroll-to-item with alignment, keyboard navigation, and
//! level-triggered end-of-list detection for incremental loading.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - the item list and a height descriptor
//! - viewport extent along the scroll axis
//! - scroll events, focus changes and navigation keys
//! - a per-item renderer
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod geometry;
mod height;
mod item;
mod key;
pub mod metrics;
mod options;
mod positions;
mod range;
mod state;
mod types;
mod window;

#[cfg(test)]
mod tests;

pub use height::{HeightDescriptor, HeightFn};
pub use item::{Item, ItemId};
pub use metrics::{MetricEvent, MetricsSink, NoopMetrics};
pub use options::{
    DEFAULT_END_REACHED_THRESHOLD, DEFAULT_IS_SCROLLING_RESET_DELAY_MS, DEFAULT_OVERSCAN,
    ListWindowOptions, OnEndReachedCallback, OnItemsRenderedCallback, OnScrollCallback,
};
pub use state::{FocusState, ScrollState, WindowState};
pub use types::{
    Align, AriaPosition, Axis, ItemStyle, NavKey, ScrollDirection, ScrollEvent, VisibleRange,
};
pub use window::ListWindow;

#[cfg(feature = "std")]
pub use metrics::RecordingMetrics;
