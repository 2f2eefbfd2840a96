//! Adapter utilities for the `listwin` crate.
//!
//! `listwin` is UI-agnostic and only does the windowing math. This crate connects it to a
//! scroll container:
//!
//! - [`ViewportAdapter`]: the seam a host implements for its scroll container (offset, extent,
//!   content size, event subscription), plus [`MemoryViewport`] for headless hosts and tests
//! - [`ListView`]: owns a `ListWindow` and a viewport, queues container events and processes
//!   them in delivery order
//! - Tween-based smooth scrolling ([`Tween`], [`Easing`])
//! - Scroll anchoring across list replacements (e.g. prepending older chat messages)
//!
//! This crate is intentionally framework-agnostic (no ratatui/egui bindings).
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod anchor;
mod controller;
mod tween;
mod viewport;


pub use anchor::{ScrollAnchor, apply_anchor, capture_anchor_at, capture_first_visible_anchor};
pub use controller::ListView;
pub use tween::{Easing, Tween};
pub use viewport::{MemoryViewport, SubscriptionId, ViewportAdapter, ViewportEvent, ViewportListener};
