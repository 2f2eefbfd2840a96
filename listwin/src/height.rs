use alloc::sync::Arc;
use core::fmt;

use crate::Item;

/// A height resolver for [`HeightDescriptor::Dynamic`].
pub type HeightFn<T> = Arc<dyn Fn(&Item<T>, usize) -> u32 + Send + Sync>;

/// How item heights along the scroll axis are determined.
///
/// The variant is chosen once per configuration; the geometry model branches on it instead of
/// re-inspecting the descriptor on every query.
///
/// Heights must be positive and deterministic for a given item list. Per-item
/// [`Item::height`] overrides take precedence over either variant.
pub enum HeightDescriptor<T> {
    /// Every item has the same height.
    Fixed(u32),
    /// Height is a pure function of the item and its index.
    Dynamic(HeightFn<T>),
}

impl<T> HeightDescriptor<T> {
    pub fn fixed(height: u32) -> Self {
        Self::Fixed(height)
    }

    pub fn dynamic(f: impl Fn(&Item<T>, usize) -> u32 + Send + Sync + 'static) -> Self {
        Self::Dynamic(Arc::new(f))
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }

    /// Resolves the height of `item` at `index`, honoring the per-item override.
    pub fn resolve(&self, item: &Item<T>, index: usize) -> u32 {
        if let Some(h) = item.height {
            return h;
        }
        match self {
            Self::Fixed(h) => *h,
            Self::Dynamic(f) => f(item, index),
        }
    }

    /// Whether two descriptors are guaranteed to produce the same heights.
    ///
    /// Dynamic descriptors compare by closure identity.
    pub fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Fixed(a), Self::Fixed(b)) => a == b,
            (Self::Dynamic(a), Self::Dynamic(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T> Clone for HeightDescriptor<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Fixed(h) => Self::Fixed(*h),
            Self::Dynamic(f) => Self::Dynamic(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for HeightDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(h) => f.debug_tuple("Fixed").field(h).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}
