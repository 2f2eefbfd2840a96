use alloc::sync::Arc;
use core::cell::RefCell;

use crate::key::{IdIndexMap, build_id_index};
use crate::metrics::{MetricEvent, MetricsSink};
use crate::positions::PositionCache;
use crate::{HeightDescriptor, Item, ItemId};

enum Layout<T> {
    /// Closed-form geometry: every item has the same height and no overrides exist.
    Uniform { height: u32 },
    /// Memoized geometry, resolved lazily in index order.
    Cached {
        descriptor: HeightDescriptor<T>,
        cache: RefCell<PositionCache>,
    },
}

/// Height and position bookkeeping for one item-list generation.
///
/// A new `Geometry` is built whenever the item list or the height descriptor changes, which
/// drops every cached height and position at once.
pub(crate) struct Geometry<T> {
    items: Arc<[Item<T>]>,
    layout: Layout<T>,
    ids: RefCell<Option<IdIndexMap>>,
    metrics: Option<Arc<dyn MetricsSink>>,
}

impl<T> Geometry<T> {
    pub(crate) fn new(
        items: Arc<[Item<T>]>,
        descriptor: &HeightDescriptor<T>,
        metrics: Option<Arc<dyn MetricsSink>>,
    ) -> Self {
        let descriptor = match descriptor {
            HeightDescriptor::Fixed(0) => {
                lwarn!("HeightDescriptor::Fixed(0): heights must be positive, using 1");
                HeightDescriptor::Fixed(1)
            }
            other => other.clone(),
        };
        let has_overrides = items.iter().any(|it| it.height.is_some());
        let layout = match descriptor {
            HeightDescriptor::Fixed(height) if !has_overrides => Layout::Uniform { height },
            descriptor => Layout::Cached {
                descriptor,
                cache: RefCell::new(PositionCache::with_capacity(items.len())),
            },
        };
        ldebug!(
            items = items.len(),
            uniform = matches!(layout, Layout::Uniform { .. }),
            "Geometry::new"
        );
        if let Some(m) = &metrics {
            m.record(&MetricEvent::GeometryInvalidated {
                item_count: items.len(),
            });
        }
        Self {
            items,
            layout,
            ids: RefCell::new(None),
            metrics,
        }
    }

    pub(crate) fn items(&self) -> &Arc<[Item<T>]> {
        &self.items
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn uniform_height(&self) -> Option<u32> {
        match &self.layout {
            Layout::Uniform { height } => Some(*height),
            Layout::Cached { .. } => None,
        }
    }

    pub(crate) fn height(&self, index: usize) -> Option<u32> {
        if index >= self.len() {
            return None;
        }
        match &self.layout {
            Layout::Uniform { height } => Some(*height),
            Layout::Cached { descriptor, cache } => {
                self.resolve_through(descriptor, cache, index);
                Some(cache.borrow().height(index))
            }
        }
    }

    pub(crate) fn position(&self, index: usize) -> Option<u64> {
        if index >= self.len() {
            return None;
        }
        match &self.layout {
            Layout::Uniform { height } => Some(index as u64 * *height as u64),
            Layout::Cached { descriptor, cache } => {
                if index > 0 {
                    self.resolve_through(descriptor, cache, index - 1);
                }
                Some(cache.borrow().position(index))
            }
        }
    }

    pub(crate) fn total_extent(&self) -> u64 {
        let n = self.len();
        if n == 0 {
            return 0;
        }
        match &self.layout {
            Layout::Uniform { height } => n as u64 * *height as u64,
            Layout::Cached { descriptor, cache } => {
                self.resolve_through(descriptor, cache, n - 1);
                cache.borrow().resolved_end()
            }
        }
    }

    /// Index of the item whose extent contains `offset`, clamped to the last item.
    pub(crate) fn index_at(&self, offset: u64) -> Option<usize> {
        let n = self.len();
        if n == 0 {
            return None;
        }
        let index = match &self.layout {
            Layout::Uniform { height } => {
                let i = offset / *height as u64;
                usize::try_from(i).unwrap_or(usize::MAX)
            }
            Layout::Cached { descriptor, cache } => {
                self.resolve_past(descriptor, cache, offset);
                cache.borrow().index_containing(offset)
            }
        };
        Some(index.min(n - 1))
    }

    pub(crate) fn index_of(&self, id: &ItemId) -> Option<usize> {
        let mut ids = self.ids.borrow_mut();
        let map = ids.get_or_insert_with(|| build_id_index(self.items.iter().map(|it| &it.id)));
        map.get(id).copied()
    }

    /// Extends the cache until item `index` is resolved.
    fn resolve_through(
        &self,
        descriptor: &HeightDescriptor<T>,
        cache: &RefCell<PositionCache>,
        index: usize,
    ) {
        let from = cache.borrow().resolved();
        if from > index {
            return;
        }
        let mut cache = cache.borrow_mut();
        for i in from..=index {
            cache.push(self.resolve_height(descriptor, i));
        }
        self.record_resolved(from, index + 1);
    }

    /// Extends the cache until the resolved prefix reaches past `offset` (or the list ends).
    fn resolve_past(
        &self,
        descriptor: &HeightDescriptor<T>,
        cache: &RefCell<PositionCache>,
        offset: u64,
    ) {
        let n = self.len();
        let from = cache.borrow().resolved();
        let mut cache = cache.borrow_mut();
        let mut i = from;
        while i < n && cache.resolved_end() <= offset {
            cache.push(self.resolve_height(descriptor, i));
            i += 1;
        }
        if i > from {
            self.record_resolved(from, i);
        }
    }

    fn resolve_height(&self, descriptor: &HeightDescriptor<T>, index: usize) -> u32 {
        let h = descriptor.resolve(&self.items[index], index);
        if h == 0 {
            lwarn!(index, "item height must be positive");
            debug_assert!(h > 0, "item height must be positive (index={index})");
        }
        h
    }

    fn record_resolved(&self, start_index: usize, end_index: usize) {
        if let Some(m) = &self.metrics {
            m.record(&MetricEvent::HeightsResolved {
                start_index,
                end_index,
            });
        }
    }
}

impl<T> Clone for Layout<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Uniform { height } => Self::Uniform { height: *height },
            Self::Cached { descriptor, cache } => Self::Cached {
                descriptor: descriptor.clone(),
                cache: RefCell::new(cache.borrow().clone()),
            },
        }
    }
}

impl<T> Clone for Geometry<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            layout: self.layout.clone(),
            ids: RefCell::new(self.ids.borrow().clone()),
            metrics: self.metrics.clone(),
        }
    }
}

impl<T> core::fmt::Debug for Geometry<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut s = f.debug_struct("Geometry");
        s.field("items", &self.items.len());
        match &self.layout {
            Layout::Uniform { height } => s.field("uniform_height", height),
            Layout::Cached { cache, .. } => s.field("resolved", &cache.borrow().resolved()),
        };
        s.finish_non_exhaustive()
    }
}
