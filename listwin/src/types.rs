/// Where an item lands in the viewport after a scroll-to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Align {
    Start,
    Center,
    End,
    /// Minimal movement: stay put when the item is fully visible, otherwise align to the
    /// nearest edge.
    Auto,
}

/// The scroll axis of a list. Fixed per instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollDirection {
    Forward,
    Backward,
}

/// A raw scroll notification from the host, carrying both axes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollEvent {
    pub scroll_left: u64,
    pub scroll_top: u64,
}

impl ScrollEvent {
    pub fn vertical(scroll_top: u64) -> Self {
        Self {
            scroll_left: 0,
            scroll_top,
        }
    }

    pub fn horizontal(scroll_left: u64) -> Self {
        Self {
            scroll_left,
            scroll_top: 0,
        }
    }

    pub fn offset_along(&self, axis: Axis) -> u64 {
        match axis {
            Axis::Vertical => self.scroll_top,
            Axis::Horizontal => self.scroll_left,
        }
    }
}

/// Keys understood by list navigation. Anything else is reported as `Other` and ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NavKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Other,
}

/// An inclusive, non-empty index range. Empty ranges are represented as `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleRange {
    pub start_index: usize,
    pub end_index: usize, // inclusive
}

impl VisibleRange {
    pub fn count(&self) -> usize {
        self.end_index - self.start_index + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start_index..=self.end_index).contains(&index)
    }

    pub fn indexes(&self) -> core::ops::RangeInclusive<usize> {
        self.start_index..=self.end_index
    }
}

/// Accessibility position of the focused item ("item N of M").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AriaPosition {
    /// 1-based position of the item.
    pub posinset: usize,
    pub setsize: usize,
}

/// Placement of a rendered item along the active axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemStyle {
    pub axis: Axis,
    /// Leading edge, measured from the start of the list content.
    pub start: u64,
    pub size: u32,
    /// Only set for the focused item.
    pub aria: Option<AriaPosition>,
}

impl ItemStyle {
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.size as u64)
    }

    /// `top` for vertical lists.
    pub fn top(&self) -> Option<u64> {
        (self.axis == Axis::Vertical).then_some(self.start)
    }

    /// `left` for horizontal lists.
    pub fn left(&self) -> Option<u64> {
        (self.axis == Axis::Horizontal).then_some(self.start)
    }
}
