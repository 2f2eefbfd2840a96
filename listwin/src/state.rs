/// A lightweight, serializable snapshot of the current scroll state.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollState {
    pub offset: u64,
    pub is_scrolling: bool,
}

/// A lightweight, serializable snapshot of keyboard focus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FocusState {
    pub focused_index: Option<usize>,
    /// Whether the list container holds focus (keyboard navigation is active).
    pub has_focus: bool,
}

/// A combined snapshot of viewport, scroll and focus state.
///
/// This is useful for restoring UI state across frames or sessions without coupling the
/// engine to any specific UI framework.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowState {
    pub viewport_extent: u32,
    pub scroll: ScrollState,
    pub focus: FocusState,
}
