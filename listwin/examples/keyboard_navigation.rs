// Example: keyboard focus, paging and "item N of M" metadata.
use listwin::{Item, ListWindow, ListWindowOptions, NavKey};

fn main() {
    let items: Vec<Item<&str>> = (0..200).map(|i| Item::new(i, "entry")).collect();
    let mut w = ListWindow::new(items, ListWindowOptions::fixed(20).with_viewport_extent(100));

    // Keys do nothing until the container has focus.
    assert!(!w.handle_key(NavKey::ArrowDown));
    w.set_has_focus(true);

    for key in [
        NavKey::ArrowDown,
        NavKey::PageDown,
        NavKey::PageDown,
        NavKey::End,
        NavKey::PageUp,
        NavKey::Home,
    ] {
        w.handle_key(key);
        println!(
            "{key:?}: focused={:?} offset={} aria={:?}",
            w.focused_index(),
            w.scroll_offset(),
            w.focused_aria()
        );
    }
}
