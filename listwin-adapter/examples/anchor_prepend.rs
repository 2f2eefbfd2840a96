// Example: prepend older messages without moving what the user is looking at.
use listwin::{Item, ListWindowOptions};
use listwin_adapter::{ListView, MemoryViewport};

fn messages(ids: std::ops::Range<i64>) -> impl Iterator<Item = Item<String>> {
    ids.map(|id| Item::new(id, format!("message {id}")))
}

fn main() {
    let mut view = ListView::new(
        messages(1_000..1_100).collect::<Vec<_>>(),
        ListWindowOptions::fixed(18),
        MemoryViewport::new(80, 180),
    );
    view.viewport_mut().user_scroll(listwin::Axis::Vertical, 905);
    view.pump(0);
    println!(
        "before: off={} anchor={:?}",
        view.window().scroll_offset(),
        view.capture_first_visible_anchor()
    );

    let older: Vec<Item<String>> = messages(900..1_000).chain(messages(1_000..1_100)).collect();
    view.set_items_anchored(older.into());
    println!(
        "after: off={} anchor={:?}",
        view.window().scroll_offset(),
        view.capture_first_visible_anchor()
    );
}
