// Example: a frame loop driving a smooth scroll through an in-memory container.
use listwin::{Align, Item, ListWindowOptions};
use listwin_adapter::{Easing, ListView, MemoryViewport};

fn main() {
    let items: Vec<Item<()>> = (0..10_000).map(|i| Item::new(i, ())).collect();
    let mut view = ListView::new(
        items,
        ListWindowOptions::fixed(1),
        MemoryViewport::new(80, 20),
    );

    let target = view.scroll_to_item_smooth(2_000, Align::Center, 0, 240, Easing::SmoothStep);
    println!("target_offset={target:?}");

    let mut now_ms = 0u64;
    while let Some(off) = view.tick(now_ms) {
        if now_ms % 80 == 0 {
            println!(
                "t={now_ms} off={off} visible={:?}",
                view.window().visible_range()
            );
        }
        now_ms += 16;
    }

    println!(
        "done: off={} scrolling={}",
        view.window().scroll_offset(),
        view.window().is_scrolling()
    );
}
