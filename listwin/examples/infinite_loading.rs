// Example: append pages as the user nears the end of the list.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use listwin::{Item, ListWindow, ListWindowOptions, ScrollEvent};

const PAGE: usize = 50;

fn page(start: usize) -> impl Iterator<Item = Item<usize>> {
    (start..start + PAGE).map(|i| Item::new(i, i))
}

fn main() {
    let wants_more = Arc::new(AtomicBool::new(false));
    let mut items: Vec<Item<usize>> = page(0).collect();

    let mut w = ListWindow::new(
        items.clone(),
        ListWindowOptions::fixed(24)
            .with_viewport_extent(240)
            .with_end_reached_threshold(0.9)
            .with_on_end_reached(Some({
                let wants_more = Arc::clone(&wants_more);
                move || wants_more.store(true, Ordering::Relaxed)
            }))
            .with_on_items_rendered(Some(|start: usize, end: usize, _: &[Item<usize>]| {
                println!("rendered {start}..={end}");
            })),
    );

    let mut now_ms = 0;
    let mut offset = 0;
    while items.len() < 4 * PAGE {
        now_ms += 16;
        offset += 120;
        w.on_scroll(ScrollEvent::vertical(w.clamp_scroll_offset(offset)), now_ms);

        // End-reached is level-triggered; the loader de-duplicates by draining the flag.
        if wants_more.swap(false, Ordering::Relaxed) {
            let next = items.len();
            items.extend(page(next));
            w.set_items(items.clone().into());
            println!("loaded page at {next}, now {} items", items.len());
        }
        w.update_scrolling(now_ms);
    }
}
