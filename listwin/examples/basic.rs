// Example: fixed and variable heights, rendering the visible window, scroll-to-item.
use listwin::{Align, Item, ListWindow, ListWindowOptions};

fn main() {
    let rows: Vec<Item<String>> = (0..1_000)
        .map(|i| Item::new(i, format!("row {i}")))
        .collect();

    let mut w = ListWindow::new(
        rows.clone(),
        ListWindowOptions::fixed(50).with_viewport_extent(500),
    );
    w.set_scroll_offset(2_025);
    println!("total_extent={}", w.total_extent());
    println!(
        "tight={:?} rendered={:?}",
        w.compute_tight_range(2_025, 500),
        w.visible_range()
    );

    for line in w.render_items(|item, index, style| {
        format!("#{index:<4} top={:<6} h={} {}", style.start, style.size, item.data)
    }) {
        println!("{line}");
    }

    // Every tenth row is a section header twice as tall.
    let mut w = ListWindow::new(
        rows,
        ListWindowOptions::dynamic(|_: &Item<String>, index| if index % 10 == 0 { 60 } else { 30 })
            .with_viewport_extent(300),
    );
    let off = w.scroll_to_item(500, Align::Center);
    println!("centered row 500 at offset {off:?}, visible={:?}", w.visible_range());
    println!("row at offset 10_000: {:?}", w.index_at_offset(10_000));
}
