use crate::*;

use alloc::sync::Arc;
use alloc::vec::Vec;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn gen_range_u32(&mut self, start: u32, end_exclusive: u32) -> u32 {
        self.gen_range_u64(start as u64, end_exclusive as u64) as u32
    }

    fn gen_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Items whose `data` is their height, for use with `height_from_data`.
fn sized_items(heights: &[u32]) -> Vec<Item<u32>> {
    heights
        .iter()
        .enumerate()
        .map(|(i, &h)| Item::new(i, h))
        .collect()
}

fn uniform_items(n: usize) -> Vec<Item<u32>> {
    (0..n).map(|i| Item::new(i, i as u32)).collect()
}

fn height_from_data() -> ListWindowOptions<u32> {
    ListWindowOptions::dynamic(|it: &Item<u32>, _| it.data)
}

fn expected_position(heights: &[u32], index: usize) -> u64 {
    heights[..index].iter().map(|&h| h as u64).sum()
}

#[test]
fn fixed_height_range_with_overscan() {
    let mut w = ListWindow::new(
        uniform_items(1000),
        ListWindowOptions::fixed(50)
            .with_viewport_extent(500)
            .with_overscan(5),
    );
    w.set_scroll_offset(2025);

    let tight = w.compute_tight_range(2025, 500).unwrap();
    assert_eq!((tight.start_index, tight.end_index), (40, 50));

    let r = w.visible_range().unwrap();
    assert_eq!((r.start_index, r.end_index), (35, 55));
    assert_eq!(r.count(), 21);
}

#[test]
fn default_overscan_is_five() {
    let w = ListWindow::new(
        uniform_items(100),
        ListWindowOptions::fixed(1).with_viewport_extent(10),
    );
    assert_eq!(w.overscan(), 5);
    let r = w.visible_range().unwrap();
    assert_eq!((r.start_index, r.end_index), (0, 14));
}

#[test]
fn overscan_clamps_to_list_bounds() {
    let mut w = ListWindow::new(
        uniform_items(20),
        ListWindowOptions::fixed(10).with_viewport_extent(50),
    );
    w.set_scroll_offset_clamped(10_000);
    assert_eq!(w.scroll_offset(), 150);
    let r = w.visible_range().unwrap();
    assert_eq!((r.start_index, r.end_index), (10, 19));
}

#[test]
fn new_list_identity_invalidates_positions() {
    let heights = [30u32; 100];
    let mut w = ListWindow::new(sized_items(&heights), height_from_data().with_viewport_extent(300));
    assert_eq!(w.item_position(51), Some(1530));
    assert_eq!(w.total_extent(), 3000);

    let mut next = heights;
    next[50] = 200;
    assert!(w.set_items(sized_items(&next).into()));
    assert_eq!(w.item_position(51), Some(1700));
    assert_eq!(w.item_height(50), Some(200));
    assert_eq!(w.total_extent(), 3170);
}

#[test]
fn same_list_identity_is_a_no_op() {
    let items: Arc<[Item<u32>]> = uniform_items(10).into();
    let metrics = Arc::new(RecordingMetrics::new());
    let mut w = ListWindow::new(
        Arc::clone(&items),
        ListWindowOptions::fixed(10).with_metrics(Some(metrics.clone() as Arc<dyn MetricsSink>)),
    );
    metrics.take();

    assert!(!w.set_items(Arc::clone(&items)));
    assert!(metrics.events().is_empty());
}

#[test]
fn center_alignment_matches_expected_offset() {
    let mut w = ListWindow::new(
        uniform_items(20),
        ListWindowOptions::fixed(40).with_viewport_extent(200),
    );
    assert_eq!(w.total_extent(), 800);
    assert_eq!(w.scroll_to_item(10, Align::Center), Some(320));
    assert_eq!(w.scroll_offset(), 320);
}

#[test]
fn center_alignment_of_item_taller_than_viewport() {
    let w = ListWindow::new(
        sized_items(&[10, 300, 10, 10, 10, 10, 10, 10, 10, 10]),
        height_from_data().with_viewport_extent(100),
    );
    // start(1) = 10, (300 - 100) / 2 = 100 past the leading edge.
    assert_eq!(w.scroll_to_item_offset(1, Align::Center), Some(110));
}

#[test]
fn start_and_end_alignment_are_clamped() {
    let w = ListWindow::new(
        uniform_items(20),
        ListWindowOptions::fixed(40).with_viewport_extent(200),
    );
    assert_eq!(w.scroll_to_item_offset(5, Align::Start), Some(200));
    // end(5) = 240, minus viewport.
    assert_eq!(w.scroll_to_item_offset(5, Align::End), Some(40));
    assert_eq!(w.scroll_to_item_offset(1, Align::End), Some(0));
    assert_eq!(w.scroll_to_item_offset(19, Align::Start), Some(600));
    assert_eq!(w.max_scroll_offset(), 600);
}

#[test]
fn align_auto_returns_current_offset_when_fully_visible() {
    let mut w = ListWindow::new(
        uniform_items(10),
        ListWindowOptions::fixed(1).with_viewport_extent(5),
    );
    w.set_scroll_offset(3);

    // Viewport covers [3, 8). Item 4 is [4, 5), fully visible.
    assert_eq!(w.scroll_to_item_offset(4, Align::Auto), Some(3));
    // Item 7 ends exactly at the viewport edge.
    assert_eq!(w.scroll_to_item_offset(7, Align::Auto), Some(3));
}

#[test]
fn align_auto_picks_nearest_edge() {
    let mut w = ListWindow::new(
        uniform_items(10),
        ListWindowOptions::fixed(1).with_viewport_extent(5),
    );
    w.set_scroll_offset(3);

    // Above the viewport behaves like Start.
    assert_eq!(
        w.scroll_to_item_offset(1, Align::Auto),
        w.scroll_to_item_offset(1, Align::Start)
    );
    // Below the viewport behaves like End.
    assert_eq!(
        w.scroll_to_item_offset(9, Align::Auto),
        w.scroll_to_item_offset(9, Align::End)
    );
    assert_eq!(w.scroll_to_item_offset(9, Align::Auto), Some(5));
}

#[test]
fn out_of_range_scroll_to_item_is_ignored() {
    let mut w = ListWindow::new(
        uniform_items(10),
        ListWindowOptions::fixed(10).with_viewport_extent(30),
    );
    w.set_scroll_offset(20);
    assert_eq!(w.scroll_to_item(10, Align::Start), None);
    assert_eq!(w.scroll_to_item(usize::MAX, Align::Center), None);
    assert_eq!(w.scroll_offset(), 20);
}

#[test]
fn empty_list_is_well_defined() {
    let mut w = ListWindow::new(
        Vec::<Item<u32>>::new(),
        ListWindowOptions::fixed(10).with_viewport_extent(100),
    );
    assert_eq!(w.total_extent(), 0);
    assert!(w.visible_range().is_none());
    assert_eq!(w.index_at_offset(0), None);
    assert_eq!(w.scroll_to_item(0, Align::Start), None);
    assert_eq!(w.scroll_fraction(), None);

    w.set_has_focus(true);
    assert!(!w.handle_key(NavKey::ArrowDown));
    assert_eq!(w.focused_index(), None);
    assert!(w.render_items(|_, i, _| i).is_empty());
}

#[test]
fn zero_viewport_yields_empty_range() {
    let w = ListWindow::new(uniform_items(10), ListWindowOptions::fixed(10));
    assert!(w.visible_range().is_none());
    assert!(w.compute_visible_range(0, 0).is_none());
    assert!(w.compute_visible_range(0, 1).is_some());
}

#[test]
fn fixed_zero_height_is_coerced() {
    let w = ListWindow::new(
        uniform_items(10),
        ListWindowOptions::fixed(0).with_viewport_extent(5),
    );
    assert_eq!(w.item_height(3), Some(1));
    assert_eq!(w.total_extent(), 10);
    assert!(w.visible_range().is_some());
}

#[test]
fn per_item_height_overrides_fixed_descriptor() {
    let mut items = uniform_items(10);
    items[3] = Item::new(3usize, 3).with_height(50);
    let w = ListWindow::new(items, ListWindowOptions::fixed(10).with_viewport_extent(40));

    assert_eq!(w.item_height(2), Some(10));
    assert_eq!(w.item_height(3), Some(50));
    assert_eq!(w.item_position(4), Some(80));
    assert_eq!(w.total_extent(), 9 * 10 + 50);
    assert_eq!(w.index_at_offset(79), Some(3));
    assert_eq!(w.index_at_offset(80), Some(4));
}

#[test]
fn fixed_zero_height_is_coerced_alongside_overrides() {
    let mut items = uniform_items(10);
    items[3] = Item::new(3usize, 3).with_height(20);
    let w = ListWindow::new(items, ListWindowOptions::fixed(0).with_viewport_extent(5));

    assert_eq!(w.item_height(0), Some(1));
    assert_eq!(w.item_height(3), Some(20));
    assert_eq!(w.total_extent(), 9 + 20);
    assert_eq!(w.item_position(4), Some(23));
}

#[test]
fn per_item_height_overrides_dynamic_descriptor() {
    let mut items = sized_items(&[5, 5, 5]);
    items[0].height = Some(20);
    let w = ListWindow::new(items, height_from_data());
    assert_eq!(w.item_position(1), Some(20));
    assert_eq!(w.total_extent(), 30);
}

#[test]
fn index_at_offset_clamps_past_the_end() {
    let w = ListWindow::new(sized_items(&[3, 4, 5]), height_from_data());
    assert_eq!(w.index_at_offset(0), Some(0));
    assert_eq!(w.index_at_offset(2), Some(0));
    assert_eq!(w.index_at_offset(3), Some(1));
    assert_eq!(w.index_at_offset(6), Some(1));
    assert_eq!(w.index_at_offset(7), Some(2));
    assert_eq!(w.index_at_offset(1_000), Some(2));
}

#[test]
fn positions_are_strictly_increasing_for_positive_heights() {
    let mut rng = Lcg::new(7);
    let heights: Vec<u32> = (0..500).map(|_| rng.gen_range_u32(1, 64)).collect();
    let w = ListWindow::new(sized_items(&heights), height_from_data());

    let mut prev = None;
    for i in 0..heights.len() {
        let p = w.item_position(i).unwrap();
        assert_eq!(p, expected_position(&heights, i));
        if let Some(prev) = prev {
            assert!(p > prev);
        }
        prev = Some(p);
    }
    assert_eq!(w.item_position(heights.len()), None);
}

#[test]
fn random_ranges_cover_every_intersecting_item() {
    let mut rng = Lcg::new(0x5eed);

    for _case in 0..200 {
        let n = rng.gen_range_usize(1, 120);
        let uniform = rng.gen_bool();
        let heights: Vec<u32> = if uniform {
            let h = rng.gen_range_u32(1, 40);
            alloc::vec![h; n]
        } else {
            (0..n).map(|_| rng.gen_range_u32(1, 40)).collect()
        };
        let viewport = rng.gen_range_u32(1, 300);
        let overscan = rng.gen_range_usize(0, 8);

        let opts = if uniform {
            ListWindowOptions::fixed(heights[0])
        } else {
            height_from_data()
        };
        let w = ListWindow::new(
            sized_items(&heights),
            opts.with_viewport_extent(viewport).with_overscan(overscan),
        );

        let total: u64 = heights.iter().map(|&h| h as u64).sum();
        assert_eq!(w.total_extent(), total);
        let max = total.saturating_sub(viewport as u64);

        for _ in 0..10 {
            let s = rng.gen_range_u64(0, max + 1);
            let tight = w.compute_tight_range(s, viewport).unwrap();
            let full = w.compute_visible_range(s, viewport).unwrap();

            // Coverage.
            for i in 0..n {
                let start = expected_position(&heights, i);
                let end = start + heights[i] as u64;
                if start < s + viewport as u64 && end > s {
                    assert!(
                        tight.contains(i),
                        "item {i} [{start}, {end}) not in {tight:?} at s={s}, viewport={viewport}"
                    );
                }
            }

            // Overscan only widens, except where clamped by the list bounds.
            assert!(full.start_index <= tight.start_index);
            assert!(full.end_index >= tight.end_index);
            assert_eq!(full.start_index, tight.start_index.saturating_sub(overscan));
            assert_eq!(full.end_index, (tight.end_index + overscan).min(n - 1));

            // Idempotence.
            assert_eq!(w.compute_visible_range(s, viewport), Some(full));
        }
    }
}

#[test]
fn scroll_to_start_round_trips_into_visible_range() {
    let mut rng = Lcg::new(42);
    let heights: Vec<u32> = (0..300).map(|_| rng.gen_range_u32(1, 50)).collect();
    let mut w = ListWindow::new(
        sized_items(&heights),
        height_from_data().with_viewport_extent(120).with_overscan(0),
    );

    for _ in 0..100 {
        let i = rng.gen_range_usize(0, heights.len());
        let off = w.scroll_to_item(i, Align::Start).unwrap();
        assert_eq!(w.scroll_offset(), off);
        assert!(w.visible_range().unwrap().contains(i));
    }
}

#[test]
fn geometry_is_resolved_lazily() {
    let metrics = Arc::new(RecordingMetrics::new());
    let w = ListWindow::new(
        uniform_items(1000),
        ListWindowOptions::dynamic(|_: &Item<u32>, _| 10)
            .with_viewport_extent(100)
            .with_metrics(Some(metrics.clone() as Arc<dyn MetricsSink>)),
    );

    let events = metrics.take();
    assert_eq!(
        events.first(),
        Some(&MetricEvent::GeometryInvalidated { item_count: 1000 })
    );
    let resolved = events
        .iter()
        .filter_map(|e| match e {
            MetricEvent::HeightsResolved { end_index, .. } => Some(*end_index),
            _ => None,
        })
        .max();
    assert_eq!(resolved, Some(10));
    assert!(events.contains(&MetricEvent::RangeChanged {
        start_index: 0,
        end_index: 14,
    }));

    assert_eq!(w.total_extent(), 10_000);
    assert_eq!(
        metrics.take(),
        alloc::vec![MetricEvent::HeightsResolved {
            start_index: 10,
            end_index: 1000,
        }]
    );

    // Memoized: no further resolution.
    assert_eq!(w.total_extent(), 10_000);
    assert_eq!(w.item_position(999), Some(9_990));
    assert!(metrics.take().is_empty());
}

#[test]
fn dynamic_heights_are_queried_once_per_generation() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut w = ListWindow::new(
        uniform_items(50),
        ListWindowOptions::dynamic({
            let calls = Arc::clone(&calls);
            move |_: &Item<u32>, _| {
                calls.fetch_add(1, Ordering::Relaxed);
                7
            }
        })
        .with_viewport_extent(30),
    );

    w.total_extent();
    w.set_scroll_offset(100);
    w.visible_range();
    w.item_position(49);
    assert_eq!(calls.load(Ordering::Relaxed), 50);

    w.set_items(uniform_items(50).into());
    w.total_extent();
    assert_eq!(calls.load(Ordering::Relaxed), 100);
}

#[test]
fn on_scroll_reports_offset_and_range_changes() {
    let offsets = Arc::new(Mutex::new(Vec::new()));
    let ranges = Arc::new(Mutex::new(Vec::new()));
    let mut w = ListWindow::new(
        uniform_items(100),
        ListWindowOptions::fixed(10)
            .with_viewport_extent(100)
            .with_overscan(0)
            .with_on_scroll(Some({
                let offsets = Arc::clone(&offsets);
                move |off: u64| offsets.lock().unwrap().push(off)
            }))
            .with_on_items_rendered(Some({
                let ranges = Arc::clone(&ranges);
                move |start: usize, end: usize, items: &[Item<u32>]| {
                    ranges
                        .lock()
                        .unwrap()
                        .push((start, end, items.len(), items[0].id.clone()))
                }
            })),
    );

    // Initial mount reports the first range.
    assert_eq!(
        *ranges.lock().unwrap(),
        alloc::vec![(0, 9, 10, ItemId::Int(0))]
    );

    w.on_scroll(ScrollEvent::vertical(250), 0);
    assert_eq!(*offsets.lock().unwrap(), alloc::vec![250]);
    assert_eq!(ranges.lock().unwrap().len(), 2);
    assert_eq!(ranges.lock().unwrap()[1], (25, 34, 10, ItemId::Int(25)));

    // Same offset: raw callback fires again, range callback does not.
    w.on_scroll(ScrollEvent::vertical(250), 10);
    assert_eq!(offsets.lock().unwrap().len(), 2);
    assert_eq!(ranges.lock().unwrap().len(), 2);

    // Sub-item scroll that keeps the same range.
    w.on_scroll(ScrollEvent::vertical(251), 20);
    assert_eq!(ranges.lock().unwrap().len(), 3);
    assert_eq!(ranges.lock().unwrap()[2].0, 25);
    assert_eq!(ranges.lock().unwrap()[2].1, 35);
}

#[test]
fn horizontal_axis_reads_scroll_left() {
    let mut w = ListWindow::new(
        uniform_items(100),
        ListWindowOptions::fixed(10)
            .with_axis(Axis::Horizontal)
            .with_viewport_extent(50),
    );
    w.on_scroll(
        ScrollEvent {
            scroll_left: 120,
            scroll_top: 999,
        },
        0,
    );
    assert_eq!(w.scroll_offset(), 120);

    let styles = w.render_items(|_, _, style| style);
    assert!(styles.iter().all(|s| s.axis == Axis::Horizontal));
    assert!(styles.iter().all(|s| s.top().is_none()));
    assert_eq!(styles[0].left(), Some(70));
}

#[test]
fn end_reached_is_level_triggered() {
    let fired = Arc::new(AtomicUsize::new(0));
    let mut w = ListWindow::new(
        uniform_items(100),
        ListWindowOptions::fixed(10)
            .with_viewport_extent(100)
            .with_on_end_reached(Some({
                let fired = Arc::clone(&fired);
                move || {
                    fired.fetch_add(1, Ordering::Relaxed);
                }
            })),
    );

    // Scrollable extent is 900; 0.8 of it is 720.
    w.apply_scroll_offset(700, 0);
    assert_eq!(fired.load(Ordering::Relaxed), 0);
    w.apply_scroll_offset(720, 10);
    assert_eq!(fired.load(Ordering::Relaxed), 1);
    w.apply_scroll_offset(750, 20);
    assert_eq!(fired.load(Ordering::Relaxed), 2);
    w.apply_scroll_offset(750, 30);
    assert_eq!(fired.load(Ordering::Relaxed), 3);
    w.apply_scroll_offset(100, 40);
    assert_eq!(fired.load(Ordering::Relaxed), 3);
}

#[test]
fn end_reached_respects_custom_threshold_and_short_content() {
    let fired = Arc::new(AtomicUsize::new(0));
    let cb = {
        let fired = Arc::clone(&fired);
        move || {
            fired.fetch_add(1, Ordering::Relaxed);
        }
    };
    let mut w = ListWindow::new(
        uniform_items(5),
        ListWindowOptions::fixed(10)
            .with_viewport_extent(100)
            .with_end_reached_threshold(0.5)
            .with_on_end_reached(Some(cb)),
    );
    // Content fits: nothing to scroll, nothing to report.
    w.apply_scroll_offset(0, 0);
    assert_eq!(fired.load(Ordering::Relaxed), 0);

    w.set_items(uniform_items(30).into());
    // Scrollable extent is 200.
    w.apply_scroll_offset(99, 10);
    assert_eq!(fired.load(Ordering::Relaxed), 0);
    w.apply_scroll_offset(100, 20);
    assert_eq!(fired.load(Ordering::Relaxed), 1);
}

#[test]
fn invalid_threshold_falls_back_to_default() {
    let mut w = ListWindow::new(
        uniform_items(5),
        ListWindowOptions::fixed(10).with_end_reached_threshold(0.0),
    );
    assert_eq!(w.options().end_reached_threshold, DEFAULT_END_REACHED_THRESHOLD);
    w.set_end_reached_threshold(1.5);
    assert_eq!(w.options().end_reached_threshold, DEFAULT_END_REACHED_THRESHOLD);
    w.set_end_reached_threshold(1.0);
    assert_eq!(w.options().end_reached_threshold, 1.0);
}

#[test]
fn is_scrolling_is_debounced() {
    let mut w = ListWindow::new(
        uniform_items(100),
        ListWindowOptions::fixed(10).with_viewport_extent(100),
    );
    assert!(!w.is_scrolling());

    w.on_scroll(ScrollEvent::vertical(10), 1_000);
    assert!(w.is_scrolling());
    assert_eq!(w.scroll_direction(), Some(ScrollDirection::Forward));

    w.update_scrolling(1_100);
    assert!(w.is_scrolling());

    // A new event restarts the quiescence window.
    w.on_scroll(ScrollEvent::vertical(5), 1_100);
    assert_eq!(w.scroll_direction(), Some(ScrollDirection::Backward));
    w.update_scrolling(1_200);
    assert!(w.is_scrolling());
    w.update_scrolling(1_250);
    assert!(!w.is_scrolling());
    assert_eq!(w.scroll_direction(), None);
}

#[test]
fn scroll_to_item_does_not_mark_scrolling() {
    let mut w = ListWindow::new(
        uniform_items(100),
        ListWindowOptions::fixed(10)
            .with_viewport_extent(100)
            .with_is_scrolling_reset_delay_ms(20),
    );
    w.scroll_to_item(50, Align::Start);
    assert!(!w.is_scrolling());
    assert_eq!(w.scroll_offset(), 500);
}

#[test]
fn keyboard_navigation_moves_focus_and_scrolls() {
    let mut w = ListWindow::new(
        uniform_items(100),
        ListWindowOptions::fixed(20).with_viewport_extent(100),
    );
    assert_eq!(w.page_size(), 5);

    // Keys are ignored while the container is unfocused.
    assert!(!w.handle_key(NavKey::ArrowDown));
    assert_eq!(w.focused_index(), None);

    w.set_has_focus(true);
    assert!(w.handle_key(NavKey::ArrowDown));
    assert_eq!(w.focused_index(), Some(0));

    assert!(w.handle_key(NavKey::ArrowUp));
    assert_eq!(w.focused_index(), Some(0));

    assert!(w.handle_key(NavKey::End));
    assert_eq!(w.focused_index(), Some(99));
    assert_eq!(w.scroll_offset(), 1_900);
    assert_eq!(
        w.focused_aria(),
        Some(AriaPosition {
            posinset: 100,
            setsize: 100,
        })
    );

    assert!(w.handle_key(NavKey::ArrowDown));
    assert_eq!(w.focused_index(), Some(99));

    assert!(w.handle_key(NavKey::Home));
    assert_eq!(w.focused_index(), Some(0));
    assert_eq!(w.scroll_offset(), 0);

    // Item 5 is [100, 120), just below the viewport: aligned to the end.
    assert!(w.handle_key(NavKey::PageDown));
    assert_eq!(w.focused_index(), Some(5));
    assert_eq!(w.scroll_offset(), 20);

    // Item 0 is above the viewport: aligned to the start.
    assert!(w.handle_key(NavKey::PageUp));
    assert_eq!(w.focused_index(), Some(0));
    assert_eq!(w.scroll_offset(), 0);

    assert!(w.handle_key(NavKey::ArrowRight));
    assert_eq!(w.focused_index(), Some(1));
    assert!(w.handle_key(NavKey::ArrowLeft));
    assert_eq!(w.focused_index(), Some(0));

    assert!(!w.handle_key(NavKey::Other));
}

#[test]
fn page_size_uses_average_height_and_is_at_least_one() {
    let w = ListWindow::new(
        sized_items(&[10, 30, 20, 20]),
        height_from_data().with_viewport_extent(45),
    );
    // Average height is 20.
    assert_eq!(w.page_size(), 2);

    let tall = ListWindow::new(
        uniform_items(10),
        ListWindowOptions::fixed(500).with_viewport_extent(100),
    );
    assert_eq!(tall.page_size(), 1);
}

#[test]
fn page_size_does_not_round_the_average_down() {
    // Heights alternate 1 and 2: an average of 1.5 fits two items in a viewport of 3.
    let heights: Vec<u32> = (0..100).map(|i| if i % 2 == 0 { 1 } else { 2 }).collect();
    let mut w = ListWindow::new(sized_items(&heights), height_from_data().with_viewport_extent(3));
    assert_eq!(w.page_size(), 2);

    w.set_has_focus(true);
    w.focus_item(10);
    assert!(w.handle_key(NavKey::PageDown));
    assert_eq!(w.focused_index(), Some(12));
}

#[test]
fn item_ids_from_usize_never_wrap() {
    assert_eq!(ItemId::from(42usize), ItemId::Int(42));
    #[cfg(target_pointer_width = "64")]
    {
        use alloc::string::ToString;
        assert_eq!(
            ItemId::from(usize::MAX),
            ItemId::Str(usize::MAX.to_string())
        );
        assert_ne!(ItemId::from(usize::MAX), ItemId::Int(-1));
    }
}

#[test]
fn aria_metadata_is_only_on_focused_item() {
    let mut w = ListWindow::new(
        uniform_items(10),
        ListWindowOptions::fixed(10).with_viewport_extent(50),
    );
    assert!(w.focus_item(2));
    assert!(!w.focus_item(10));
    assert_eq!(w.focused_index(), Some(2));

    let rendered = w.render_items(|item, index, style| (item.id.clone(), index, style));
    for (id, index, style) in &rendered {
        assert_eq!(*id, ItemId::Int(*index as i64));
        assert_eq!(style.start, *index as u64 * 10);
        assert_eq!(style.size, 10);
        assert_eq!(style.top(), Some(style.start));
        if *index == 2 {
            assert_eq!(
                style.aria,
                Some(AriaPosition {
                    posinset: 3,
                    setsize: 10,
                })
            );
        } else {
            assert_eq!(style.aria, None);
        }
    }
}

#[test]
fn list_change_resets_focus_only_when_out_of_bounds() {
    let mut w = ListWindow::new(
        uniform_items(10),
        ListWindowOptions::fixed(10).with_viewport_extent(50),
    );
    w.focus_item(8);

    w.set_items(uniform_items(20).into());
    assert_eq!(w.focused_index(), Some(8));
    assert_eq!(w.focused_aria().map(|a| a.setsize), Some(20));

    w.set_items(uniform_items(5).into());
    assert_eq!(w.focused_index(), None);
}

#[test]
fn list_change_reports_range_even_if_indexes_match() {
    let count = Arc::new(AtomicUsize::new(0));
    let mut w = ListWindow::new(
        uniform_items(10),
        ListWindowOptions::fixed(10)
            .with_viewport_extent(50)
            .with_on_items_rendered(Some({
                let count = Arc::clone(&count);
                move |_: usize, _: usize, _: &[Item<u32>]| {
                    count.fetch_add(1, Ordering::Relaxed);
                }
            })),
    );
    assert_eq!(count.load(Ordering::Relaxed), 1);

    w.set_items(uniform_items(10).into());
    assert_eq!(count.load(Ordering::Relaxed), 2);

    w.set_viewport_extent(50);
    assert_eq!(count.load(Ordering::Relaxed), 2);
}

#[test]
fn batch_update_applies_list_change_before_range() {
    let ranges = Arc::new(Mutex::new(Vec::new()));
    let mut w = ListWindow::new(
        uniform_items(10),
        ListWindowOptions::fixed(10)
            .with_viewport_extent(50)
            .with_overscan(0)
            .with_on_items_rendered(Some({
                let ranges = Arc::clone(&ranges);
                move |start: usize, end: usize, items: &[Item<u32>]| {
                    ranges.lock().unwrap().push((start, end, items.len()))
                }
            })),
    );
    ranges.lock().unwrap().clear();

    w.batch_update(|w| {
        w.set_items(uniform_items(100).into());
        w.apply_scroll_offset(500, 0);
    });
    assert_eq!(*ranges.lock().unwrap(), alloc::vec![(50, 54, 5)]);
}

#[test]
fn index_of_finds_first_matching_id() {
    let items = alloc::vec![
        Item::new("a", 0u32),
        Item::new("b", 1),
        Item::new("a", 2),
        Item::new(7i64, 3),
    ];
    let mut w = ListWindow::new(items, ListWindowOptions::fixed(1));
    assert_eq!(w.index_of(&ItemId::from("a")), Some(0));
    assert_eq!(w.index_of(&ItemId::from("b")), Some(1));
    assert_eq!(w.index_of(&ItemId::Int(7)), Some(3));
    assert_eq!(w.index_of(&ItemId::from("zzz")), None);

    w.set_items(alloc::vec![Item::new("b", 0u32), Item::new("a", 1)].into());
    assert_eq!(w.index_of(&ItemId::from("a")), Some(1));
}

#[test]
fn set_options_rebuilds_geometry_only_for_new_descriptor() {
    let recorder = Arc::new(RecordingMetrics::new());
    let sink: Arc<dyn MetricsSink> = recorder.clone();

    let mut w = ListWindow::new(
        uniform_items(10),
        ListWindowOptions::fixed(10)
            .with_viewport_extent(30)
            .with_metrics(Some(Arc::clone(&sink))),
    );
    recorder.take();

    w.update_options(|o| o.overscan = 1);
    assert!(!recorder
        .events()
        .iter()
        .any(|e| matches!(e, MetricEvent::GeometryInvalidated { .. })));

    w.update_options(|o| o.height = HeightDescriptor::Fixed(20));
    assert!(recorder
        .events()
        .contains(&MetricEvent::GeometryInvalidated { item_count: 10 }));
    assert_eq!(w.total_extent(), 200);

    w.set_height(HeightDescriptor::dynamic(|_: &Item<u32>, i| 1 + i as u32));
    assert_eq!(w.total_extent(), (1..=10).sum::<u32>() as u64);
}

#[test]
fn window_state_round_trips() {
    let mut w = ListWindow::new(
        uniform_items(100),
        ListWindowOptions::fixed(10).with_viewport_extent(100),
    );
    w.set_has_focus(true);
    w.focus_item(42);
    w.apply_scroll_offset(400, 1_000);
    let state = w.window_state();
    assert_eq!(state.scroll.offset, 400);
    assert!(state.scroll.is_scrolling);

    let mut restored = ListWindow::new(uniform_items(100), ListWindowOptions::fixed(10));
    restored.restore_window_state(state, 5_000);
    assert_eq!(restored.window_state(), state);

    restored.update_scrolling(5_100);
    assert!(restored.is_scrolling());
    restored.update_scrolling(5_150);
    assert!(!restored.is_scrolling());

    // A focused index past the end of a shorter list is dropped.
    let mut short = ListWindow::new(uniform_items(10), ListWindowOptions::fixed(10));
    short.restore_window_state(state, 0);
    assert_eq!(short.focused_index(), None);
    assert_eq!(short.scroll_offset(), 0);
}

#[test]
fn collect_visible_indexes_matches_render() {
    let mut w = ListWindow::new(
        uniform_items(100),
        ListWindowOptions::fixed(3).with_viewport_extent(20),
    );
    w.set_scroll_offset(150);

    let mut a = Vec::new();
    w.collect_visible_indexes(&mut a);
    let b = w.render_items(|_, i, _| i);
    assert_eq!(a, b);
    assert_eq!(a.first(), Some(&45));
}

#[test]
fn smoke_large_count() {
    let mut w = ListWindow::new(
        uniform_items(1_000_000),
        ListWindowOptions::fixed(1).with_viewport_extent(10),
    );
    w.set_scroll_offset(123_456);

    let r = w.visible_range().unwrap();
    assert!(r.start_index <= 123_456);
    assert!(r.end_index >= 123_465);

    let off = w.scroll_to_item_offset(999_999, Align::End).unwrap();
    assert_eq!(off, 999_990);
}
