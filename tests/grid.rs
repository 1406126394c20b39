use eframe::egui;
use imagepeek::grid::{GridLayout, PageUpdate, Pager};

#[test]
fn pager_clamps_rows_columns_and_offset() {
    let pager = Pager::new(0, 0, 7);
    assert_eq!(pager.rows(10), 1);
    assert_eq!(pager.columns(10), 1);
    assert_eq!(pager.offset(10), 7);
    // Offset never points past the last item.
    assert_eq!(pager.offset(3), 2);
}

#[test]
fn effective_shape_is_limited_by_item_count() {
    let pager = Pager::new(4, 5, 0);
    assert_eq!(pager.rows(3), 3);
    assert_eq!(pager.columns(3), 3);
    assert_eq!(pager.rows(100), 4);
    assert_eq!(pager.columns(100), 5);
}

#[test]
fn visible_range_covers_one_page() {
    let pager = Pager::new(2, 3, 4);
    assert_eq!(pager.page_len(10), 6);
    assert_eq!(pager.visible(10), 4..10);
    // A short tail yields a partial page.
    assert_eq!(pager.visible(5), 4..5);
}

#[test]
fn next_page_stops_at_the_end() {
    let mut pager = Pager::new(2, 3, 0);
    assert!(pager.next_page(10));
    assert_eq!(pager.offset(10), 6);
    assert!(!pager.next_page(10));
    assert_eq!(pager.offset(10), 6);
}

#[test]
fn prev_page_lands_on_zero_from_partial_offsets() {
    let mut pager = Pager::new(2, 3, 6);
    assert!(pager.prev_page(10));
    assert_eq!(pager.offset(10), 0);

    let mut pager = Pager::new(2, 3, 3);
    assert!(pager.prev_page(10));
    assert_eq!(pager.offset(10), 0);
    assert!(!pager.prev_page(10));
}

#[test]
fn first_and_last_page_jumps() {
    let mut pager = Pager::new(2, 3, 4);
    assert!(pager.first_page(10));
    assert_eq!(pager.offset(10), 0);
    assert!(!pager.first_page(10));

    assert!(pager.last_page(10));
    assert_eq!(pager.offset(10), 4);
    // Never moves backwards.
    assert!(!pager.last_page(10));
}

#[test]
fn shift_moves_by_single_items_and_clamps_at_zero() {
    let mut pager = Pager::new(1, 1, 0);
    pager.shift(10, -1);
    assert_eq!(pager.offset(10), 0);
    pager.shift(10, 1);
    pager.shift(10, 1);
    assert_eq!(pager.offset(10), 2);
}

#[test]
fn row_and_column_adjustment_never_drops_below_one() {
    let mut pager = Pager::new(1, 1, 0);
    pager.adjust_rows(-1, 10);
    pager.adjust_columns(-1, 10);
    assert_eq!(pager.rows(10), 1);
    assert_eq!(pager.columns(10), 1);
    pager.adjust_rows(1, 10);
    pager.adjust_columns(1, 10);
    assert_eq!(pager.rows(10), 2);
    assert_eq!(pager.columns(10), 2);
}

#[test]
fn slots_fill_row_major() {
    let pager = Pager::new(2, 3, 0);
    assert_eq!(pager.slot(0, 10), (0, 0));
    assert_eq!(pager.slot(2, 10), (2, 0));
    assert_eq!(pager.slot(4, 10), (1, 1));
}

#[test]
fn shape_changes_while_loading_restart_the_fill() {
    let pager = Pager::new(2, 3, 0);
    assert_eq!(pager.plan_update(10, 2, 3, true), PageUpdate::Restart);
}

#[test]
fn shrinking_rows_truncates_the_placed_page() {
    let mut pager = Pager::new(3, 3, 0);
    pager.adjust_rows(-1, 10);
    assert_eq!(pager.plan_update(10, 9, 3, false), PageUpdate::Truncate(6));
}

#[test]
fn shrinking_columns_on_a_single_row_truncates() {
    let mut pager = Pager::new(1, 5, 0);
    pager.adjust_columns(-2, 10);
    assert_eq!(pager.plan_update(10, 5, 5, false), PageUpdate::Truncate(3));
}

#[test]
fn growing_or_reshaping_refills_the_page() {
    let mut pager = Pager::new(2, 3, 0);
    pager.adjust_rows(1, 20);
    assert_eq!(pager.plan_update(20, 6, 3, false), PageUpdate::Reload);

    // Same slot count split over different columns: positions move.
    let pager = Pager::new(2, 3, 0);
    assert_eq!(pager.plan_update(20, 6, 2, false), PageUpdate::Reload);
}

#[test]
fn matching_shape_is_left_alone() {
    let pager = Pager::new(2, 3, 0);
    assert_eq!(pager.plan_update(20, 6, 3, false), PageUpdate::Keep);
}

#[test]
fn layout_uses_max_width_per_column_and_max_height_per_row() {
    let sizes = [
        egui::vec2(10.0, 10.0),
        egui::vec2(20.0, 20.0),
        egui::vec2(30.0, 30.0),
    ];
    let layout = GridLayout::compute(&sizes, 2, 4.0);
    assert_eq!(layout.positions[0], egui::pos2(0.0, 0.0));
    assert_eq!(layout.positions[1], egui::pos2(34.0, 0.0));
    assert_eq!(layout.positions[2], egui::pos2(0.0, 24.0));
    // Columns: max(10, 30) = 30 and 20; rows: 20 and 30.
    assert_eq!(layout.size, egui::vec2(54.0, 54.0));
}

#[test]
fn layout_of_single_row_ignores_unused_columns() {
    let sizes = [egui::vec2(100.0, 50.0), egui::vec2(50.0, 100.0)];
    let layout = GridLayout::compute(&sizes, 3, 4.0);
    assert_eq!(layout.size, egui::vec2(154.0, 100.0));
}

#[test]
fn empty_layout_is_zero_sized() {
    let layout = GridLayout::compute(&[], 3, 4.0);
    assert!(layout.positions.is_empty());
    assert_eq!(layout.size, egui::Vec2::ZERO);
}
