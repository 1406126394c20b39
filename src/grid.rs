use std::ops::Range;

use eframe::egui::{self, Pos2, Vec2};

/// Which slice of the item list is on screen: a rows×columns window starting
/// at a page offset. Raw values are kept as configured; the effective values
/// returned by the accessors are clamped against the item count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pager {
    rows: usize,
    columns: usize,
    offset: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self {
            rows: 1,
            columns: 1,
            offset: 0,
        }
    }
}

impl Pager {
    pub fn new(rows: usize, columns: usize, offset: usize) -> Self {
        let mut pager = Self::default();
        pager.set_rows(rows as i64);
        pager.set_columns(columns as i64);
        pager.set_offset(offset as i64);
        pager
    }

    pub fn set_rows(&mut self, rows: i64) {
        self.rows = rows.max(1) as usize;
    }

    pub fn set_columns(&mut self, columns: i64) {
        self.columns = columns.max(1) as usize;
    }

    pub fn set_offset(&mut self, offset: i64) {
        self.offset = offset.max(0) as usize;
    }

    pub fn rows(&self, count: usize) -> usize {
        self.rows.min(count).max(1)
    }

    pub fn columns(&self, count: usize) -> usize {
        self.columns.min(count).max(1)
    }

    /// First visible item, never past the end of the list.
    pub fn offset(&self, count: usize) -> usize {
        self.offset.min(count.saturating_sub(1))
    }

    pub fn page_len(&self, count: usize) -> usize {
        self.rows(count) * self.columns(count)
    }

    pub fn visible(&self, count: usize) -> Range<usize> {
        let start = self.offset(count);
        start..count.min(start + self.page_len(count))
    }

    /// Column/row position of the i-th slot on the page.
    pub fn slot(&self, index: usize, count: usize) -> (usize, usize) {
        let columns = self.columns(count);
        (index % columns, index / columns)
    }

    pub fn next_page(&mut self, count: usize) -> bool {
        let offset = self.offset(count) + self.page_len(count);
        if offset < count {
            self.offset = offset;
            true
        } else {
            false
        }
    }

    pub fn prev_page(&mut self, count: usize) -> bool {
        let offset = self.offset(count);
        let page_len = self.page_len(count);
        if offset >= page_len {
            self.offset = offset - page_len;
        } else if offset > 0 {
            self.offset = 0;
        } else {
            return false;
        }
        true
    }

    pub fn first_page(&mut self, count: usize) -> bool {
        if self.offset(count) == 0 {
            return false;
        }
        self.offset = 0;
        true
    }

    /// Jumps so the final page is exactly full, but never backwards.
    pub fn last_page(&mut self, count: usize) -> bool {
        let offset = count.saturating_sub(self.page_len(count));
        if offset > self.offset(count) {
            self.offset = offset;
            true
        } else {
            false
        }
    }

    /// Shifts the window by whole items, e.g. to nudge a grid by one column.
    pub fn shift(&mut self, count: usize, delta: i64) {
        self.set_offset(self.offset(count) as i64 + delta);
    }

    pub fn adjust_rows(&mut self, delta: i64, count: usize) {
        self.set_rows(self.rows(count) as i64 + delta);
    }

    pub fn adjust_columns(&mut self, delta: i64, count: usize) {
        self.set_columns(self.columns(count) as i64 + delta);
    }

    /// Decides what a shape change does to a page that was planned with
    /// `placed_columns` and currently holds `placed` items. A pure shrink
    /// keeps every surviving item in its slot, so truncation suffices;
    /// anything that moves items refills the page.
    pub fn plan_update(
        &self,
        count: usize,
        placed: usize,
        placed_columns: usize,
        loading: bool,
    ) -> PageUpdate {
        if loading {
            return PageUpdate::Restart;
        }
        let offset = self.offset(count);
        let want = self.page_len(count).min(count.saturating_sub(offset));
        let columns_unchanged = self.columns(count) == placed_columns;
        if want < placed && (columns_unchanged || self.rows(count) == 1) {
            PageUpdate::Truncate(want)
        } else if want != placed || !columns_unchanged {
            PageUpdate::Reload
        } else {
            PageUpdate::Keep
        }
    }
}

/// How an already-placed page reacts to a rows/columns change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageUpdate {
    /// The page already matches the new shape.
    Keep,
    /// Pure shrink: drop the trailing slots, keep the rest in place.
    Truncate(usize),
    /// Items would move to different slots; refill the page.
    Reload,
    /// The page is still filling; start the fill over with the new shape.
    Restart,
}

/// Table-style placement: each column is as wide as its widest item, each
/// row as tall as its tallest, with a uniform gap in between.
#[derive(Clone, Debug, Default)]
pub struct GridLayout {
    pub positions: Vec<Pos2>,
    pub size: Vec2,
}

impl GridLayout {
    pub fn compute(item_sizes: &[Vec2], columns: usize, spacing: f32) -> Self {
        if item_sizes.is_empty() {
            return Self::default();
        }
        let columns = columns.max(1);
        let rows = item_sizes.len().div_ceil(columns);

        let mut column_widths = vec![0.0f32; columns];
        let mut row_heights = vec![0.0f32; rows];
        for (i, size) in item_sizes.iter().enumerate() {
            let (col, row) = (i % columns, i / columns);
            column_widths[col] = column_widths[col].max(size.x);
            row_heights[row] = row_heights[row].max(size.y);
        }

        let mut column_starts = Vec::with_capacity(columns);
        let mut x = 0.0;
        for width in &column_widths {
            column_starts.push(x);
            x += width + spacing;
        }
        let mut row_starts = Vec::with_capacity(rows);
        let mut y = 0.0;
        for height in &row_heights {
            row_starts.push(y);
            y += height + spacing;
        }

        let positions = item_sizes
            .iter()
            .enumerate()
            .map(|(i, _)| egui::pos2(column_starts[i % columns], row_starts[i / columns]))
            .collect();
        let used_columns = columns.min(item_sizes.len());
        let size = egui::vec2(
            column_starts[used_columns - 1] + column_widths[used_columns - 1],
            row_starts[rows - 1] + row_heights[rows - 1],
        );
        Self { positions, size }
    }
}
