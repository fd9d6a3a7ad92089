use crate::core::window::{page_count, page_window};

/// Discrete page buttons, independent of scroll loading. Pages are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    rows: usize,
    first: usize,
}

impl Paginator {
    pub(super) fn new(rows: usize) -> Self {
        Self { rows, first: 0 }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Index of the first record on the current page.
    pub fn first(&self) -> usize {
        self.first
    }

    pub fn current_page(&self) -> usize {
        self.first / self.rows
    }

    pub fn page_count(&self, total: usize) -> usize {
        page_count(total, self.rows)
    }

    pub fn go_to_page(&mut self, page: usize, total: usize) -> bool {
        let last = self.page_count(total).saturating_sub(1);
        let first = page.min(last) * self.rows;
        let changed = first != self.first;
        self.first = first;
        changed
    }

    pub fn next(&mut self, total: usize) -> bool {
        self.go_to_page(self.current_page() + 1, total)
    }

    pub fn previous(&mut self, total: usize) -> bool {
        self.go_to_page(self.current_page().saturating_sub(1), total)
    }

    pub fn reset(&mut self) {
        self.first = 0;
    }

    pub fn window(&self, total: usize) -> (usize, usize) {
        let last = self.page_count(total).saturating_sub(1);
        page_window(total, self.rows, self.current_page().min(last))
    }

    pub fn report(&self, total: usize) -> String {
        let (start, end) = self.window(total);
        if total == 0 {
            return "0 of 0".to_string();
        }
        format!("{}-{} of {}", start + 1, end, total)
    }
}
