use unicode_width::UnicodeWidthChar;

use crate::core::scroll::ScrollMetrics;

/// Scroll position over a column of rows. One row counts as one pixel when
/// the viewport is reported as scroll metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    offset: usize,
    height: usize,
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Self { offset: 0, height }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn set_height(&mut self, height: usize, total: usize) {
        self.height = height;
        self.clamp(total);
    }

    fn max_offset(&self, total: usize) -> usize {
        total.saturating_sub(self.height)
    }

    pub fn clamp(&mut self, total: usize) {
        self.offset = self.offset.min(self.max_offset(total));
    }

    /// Returns whether the offset moved.
    pub fn scroll_by(&mut self, delta: isize, total: usize) -> bool {
        let target = self.offset.saturating_add_signed(delta).min(self.max_offset(total));
        let moved = target != self.offset;
        self.offset = target;
        moved
    }

    pub fn page_down(&mut self, total: usize) -> bool {
        self.scroll_by(self.height.max(1) as isize, total)
    }

    pub fn page_up(&mut self, total: usize) -> bool {
        self.scroll_by(-(self.height.max(1) as isize), total)
    }

    pub fn home(&mut self) -> bool {
        let moved = self.offset != 0;
        self.offset = 0;
        moved
    }

    pub fn end(&mut self, total: usize) -> bool {
        let target = self.max_offset(total);
        let moved = target != self.offset;
        self.offset = target;
        moved
    }

    pub fn visible_range(&self, total: usize) -> (usize, usize) {
        let start = self.offset.min(total);
        let end = (start + self.height).min(total);
        (start, end)
    }

    pub fn metrics(&self, total: usize) -> ScrollMetrics {
        ScrollMetrics::new(self.offset as f64, total as f64, self.height as f64)
    }

    pub fn footer(&self, total: usize) -> Option<String> {
        if total <= self.height {
            return None;
        }
        let (start, end) = self.visible_range(total);
        let arrow = match (start > 0, end < total) {
            (true, true) => " ↑↓",
            (true, false) => " ↑",
            (false, true) => " ↓",
            (false, false) => "",
        };
        Some(format!("[{}-{} of {}]{}", start + 1, end, total, arrow))
    }
}

/// Cuts `text` to at most `width` terminal columns.
pub fn truncate_to_width(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (index, ch) in text.char_indices() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width {
            return &text[..index];
        }
        used += w;
    }
    text
}

#[cfg(test)]
mod tests {
    use super::{Viewport, truncate_to_width};
    use rstest::rstest;

    #[test]
    fn scrolls_within_content() {
        let mut viewport = Viewport::new(10);
        assert!(!viewport.scroll_by(-1, 25));
        assert!(viewport.page_down(25));
        assert_eq!(viewport.visible_range(25), (10, 20));
        assert!(viewport.page_down(25));
        assert_eq!(viewport.offset(), 15);
        assert!(!viewport.scroll_by(1, 25));
        assert_eq!(viewport.footer(25).as_deref(), Some("[16-25 of 25] ↑"));

        let metrics = viewport.metrics(25);
        assert_eq!(metrics.remaining(), 0.0);

        assert!(viewport.home());
        assert_eq!(viewport.footer(25).as_deref(), Some("[1-10 of 25] ↓"));
        assert_eq!(viewport.footer(8), None);
    }

    #[test]
    fn shrinking_content_pulls_offset_back() {
        let mut viewport = Viewport::new(5);
        viewport.end(30);
        assert_eq!(viewport.offset(), 25);
        viewport.clamp(12);
        assert_eq!(viewport.offset(), 7);
        viewport.set_height(20, 12);
        assert_eq!(viewport.offset(), 0);
    }

    #[rstest]
    #[case("hello", 3, "hel")]
    #[case("hello", 10, "hello")]
    #[case("日本語", 4, "日本")]
    #[case("日本語", 5, "日本")]
    #[case("", 2, "")]
    fn truncates_by_display_width(#[case] text: &str, #[case] width: usize, #[case] expected: &str) {
        assert_eq!(truncate_to_width(text, width), expected);
    }
}
