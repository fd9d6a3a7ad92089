use serde::{Deserialize, Serialize};

/// How an eager controller reveals its items, one page per load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowStrategy {
    /// Page index starts at 0; each load appends the next page slice.
    #[default]
    Accumulate,
    /// Page index starts at 1; each load replaces the view with the prefix
    /// `[0, page_index * page_size)`.
    Prefix,
}

impl WindowStrategy {
    pub fn initial_page(self) -> usize {
        match self {
            Self::Accumulate => 0,
            Self::Prefix => 1,
        }
    }
}

pub fn page_window(total: usize, page_size: usize, page_index: usize) -> (usize, usize) {
    let start = page_index.saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);
    (start, end)
}

pub fn prefix_window(total: usize, page_size: usize, page_index: usize) -> (usize, usize) {
    (0, page_index.saturating_mul(page_size).min(total))
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}
