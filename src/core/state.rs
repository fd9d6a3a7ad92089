#[derive(Debug, Clone, PartialEq)]
pub struct PagedState<T> {
    materialized: Vec<T>,
    page_index: usize,
    is_loading: bool,
    has_more: bool,
}

impl<T> PagedState<T> {
    pub(crate) fn new(materialized: Vec<T>, page_index: usize, has_more: bool) -> Self {
        Self {
            materialized,
            page_index,
            is_loading: false,
            has_more,
        }
    }

    pub fn items(&self) -> &[T] {
        self.materialized.as_slice()
    }

    pub fn len(&self) -> usize {
        self.materialized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materialized.is_empty()
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn can_load(&self) -> bool {
        !self.is_loading && self.has_more
    }

    pub(crate) fn begin_load(&mut self) {
        self.is_loading = true;
    }

    pub(crate) fn end_load(&mut self) {
        self.is_loading = false;
    }

    pub(crate) fn append_page(&mut self, page_index: usize, items: Vec<T>) {
        self.materialized.extend(items);
        self.page_index = page_index;
    }

    pub(crate) fn replace_prefix(&mut self, page_index: usize, items: Vec<T>) {
        if items.len() >= self.materialized.len() {
            self.materialized = items;
        }
        self.page_index = page_index;
    }

    /// Exhaustion is permanent for the lifetime of the state record.
    pub(crate) fn mark_exhausted(&mut self) {
        self.has_more = false;
    }
}
