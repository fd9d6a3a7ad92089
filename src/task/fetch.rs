use crate::core::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self { page, page_size }
    }
}

/// Retrieves one page of items. Runs on a worker thread, so it may block.
pub trait PageFetcher<T>: Send + Sync {
    fn fetch_page(&self, request: PageRequest) -> Result<Vec<T>, FetchError>;
}

impl<T, F> PageFetcher<T> for F
where
    F: Fn(PageRequest) -> Result<Vec<T>, FetchError> + Send + Sync,
{
    fn fetch_page(&self, request: PageRequest) -> Result<Vec<T>, FetchError> {
        self(request)
    }
}

/// Caller-owned loader for the externally driven list: it updates the
/// caller's own collection and reports only success or failure.
pub trait LoadMore: Send + Sync {
    fn load_more(&self) -> Result<(), FetchError>;
}

impl<F> LoadMore for F
where
    F: Fn() -> Result<(), FetchError> + Send + Sync,
{
    fn load_more(&self) -> Result<(), FetchError> {
        self()
    }
}
