use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::error::{ConfigError, FetchError};
use crate::core::scroll::{DEFAULT_THRESHOLD, ScrollMetrics, is_near_bottom, validate_threshold};
use crate::core::state::PagedState;
use crate::core::window::{WindowStrategy, page_window, prefix_window};
use crate::task::{Completion, FetchExecutor, PageFetcher, PageRequest};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Deferred fetches are 1-based, seeded or not.
const FIRST_FETCHED_PAGE: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { page: usize, appended: usize },
    Pending { page: usize },
    /// The caller's own loader was invoked.
    Requested,
    Skipped(SkipReason),
}

impl LoadOutcome {
    /// Whether a load was started or completed.
    pub fn is_progress(&self) -> bool {
        matches!(
            self,
            LoadOutcome::Loaded { .. } | LoadOutcome::Pending { .. } | LoadOutcome::Requested
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoMetrics,
    BelowThreshold,
    Loading,
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    LoadStarted { page: usize },
    PageLoaded { page: usize, count: usize },
    Exhausted,
    LoadFailed { page: usize, error: FetchError },
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerMode {
    Eager(WindowStrategy),
    Deferred,
}

pub type StateListener<T> = Box<dyn FnMut(&StateChange, &PagedState<T>)>;

enum Source<T> {
    Eager {
        items: Vec<T>,
        strategy: WindowStrategy,
    },
    Deferred {
        fetcher: Arc<dyn PageFetcher<T>>,
        executor: FetchExecutor<Vec<T>>,
        seed: Vec<T>,
    },
}

/// Decides when the next page is requested and owns what is materialized.
/// At most one load is outstanding; a trigger while loading is dropped.
pub struct PagedController<T> {
    source: Source<T>,
    page_size: usize,
    threshold: f64,
    seed_has_more: bool,
    state: PagedState<T>,
    in_flight: Option<PageRequest>,
    generation: u64,
    listener: Option<StateListener<T>>,
}

impl<T: Clone + Send + 'static> PagedController<T> {
    pub fn eager(items: Vec<T>, page_size: usize) -> Result<Self, ConfigError> {
        Self::with_source(
            Source::Eager {
                items,
                strategy: WindowStrategy::default(),
            },
            page_size,
        )
    }

    pub fn deferred<F>(fetcher: F, page_size: usize) -> Result<Self, ConfigError>
    where
        F: PageFetcher<T> + 'static,
    {
        Self::deferred_shared(Arc::new(fetcher), page_size)
    }

    pub fn deferred_shared(
        fetcher: Arc<dyn PageFetcher<T>>,
        page_size: usize,
    ) -> Result<Self, ConfigError> {
        Self::with_source(
            Source::Deferred {
                fetcher,
                executor: FetchExecutor::new(),
                seed: Vec::new(),
            },
            page_size,
        )
    }

    fn with_source(source: Source<T>, page_size: usize) -> Result<Self, ConfigError> {
        if page_size == 0 {
            return Err(ConfigError::InvalidPageSize(page_size));
        }
        let mut controller = Self {
            source,
            page_size,
            threshold: DEFAULT_THRESHOLD,
            seed_has_more: true,
            state: PagedState::new(Vec::new(), 0, true),
            in_flight: None,
            generation: 0,
            listener: None,
        };
        controller.state = controller.seed_state();
        Ok(controller)
    }

    /// Selects the eager windowing convention. Construction-time only; the
    /// state is re-seeded.
    pub fn with_strategy(mut self, strategy: WindowStrategy) -> Self {
        if let Source::Eager {
            strategy: current, ..
        } = &mut self.source
        {
            *current = strategy;
            self.state = self.seed_state();
        } else {
            log::debug!("window strategy ignored for a deferred controller");
        }
        self
    }

    /// Seeds a deferred controller with an already-known first page.
    pub fn with_initial_items(mut self, items: Vec<T>) -> Self {
        if let Source::Deferred { seed, .. } = &mut self.source {
            *seed = items;
            self.state = self.seed_state();
        } else {
            log::debug!("initial items ignored for an eager controller");
        }
        self
    }

    pub fn with_has_more(mut self, has_more: bool) -> Self {
        self.seed_has_more = has_more;
        self.state = self.seed_state();
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Result<Self, ConfigError> {
        if !validate_threshold(threshold) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        self.threshold = threshold;
        Ok(self)
    }

    pub fn with_listener<F>(mut self, listener: F) -> Self
    where
        F: FnMut(&StateChange, &PagedState<T>) + 'static,
    {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn state(&self) -> &PagedState<T> {
        &self.state
    }

    pub fn items(&self) -> &[T] {
        self.state.items()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn mode(&self) -> ControllerMode {
        match &self.source {
            Source::Eager { strategy, .. } => ControllerMode::Eager(*strategy),
            Source::Deferred { .. } => ControllerMode::Deferred,
        }
    }

    /// Total item count when known upfront.
    pub fn total(&self) -> Option<usize> {
        match &self.source {
            Source::Eager { items, .. } => Some(items.len()),
            Source::Deferred { .. } => None,
        }
    }

    pub fn on_scroll_sample(&mut self, metrics: Option<ScrollMetrics>) -> LoadOutcome {
        let Some(metrics) = metrics else {
            return LoadOutcome::Skipped(SkipReason::NoMetrics);
        };
        if !is_near_bottom(&metrics, self.threshold) {
            return LoadOutcome::Skipped(SkipReason::BelowThreshold);
        }
        self.request_next_page()
    }

    pub fn request_next_page(&mut self) -> LoadOutcome {
        if self.state.is_loading() {
            log::debug!("load trigger dropped: page request already in flight");
            return LoadOutcome::Skipped(SkipReason::Loading);
        }
        if !self.state.has_more() {
            return LoadOutcome::Skipped(SkipReason::Exhausted);
        }

        let page = self.next_page();
        self.state.begin_load();
        self.emit(StateChange::LoadStarted { page });

        let request = PageRequest::new(page, self.page_size);
        let spawned = match &self.source {
            Source::Eager { .. } => false,
            Source::Deferred {
                fetcher, executor, ..
            } => {
                let fetcher = Arc::clone(fetcher);
                executor.spawn(self.generation, move || fetcher.fetch_page(request));
                true
            }
        };
        if !spawned {
            return self.load_eager(page);
        }

        self.in_flight = Some(request);
        log::debug!("requested page {page} ({} items)", self.page_size);
        LoadOutcome::Pending { page }
    }

    fn load_eager(&mut self, page: usize) -> LoadOutcome {
        let Source::Eager { items, strategy } = &self.source else {
            self.state.end_load();
            return LoadOutcome::Skipped(SkipReason::Exhausted);
        };
        let total = items.len();
        let before = self.state.len();
        let end = match strategy {
            WindowStrategy::Accumulate => {
                let (start, end) = page_window(total, self.page_size, page);
                self.state.append_page(page, items[start..end].to_vec());
                end
            }
            WindowStrategy::Prefix => {
                let (_, end) = prefix_window(total, self.page_size, page);
                self.state.replace_prefix(page, items[..end].to_vec());
                end
            }
        };
        let appended = self.state.len() - before;
        let exhausted = end >= total;
        if exhausted {
            self.state.mark_exhausted();
        }
        self.state.end_load();

        self.emit(StateChange::PageLoaded {
            page,
            count: appended,
        });
        if exhausted {
            log::info!("all {total} items revealed after page {page}");
            self.emit(StateChange::Exhausted);
        }
        LoadOutcome::Loaded { page, appended }
    }

    /// Applies finished fetches. Returns how many were applied.
    pub fn poll(&mut self) -> usize {
        let completions = match &self.source {
            Source::Deferred { executor, .. } => executor.drain_ready(),
            Source::Eager { .. } => return 0,
        };
        let mut applied = 0;
        for completion in completions {
            if self.apply_completion(completion) {
                applied += 1;
            }
        }
        applied
    }

    /// Blocks until the outstanding fetch settles or `timeout` passes.
    /// Returns whether the controller is idle.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        while self.state.is_loading() {
            let Some(remaining) = remaining_wait(deadline, timeout) else {
                return false;
            };
            let next = match &self.source {
                Source::Deferred { executor, .. } => executor.wait_next(remaining),
                Source::Eager { .. } => None,
            };
            let Some(completion) = next else {
                return false;
            };
            self.apply_completion(completion);
        }
        true
    }

    /// Re-seeds the state record; an in-flight fetch is discarded when it
    /// resolves.
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.in_flight = None;
        self.state = self.seed_state();
        self.emit(StateChange::Reset);
    }

    fn apply_completion(&mut self, completion: Completion<Vec<T>>) -> bool {
        if completion.generation != self.generation {
            log::debug!(
                "discarding page result from generation {}",
                completion.generation
            );
            return false;
        }
        let Some(request) = self.in_flight.take() else {
            return false;
        };

        match completion.result {
            Ok(items) => {
                let count = items.len();
                self.state.append_page(request.page + 1, items);
                let exhausted = count < request.page_size;
                if exhausted {
                    self.state.mark_exhausted();
                }
                self.state.end_load();

                self.emit(StateChange::PageLoaded {
                    page: request.page,
                    count,
                });
                if exhausted {
                    log::info!(
                        "page {} returned {count} of {} items, no more pages",
                        request.page,
                        request.page_size
                    );
                    self.emit(StateChange::Exhausted);
                }
            }
            Err(error) => {
                log::warn!("page {} fetch failed, loading stopped: {error}", request.page);
                self.state.mark_exhausted();
                self.state.end_load();
                self.emit(StateChange::LoadFailed {
                    page: request.page,
                    error,
                });
                self.emit(StateChange::Exhausted);
            }
        }
        true
    }

    fn seed_state(&self) -> PagedState<T> {
        match &self.source {
            Source::Eager { items, strategy } => {
                let total = items.len();
                let page = strategy.initial_page();
                let (start, end) = match strategy {
                    WindowStrategy::Accumulate => page_window(total, self.page_size, page),
                    WindowStrategy::Prefix => prefix_window(total, self.page_size, page),
                };
                let has_more = self.seed_has_more && end < total;
                PagedState::new(items[start..end].to_vec(), page, has_more)
            }
            Source::Deferred { seed, .. } => {
                PagedState::new(seed.clone(), FIRST_FETCHED_PAGE, self.seed_has_more)
            }
        }
    }

    /// Eager lists track the last revealed page; deferred lists track the
    /// next page to fetch.
    fn next_page(&self) -> usize {
        match &self.source {
            Source::Eager { .. } => self.state.page_index() + 1,
            Source::Deferred { .. } => self.state.page_index(),
        }
    }

    fn emit(&mut self, change: StateChange) {
        if let Some(listener) = self.listener.as_mut() {
            listener(&change, &self.state);
        }
    }
}

/// Time left before `deadline`, or `None` once it passed. Without a
/// representable deadline the full `timeout` is granted each round.
pub(crate) fn remaining_wait(deadline: Option<Instant>, timeout: Duration) -> Option<Duration> {
    let Some(deadline) = deadline else {
        return Some(timeout);
    };
    let remaining = deadline.saturating_duration_since(Instant::now());
    (!remaining.is_zero()).then_some(remaining)
}
