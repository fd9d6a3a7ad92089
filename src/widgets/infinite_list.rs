use std::sync::Arc;
use std::time::Duration;

use crate::core::controller::{
    ControllerMode, LoadOutcome, PagedController, StateChange, StateListener,
};
use crate::core::error::ConfigError;
use crate::core::options::ListOptions;
use crate::core::scroll::{ScrollHost, ScrollMetrics, ScrollSubscription};
use crate::core::state::PagedState;
use crate::core::window::WindowStrategy;
use crate::task::PageFetcher;

pub type RenderItem<T, R> = Box<dyn Fn(&T, usize) -> R>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStatus {
    Idle,
    Loading,
    Exhausted,
}

/// What the view draws this pass: rendered rows, then the placeholder for
/// the current status, if one was configured.
#[derive(Debug, Clone, PartialEq)]
pub struct ListFrame<R> {
    pub rows: Vec<R>,
    pub status: ListStatus,
    pub placeholder: Option<R>,
}

pub struct InfiniteListBuilder<T, R> {
    items: Option<Vec<T>>,
    fetcher: Option<Arc<dyn PageFetcher<T>>>,
    initial_items: Vec<T>,
    has_more: Option<bool>,
    render_item: Option<RenderItem<T, R>>,
    loading_component: Option<R>,
    end_message: Option<R>,
    options: ListOptions,
    listener: Option<StateListener<T>>,
}

impl<T: Clone + Send + 'static, R> InfiniteListBuilder<T, R> {
    pub fn new() -> Self {
        Self {
            items: None,
            fetcher: None,
            initial_items: Vec::new(),
            has_more: None,
            render_item: None,
            loading_component: None,
            end_message: None,
            options: ListOptions::default(),
            listener: None,
        }
    }

    pub fn with_items(mut self, items: Vec<T>) -> Self {
        self.items = Some(items);
        self
    }

    pub fn with_fetch_page<F>(mut self, fetcher: F) -> Self
    where
        F: PageFetcher<T> + 'static,
    {
        self.fetcher = Some(Arc::new(fetcher));
        self
    }

    pub fn with_initial_items(mut self, items: Vec<T>) -> Self {
        self.initial_items = items;
        self
    }

    pub fn with_has_more(mut self, has_more: bool) -> Self {
        self.has_more = Some(has_more);
        self
    }

    pub fn with_render_item<F>(mut self, render_item: F) -> Self
    where
        F: Fn(&T, usize) -> R + 'static,
    {
        self.render_item = Some(Box::new(render_item));
        self
    }

    pub fn with_loading_component(mut self, loading: R) -> Self {
        self.loading_component = Some(loading);
        self
    }

    pub fn with_end_message(mut self, end_message: R) -> Self {
        self.end_message = Some(end_message);
        self
    }

    pub fn with_options(mut self, options: ListOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_items_per_page(mut self, items_per_page: usize) -> Self {
        self.options.items_per_page = items_per_page;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.options.threshold = threshold;
        self
    }

    pub fn with_container_height(mut self, height: impl Into<String>) -> Self {
        self.options.container_height = height.into();
        self
    }

    pub fn with_strategy(mut self, strategy: WindowStrategy) -> Self {
        self.options.strategy = strategy;
        self
    }

    pub fn with_on_change<F>(mut self, listener: F) -> Self
    where
        F: FnMut(&StateChange, &PagedState<T>) + 'static,
    {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn build(self) -> Result<InfiniteList<T, R>, ConfigError> {
        let render_item = self.render_item.ok_or(ConfigError::MissingRenderItem)?;
        self.options.validate()?;
        let page_size = self.options.items_per_page;

        let controller = match (self.items, self.fetcher) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingSource),
            (None, None) => return Err(ConfigError::MissingSource),
            (Some(items), None) => {
                PagedController::eager(items, page_size)?.with_strategy(self.options.strategy)
            }
            (None, Some(fetcher)) => PagedController::deferred_shared(fetcher, page_size)?
                .with_initial_items(self.initial_items),
        };
        let controller = match self.has_more {
            Some(has_more) => controller.with_has_more(has_more),
            None => controller,
        };
        let mut controller = controller.with_threshold(self.options.threshold)?;
        if let Some(listener) = self.listener {
            controller = controller.with_listener(listener);
        }

        Ok(InfiniteList {
            controller,
            render_item,
            loading_component: self.loading_component,
            end_message: self.end_message,
            options: self.options,
            subscription: None,
        })
    }

    /// Builds the list and subscribes it to `host`. The subscription is
    /// released again if the configuration is rejected.
    pub fn mount(self, host: &ScrollHost) -> Result<InfiniteList<T, R>, ConfigError> {
        let subscription = host.subscribe();
        let mut list = self.build()?;
        list.subscription = Some(subscription);
        if list.controller.mode() == ControllerMode::Deferred && list.controller.state().is_empty()
        {
            list.controller.request_next_page();
        }
        Ok(list)
    }
}

impl<T: Clone + Send + 'static, R> Default for InfiniteListBuilder<T, R> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct InfiniteList<T, R> {
    controller: PagedController<T>,
    render_item: RenderItem<T, R>,
    loading_component: Option<R>,
    end_message: Option<R>,
    options: ListOptions,
    subscription: Option<ScrollSubscription>,
}

impl<T: Clone + Send + 'static, R> InfiniteList<T, R> {
    pub fn builder() -> InfiniteListBuilder<T, R> {
        InfiniteListBuilder::new()
    }

    pub fn controller(&self) -> &PagedController<T> {
        &self.controller
    }

    pub fn state(&self) -> &PagedState<T> {
        self.controller.state()
    }

    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn status(&self) -> ListStatus {
        let state = self.controller.state();
        if state.is_loading() {
            ListStatus::Loading
        } else if !state.has_more() {
            ListStatus::Exhausted
        } else {
            ListStatus::Idle
        }
    }

    /// Applies finished fetches, then the newest scroll sample. Returns
    /// whether anything the view reads changed.
    pub fn tick(&mut self) -> bool {
        let mut changed = self.controller.poll() > 0;
        let sample = self.subscription.as_ref().and_then(ScrollSubscription::latest);
        if let Some(metrics) = sample {
            changed |= self.on_scroll_sample(metrics).is_progress();
        }
        changed
    }

    pub fn on_scroll_sample(&mut self, metrics: Option<ScrollMetrics>) -> LoadOutcome {
        self.controller.on_scroll_sample(metrics)
    }

    pub fn request_next_page(&mut self) -> LoadOutcome {
        self.controller.request_next_page()
    }

    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        self.controller.wait_idle(timeout)
    }

    pub fn reset(&mut self) {
        self.controller.reset();
        if self.controller.mode() == ControllerMode::Deferred && self.controller.state().is_empty()
        {
            self.controller.request_next_page();
        }
    }

    pub fn unmount(mut self) {
        self.subscription = None;
        log::debug!(
            "infinite list unmounted with {} items",
            self.controller.state().len()
        );
    }

    pub fn rows(&self) -> Vec<R> {
        self.controller
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| (self.render_item)(item, index))
            .collect()
    }
}

impl<T: Clone + Send + 'static, R: Clone> InfiniteList<T, R> {
    pub fn frame(&self) -> ListFrame<R> {
        let status = self.status();
        let placeholder = match status {
            ListStatus::Loading => self.loading_component.clone(),
            ListStatus::Exhausted => self.end_message.clone(),
            ListStatus::Idle => None,
        };
        ListFrame {
            rows: self.rows(),
            status,
            placeholder,
        }
    }
}
