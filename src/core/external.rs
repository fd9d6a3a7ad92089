use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::controller::{LoadOutcome, SkipReason, remaining_wait};
use crate::core::error::{ConfigError, FetchError};
use crate::core::scroll::{DEFAULT_THRESHOLD, ScrollMetrics, is_near_bottom, validate_threshold};
use crate::task::{FetchExecutor, LoadMore};

/// Loading state owned by the caller, passed in on every sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalState {
    pub has_more: bool,
    pub loading: bool,
}

impl ExternalState {
    pub fn new(has_more: bool, loading: bool) -> Self {
        Self { has_more, loading }
    }
}

/// Trigger-only controller: the caller owns the items and `has_more`; this
/// only guards against invoking `load_more` twice before the caller's own
/// `loading` flag catches up.
pub struct ExternalController {
    load_more: Arc<dyn LoadMore>,
    executor: FetchExecutor<()>,
    threshold: f64,
    is_loading_more: bool,
    last_error: Option<FetchError>,
}

impl ExternalController {
    pub fn new<L>(load_more: L) -> Self
    where
        L: LoadMore + 'static,
    {
        Self {
            load_more: Arc::new(load_more),
            executor: FetchExecutor::new(),
            threshold: DEFAULT_THRESHOLD,
            is_loading_more: false,
            last_error: None,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Result<Self, ConfigError> {
        if !validate_threshold(threshold) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        self.threshold = threshold;
        Ok(self)
    }

    pub fn is_loading_more(&self) -> bool {
        self.is_loading_more
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    pub fn on_scroll_sample(
        &mut self,
        metrics: Option<ScrollMetrics>,
        external: ExternalState,
    ) -> LoadOutcome {
        let Some(metrics) = metrics else {
            return LoadOutcome::Skipped(SkipReason::NoMetrics);
        };
        if !is_near_bottom(&metrics, self.threshold) {
            return LoadOutcome::Skipped(SkipReason::BelowThreshold);
        }
        self.request_load_more(external)
    }

    pub fn request_load_more(&mut self, external: ExternalState) -> LoadOutcome {
        if external.loading || self.is_loading_more {
            log::debug!("load_more trigger dropped: caller is still loading");
            return LoadOutcome::Skipped(SkipReason::Loading);
        }
        if !external.has_more {
            return LoadOutcome::Skipped(SkipReason::Exhausted);
        }

        self.is_loading_more = true;
        let load_more = Arc::clone(&self.load_more);
        self.executor.spawn(0, move || load_more.load_more());
        LoadOutcome::Requested
    }

    /// Clears the in-flight flag once `load_more` settled. Returns whether
    /// it did.
    pub fn poll(&mut self) -> bool {
        let mut settled = false;
        for completion in self.executor.drain_ready() {
            self.settle(completion.result);
            settled = true;
        }
        settled
    }

    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        while self.is_loading_more {
            let Some(remaining) = remaining_wait(deadline, timeout) else {
                return false;
            };
            let Some(completion) = self.executor.wait_next(remaining) else {
                return false;
            };
            self.settle(completion.result);
        }
        true
    }

    fn settle(&mut self, result: Result<(), FetchError>) {
        self.is_loading_more = false;
        match result {
            Ok(()) => self.last_error = None,
            Err(err) => {
                log::warn!("load_more failed: {err}");
                self.last_error = Some(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ExternalController, ExternalState};
    use crate::core::controller::{LoadOutcome, SkipReason};
    use crate::core::error::FetchError;
    use crate::core::scroll::ScrollMetrics;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(5);

    fn bottom() -> Option<ScrollMetrics> {
        Some(ScrollMetrics::new(900.0, 1000.0, 100.0))
    }

    #[test]
    fn invokes_load_more_once_until_it_settles() {
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let release_rx = Mutex::new(release_rx);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut controller = ExternalController::new(move || -> Result<(), FetchError> {
            counter.fetch_add(1, Ordering::SeqCst);
            if let Ok(rx) = release_rx.lock() {
                let _ = rx.recv();
            }
            Ok(())
        });

        let idle = ExternalState::new(true, false);
        assert_eq!(
            controller.on_scroll_sample(bottom(), idle),
            LoadOutcome::Requested
        );
        // The caller's own flag has not propagated yet.
        assert_eq!(
            controller.on_scroll_sample(bottom(), idle),
            LoadOutcome::Skipped(SkipReason::Loading)
        );
        assert!(controller.is_loading_more());

        release_tx.send(()).expect("release");
        assert!(controller.wait_idle(WAIT));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!controller.is_loading_more());
    }

    #[test]
    fn respects_caller_flags() {
        let mut controller = ExternalController::new(|| -> Result<(), FetchError> { Ok(()) });
        assert_eq!(
            controller.on_scroll_sample(bottom(), ExternalState::new(true, true)),
            LoadOutcome::Skipped(SkipReason::Loading)
        );
        assert_eq!(
            controller.on_scroll_sample(bottom(), ExternalState::new(false, false)),
            LoadOutcome::Skipped(SkipReason::Exhausted)
        );
        assert_eq!(
            controller.on_scroll_sample(None, ExternalState::new(true, false)),
            LoadOutcome::Skipped(SkipReason::NoMetrics)
        );
    }

    #[test]
    fn failure_clears_flag_and_is_recorded() {
        let mut controller = ExternalController::new(|| -> Result<(), FetchError> {
            Err(FetchError::failed("offline"))
        });
        controller.request_load_more(ExternalState::new(true, false));
        assert!(controller.wait_idle(WAIT));
        assert!(!controller.is_loading_more());
        assert_eq!(controller.last_error(), Some(&FetchError::failed("offline")));
    }

    #[test]
    fn unbounded_wait_settles() {
        let mut controller = ExternalController::new(|| -> Result<(), FetchError> { Ok(()) });
        controller.request_load_more(ExternalState::new(true, false));
        assert!(controller.wait_idle(Duration::MAX));
        assert!(!controller.is_loading_more());
        assert!(controller.wait_idle(Duration::MAX));
    }
}
