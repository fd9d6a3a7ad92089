use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::mpsc::{self, Receiver, Sender};

pub const DEFAULT_THRESHOLD: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    /// Unseen scrollable distance below the viewport.
    pub fn remaining(&self) -> f64 {
        self.scroll_height - self.scroll_top - self.client_height
    }
}

pub fn is_near_bottom(metrics: &ScrollMetrics, threshold: f64) -> bool {
    metrics.remaining() <= threshold
}

pub fn validate_threshold(threshold: f64) -> bool {
    threshold.is_finite() && threshold >= 0.0
}

struct Listener {
    id: u64,
    tx: Sender<Option<ScrollMetrics>>,
}

#[derive(Default)]
struct HostInner {
    metrics: Option<ScrollMetrics>,
    listeners: Vec<Listener>,
    next_id: u64,
}

/// The scrollable container a widget is mounted into. Metrics stay `None`
/// until a container is attached.
#[derive(Clone, Default)]
pub struct ScrollHost {
    inner: Rc<RefCell<HostInner>>,
}

impl ScrollHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach_container(&self, metrics: ScrollMetrics) {
        self.inner.borrow_mut().metrics = Some(metrics);
    }

    pub fn detach_container(&self) {
        self.inner.borrow_mut().metrics = None;
    }

    pub fn metrics(&self) -> Option<ScrollMetrics> {
        self.inner.borrow().metrics
    }

    pub fn scroll_to(&self, scroll_top: f64) {
        let mut inner = self.inner.borrow_mut();
        if let Some(metrics) = inner.metrics.as_mut() {
            let max_top = (metrics.scroll_height - metrics.client_height).max(0.0);
            metrics.scroll_top = scroll_top.clamp(0.0, max_top);
        }
    }

    pub fn set_content_height(&self, scroll_height: f64) {
        if let Some(metrics) = self.inner.borrow_mut().metrics.as_mut() {
            metrics.scroll_height = scroll_height;
        }
    }

    pub fn set_client_height(&self, client_height: f64) {
        if let Some(metrics) = self.inner.borrow_mut().metrics.as_mut() {
            metrics.client_height = client_height;
        }
    }

    /// Delivers the current sample to every subscriber.
    pub fn emit(&self) {
        let inner = self.inner.borrow();
        for listener in &inner.listeners {
            let _ = listener.tx.send(inner.metrics);
        }
    }

    pub fn subscribe(&self) -> ScrollSubscription {
        let (tx, rx) = mpsc::channel();
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id = inner.next_id.saturating_add(1);
        inner.listeners.push(Listener { id, tx });
        log::debug!("scroll listener {id} attached");
        ScrollSubscription {
            id,
            host: Rc::downgrade(&self.inner),
            rx,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Registration on a [`ScrollHost`]. Dropping it detaches the listener.
pub struct ScrollSubscription {
    id: u64,
    host: Weak<RefCell<HostInner>>,
    rx: Receiver<Option<ScrollMetrics>>,
}

impl ScrollSubscription {
    /// Most recent pending sample; older ones are superseded. The outer
    /// `None` means nothing was emitted since the last call.
    pub fn latest(&self) -> Option<Option<ScrollMetrics>> {
        let mut latest = None;
        while let Ok(sample) = self.rx.try_recv() {
            latest = Some(sample);
        }
        latest
    }
}

impl Drop for ScrollSubscription {
    fn drop(&mut self) {
        let Some(host) = self.host.upgrade() else {
            return;
        };
        let mut inner = host.borrow_mut();
        inner.listeners.retain(|listener| listener.id != self.id);
        log::debug!("scroll listener {} detached", self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_THRESHOLD, ScrollHost, ScrollMetrics, is_near_bottom};
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(900.0, 1000.0, 100.0, true)]
    #[case(800.0, 1000.0, 100.0, true)]
    #[case(799.0, 1000.0, 100.0, false)]
    #[case(0.0, 600.0, 600.0, true)]
    #[case(0.0, 5000.0, 600.0, false)]
    fn detector_cases(
        #[case] top: f64,
        #[case] height: f64,
        #[case] client: f64,
        #[case] expected: bool,
    ) {
        let metrics = ScrollMetrics::new(top, height, client);
        assert_eq!(is_near_bottom(&metrics, DEFAULT_THRESHOLD), expected);
    }

    #[test]
    fn equality_counts_as_triggering() {
        let metrics = ScrollMetrics::new(400.0, 1000.0, 500.0);
        assert!(is_near_bottom(&metrics, 100.0));
        assert!(!is_near_bottom(&metrics, 99.5));
    }

    proptest! {
        #[test]
        fn detector_matches_remaining_distance(
            top in 0u32..10_000,
            client in 1u32..2_000,
            extra in 0u32..10_000,
            threshold in 0u32..500,
        ) {
            let height = f64::from(top + client + extra);
            let metrics = ScrollMetrics::new(f64::from(top), height, f64::from(client));
            prop_assert_eq!(
                is_near_bottom(&metrics, f64::from(threshold)),
                extra <= threshold
            );
        }
    }

    #[test]
    fn subscription_receives_latest_sample_only() {
        let host = ScrollHost::new();
        let sub = host.subscribe();
        assert_eq!(sub.latest(), None);

        host.emit();
        assert_eq!(sub.latest(), Some(None));

        host.attach_container(ScrollMetrics::new(0.0, 1000.0, 200.0));
        host.emit();
        host.scroll_to(500.0);
        host.emit();
        let sample = sub.latest().flatten().expect("sample");
        assert_eq!(sample.scroll_top, 500.0);
        assert_eq!(sub.latest(), None);
    }

    #[test]
    fn scroll_to_clamps_into_range() {
        let host = ScrollHost::new();
        host.attach_container(ScrollMetrics::new(0.0, 1000.0, 200.0));
        host.scroll_to(5000.0);
        assert_eq!(host.metrics().map(|m| m.scroll_top), Some(800.0));
        host.scroll_to(-3.0);
        assert_eq!(host.metrics().map(|m| m.scroll_top), Some(0.0));
    }

    #[test]
    fn dropping_subscription_detaches_listener() {
        let host = ScrollHost::new();
        let first = host.subscribe();
        let second = host.subscribe();
        assert_eq!(host.listener_count(), 2);
        drop(first);
        assert_eq!(host.listener_count(), 1);
        drop(second);
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn subscription_outliving_host_drops_cleanly() {
        let host = ScrollHost::new();
        let sub = host.subscribe();
        drop(host);
        drop(sub);
    }
}
