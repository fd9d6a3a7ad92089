use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crate::core::error::FetchError;

#[derive(Debug)]
pub struct Completion<C> {
    pub generation: u64,
    pub result: Result<C, FetchError>,
}

/// Runs fetch jobs on worker threads and queues their completions until the
/// UI loop drains them. Dropping the executor drops the receiver, so late
/// completions are discarded by the worker.
pub struct FetchExecutor<C> {
    completion_tx: Sender<Completion<C>>,
    completion_rx: Receiver<Completion<C>>,
}

impl<C: Send + 'static> FetchExecutor<C> {
    pub fn new() -> Self {
        let (completion_tx, completion_rx) = mpsc::channel::<Completion<C>>();
        Self {
            completion_tx,
            completion_rx,
        }
    }

    pub fn spawn<F>(&self, generation: u64, job: F)
    where
        F: FnOnce() -> Result<C, FetchError> + Send + 'static,
    {
        let completion_tx = self.completion_tx.clone();
        std::thread::spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(job))
                .unwrap_or(Err(FetchError::Panicked));
            let _ = completion_tx.send(Completion { generation, result });
        });
    }

    pub fn drain_ready(&self) -> Vec<Completion<C>> {
        self.completion_rx.try_iter().collect()
    }

    pub fn wait_next(&self, timeout: Duration) -> Option<Completion<C>> {
        match self.completion_rx.recv_timeout(timeout) {
            Ok(completion) => Some(completion),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl<C: Send + 'static> Default for FetchExecutor<C> {
    fn default() -> Self {
        Self::new()
    }
}
