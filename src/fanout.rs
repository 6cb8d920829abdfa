//! Bounded fan-out for independent external calls.
//!
//! Results come back in input order and the whole batch fails if any call
//! fails. With `max_concurrency == 1` calls run one after another on the
//! caller's thread.

use std::thread;
use std::time::Duration;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::PlannerConfig;
use crate::error::{Result, RouteError};

/// Base delay between retries; grows linearly with the attempt number.
const RETRY_BACKOFF: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy)]
pub struct FanOut<'a> {
    max_concurrency: usize,
    retry_attempts: u32,
    cancel: &'a CancellationToken,
}

impl<'a> FanOut<'a> {
    pub fn new(config: &PlannerConfig, cancel: &'a CancellationToken) -> Self {
        Self {
            max_concurrency: config.max_concurrency.max(1),
            retry_attempts: config.retry_attempts,
            cancel,
        }
    }

    /// Calls `call(index, item)` for every item.
    ///
    /// On failure no new calls or retries are started; calls already running
    /// finish and their results are dropped. The error reported is the one
    /// with the lowest input index. Cancellation of the caller's token wins
    /// over any other error.
    pub fn run<I, T, F>(&self, items: &[I], call: F) -> Result<Vec<T>>
    where
        I: Sync,
        T: Send,
        F: Fn(usize, &I) -> Result<T> + Sync,
    {
        if self.cancel.is_cancelled() {
            return Err(RouteError::Cancelled);
        }

        if self.max_concurrency == 1 || items.len() <= 1 {
            return self.run_sequential(items, &call);
        }

        let workers = self.max_concurrency.min(items.len());
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|err| RouteError::config(format!("cannot start worker pool: {err}")))?;
        debug!(workers, calls = items.len(), "fanning out external calls");

        // Cancelled by the caller's token or by the first failing call.
        let abort = self.cancel.child_token();
        let outcomes: Vec<Option<Result<T>>> = pool.install(|| {
            items
                .par_iter()
                .enumerate()
                .map(|(index, item)| {
                    if abort.is_cancelled() {
                        return None;
                    }
                    let outcome = self.attempt(index, item, &call, &abort);
                    if outcome.is_err() {
                        abort.cancel();
                    }
                    Some(outcome)
                })
                .collect()
        });

        if self.cancel.is_cancelled() {
            return Err(RouteError::Cancelled);
        }

        let mut results = Vec::with_capacity(items.len());
        let mut skipped = false;
        for outcome in outcomes {
            match outcome {
                Some(Ok(value)) => results.push(value),
                Some(Err(err)) => return Err(err),
                None => skipped = true,
            }
        }
        if skipped {
            return Err(RouteError::Cancelled);
        }
        Ok(results)
    }

    fn run_sequential<I, T, F>(&self, items: &[I], call: &F) -> Result<Vec<T>>
    where
        F: Fn(usize, &I) -> Result<T>,
    {
        let mut results = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return Err(RouteError::Cancelled);
            }
            results.push(self.attempt(index, item, call, self.cancel)?);
        }
        Ok(results)
    }

    /// Runs `call` once, then again for retryable errors until the retry
    /// budget is spent or `stop` fires. `stop` is checked on both sides of the
    /// backoff sleep.
    fn attempt<I, T, F>(
        &self,
        index: usize,
        item: &I,
        call: &F,
        stop: &CancellationToken,
    ) -> Result<T>
    where
        F: Fn(usize, &I) -> Result<T>,
    {
        let mut retries = 0;
        loop {
            let err = match call(index, item) {
                Err(err) if err.is_retryable() && retries < self.retry_attempts => err,
                outcome => return outcome,
            };
            if stop.is_cancelled() {
                return Err(err);
            }
            retries += 1;
            warn!(index, attempt = retries, error = %err, "retrying external call");
            thread::sleep(RETRY_BACKOFF * retries);
            if stop.is_cancelled() {
                debug!(index, "batch stopped during backoff");
                return Err(err);
            }
        }
    }
}
