//! Bounded worker pool: at most `max_concurrent` jobs in flight.
//!
//! Each job holds a semaphore permit from before it is spawned until its
//! outcome has been handed to the outcome channel. `submit` waits for a free
//! permit, so a slow source applies backpressure to the submitter instead of
//! growing a queue.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

use crate::fetch::SourceFetcher;
use crate::job::{Job, Outcome};
use crate::locator::Locator;

/// Everything a pool needs besides the outcome sender. Passed explicitly; no globals.
#[derive(Clone)]
pub struct PoolContext {
    pub fetcher: Arc<dyn SourceFetcher>,
    pub token: Arc<[u8]>,
    pub max_concurrent: usize,
}

impl PoolContext {
    pub fn new(fetcher: Arc<dyn SourceFetcher>, token: &[u8], max_concurrent: usize) -> Self {
        Self {
            fetcher,
            token: Arc::from(token),
            max_concurrent: max_concurrent.max(1),
        }
    }
}

pub struct WorkerPool {
    fetcher: Arc<dyn SourceFetcher>,
    token: Arc<[u8]>,
    max_concurrent: usize,
    permits: Arc<Semaphore>,
    join_set: JoinSet<()>,
    outcome_tx: mpsc::Sender<Outcome>,
    submitted: usize,
}

impl WorkerPool {
    pub fn new(ctx: PoolContext, outcome_tx: mpsc::Sender<Outcome>) -> Self {
        let max_concurrent = ctx.max_concurrent.max(1);
        Self {
            fetcher: ctx.fetcher,
            token: ctx.token,
            max_concurrent,
            permits: Arc::new(Semaphore::new(max_concurrent)),
            join_set: JoinSet::new(),
            outcome_tx,
            submitted: 0,
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Jobs currently holding a permit.
    pub fn in_flight(&self) -> usize {
        self.max_concurrent - self.permits.available_permits()
    }

    /// Jobs submitted so far.
    pub fn submitted(&self) -> usize {
        self.submitted
    }

    /// Dispatch one job, waiting while `max_concurrent` jobs are already running.
    pub async fn submit(&mut self, locator: Locator) -> Result<()> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .context("worker pool permits closed")?;
        self.reap_finished();

        let job = Job::new(locator, Arc::clone(&self.token));
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.outcome_tx.clone();
        self.submitted += 1;
        tracing::debug!(
            locator = %job.locator(),
            kind = %job.locator().kind(),
            seq = self.submitted,
            "job dispatched"
        );
        self.join_set.spawn(async move {
            let outcome = job.run(fetcher).await;
            if tx.send(outcome).await.is_err() {
                tracing::warn!("outcome dropped: aggregator is gone");
            }
            drop(permit);
        });
        Ok(())
    }

    /// Collect already-finished tasks so the join set stays bounded by the permit count.
    fn reap_finished(&mut self) {
        while let Some(res) = self.join_set.try_join_next() {
            if let Err(e) = res {
                tracing::error!("job task join: {}", e);
            }
        }
    }

    /// Wait for every submitted job, then close this pool's side of the outcome
    /// stream. Returns the number of jobs submitted.
    pub async fn finish(mut self) -> Result<usize> {
        while let Some(res) = self.join_set.join_next().await {
            if let Err(e) = res {
                tracing::error!("job task join: {}", e);
            }
        }
        debug_assert_eq!(self.permits.available_permits(), self.max_concurrent);
        drop(self.outcome_tx);
        Ok(self.submitted)
    }
}
