//! Wires the pool and the aggregator together and owns shutdown order.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::aggregate::{Aggregator, RunSummary};
use super::pool::{PoolContext, WorkerPool};
use super::report::ReportSink;
use crate::config::GocountConfig;
use crate::fetch::SourceFetcher;
use crate::locator::Locator;

/// Per-run settings, usually taken from config with CLI overrides.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub max_concurrent: usize,
    pub token: Vec<u8>,
}

impl PipelineSettings {
    pub fn new(max_concurrent: usize, token: impl Into<Vec<u8>>) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
            token: token.into(),
        }
    }

    pub fn from_config(cfg: &GocountConfig) -> Self {
        Self::new(cfg.concurrency(), cfg.token.as_bytes())
    }
}

/// A running pipeline. Submit locators one by one, then `finish`.
pub struct Pipeline<S> {
    pool: WorkerPool,
    aggregator: JoinHandle<(RunSummary, S)>,
}

impl<S: ReportSink> Pipeline<S> {
    /// Spawns the aggregator task. Must be called inside a Tokio runtime.
    pub fn start(settings: &PipelineSettings, fetcher: Arc<dyn SourceFetcher>, sink: S) -> Self {
        let ctx = PoolContext::new(fetcher, &settings.token, settings.max_concurrent);
        let (outcome_tx, outcome_rx) = mpsc::channel(ctx.max_concurrent);
        let aggregator = tokio::spawn(Aggregator::new(sink).run(outcome_rx));
        let pool = WorkerPool::new(ctx, outcome_tx);
        tracing::debug!(
            max_concurrent = pool.max_concurrent(),
            token = %String::from_utf8_lossy(&settings.token),
            "pipeline started"
        );
        Self { pool, aggregator }
    }

    /// Dispatch one locator; waits while the pool is full.
    pub async fn submit(&mut self, locator: Locator) -> Result<()> {
        self.pool.submit(locator).await
    }

    pub fn submitted(&self) -> usize {
        self.pool.submitted()
    }

    /// Jobs still holding a permit.
    pub fn in_flight(&self) -> usize {
        self.pool.in_flight()
    }

    /// Wait for all jobs, close the outcome stream, then wait for the aggregator's total.
    pub async fn finish(self) -> Result<(RunSummary, S)> {
        let submitted = self.pool.finish().await?;
        let (summary, sink) = self.aggregator.await.context("aggregator task join")?;
        if summary.outcomes() != submitted {
            tracing::warn!(
                submitted,
                outcomes = summary.outcomes(),
                "outcome count differs from submitted jobs"
            );
        }
        Ok((summary, sink))
    }
}

/// Run every locator through a fresh pipeline and return the summary and the sink.
pub async fn run_pipeline<S, I>(
    settings: &PipelineSettings,
    fetcher: Arc<dyn SourceFetcher>,
    sink: S,
    locators: I,
) -> Result<(RunSummary, S)>
where
    S: ReportSink,
    I: IntoIterator<Item = Locator>,
{
    let mut pipeline = Pipeline::start(settings, fetcher, sink);
    for locator in locators {
        pipeline.submit(locator).await?;
    }
    pipeline.finish().await
}
