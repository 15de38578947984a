//! Single consumer of job outcomes: reports each one and keeps the run total.

use tokio::sync::mpsc;

use super::report::ReportSink;
use crate::job::Outcome;

/// Final tally of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Sum of counts over successful outcomes.
    pub total: u64,
    pub succeeded: usize,
    pub failed: usize,
}

impl RunSummary {
    /// Number of outcomes consumed.
    pub fn outcomes(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Owns the running total; nothing else mutates it, so it needs no lock.
pub struct Aggregator<S> {
    sink: S,
    summary: RunSummary,
}

impl<S: ReportSink> Aggregator<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            summary: RunSummary::default(),
        }
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Report one outcome. Failures are reported and never added to the total.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome.result() {
            Ok(count) => {
                tracing::debug!(locator = %outcome.locator(), count, "job counted");
                self.sink.success(outcome.locator(), count);
                self.summary.total = self.summary.total.saturating_add(count);
                self.summary.succeeded += 1;
            }
            Err(e) => {
                // The sink already emits the user-facing error line.
                tracing::debug!(
                    locator = %outcome.locator(),
                    kind = %outcome.kind(),
                    error_kind = e.kind(),
                    "job failed: {}",
                    e
                );
                self.sink.failure(outcome.locator(), e);
                self.summary.failed += 1;
            }
        }
    }

    /// Drain `outcomes` in arrival order until every sender is gone, then report
    /// the total once. Returns the summary and the sink.
    pub async fn run(mut self, mut outcomes: mpsc::Receiver<Outcome>) -> (RunSummary, S) {
        while let Some(outcome) = outcomes.recv().await {
            self.record(outcome);
        }
        self.sink.total(&self.summary);
        tracing::info!(
            total = self.summary.total,
            succeeded = self.summary.succeeded,
            failed = self.summary.failed,
            "run complete"
        );
        (self.summary, self.sink)
    }
}
