//! Job pipeline: bounded fan-out of jobs, ordered fan-in of outcomes.
//!
//! Submitter → `WorkerPool` (≤ K jobs in flight) → outcome channel →
//! `Aggregator` (single task) → `ReportSink`. The pool closes the channel only
//! after every job has finished; the aggregator then reports the total once.

mod aggregate;
mod pipeline;
mod pool;
mod report;

pub use aggregate::{Aggregator, RunSummary};
pub use pipeline::{run_pipeline, Pipeline, PipelineSettings};
pub use pool::{PoolContext, WorkerPool};
pub use report::{ConsoleSink, Record, RecordingSink, ReportSink};
