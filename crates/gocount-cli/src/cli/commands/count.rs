//! Default command: stream locators into the pipeline and report counts.

use anyhow::{Context, Result};
use gocount_core::config::GocountConfig;
use gocount_core::fetch::{SourceFetcher, StdFetcher};
use gocount_core::locator::{Locator, SourceKind};
use gocount_core::scheduler::{Pipeline, PipelineSettings, ReportSink, RunSummary};
use std::sync::Arc;
use tokio::io::AsyncRead;

use crate::cli::input::LocatorLines;

/// Submits each line of `input` as a `kind` locator while the pool runs.
/// A read error stops submission; jobs already dispatched still finish and the
/// total is still reported before the error is returned.
pub async fn run_count<R, S>(
    cfg: &GocountConfig,
    settings: &PipelineSettings,
    kind: SourceKind,
    input: R,
    sink: S,
) -> Result<(RunSummary, S)>
where
    R: AsyncRead + Unpin,
    S: ReportSink,
{
    let fetcher: Arc<dyn SourceFetcher> = Arc::new(StdFetcher::from_config(cfg));
    let mut pipeline = Pipeline::start(settings, fetcher, sink);
    let mut lines = LocatorLines::new(input);

    let read_result = loop {
        match lines.next_locator().await {
            Ok(Some(text)) => pipeline.submit(Locator::new(text, kind)).await?,
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        }
    };

    let finished = pipeline.finish().await?;
    read_result.context("read locators from stdin")?;
    Ok(finished)
}
