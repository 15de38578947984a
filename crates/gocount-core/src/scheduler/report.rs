//! Reporting sinks: where per-locator results and the final total go.

use std::io::{self, Write};

use super::aggregate::RunSummary;
use crate::fetch::FetchError;
use crate::locator::{Locator, SourceKind};

/// Receives one record per outcome, then one total. Called only from the aggregator task.
pub trait ReportSink: Send + 'static {
    fn failure(&mut self, locator: &Locator, error: &FetchError);
    fn success(&mut self, locator: &Locator, count: u64);
    fn total(&mut self, summary: &RunSummary);
}

/// Line-oriented sink: counts and the total to `out`, errors to `err`.
pub struct ConsoleSink<O, E> {
    out: O,
    err: E,
    write_failed: bool,
}

impl ConsoleSink<io::Stdout, io::Stderr> {
    /// Counts on stdout, errors on stderr.
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> ConsoleSink<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            write_failed: false,
        }
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }

    fn check(&mut self, res: io::Result<()>) {
        if let Err(e) = res {
            if !self.write_failed {
                tracing::warn!("report output failed: {}", e);
                self.write_failed = true;
            }
        }
    }
}

impl<O, E> ReportSink for ConsoleSink<O, E>
where
    O: Write + Send + 'static,
    E: Write + Send + 'static,
{
    fn failure(&mut self, locator: &Locator, error: &FetchError) {
        let res = writeln!(
            self.err,
            "error: {} path: {} type: {}",
            error,
            locator,
            locator.kind()
        );
        self.check(res);
    }

    fn success(&mut self, locator: &Locator, count: u64) {
        let res = writeln!(self.out, "Count for {}: {}", locator, count);
        self.check(res);
    }

    fn total(&mut self, summary: &RunSummary) {
        let res = writeln!(self.out, "Total: {}", summary.total).and_then(|()| self.out.flush());
        self.check(res);
        let res = self.err.flush();
        self.check(res);
    }
}

/// One reported line, kept in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Count {
        locator: String,
        count: u64,
    },
    Error {
        locator: String,
        kind: SourceKind,
        error_kind: &'static str,
        detail: String,
    },
    Total(u64),
}

/// Sink that keeps every record; for embedding and tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub records: Vec<Record>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts(&self) -> impl Iterator<Item = (&str, u64)> {
        self.records.iter().filter_map(|r| match r {
            Record::Count { locator, count } => Some((locator.as_str(), *count)),
            _ => None,
        })
    }

    pub fn errors(&self) -> impl Iterator<Item = &Record> {
        self.records
            .iter()
            .filter(|r| matches!(r, Record::Error { .. }))
    }

    pub fn totals(&self) -> impl Iterator<Item = u64> + '_ {
        self.records.iter().filter_map(|r| match r {
            Record::Total(t) => Some(*t),
            _ => None,
        })
    }
}

impl ReportSink for RecordingSink {
    fn failure(&mut self, locator: &Locator, error: &FetchError) {
        self.records.push(Record::Error {
            locator: locator.text().to_string(),
            kind: locator.kind(),
            error_kind: error.kind(),
            detail: error.to_string(),
        });
    }

    fn success(&mut self, locator: &Locator, count: u64) {
        self.records.push(Record::Count {
            locator: locator.text().to_string(),
            count,
        });
    }

    fn total(&mut self, summary: &RunSummary) {
        self.records.push(Record::Total(summary.total));
    }
}
