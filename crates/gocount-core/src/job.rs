//! One unit of work: fetch a locator, count the token, produce an `Outcome`.

use std::sync::Arc;

use crate::counter::TokenCounter;
use crate::fetch::{FetchError, SourceFetcher};
use crate::locator::{Locator, SourceKind};

/// Terminal result of a job: a count or an error, never both. Immutable once built.
#[derive(Debug)]
pub struct Outcome {
    locator: Locator,
    result: Result<u64, FetchError>,
}

impl Outcome {
    pub fn new(locator: Locator, result: Result<u64, FetchError>) -> Self {
        Self { locator, result }
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn result(&self) -> Result<u64, &FetchError> {
        self.result.as_ref().copied()
    }

    pub fn kind(&self) -> SourceKind {
        self.locator.kind()
    }

    /// Count for a successful job; `None` when the job failed.
    pub fn count(&self) -> Option<u64> {
        self.result.as_ref().ok().copied()
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.result.as_ref().err()
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// A locator bound to the token it is searched for. Built once per locator
/// before dispatch and moved into the worker task.
#[derive(Debug, Clone)]
pub struct Job {
    locator: Locator,
    token: Arc<[u8]>,
}

impl Job {
    pub fn new(locator: Locator, token: Arc<[u8]>) -> Self {
        Self { locator, token }
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Fetch then count on the calling thread. Any fetch error replaces the count.
    pub fn run_blocking(self, fetcher: &dyn SourceFetcher) -> Outcome {
        if self.locator.is_empty() {
            return Outcome {
                locator: self.locator,
                result: Err(FetchError::empty_locator()),
            };
        }
        let mut counter = TokenCounter::new(&self.token);
        let fetched = fetcher.fetch(&self.locator, &mut |chunk| counter.feed(chunk));
        let result = fetched.map(|()| counter.finish());
        Outcome {
            locator: self.locator,
            result,
        }
    }

    /// Runs the job on the blocking pool. Always yields an `Outcome`, including
    /// when the blocking task panics.
    pub async fn run(self, fetcher: Arc<dyn SourceFetcher>) -> Outcome {
        let locator = self.locator.clone();
        match tokio::task::spawn_blocking(move || self.run_blocking(fetcher.as_ref())).await {
            Ok(outcome) => outcome,
            Err(e) => Outcome {
                locator,
                result: Err(FetchError::Aborted(e.to_string())),
            },
        }
    }
}
