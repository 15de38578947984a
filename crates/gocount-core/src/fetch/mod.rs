//! Source fetchers: read a locator's content and stream it to a sink.
//!
//! Fetchers are blocking; call them from `spawn_blocking` when used from
//! async code. Every opened handle (file, curl transfer) is scoped to the
//! fetch call and dropped on all exit paths.

mod file;
mod remote;

pub use file::fetch_file;
pub use remote::fetch_remote;

use std::io;
use thiserror::Error;

use crate::config::{GocountConfig, HttpConfig};
use crate::locator::{Locator, SourceKind};

/// Why a single locator could not be read. Never fatal for the run.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Empty or malformed locator; no I/O was attempted.
    #[error("invalid locator: {reason}")]
    InvalidLocator { reason: String },

    /// Kind value other than file or url.
    #[error("type {0:?} isn't supported (expected file or url)")]
    UnsupportedKind(String),

    /// Local path does not exist.
    #[error("no such file: {path}")]
    NotFound { path: String },

    /// Local open or read failure other than not-found.
    #[error("read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// HTTP response outside 200..=299.
    #[error("response: HTTP {status}")]
    RemoteStatus { status: u32 },

    /// Network failure before a usable response (resolve, connect, timeout, recv).
    #[error("transport: {0}")]
    RemoteTransport(#[source] curl::Error),

    /// The fetch task panicked or was cancelled.
    #[error("job aborted: {0}")]
    Aborted(String),
}

impl FetchError {
    /// Stable short label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::InvalidLocator { .. } => "invalid_locator",
            FetchError::UnsupportedKind(_) => "unsupported_kind",
            FetchError::NotFound { .. } => "not_found",
            FetchError::Io { .. } => "io",
            FetchError::RemoteStatus { .. } => "remote_status",
            FetchError::RemoteTransport(_) => "remote_transport",
            FetchError::Aborted(_) => "aborted",
        }
    }

    pub(crate) fn empty_locator() -> Self {
        FetchError::InvalidLocator {
            reason: "empty path".to_string(),
        }
    }
}

impl From<curl::Error> for FetchError {
    fn from(e: curl::Error) -> Self {
        remote::classify_curl_error(e)
    }
}

/// Reads a locator's full content, handing each chunk to `sink` in order.
pub trait SourceFetcher: Send + Sync {
    fn fetch(&self, locator: &Locator, sink: &mut dyn FnMut(&[u8])) -> Result<(), FetchError>;
}

/// Default fetcher: local files via `std::fs`, remote URLs via libcurl.
#[derive(Debug, Clone)]
pub struct StdFetcher {
    read_buffer: usize,
    http: HttpConfig,
}

impl StdFetcher {
    pub fn new(read_buffer: usize, http: HttpConfig) -> Self {
        Self {
            read_buffer: read_buffer.max(1),
            http,
        }
    }

    pub fn from_config(cfg: &GocountConfig) -> Self {
        Self::new(cfg.read_buffer(), cfg.http.clone())
    }
}

impl Default for StdFetcher {
    fn default() -> Self {
        Self::from_config(&GocountConfig::default())
    }
}

impl SourceFetcher for StdFetcher {
    fn fetch(&self, locator: &Locator, sink: &mut dyn FnMut(&[u8])) -> Result<(), FetchError> {
        if locator.is_empty() {
            return Err(FetchError::empty_locator());
        }
        match locator.kind() {
            SourceKind::File => fetch_file(locator.text(), self.read_buffer, sink),
            SourceKind::Remote => fetch_remote(locator.text(), &self.http, sink),
        }
    }
}
