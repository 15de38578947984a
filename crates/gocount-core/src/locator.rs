//! Source locators: a text identifier tagged with how to read it.

use std::fmt;
use std::str::FromStr;

use crate::fetch::FetchError;

/// How a locator's content is retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Local filesystem path.
    File,
    /// HTTP(S) URL fetched with GET.
    Remote,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::File => "file",
            SourceKind::Remote => "url",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = FetchError;

    /// Accepts `file`, `url` or `remote` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(SourceKind::File),
            "url" | "remote" => Ok(SourceKind::Remote),
            _ => Err(FetchError::UnsupportedKind(s.to_string())),
        }
    }
}

/// A content source. The text is not validated on construction; an empty or
/// malformed locator fails its own job instead of the run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    text: String,
    kind: SourceKind,
}

impl Locator {
    pub fn new(text: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    pub fn file(text: impl Into<String>) -> Self {
        Self::new(text, SourceKind::File)
    }

    pub fn remote(text: impl Into<String>) -> Self {
        Self::new(text, SourceKind::Remote)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
