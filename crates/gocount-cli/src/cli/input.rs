//! Locator source: one locator per input line, blank lines skipped.
//!
//! Lines are read as raw bytes. A line that is not valid UTF-8 is converted
//! lossily and still submitted, so it fails (or succeeds) as its own job
//! instead of ending the read loop.

use std::io;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

pub struct LocatorLines<R> {
    reader: BufReader<R>,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> LocatorLines<R> {
    pub fn new(input: R) -> Self {
        Self {
            reader: BufReader::new(input),
            buf: Vec::new(),
        }
    }

    /// Next non-blank line with the trailing `\n` / `\r\n` removed; `None` at end of input.
    /// Only I/O failures of the underlying reader are errors.
    pub async fn next_locator(&mut self) -> io::Result<Option<String>> {
        loop {
            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf).await? == 0 {
                return Ok(None);
            }
            let mut line = self.buf.as_slice();
            if let Some(stripped) = line.strip_suffix(b"\n") {
                line = stripped;
            }
            if let Some(stripped) = line.strip_suffix(b"\r") {
                line = stripped;
            }
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            let text = match std::str::from_utf8(line) {
                Ok(s) => s.to_string(),
                Err(_) => {
                    let lossy = String::from_utf8_lossy(line).into_owned();
                    tracing::debug!("locator is not valid UTF-8, using {:?}", lossy);
                    lossy
                }
            };
            return Ok(Some(text));
        }
    }
}
