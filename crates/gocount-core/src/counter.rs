//! Literal token counting over raw bytes.
//!
//! Matches are non-overlapping and leftmost-first: `"GoGoGo"` holds three
//! `"Go"` but only one `"GoGo"`. No case folding or normalization.
//! `TokenCounter` gives the same result when content arrives in chunks.

/// Count non-overlapping occurrences of `token` in `content`. An empty token counts 0.
pub fn count_occurrences(content: &[u8], token: &[u8]) -> u64 {
    let mut counter = TokenCounter::new(token);
    counter.feed(content);
    counter.finish()
}

/// Streaming counter. Feed chunks in order, then call `finish`.
///
/// Between chunks only the unscanned tail (shorter than the token) is kept,
/// so a token split across two chunks is still counted once.
#[derive(Debug, Clone)]
pub struct TokenCounter {
    token: Vec<u8>,
    carry: Vec<u8>,
    count: u64,
}

impl TokenCounter {
    pub fn new(token: &[u8]) -> Self {
        Self {
            token: token.to_vec(),
            carry: Vec::with_capacity(token.len()),
            count: 0,
        }
    }

    /// Matches found so far (excludes any match still pending in the carry).
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn feed(&mut self, chunk: &[u8]) {
        let t = self.token.len();
        if t == 0 || chunk.is_empty() {
            return;
        }
        let mut body = chunk;
        if !self.carry.is_empty() {
            // Only the first t-1 bytes of the chunk can complete a match that
            // starts in the carry; scan that window, then resume in place.
            let take = chunk.len().min(t - 1);
            let carried = self.carry.len();
            self.carry.extend_from_slice(&chunk[..take]);
            let window_len = self.carry.len();
            let rest = scan(&self.carry, &self.token, &mut self.count).len();
            let consumed = window_len - rest;
            if take == chunk.len() {
                self.carry.drain(..consumed);
                return;
            }
            // With a full t-1 byte window the scan always reaches the chunk.
            body = &chunk[consumed - carried..];
            self.carry.clear();
        }
        let rest = scan(body, &self.token, &mut self.count);
        self.carry.extend_from_slice(rest);
    }

    /// Final count. The carry is always shorter than the token, so it holds no match.
    pub fn finish(self) -> u64 {
        self.count
    }
}

/// Scan `buf` from the start, counting matches; returns the unscanned tail
/// (fewer than `token.len()` bytes).
fn scan<'a>(buf: &'a [u8], token: &[u8], count: &mut u64) -> &'a [u8] {
    let t = token.len();
    let mut i = 0;
    while i + t <= buf.len() {
        if buf[i] == token[0] && &buf[i..i + t] == token {
            *count += 1;
            i += t;
        } else {
            i += 1;
        }
    }
    &buf[i..]
}
