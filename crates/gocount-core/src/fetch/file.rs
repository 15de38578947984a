//! Local file leaf: chunked reads into the sink.

use std::fs::File;
use std::io::{self, Read};

use super::FetchError;

fn io_error(path: &str, e: io::Error) -> FetchError {
    if e.kind() == io::ErrorKind::NotFound {
        FetchError::NotFound {
            path: path.to_string(),
        }
    } else {
        FetchError::Io {
            path: path.to_string(),
            source: e,
        }
    }
}

/// Reads `path` to the end in `buf_size` chunks. Directories fail on read.
pub fn fetch_file(
    path: &str,
    buf_size: usize,
    sink: &mut dyn FnMut(&[u8]),
) -> Result<(), FetchError> {
    if path.is_empty() {
        return Err(FetchError::empty_locator());
    }
    let mut f = File::open(path).map_err(|e| io_error(path, e))?;
    let mut buf = vec![0u8; buf_size.max(1)];
    loop {
        let n = match f.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(io_error(path, e)),
        };
        sink(&buf[..n]);
    }
    Ok(())
}
