//! Line sources: plain or zstd-compressed JSONL files, read sequentially with
//! a compressed-byte counter for progress reporting.

use crate::error::{Error, Result};
use crate::util::open_with_backoff;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use zstd::stream::read::Decoder;

/// A `Read` wrapper that counts raw (compressed) bytes read.
struct CountingReader<R: Read> {
    inner: R,
    counter: Arc<AtomicU64>,
}
impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.counter.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}

/// A sequential reader of newline-delimited records. Only ever read by one
/// thread (the feeder / the streaming fold); never shared with workers.
pub struct LineSource {
    rdr: Box<dyn BufRead + Send>,
    bytes_read: Arc<AtomicU64>,
    source_len: u64,
}

impl LineSource {
    /// Open a JSONL file. `.zst` inputs are decoded on the fly; we request
    /// `window_log_max(31)` up front to avoid "Frame requires too much memory"
    /// on very large frames.
    pub fn open(path: &Path, read_buffer_bytes: usize) -> Result<Self> {
        let file = open_with_backoff(path, 16, 50).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let source_len = file.metadata().map(|m| m.len()).unwrap_or(0);

        let bytes_read = Arc::new(AtomicU64::new(0));
        let counted = CountingReader { inner: file, counter: bytes_read.clone() };

        let cap = read_buffer_bytes.max(8 * 1024);
        let compressed = path.extension().and_then(|e| e.to_str()) == Some("zst");
        let rdr: Box<dyn BufRead + Send> = if compressed {
            let mut decoder = Decoder::new(counted)?;
            decoder.window_log_max(31)?;
            Box::new(BufReader::with_capacity(cap, decoder))
        } else {
            Box::new(BufReader::with_capacity(cap, counted))
        };

        Ok(Self { rdr, bytes_read, source_len })
    }

    /// Wrap an arbitrary reader (in-memory buffers, pipes). No byte total is
    /// known, so progress stays at zero length.
    pub fn from_reader(r: impl Read + Send + 'static) -> Self {
        let bytes_read = Arc::new(AtomicU64::new(0));
        let counted = CountingReader { inner: r, counter: bytes_read.clone() };
        Self {
            rdr: Box::new(BufReader::new(counted)),
            bytes_read,
            source_len: 0,
        }
    }

    /// Read the next line into `buf`. Returns the number of bytes read (0 on EOF).
    /// Strips trailing `\r?\n`.
    pub fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        buf.clear();
        let n = self.rdr.read_line(buf)?;
        if n == 0 {
            return Ok(0);
        }
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        Ok(n)
    }

    /// Shared counter of raw bytes consumed so far (compressed bytes for `.zst`).
    pub fn bytes_counter(&self) -> Arc<AtomicU64> {
        self.bytes_read.clone()
    }

    /// On-disk size of the source, 0 when unknown.
    pub fn source_len(&self) -> u64 {
        self.source_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_line_strips_terminators() {
        let mut src = LineSource::from_reader(Cursor::new("a\r\nb\nc"));
        let mut buf = String::new();
        assert!(src.read_line(&mut buf).unwrap() > 0);
        assert_eq!(buf, "a");
        assert!(src.read_line(&mut buf).unwrap() > 0);
        assert_eq!(buf, "b");
        assert!(src.read_line(&mut buf).unwrap() > 0);
        assert_eq!(buf, "c");
        assert_eq!(src.read_line(&mut buf).unwrap(), 0);
    }

    #[test]
    fn byte_counter_advances() {
        let mut src = LineSource::from_reader(Cursor::new("hello\nworld\n"));
        let counter = src.bytes_counter();
        let mut buf = String::new();
        while src.read_line(&mut buf).unwrap() > 0 {}
        assert_eq!(counter.load(Ordering::Relaxed), 12);
    }
}
