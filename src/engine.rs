//! The aggregation engine. Chunked mode: a feeder thread reads the source
//! into chunks behind a bounded queue, a fixed set of workers folds each
//! chunk into a private local state, and the collecting thread merges
//! completed states in whatever order they arrive. Streaming mode: a plain
//! single-threaded fold over the same source.
//!
//! Cancellation is driven purely by channel disconnection, no flags: the
//! collector stops on the first error and drops its receiver; worker sends
//! then fail and workers exit, the last one dropping the shared work
//! receiver; the feeder's next send fails and it stops reading. The global
//! state is only ever touched by the collecting thread, after a local state
//! is fully produced, so a cancelled run never leaves partial counts behind.

use crate::aggregate::Aggregate;
use crate::chunk::{chunks, Chunk};
use crate::error::{Error, Result};
use crate::mem::maybe_throttle_low_memory;
use crate::source::LineSource;
use parking_lot::Mutex;
use std::sync::atomic::Ordering;
use std::sync::{mpsc, Arc};
use std::thread;

/// Validated engine parameters.
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    pub lines_per_chunk: usize,
    pub num_workers: usize,
}

/// Buffered chunks per worker; bounds feeder read-ahead when workers lag.
const QUEUE_SLOTS_PER_WORKER: usize = 2;

impl EngineConfig {
    pub fn new(lines_per_chunk: usize, num_workers: usize) -> Result<Self> {
        if lines_per_chunk == 0 {
            return Err(Error::InvalidConfig("lines_per_chunk must be at least 1".into()));
        }
        if num_workers == 0 {
            return Err(Error::InvalidConfig("num_workers must be at least 1".into()));
        }
        Ok(Self { lines_per_chunk, num_workers })
    }
}

/// Fold one chunk into a fresh local state. Blank lines carry no record and
/// are skipped; the first malformed record aborts the chunk.
fn aggregate_chunk<A: Aggregate>(chunk: &Chunk) -> Result<A> {
    let mut local = A::default();
    for (offset, line) in chunk.lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        local.ingest(line).map_err(|source| Error::MalformedRecord {
            line: chunk.first_line + offset as u64,
            source,
        })?;
    }
    Ok(local)
}

/// Run the chunked parallel aggregation over `src` and return the merged
/// global state. `on_progress` is called from the feeder thread with deltas
/// of raw bytes consumed. Fail-fast: the first chunk failure cancels queued
/// and in-flight work and is returned as the run's single error.
pub fn run_chunked<A, F>(src: LineSource, cfg: &EngineConfig, mut on_progress: F) -> Result<A>
where
    A: Aggregate,
    F: FnMut(u64) + Send,
{
    let lines_per_chunk = cfg.lines_per_chunk;
    let num_workers = cfg.num_workers;

    let (work_tx, work_rx) = mpsc::sync_channel::<Chunk>(num_workers * QUEUE_SLOTS_PER_WORKER);
    let (done_tx, done_rx) = mpsc::channel::<Result<A>>();
    let work_rx = Arc::new(Mutex::new(work_rx));

    thread::scope(|s| {
        // Feeder: the only thread that reads the source.
        let feeder_done_tx = done_tx.clone();
        s.spawn(move || {
            let counter = src.bytes_counter();
            let mut last = 0u64;
            for next in chunks(src, lines_per_chunk) {
                let chunk = match next {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        let _ = feeder_done_tx.send(Err(Error::Io(e)));
                        return;
                    }
                };
                let cur = counter.load(Ordering::Relaxed);
                if cur > last {
                    on_progress(cur - last);
                    last = cur;
                }
                if work_tx.send(chunk).is_err() {
                    // Collector bailed; the queue receiver is gone.
                    return;
                }
                maybe_throttle_low_memory(0.10);
            }
        });

        // Fixed worker set sharing the queue's receiving end.
        for _ in 0..num_workers {
            let work_rx = Arc::clone(&work_rx);
            let done_tx = done_tx.clone();
            s.spawn(move || loop {
                let chunk = match work_rx.lock().recv() {
                    Ok(chunk) => chunk,
                    Err(_) => break, // feeder done, queue drained
                };
                let outcome = aggregate_chunk::<A>(&chunk).map_err(|e| Error::ChunkProcessing {
                    chunk: chunk.index,
                    source: Box::new(e),
                });
                if done_tx.send(outcome).is_err() {
                    break; // collector bailed
                }
            });
        }
        // Only the feeder and workers may keep the collection channel open.
        drop(done_tx);
        drop(work_rx);

        // Collector: single-threaded merge, unordered arrival.
        let mut global = A::default();
        let mut merged = 0usize;
        let mut failure: Option<Error> = None;
        while let Ok(outcome) = done_rx.recv() {
            match outcome {
                Ok(local) => {
                    global.merge(local);
                    merged += 1;
                }
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }
        // Dropping the receiver starts the cancellation chain on failure;
        // on success everything upstream has already exited.
        drop(done_rx);

        match failure {
            Some(e) => Err(e),
            None => {
                tracing::debug!(chunks = merged, workers = num_workers, "chunked run complete");
                Ok(global)
            }
        }
    })
}

/// Single-pass streaming fold: one thread, one state, memory bounded by the
/// state itself. Same record semantics and errors as the chunked run, minus
/// the chunk wrapper.
pub fn run_streaming<A, F>(mut src: LineSource, mut on_progress: F) -> Result<A>
where
    A: Aggregate,
    F: FnMut(u64),
{
    let counter = src.bytes_counter();
    let mut last = 0u64;
    let mut global = A::default();
    let mut buf = String::with_capacity(16 * 1024);
    let mut line_no = 0u64;
    loop {
        if src.read_line(&mut buf)? == 0 {
            let cur = counter.load(Ordering::Relaxed);
            if cur > last {
                on_progress(cur - last);
            }
            break;
        }
        line_no += 1;
        let cur = counter.load(Ordering::Relaxed);
        if cur > last {
            on_progress(cur - last);
            last = cur;
        }
        if buf.trim().is_empty() {
            continue;
        }
        global
            .ingest(&buf)
            .map_err(|source| Error::MalformedRecord { line: line_no, source })?;
    }
    tracing::debug!(lines = line_no, "streaming run complete");
    Ok(global)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::MentionCounts;
    use std::io::Cursor;

    fn mention_lines(n: usize) -> String {
        (0..n)
            .map(|i| format!(r#"{{"mentionedUsers":[{{"username":"user{}"}}]}}"#, i % 7))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn zero_chunk_size_is_invalid() {
        assert!(matches!(EngineConfig::new(0, 4), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn zero_workers_is_invalid() {
        assert!(matches!(EngineConfig::new(100, 0), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn chunked_and_streaming_agree() {
        let text = mention_lines(53);
        let cfg = EngineConfig::new(5, 3).unwrap();
        let chunked: MentionCounts =
            run_chunked(LineSource::from_reader(Cursor::new(text.clone())), &cfg, |_| {}).unwrap();
        let streamed: MentionCounts =
            run_streaming(LineSource::from_reader(Cursor::new(text)), |_| {}).unwrap();
        assert_eq!(chunked.counts, streamed.counts);
    }

    #[test]
    fn malformed_line_cancels_the_run() {
        let mut text = mention_lines(20);
        text.push_str("\n{broken\n");
        text.push_str(&mention_lines(20));
        let cfg = EngineConfig::new(4, 2).unwrap();
        let got: Result<MentionCounts> =
            run_chunked(LineSource::from_reader(Cursor::new(text)), &cfg, |_| {});
        match got {
            Err(Error::ChunkProcessing { chunk, source }) => {
                // Line 21 is the broken one; it lands in the sixth chunk.
                assert_eq!(chunk, 5);
                assert!(matches!(*source, Error::MalformedRecord { line: 21, .. }));
            }
            other => panic!("expected ChunkProcessing, got {:?}", other.map(|a| a.counts)),
        }
    }

    #[test]
    fn blank_lines_are_skipped_not_errors() {
        let text = "\n".to_string() + &mention_lines(3) + "\n   \n";
        let cfg = EngineConfig::new(2, 2).unwrap();
        let got: MentionCounts =
            run_chunked(LineSource::from_reader(Cursor::new(text)), &cfg, |_| {}).unwrap();
        assert_eq!(got.counts.values().sum::<u64>(), 3);
    }

    #[test]
    fn empty_source_yields_default_state() {
        let cfg = EngineConfig::new(10, 4).unwrap();
        let got: MentionCounts =
            run_chunked(LineSource::from_reader(Cursor::new("")), &cfg, |_| {}).unwrap();
        assert!(got.counts.is_empty());
    }
}
