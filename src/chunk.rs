//! Chunking: split a line source into fixed-size, order-preserving chunks.
//! A chunk never splits a record; the final chunk may be partial.

use crate::source::LineSource;
use std::io;

/// A bounded, ordered slice of the input assigned to one worker task.
pub struct Chunk {
    /// Zero-based position in chunk-emission order.
    pub index: usize,
    /// 1-based file line number of `lines[0]`.
    pub first_line: u64,
    pub lines: Vec<String>,
}

/// Lazy, finite, non-restartable chunk sequence. Concatenating all emitted
/// chunks in order reproduces the source exactly; an empty source yields
/// zero chunks. `lines_per_chunk` must be validated (> 0) by the caller.
pub struct Chunks {
    src: LineSource,
    lines_per_chunk: usize,
    next_index: usize,
    next_line: u64,
    done: bool,
}

pub fn chunks(src: LineSource, lines_per_chunk: usize) -> Chunks {
    debug_assert!(lines_per_chunk > 0);
    Chunks { src, lines_per_chunk, next_index: 0, next_line: 1, done: false }
}

impl Iterator for Chunks {
    type Item = io::Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let first_line = self.next_line;
        let mut lines = Vec::with_capacity(self.lines_per_chunk.min(1024));
        while lines.len() < self.lines_per_chunk {
            let mut buf = String::new();
            match self.src.read_line(&mut buf) {
                Ok(0) => {
                    self.done = true;
                    break;
                }
                Ok(_) => {
                    self.next_line += 1;
                    lines.push(buf);
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        if lines.is_empty() {
            return None;
        }
        let index = self.next_index;
        self.next_index += 1;
        Some(Ok(Chunk { index, first_line, lines }))
    }
}
