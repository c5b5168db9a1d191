use crate::aggregate::{Aggregate, DailyAuthorCounts, EmojiCounts, MentionCounts};
use crate::config::{Strategy, TopOptions};
use crate::engine::{run_chunked, run_streaming, EngineConfig};
use crate::error::Result;
use crate::progress::make_progress_bar_labeled;
use crate::source::LineSource;
use crate::topk::{top_k_daily, top_k_flat, DayTopAuthor};
use crate::util::init_tracing_once;
use std::path::Path;
use std::time::Instant;

/// Entry point for the three tweet-archive reports. Build one, chain the
/// options you care about, then call an analysis with the input path.
#[derive(Clone)]
pub struct TweetTop {
    pub(crate) opts: TopOptions,
}

impl TweetTop {
    pub fn new() -> Self {
        Self { opts: TopOptions::default() }
    }

    // -------- Builder methods --------
    pub fn strategy(mut self, strategy: Strategy) -> Self { self.opts = self.opts.with_strategy(strategy); self }
    pub fn lines_per_chunk(mut self, lines: usize) -> Self { self.opts = self.opts.with_lines_per_chunk(lines); self }
    pub fn workers(mut self, n: usize) -> Self { self.opts = self.opts.with_num_workers(n); self }
    pub fn top_k(mut self, k: usize) -> Self { self.opts = self.opts.with_top_k(k); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }
    pub fn io_read_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_read_buffer(bytes); self }

    // -------- Analyses --------

    /// Per day, the most active author, top K days by that author's count.
    pub fn daily_top_authors(&self, input: impl AsRef<Path>) -> Result<Vec<DayTopAuthor>> {
        let agg: DailyAuthorCounts = self.run_analysis(input.as_ref(), "daily top authors")?;
        Ok(top_k_daily(agg.counts, self.opts.top_k))
    }

    /// Top K most frequent emoji glyphs across tweet bodies.
    pub fn top_emojis(&self, input: impl AsRef<Path>) -> Result<Vec<(String, u64)>> {
        let agg: EmojiCounts = self.run_analysis(input.as_ref(), "top emojis")?;
        Ok(top_k_flat(agg.counts, self.opts.top_k))
    }

    /// Top K most mentioned usernames.
    pub fn top_mentions(&self, input: impl AsRef<Path>) -> Result<Vec<(String, u64)>> {
        let agg: MentionCounts = self.run_analysis(input.as_ref(), "top mentions")?;
        Ok(top_k_flat(agg.counts, self.opts.top_k))
    }

    /// Run a caller-supplied aggregation through the same engine and return
    /// its merged global state.
    pub fn aggregate_with<A: Aggregate>(&self, input: impl AsRef<Path>) -> Result<A> {
        self.run_analysis(input.as_ref(), "custom aggregation")
    }

    fn run_analysis<A: Aggregate>(&self, path: &Path, what: &str) -> Result<A> {
        init_tracing_once();
        let lines_per_chunk = self.opts.lines_per_chunk.unwrap_or(A::DEFAULT_LINES_PER_CHUNK);
        let cfg = EngineConfig::new(lines_per_chunk, self.opts.num_workers)?;

        let src = LineSource::open(path, self.opts.read_buffer_bytes)?;
        if src.source_len() == 0 {
            tracing::warn!(path = %path.display(), "input file is empty");
        }
        let pb = if self.opts.progress {
            let label = self.opts.progress_label.as_deref().unwrap_or(what);
            Some(make_progress_bar_labeled(src.source_len(), Some(label)))
        } else {
            None
        };
        let tick = {
            let pb = pb.clone();
            move |delta: u64| {
                if let Some(pb) = &pb {
                    pb.inc(delta);
                }
            }
        };

        let started = Instant::now();
        let agg = match self.opts.strategy {
            Strategy::Chunked => run_chunked::<A, _>(src, &cfg, tick),
            Strategy::Streaming => run_streaming::<A, _>(src, tick),
        };
        let agg = agg?;
        if let Some(pb) = &pb {
            pb.finish_with_message(format!("{what}: done"));
        }
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            strategy = ?self.opts.strategy,
            "{} complete",
            what
        );
        Ok(agg)
    }
}

impl Default for TweetTop {
    fn default() -> Self {
        Self::new()
    }
}
