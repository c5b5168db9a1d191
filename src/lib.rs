mod config;
mod error;
mod source;
mod chunk;

mod record;
mod emoji;
mod aggregate;

mod engine;
mod topk;
mod pipeline;

mod progress;
mod mem;
mod util;

pub use crate::config::{Strategy, TopOptions};
pub use crate::error::{Error, RecordError, Result};
pub use crate::pipeline::TweetTop;
pub use crate::topk::DayTopAuthor;

// Expose the aggregation trait and the shipped states so callers can run
// custom analyses through the same engine.
pub use crate::aggregate::{Aggregate, DailyAuthorCounts, EmojiCounts, MentionCounts};

// Expose the engine and line source for callers orchestrating their own runs.
pub use crate::engine::{run_chunked, run_streaming, EngineConfig};
pub use crate::source::LineSource;

// Expose selection helpers; selection is a pure last step over merged counts.
pub use crate::topk::{top_k_daily, top_k_flat};

// Expose emoji scanning for reuse outside the shipped report.
pub use crate::emoji::emoji_glyphs;

// Expose tracing init and robust file ops so binaries can import from crate root.
pub use crate::util::{create_with_backoff, init_tracing_once, open_with_backoff};
