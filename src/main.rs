use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tweetop::{create_with_backoff, Strategy, TweetTop};

/// Top-K analytics for newline-delimited tweet archives (.json / .json.zst).
#[derive(Parser)]
#[command(name = "tweetop", version)]
struct Args {
    /// Input JSONL file, one tweet per line
    input: PathBuf,

    /// Which report to compute
    #[arg(value_enum, default_value_t = Report::All)]
    report: Report,

    /// Use the single-pass low-memory strategy instead of chunked workers
    #[arg(long)]
    streaming: bool,

    /// Worker threads for the chunked strategy
    #[arg(long, default_value_t = 4)]
    workers: usize,

    /// Lines per chunk (default: 1000 for daily, 10000 for emojis/mentions)
    #[arg(long)]
    lines_per_chunk: Option<usize>,

    /// Number of entries per report
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Write TSV rows to this file instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,

    /// Suppress the progress bar
    #[arg(long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Report {
    Daily,
    Emojis,
    Mentions,
    All,
}

fn main() -> Result<()> {
    let args = Args::parse();
    tweetop::init_tracing_once();

    let mut top = TweetTop::new()
        .workers(args.workers)
        .top_k(args.top)
        .progress(!args.quiet);
    if args.streaming {
        top = top.strategy(Strategy::Streaming);
    }
    if let Some(lines) = args.lines_per_chunk {
        top = top.lines_per_chunk(lines);
    }

    let mut out: Box<dyn Write> = match &args.out {
        Some(path) => Box::new(BufWriter::new(create_with_backoff(path, 16, 50)?)),
        None => Box::new(std::io::stdout().lock()),
    };
    let multi = args.report == Report::All;

    if matches!(args.report, Report::Daily | Report::All) {
        if multi {
            writeln!(out, "# daily")?;
        }
        for row in top.daily_top_authors(&args.input)? {
            writeln!(out, "{}\t{}\t{}", row.date, row.username, row.count)?;
        }
    }
    if matches!(args.report, Report::Emojis | Report::All) {
        if multi {
            writeln!(out, "# emojis")?;
        }
        for (glyph, count) in top.top_emojis(&args.input)? {
            writeln!(out, "{}\t{}", glyph, count)?;
        }
    }
    if matches!(args.report, Report::Mentions | Report::All) {
        if multi {
            writeln!(out, "# mentions")?;
        }
        for (username, count) in top.top_mentions(&args.input)? {
            writeln!(out, "{}\t{}", username, count)?;
        }
    }
    out.flush()?;
    Ok(())
}
