/// Execution strategy toggle: one-pass low-memory fold, or chunked parallel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    Streaming,
    Chunked,
}

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct TopOptions {
    pub strategy: Strategy,
    pub lines_per_chunk: Option<usize>, // None -> the analysis's own default
    pub num_workers: usize,
    pub top_k: usize,
    pub progress: bool,                 // show progress bar
    pub progress_label: Option<String>, // optional label for progress bar

    // IO tuning
    pub read_buffer_bytes: usize, // BufReader capacity
}

impl Default for TopOptions {
    fn default() -> Self {
        // Read buffer chosen to be safe but noticeably faster than the std
        // default. Adjust at runtime via the io builder method.
        let default_read = 256 * 1024;

        Self {
            strategy: Strategy::Chunked,
            lines_per_chunk: None,
            num_workers: 4,
            top_k: 10,
            progress: true,
            progress_label: None,

            read_buffer_bytes: default_read,
        }
    }
}

impl TopOptions {
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }
    pub fn with_lines_per_chunk(mut self, lines: usize) -> Self {
        self.lines_per_chunk = Some(lines);
        self
    }
    pub fn with_num_workers(mut self, workers: usize) -> Self {
        self.num_workers = workers;
        self
    }
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = Some(label.into());
        self
    }

    // IO buffer tuning
    pub fn with_io_read_buffer(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes.max(8 * 1024);
        self
    }
}
