use std::num::NonZeroUsize;

/// Side effects requested by the harvest loop. The driver executes them in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestEffect<R> {
    FetchPage {
        offset: usize,
        page_length: NonZeroUsize,
    },
    /// The accumulated result, moved out of the state. Emitted at most once per run.
    Persist { records: Vec<R> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractorEffect {
    ExtractLinks { html: String },
    ExportCsv { json: String },
}
