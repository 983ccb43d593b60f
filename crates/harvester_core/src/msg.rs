#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestMsg<R> {
    /// Begin the run at offset 0.
    Start,
    /// A page request completed and decoded.
    PageLoaded { offset: usize, records: Vec<R> },
    /// A page request failed; the run aborts without persisting.
    PageFailed { offset: usize, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractorMsg {
    /// User replaced the HTML input.
    InputChanged(String),
    /// User asked for the links in the current input.
    ExtractRequested,
    /// Engine produced the JSON link array.
    LinksExtracted { json: String, count: usize },
    /// Engine rejected the input (no links, parse problems).
    ExtractionFailed { message: String },
    /// User asked for a CSV export of the current output.
    ExportRequested,
    /// Engine wrote the CSV file.
    CsvExported { path: String },
    /// Engine could not build or write the CSV file.
    CsvExportFailed { message: String },
    /// User cleared input and output.
    ClearRequested,
    /// Fallback for unrecognized input.
    NoOp,
}
