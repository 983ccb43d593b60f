#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractorViewModel {
    pub input: String,
    /// Pretty JSON array of the last successful extraction.
    pub output: Option<String>,
    pub link_count: usize,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub dirty: bool,
}
